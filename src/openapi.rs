//! OpenAPI generation for confirm-gate endpoints.

use std::path::{Path, PathBuf};

use crate::handlers;
use thiserror::Error;
use utoipa::OpenApi;

/// OpenAPI document for all confirm-gate HTTP endpoints.
#[derive(OpenApi)]
#[openapi(
    nest(
        (
            path = handlers::CONFIRM_EMAIL_PATH,
            api = handlers::confirm::ConfirmEmailApi,
            tags = ["confirmation"]
        ),
        (
            path = handlers::ADMIN_CONFIRMATIONS_PATH,
            api = handlers::admin::AdminConfirmationsApi,
            tags = ["admin"]
        )
    ),
    tags(
        (name = "confirmation", description = "Email confirmation flow"),
        (name = "admin", description = "Confirmation status listing and manual override")
    )
)]
pub struct ConfirmApiDoc;

/// OpenAPI generation and file-write errors.
#[derive(Debug, Error)]
pub enum OpenApiError {
    /// OpenAPI serialization failed.
    #[error("failed to serialize openapi spec: {0}")]
    Serialize(#[from] serde_yaml::Error),

    /// Creating the docs directory failed.
    #[error("failed to create docs directory at {path}: {source}")]
    CreateDir {
        /// Target directory path.
        path: PathBuf,
        /// I/O source error.
        #[source]
        source: std::io::Error,
    },

    /// Writing the OpenAPI file failed.
    #[error("failed to write openapi spec at {path}: {source}")]
    WriteFile {
        /// Target file path.
        path: PathBuf,
        /// I/O source error.
        #[source]
        source: std::io::Error,
    },
}

/// Build the OpenAPI document for confirm-gate.
pub fn openapi_build() -> utoipa::openapi::OpenApi {
    ConfirmApiDoc::openapi()
}

/// Generate the OpenAPI document as YAML.
pub fn openapi_yaml_generate() -> Result<String, OpenApiError> {
    Ok(serde_yaml::to_string(&openapi_build())?)
}

/// Write the OpenAPI YAML document to an arbitrary path.
pub fn openapi_yaml_write(path: impl AsRef<Path>) -> Result<(), OpenApiError> {
    let path = path.as_ref();
    let docs_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    std::fs::create_dir_all(&docs_dir).map_err(|source| OpenApiError::CreateDir {
        path: docs_dir.clone(),
        source,
    })?;

    let spec = openapi_yaml_generate()?;
    std::fs::write(path, spec).map_err(|source| OpenApiError::WriteFile {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

/// Write `confirm-gate/docs/openapi.yml` and return the written path.
pub fn openapi_yaml_write_default() -> Result<PathBuf, OpenApiError> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("docs")
        .join("openapi.yml");
    openapi_yaml_write(&path)?;
    Ok(path)
}
