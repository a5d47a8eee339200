use std::time::Duration;
use thiserror::Error;

/// Errors when loading or validating the gate configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfirmConfigError {
    /// Required environment variable was not provided.
    #[error("missing env var {0}")]
    MissingEnv(&'static str),

    /// Configuration failed validation checks.
    #[error("invalid confirm config: {0}")]
    Invalid(String),
}

/// Confirmation gate configuration.
#[derive(Debug, Clone)]
pub struct ConfirmConfig {
    /// Absolute base URL for emailed confirmation links
    /// (e.g., "https://app.example.com").
    pub link_base_url: String,

    /// Site name used in the confirmation email subject and body
    /// (default: "this site").
    pub site_name: String,

    /// Confirmation token lifetime. `None` means tokens never expire
    /// (default: None).
    pub token_expiry: Option<Duration>,
}

impl Default for ConfirmConfig {
    fn default() -> Self {
        Self {
            link_base_url: String::new(), // Must be provided by user
            site_name: "this site".to_string(),
            token_expiry: None,
        }
    }
}

impl ConfirmConfig {
    /// Build gate config from environment variables.
    ///
    /// Required:
    /// - `CONFIRM_LINK_BASE_URL`
    ///
    /// Optional:
    /// - `CONFIRM_SITE_NAME`
    /// - `CONFIRM_TOKEN_EXPIRY_SECS` (0 or unset: tokens never expire)
    pub fn from_env() -> Result<Self, ConfirmConfigError> {
        let mut cfg = Self::default();
        cfg.link_base_url = env_var_required("CONFIRM_LINK_BASE_URL")?;
        if let Some(v) = env_var_optional("CONFIRM_SITE_NAME") {
            cfg.site_name = v;
        }
        cfg.token_expiry = env_var_expiry_secs("CONFIRM_TOKEN_EXPIRY_SECS")?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfirmConfigError> {
        let base = self.link_base_url.trim();
        if base.is_empty() {
            return Err(ConfirmConfigError::Invalid(
                "link base URL cannot be empty".to_string(),
            ));
        }

        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(ConfirmConfigError::Invalid(
                "link base URL must be absolute (http:// or https://)".to_string(),
            ));
        }

        if self.site_name.trim().is_empty() {
            return Err(ConfirmConfigError::Invalid(
                "site name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn env_var_required(key: &'static str) -> Result<String, ConfirmConfigError> {
    std::env::var(key).map_err(|_| ConfirmConfigError::MissingEnv(key))
}

fn env_var_optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_var_expiry_secs(key: &str) -> Result<Option<Duration>, ConfirmConfigError> {
    match env_var_optional(key) {
        Some(v) => {
            let secs = v
                .parse::<u64>()
                .map_err(|_| ConfirmConfigError::Invalid(format!("{key} must be a valid u64")))?;
            Ok((secs > 0).then(|| Duration::from_secs(secs)))
        }
        _ => Ok(None),
    }
}
