//! Admin handlers: confirmation status listing and manual override.
//!
//! These routes carry no authorization of their own. The host must wrap
//! them in its own access-control and anti-forgery layers before exposing
//! them, the same way it guards the rest of its admin surface.

use crate::{
    ConfirmGate, ConfirmHooks, ConfirmStatus, ConfirmStore, ConfirmUser, Notifier,
    error::ConfirmError,
};
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

pub const ADMIN_CONFIRMATIONS_PATH: &str = "/admin/confirmations";
pub const ADMIN_CONFIRM_PATH: &str = "/admin/confirmations/confirm";

#[derive(OpenApi)]
#[openapi(
    paths(admin_confirmations_list, admin_confirm_user),
    components(schemas(
        ConfirmationRow,
        AdminConfirmRequest,
        AdminConfirmResponse,
        crate::error::ConfirmErrorResponse
    ))
)]
pub(crate) struct AdminConfirmationsApi;

/// Returns routes for the admin confirmation endpoints.
pub fn admin_confirmation_routes<S: ConfirmStore, H: ConfirmHooks<S::User>, N: Notifier>()
-> Router<ConfirmGate<S, H, N>> {
    Router::new()
        .route(
            ADMIN_CONFIRMATIONS_PATH,
            get(admin_confirmations_list::<S, H, N>),
        )
        .route(ADMIN_CONFIRM_PATH, post(admin_confirm_user::<S, H, N>))
}

/// One row of the admin confirmation listing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConfirmationRow {
    /// User ID.
    pub user: Uuid,
    /// User email.
    pub email: String,
    /// Current confirmation status.
    pub status: ConfirmStatus,
}

/// Request body for manually confirming an account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminConfirmRequest {
    /// User to confirm.
    pub user: Uuid,
}

/// Response for a manual confirmation.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminConfirmResponse {
    /// Success message.
    pub message: String,
}

/// List every user's confirmation status.
#[utoipa::path(
    get,
    path = "",
    responses(
        (status = OK, body = [ConfirmationRow]),
        (status = INTERNAL_SERVER_ERROR, body = crate::error::ConfirmErrorResponse)
    )
)]
pub async fn admin_confirmations_list<S: ConfirmStore, H: ConfirmHooks<S::User>, N: Notifier>(
    State(gate): State<ConfirmGate<S, H, N>>,
) -> Result<Json<Vec<ConfirmationRow>>, ConfirmError> {
    let rows = gate
        .statuses_list()
        .await?
        .iter()
        .map(|user| ConfirmationRow {
            user: user.id(),
            email: user.email().to_owned(),
            status: user.confirmation_status(),
        })
        .collect();

    Ok(Json(rows))
}

/// Manually confirm an account, bypassing token verification.
///
/// Idempotent: confirming an already-confirmed account is a no-op success.
#[utoipa::path(
    post,
    path = "/confirm",
    request_body = AdminConfirmRequest,
    responses(
        (status = OK, body = AdminConfirmResponse),
        (status = NOT_FOUND, body = crate::error::ConfirmErrorResponse),
        (status = INTERNAL_SERVER_ERROR, body = crate::error::ConfirmErrorResponse)
    )
)]
pub async fn admin_confirm_user<S: ConfirmStore, H: ConfirmHooks<S::User>, N: Notifier>(
    State(gate): State<ConfirmGate<S, H, N>>,
    Json(req): Json<AdminConfirmRequest>,
) -> Result<Json<AdminConfirmResponse>, ConfirmError> {
    gate.confirm_force(req.user).await?;

    Ok(Json(AdminConfirmResponse {
        message: "Account confirmed.".to_string(),
    }))
}
