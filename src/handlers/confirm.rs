//! Handlers for the emailed confirmation link and the resend endpoint.

use crate::{
    ConfirmGate, ConfirmHooks, ConfirmStore, ConfirmUser, Notifier,
    email::email_normalize,
    error::ConfirmError,
};
use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};
use uuid::Uuid;

pub const CONFIRM_EMAIL_PATH: &str = "/confirm/email";
pub const CONFIRM_EMAIL_SEND_PATH: &str = "/confirm/email/send";

#[derive(OpenApi)]
#[openapi(
    paths(confirm_email_send, confirm_email_get),
    components(schemas(
        ConfirmEmailSendRequest,
        ConfirmEmailSendResponse,
        ConfirmEmailQuery,
        ConfirmEmailResponse,
        crate::error::ConfirmErrorResponse
    ))
)]
pub(crate) struct ConfirmEmailApi;

/// Returns routes for the email confirmation endpoints.
pub fn confirm_email_routes<S: ConfirmStore, H: ConfirmHooks<S::User>, N: Notifier>()
-> Router<ConfirmGate<S, H, N>> {
    Router::new()
        .route(CONFIRM_EMAIL_SEND_PATH, post(confirm_email_send::<S, H, N>))
        .route(CONFIRM_EMAIL_PATH, get(confirm_email_get::<S, H, N>))
}

/// Request body for (re)sending the confirmation email.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ConfirmEmailSendRequest {
    /// User's email address.
    pub email: String,
}

/// Response for (re)sending the confirmation email.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConfirmEmailSendResponse {
    /// Success message.
    pub message: String,
}

/// Query carried by emailed confirmation links.
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ConfirmEmailQuery {
    /// User the link was issued for.
    pub user: Uuid,
    /// Confirmation token from the email link.
    pub token: String,
}

/// Response for a consumed confirmation link.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConfirmEmailResponse {
    /// Success message.
    pub message: String,
}

/// Send a confirmation email to the user.
///
/// Issues a fresh token (invalidating any prior one) and emails the
/// confirmation link. Always returns success to prevent account enumeration;
/// notifier failures are logged, not exposed.
#[utoipa::path(
    post,
    path = "/send",
    request_body = ConfirmEmailSendRequest,
    responses(
        (status = OK, body = ConfirmEmailSendResponse),
        (status = BAD_REQUEST, body = crate::error::ConfirmErrorResponse),
        (status = INTERNAL_SERVER_ERROR, body = crate::error::ConfirmErrorResponse)
    )
)]
pub async fn confirm_email_send<S: ConfirmStore, H: ConfirmHooks<S::User>, N: Notifier>(
    State(gate): State<ConfirmGate<S, H, N>>,
    Json(req): Json<ConfirmEmailSendRequest>,
) -> Result<Json<ConfirmEmailSendResponse>, ConfirmError> {
    let email = email_normalize(&req.email)?;

    let user = gate
        .store()
        .user_find_by_email(&email)
        .await
        .map_err(ConfirmError::from_store)?;

    // Only send if the user exists; already-confirmed users get a no-op.
    if let Some(user) = user {
        if let Err(e) = gate.confirmation_send(user.id()).await {
            tracing::error!(error = %e, "Confirmation email not sent");
        }
    }

    // Always return success to prevent account enumeration
    Ok(Json(ConfirmEmailSendResponse {
        message: "If an account exists with that email, a confirmation link has been sent."
            .to_string(),
    }))
}

/// Confirm an account from a browser confirmation link
/// (`GET /confirm/email?user=...&token=...`).
#[utoipa::path(
    get,
    path = "",
    params(ConfirmEmailQuery),
    responses(
        (status = OK, body = ConfirmEmailResponse),
        (status = UNAUTHORIZED, body = crate::error::ConfirmErrorResponse),
        (status = NOT_FOUND, body = crate::error::ConfirmErrorResponse),
        (status = INTERNAL_SERVER_ERROR, body = crate::error::ConfirmErrorResponse)
    )
)]
pub async fn confirm_email_get<S: ConfirmStore, H: ConfirmHooks<S::User>, N: Notifier>(
    State(gate): State<ConfirmGate<S, H, N>>,
    Query(req): Query<ConfirmEmailQuery>,
) -> Result<Json<ConfirmEmailResponse>, ConfirmError> {
    gate.token_verify(req.user, &req.token).await?;

    Ok(Json(ConfirmEmailResponse {
        message: "Your email has been confirmed! Welcome!".to_string(),
    }))
}
