//! Confirmation HTTP handlers.

pub mod admin;
pub mod confirm;

pub use admin::{
    ADMIN_CONFIRM_PATH, ADMIN_CONFIRMATIONS_PATH, AdminConfirmRequest, ConfirmationRow,
    admin_confirmation_routes,
};
pub use confirm::{
    CONFIRM_EMAIL_PATH, CONFIRM_EMAIL_SEND_PATH, ConfirmEmailQuery, ConfirmEmailSendRequest,
    confirm_email_routes,
};
