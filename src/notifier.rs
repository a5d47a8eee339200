//! Message delivery abstraction for confirm-gate.
//!
//! Implement [`Notifier`] to provide email delivery for the confirmation
//! flow. Delivery is fire-and-forget: a failed send is surfaced to the
//! caller but never rolls back a token that was already persisted.

use std::future::Future;
use thiserror::Error;

/// Error type for notification delivery.
#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    /// Failed to deliver the message.
    #[error("delivery failed: {0}")]
    Delivery(String),

    /// Transport-level error (SMTP, HTTP API, ...).
    #[error("transport error: {0}")]
    Transport(String),
}

/// Trait for async message delivery.
///
/// Implement this to hand confirm-gate an email transport. The default
/// implementation (`()`) is a no-op that silently succeeds.
///
/// # Example
///
/// ```rust,ignore
/// use confirm_gate::{Notifier, NotifyError};
///
/// #[derive(Clone)]
/// struct MySmtpNotifier { /* ... */ }
///
/// impl Notifier for MySmtpNotifier {
///     async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
///         // Queue or send email
///         Ok(())
///     }
/// }
/// ```
pub trait Notifier: Send + Sync + Clone + 'static {
    /// Send a message asynchronously.
    ///
    /// Implementations may queue messages for background delivery or send
    /// immediately.
    fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// No-op notifier (default).
impl Notifier for () {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}
