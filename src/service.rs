//! Confirmation state operations: issue, send, verify, override.
//!
//! The state machine these operations drive:
//!
//! ```text
//!           token_issue
//!  (none) ----------------> Unconfirmed(token=T)
//!                               |  token_verify(token==T)  -> Confirmed(token=None)   [terminal]
//!                               |  token_verify(token!=T)  -> Unconfirmed(token=T)    [unchanged]
//!                               |  confirm_force()         -> Confirmed(token=None)   [terminal]
//!  Confirmed --- confirm_force() --> Confirmed   [no-op]
//!  Confirmed --- token_verify(*) --> TokenMismatch (no state change)
//! ```

use crate::{
    ConfirmGate, ConfirmHooks, ConfirmStore, ConfirmUser, Notifier,
    error::ConfirmError,
    link::{confirmation_link_build, confirmation_message_build},
    token::{token_generate, token_hash_sha256},
};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

impl<S: ConfirmStore, H: ConfirmHooks<S::User>, N: Notifier> ConfirmGate<S, H, N> {
    /// Issue a fresh confirmation token for a user.
    ///
    /// Generates a CSPRNG token, stores its SHA-256 hash (replacing and
    /// thereby invalidating any prior token), and sets the user's status to
    /// [`Unconfirmed`](crate::ConfirmStatus::Unconfirmed). Returns the raw
    /// token for embedding in a confirmation link; sends nothing itself.
    ///
    /// Returns [`ConfirmError::AlreadyConfirmed`] for a confirmed user:
    /// confirmed is terminal, and re-issuing is only meaningful through an
    /// explicit re-registration path the host would own.
    pub async fn token_issue(&self, user_id: Uuid) -> Result<String, ConfirmError> {
        let user = self.user_require(user_id).await?;
        if user.confirmation_status().is_confirmed() {
            return Err(ConfirmError::AlreadyConfirmed);
        }

        let token = token_generate();
        let hash = token_hash_sha256(&token);
        let expires_at = self.token_expiry_calculate()?;

        self.store()
            .token_issue(user_id, &hash, expires_at)
            .await
            .map_err(ConfirmError::from_store)?;

        self.hooks().on_issue(&user).await;

        Ok(token)
    }

    /// Issue a confirmation token and email the confirmation link to the user.
    ///
    /// Token persistence errors are returned to the caller. A notifier
    /// failure surfaces as [`ConfirmError::NotificationFailed`] but does not
    /// roll back the token, which was already persisted; a later resend
    /// simply replaces it.
    ///
    /// No-op `Ok` when the user is already confirmed.
    pub async fn confirmation_send(&self, user_id: Uuid) -> Result<(), ConfirmError> {
        let user = self.user_require(user_id).await?;
        if user.confirmation_status().is_confirmed() {
            return Ok(());
        }

        let token = self.token_issue(user_id).await?;
        let link = confirmation_link_build(self.config(), user_id, &token);
        let (subject, body) = confirmation_message_build(self.config(), &link);

        if let Err(e) = self.notifier().send(user.email(), &subject, &body).await {
            tracing::error!(error = %e, user_id = %user_id, "Failed to send confirmation email");
            return Err(ConfirmError::NotificationFailed(e.to_string()));
        }

        Ok(())
    }

    /// Verify a supplied confirmation token for a user.
    ///
    /// Hashes the supplied token and asks the store for an atomic
    /// compare-and-clear against the stored hash. On a match the user
    /// transitions to confirmed, the token is consumed, and `on_confirm`
    /// hooks fire.
    ///
    /// Mismatch, expired token, or no pending token (including replay of an
    /// already-consumed token) returns [`ConfirmError::TokenMismatch`] and
    /// leaves state untouched. Replay after a successful confirmation is
    /// therefore a mismatch, never a re-confirmation.
    pub async fn token_verify(&self, user_id: Uuid, supplied: &str) -> Result<(), ConfirmError> {
        let user = self.user_require(user_id).await?;

        let hash = token_hash_sha256(supplied);
        let consumed = self
            .store()
            .token_consume(user_id, &hash)
            .await
            .map_err(ConfirmError::from_store)?;

        if !consumed {
            return Err(ConfirmError::TokenMismatch);
        }

        self.hooks().on_confirm(&user).await;

        Ok(())
    }

    /// Administratively confirm a user, clearing any pending token.
    ///
    /// No-op `Ok` when the user is already confirmed; `on_confirm` hooks
    /// fire only on an actual transition. The caller must guard this with
    /// its own authorization and anti-forgery checks.
    pub async fn confirm_force(&self, user_id: Uuid) -> Result<(), ConfirmError> {
        let user = self.user_require(user_id).await?;
        if user.confirmation_status().is_confirmed() {
            return Ok(());
        }

        self.store()
            .confirm_force(user_id)
            .await
            .map_err(ConfirmError::from_store)?;

        self.hooks().on_confirm(&user).await;

        Ok(())
    }

    /// Whether the user's account is confirmed. Pure read, no side effects.
    pub async fn is_confirmed(&self, user_id: Uuid) -> Result<bool, ConfirmError> {
        let user = self.user_require(user_id).await?;
        Ok(user.confirmation_status().is_confirmed())
    }

    /// List every user with their confirmation status, for the admin overview.
    pub async fn statuses_list(&self) -> Result<Vec<S::User>, ConfirmError> {
        self.store()
            .user_list()
            .await
            .map_err(ConfirmError::from_store)
    }

    fn token_expiry_calculate(&self) -> Result<Option<DateTime<Utc>>, ConfirmError> {
        match self.config().token_expiry {
            Some(ttl) => {
                let ttl = Duration::from_std(ttl)
                    .map_err(|_| ConfirmError::Internal("token expiry overflow".to_string()))?;
                Ok(Some(Utc::now() + ttl))
            }
            None => Ok(None),
        }
    }

    async fn user_require(&self, user_id: Uuid) -> Result<S::User, ConfirmError> {
        self.store()
            .user_get_by_id(user_id)
            .await
            .map_err(ConfirmError::from_store)?
            .ok_or(ConfirmError::UserNotFound)
    }
}
