//! Store trait abstraction for host-agnostic confirmation state.
//!
//! This module defines the core traits that allow `confirm-gate` to work with
//! any database or user-attribute storage the host platform provides.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use utoipa::ToSchema;
use uuid::Uuid;

/// Confirmation state of a user account.
///
/// `Confirmed` is terminal: there is no re-confirmation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmStatus {
    /// Account created, confirmation still pending.
    Unconfirmed,
    /// Account confirmed via token verification or admin override.
    Confirmed,
}

impl ConfirmStatus {
    /// Convert to string for storage as a user attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unconfirmed => "unconfirmed",
            Self::Confirmed => "confirmed",
        }
    }

    /// Whether this status is the terminal confirmed state.
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

/// Minimal user interface required by confirm-gate.
///
/// Implement this trait for your user type to use with [`ConfirmStore`].
/// This decouples the gate from any specific user schema.
///
/// # Example
///
/// ```rust,ignore
/// use confirm_gate::{ConfirmStatus, ConfirmUser};
/// use uuid::Uuid;
///
/// #[derive(Clone)]
/// struct MyUser {
///     id: Uuid,
///     email: String,
///     confirmed: bool,
///     // ... your custom fields
/// }
///
/// impl ConfirmUser for MyUser {
///     fn id(&self) -> Uuid { self.id }
///     fn email(&self) -> &str { &self.email }
///     fn confirmation_status(&self) -> ConfirmStatus {
///         if self.confirmed { ConfirmStatus::Confirmed } else { ConfirmStatus::Unconfirmed }
///     }
/// }
/// ```
pub trait ConfirmUser: Send + Sync + Clone {
    /// Returns the user's unique identifier.
    fn id(&self) -> Uuid;

    /// Returns the user's email address.
    fn email(&self) -> &str;

    /// Returns the user's confirmation status.
    fn confirmation_status(&self) -> ConfirmStatus;
}

/// Storage trait for confirmation state.
///
/// Implement this trait to attach confirm-gate to any database or
/// key-value user-attribute store. The gate only ever hands the store a
/// SHA-256 hash of a token, never the raw token.
///
/// # Type Parameters
///
/// * `User` - Your user type implementing [`ConfirmUser`]
/// * `Error` - Your error type for storage operations
pub trait ConfirmStore: Clone + Send + Sync + 'static {
    /// The user type stored in this store.
    type User: ConfirmUser;

    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Find a user by their unique ID.
    ///
    /// Returns `None` if no user exists with the given ID.
    fn user_get_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<Self::User>, Self::Error>> + Send;

    /// Find a user by email address.
    ///
    /// Returns `None` if no user exists with the given email.
    fn user_find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<Self::User>, Self::Error>> + Send;

    /// List all users with their confirmation status, for the admin overview.
    fn user_list(&self) -> impl Future<Output = Result<Vec<Self::User>, Self::Error>> + Send;

    /// Store a new confirmation token hash for a user.
    ///
    /// Sets the user's status to [`ConfirmStatus::Unconfirmed`] and replaces
    /// any previously stored token hash, invalidating the prior token.
    /// `expires_at` is `None` when tokens are configured to never expire.
    fn token_issue(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Atomically compare-and-clear the stored token hash.
    ///
    /// On a match against a non-expired stored hash: clear the token, set the
    /// status to [`ConfirmStatus::Confirmed`], and return `true`. On mismatch,
    /// absent, or expired token: leave state untouched and return `false`.
    ///
    /// The compare-and-clear must be atomic per user record (a per-user lock
    /// or a conditional update against the backing store), so that two
    /// concurrent verifications of the same token cannot both succeed. The
    /// hash comparison must run in constant time; see
    /// [`token_hash_matches`](crate::token::token_hash_matches).
    fn token_consume(
        &self,
        user_id: Uuid,
        token_hash: &str,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Unconditionally mark a user confirmed and clear any pending token.
    ///
    /// Must not fail when the user is already confirmed.
    fn confirm_force(&self, user_id: Uuid) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
