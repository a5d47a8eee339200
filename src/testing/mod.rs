//! Test doubles for exercising confirm-gate without a real database or
//! email transport.
//!
//! [`MemoryStore`] is a mutex-guarded in-memory [`ConfirmStore`] whose
//! `token_consume` performs the same atomic compare-and-clear contract a
//! production store must provide. [`RecordingNotifier`] captures outgoing
//! mail for assertions; [`FailingNotifier`] always fails, for exercising the
//! no-rollback-on-send-failure behavior.
//!
//! These doubles back both this crate's own test suites and host projects
//! that want to test their integration without standing up infrastructure.
//!
//! # Example
//!
//! ```ignore
//! use confirm_gate::{ConfirmConfig, ConfirmGate};
//! use confirm_gate::testing::{MemoryStore, RecordingNotifier};
//!
//! let store = MemoryStore::new();
//! let outbox = RecordingNotifier::new();
//! let gate = ConfirmGate::new(config, store.clone())?
//!     .with_notifier(outbox.clone());
//!
//! let user = store.user_insert("alice@example.com");
//! gate.confirmation_send(user.id).await?;
//! assert_eq!(outbox.sent().len(), 1);
//! ```

use crate::notifier::{Notifier, NotifyError};
use crate::store::{ConfirmStatus, ConfirmStore, ConfirmUser};
use crate::token::token_hash_matches;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// In-memory user record.
#[derive(Debug, Clone)]
pub struct MemoryUser {
    /// User ID.
    pub id: Uuid,
    /// User email.
    pub email: String,
    /// Current confirmation status.
    pub status: ConfirmStatus,
    /// SHA-256 hash of the pending confirmation token, if any.
    pub token_hash: Option<String>,
    /// When the pending token expires; `None` means it never does.
    pub token_expires_at: Option<DateTime<Utc>>,
}

impl ConfirmUser for MemoryUser {
    fn id(&self) -> Uuid {
        self.id
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn confirmation_status(&self) -> ConfirmStatus {
        self.status
    }
}

/// Mutex-guarded in-memory [`ConfirmStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Arc<Mutex<HashMap<Uuid, MemoryUser>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an unconfirmed user with no pending token and return it.
    pub fn user_insert(&self, email: &str) -> MemoryUser {
        let user = MemoryUser {
            id: Uuid::new_v4(),
            email: email.to_owned(),
            status: ConfirmStatus::Unconfirmed,
            token_hash: None,
            token_expires_at: None,
        };
        self.users
            .lock()
            .expect("memory store lock")
            .insert(user.id, user.clone());
        user
    }

    /// Snapshot a user record for assertions.
    pub fn user_get(&self, user_id: Uuid) -> Option<MemoryUser> {
        self.users
            .lock()
            .expect("memory store lock")
            .get(&user_id)
            .cloned()
    }

    /// Backdate a pending token's expiry so it reads as expired.
    pub fn token_expire(&self, user_id: Uuid) {
        let mut users = self.users.lock().expect("memory store lock");
        if let Some(user) = users.get_mut(&user_id) {
            user.token_expires_at = Some(Utc::now() - Duration::minutes(1));
        }
    }
}

impl ConfirmStore for MemoryStore {
    type User = MemoryUser;
    type Error = Infallible;

    async fn user_get_by_id(&self, id: Uuid) -> Result<Option<MemoryUser>, Infallible> {
        Ok(self.user_get(id))
    }

    async fn user_find_by_email(&self, email: &str) -> Result<Option<MemoryUser>, Infallible> {
        let users = self.users.lock().expect("memory store lock");
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn user_list(&self) -> Result<Vec<MemoryUser>, Infallible> {
        let users = self.users.lock().expect("memory store lock");
        let mut list: Vec<_> = users.values().cloned().collect();
        list.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(list)
    }

    async fn token_issue(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), Infallible> {
        let mut users = self.users.lock().expect("memory store lock");
        if let Some(user) = users.get_mut(&user_id) {
            user.status = ConfirmStatus::Unconfirmed;
            user.token_hash = Some(token_hash.to_owned());
            user.token_expires_at = expires_at;
        }
        Ok(())
    }

    async fn token_consume(&self, user_id: Uuid, token_hash: &str) -> Result<bool, Infallible> {
        // Compare-and-clear under the store lock: concurrent verifications
        // of the same token see the cleared hash and fail.
        let mut users = self.users.lock().expect("memory store lock");
        let Some(user) = users.get_mut(&user_id) else {
            return Ok(false);
        };
        let Some(stored) = user.token_hash.as_deref() else {
            return Ok(false);
        };
        if let Some(expires_at) = user.token_expires_at {
            if expires_at <= Utc::now() {
                return Ok(false);
            }
        }
        if !token_hash_matches(stored, token_hash) {
            return Ok(false);
        }

        user.token_hash = None;
        user.token_expires_at = None;
        user.status = ConfirmStatus::Confirmed;
        Ok(true)
    }

    async fn confirm_force(&self, user_id: Uuid) -> Result<(), Infallible> {
        let mut users = self.users.lock().expect("memory store lock");
        if let Some(user) = users.get_mut(&user_id) {
            user.token_hash = None;
            user.token_expires_at = None;
            user.status = ConfirmStatus::Confirmed;
        }
        Ok(())
    }
}

/// One message captured by [`RecordingNotifier`].
#[derive(Debug, Clone)]
pub struct SentMail {
    /// Recipient address.
    pub to: String,
    /// Message subject.
    pub subject: String,
    /// Message body.
    pub body: String,
}

/// Notifier that records every message instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<SentMail>>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything sent so far.
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().expect("notifier lock").clone()
    }
}

impl Notifier for RecordingNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        self.sent.lock().expect("notifier lock").push(SentMail {
            to: to.to_owned(),
            subject: subject.to_owned(),
            body: body.to_owned(),
        });
        Ok(())
    }
}

/// Notifier that fails every send.
#[derive(Debug, Clone, Default)]
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp connection refused".to_owned()))
    }
}
