//! # confirm-gate
//!
//! An email-confirmation gate for user registration flows, with pluggable
//! storage and notification.
//!
//! ## Features
//!
//! - **Confirmation tokens** generated from a CSPRNG, stored hashed, single-use
//! - **Extensible store trait** for any database
//! - **Pluggable notifier** for any email transport
//! - **Lifecycle hooks** for issue/confirm events
//! - **Ready-made Axum routes** for the emailed link, resend, and admin override
//!
//! ## Quick Start
//!
//! First, implement the [`ConfirmStore`] trait for your database:
//!
//! ```rust,ignore
//! use confirm_gate::{ConfirmStore, ConfirmUser};
//!
//! #[derive(Clone)]
//! struct MyStore { /* your db pool */ }
//!
//! impl ConfirmStore for MyStore {
//!     type User = MyUser;
//!     type Error = MyError;
//!
//!     // ... implement methods
//! }
//! ```
//!
//! Then create a `ConfirmGate` instance and add routes:
//!
//! ```rust,ignore
//! use confirm_gate::{ConfirmGate, ConfirmConfig};
//! use axum::Router;
//!
//! let store = MyStore::new();
//! let gate = ConfirmGate::new(ConfirmConfig::from_env()?, store)?
//!     .with_notifier(MySmtpNotifier::new());
//!
//! let app = Router::new()
//!     .merge(gate.routes())
//!     // wrap admin routes in your own authorization + anti-forgery layers
//!     .merge(gate.admin_routes());
//! ```
//!
//! On registration, the host calls [`ConfirmGate::confirmation_send`] for the
//! new user; the emailed link lands on `GET /confirm/email` which consumes the
//! token and marks the account confirmed.
//!
//! ## Endpoints
//!
//! - `POST /confirm/email/send` - (Re)send a confirmation email
//! - `GET /confirm/email?user=..&token=..` - Consume an emailed confirmation link
//! - `GET /admin/confirmations` - List per-user confirmation status
//! - `POST /admin/confirmations/confirm` - Manually confirm an account
//!
//! The admin endpoints carry no authorization of their own; the host must
//! guard them with its own access control and anti-forgery checks.
//!
//! ## Hooks
//!
//! Use hooks to run custom logic after confirmation events:
//!
//! ```rust,ignore
//! use confirm_gate::{ConfirmGate, ConfirmHooks, ConfirmUser};
//!
//! #[derive(Clone)]
//! struct MyHooks;
//!
//! impl<U: ConfirmUser> ConfirmHooks<U> for MyHooks {
//!     fn on_confirm(&self, user: &U) -> impl std::future::Future<Output = ()> + Send {
//!         let user_id = user.id();
//!         async move {
//!             // Unlock course access, sign the user in, etc.
//!             println!("Account confirmed: {user_id}");
//!         }
//!     }
//! }
//!
//! let gate = ConfirmGate::new(config, store)?.with_hooks(MyHooks);
//! ```

mod config;
mod email;
mod error;
pub mod handlers;
mod link;
mod notifier;
pub mod openapi;
mod service;
mod store;
pub mod testing;
pub mod token;

use axum::Router;
use std::future::Future;
use std::sync::Arc;

pub use config::{ConfirmConfig, ConfirmConfigError};
pub use error::{ConfirmError, ConfirmErrorResponse};
pub use link::confirmation_link_build;
pub use notifier::{Notifier, NotifyError};
pub use store::{ConfirmStatus, ConfirmStore, ConfirmUser};

/// Hooks for confirmation lifecycle events (token issue, account confirm).
///
/// Implement this trait to run custom logic after confirmation events, such
/// as unlocking content or establishing a session for the confirmed user.
///
/// # Example
///
/// ```rust,ignore
/// use confirm_gate::{ConfirmHooks, ConfirmUser};
///
/// #[derive(Clone)]
/// struct MyHooks;
///
/// impl<U: ConfirmUser> ConfirmHooks<U> for MyHooks {
///     fn on_confirm(&self, user: &U) -> impl std::future::Future<Output = ()> + Send {
///         let user_id = user.id();
///         async move { println!("User {user_id} confirmed their email!"); }
///     }
/// }
/// ```
pub trait ConfirmHooks<U: ConfirmUser>: Send + Sync + Clone + 'static {
    /// Called after a confirmation token is issued for a user.
    fn on_issue(&self, _user: &U) -> impl Future<Output = ()> + Send {
        async {}
    }

    /// Called after a user becomes confirmed, whether via token verification
    /// or an administrative override.
    fn on_confirm(&self, _user: &U) -> impl Future<Output = ()> + Send {
        async {}
    }
}

impl<U: ConfirmUser> ConfirmHooks<U> for () {}

/// Email-confirmation gate over an injected store and notifier. Cheap to clone.
///
/// # Type Parameters
///
/// - `S`: The store implementing [`ConfirmStore`]
/// - `H`: Optional hooks implementing [`ConfirmHooks`] (defaults to `()`)
/// - `N`: Optional notifier implementing [`Notifier`] (defaults to `()`, a no-op)
///
/// # Example
///
/// ```rust,ignore
/// use confirm_gate::{ConfirmGate, ConfirmConfig};
///
/// let gate = ConfirmGate::new(ConfirmConfig::from_env()?, store)?;
///
/// // With a real notifier and hooks
/// let gate = ConfirmGate::new(config, store)?
///     .with_notifier(smtp)
///     .with_hooks(MyHooks);
/// ```
#[derive(Clone)]
pub struct ConfirmGate<S: ConfirmStore, H: ConfirmHooks<S::User> = (), N: Notifier = ()> {
    config: Arc<ConfirmConfig>,
    store: S,
    hooks: H,
    notifier: N,
}

impl<S: ConfirmStore> ConfirmGate<S, (), ()> {
    /// Create a gate with default (no-op) hooks and notifier.
    pub fn new(config: ConfirmConfig, store: S) -> Result<Self, ConfirmConfigError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            store,
            hooks: (),
            notifier: (),
        })
    }
}

impl<S: ConfirmStore, H: ConfirmHooks<S::User>, N: Notifier> ConfirmGate<S, H, N> {
    /// Attach custom lifecycle hooks.
    pub fn with_hooks<NewH: ConfirmHooks<S::User>>(self, hooks: NewH) -> ConfirmGate<S, NewH, N> {
        ConfirmGate {
            config: self.config,
            store: self.store,
            hooks,
            notifier: self.notifier,
        }
    }

    /// Attach a notifier for outgoing confirmation emails.
    pub fn with_notifier<NewN: Notifier>(self, notifier: NewN) -> ConfirmGate<S, H, NewN> {
        ConfirmGate {
            config: self.config,
            store: self.store,
            hooks: self.hooks,
            notifier,
        }
    }

    /// Returns a router with the user-facing confirmation endpoints.
    ///
    /// Endpoints:
    /// - `POST /confirm/email/send`
    /// - `GET /confirm/email`
    pub fn routes<St>(&self) -> Router<St>
    where
        St: Clone + Send + Sync + 'static,
    {
        Router::new()
            .merge(handlers::confirm_email_routes::<S, H, N>())
            .with_state(self.clone())
    }

    /// Returns a router with the admin confirmation endpoints.
    ///
    /// These are kept separate from [`routes`](Self::routes) so the host can
    /// wrap them in its own authorization and anti-forgery layers.
    ///
    /// Endpoints:
    /// - `GET /admin/confirmations`
    /// - `POST /admin/confirmations/confirm`
    pub fn admin_routes<St>(&self) -> Router<St>
    where
        St: Clone + Send + Sync + 'static,
    {
        Router::new()
            .merge(handlers::admin_confirmation_routes::<S, H, N>())
            .with_state(self.clone())
    }

    /// Returns a reference to the gate configuration.
    pub fn config(&self) -> &ConfirmConfig {
        &self.config
    }

    /// Returns a reference to the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a reference to the notifier.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub(crate) fn hooks(&self) -> &H {
        &self.hooks
    }
}
