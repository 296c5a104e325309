//! Whitelist-gated authentication for the Reel admin panel.
//!
//! The pieces, leaf to root:
//!
//! - [`identity::IdentityProvider`]: the external sign-in boundary.
//! - [`whitelist::Whitelist`]: fail-closed "is this email an admin" check.
//! - [`controller::AuthController`]: the session/authorization state machine.
//! - [`guard::RouteGuard`]: admits or redirects administrative views.
//!
//! Nothing here is global; every piece is constructed and injected, so the
//! controller can be exercised with fake providers and stores.

#![allow(async_fn_in_trait)]

pub mod controller;
pub mod error;
pub mod guard;
pub mod identity;
pub mod navigation;
pub mod state;
pub mod whitelist;

pub use controller::{AuthController, SignInOutcome};
pub use error::ProviderError;
pub use guard::{GuardDecision, RouteGuard};
pub use state::{AuthState, Denial, DenialReason};
