//! # Lockout Axum Integration
//!
//! This crate puts the [`lockout_core::LockoutTracker`] in front of an Axum login
//! route and exposes administrative routes for support staff.
//!
//! ## Features
//!
//! - **Login guard**: rejects locked identities with `429 Too Many Requests`
//!   before credentials are checked, reports remaining attempts in a response
//!   header, and records the handler's outcome
//! - **Admin routes**: inspect or clear the state of one identity
//! - **Security events**: failures, locks and unlocks are dispatched through an
//!   [`EventBus`](lockout_core::EventBus)
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use axum::{Router, routing::post, middleware::from_fn_with_state};
//! use lockout_core::{LockoutConfig, LockoutTracker, SystemClock};
//! use lockout_axum::{LockoutState, admin_router, login_guard};
//!
//! #[tokio::main]
//! async fn main() {
//!     let tracker = Arc::new(LockoutTracker::new(LockoutConfig::default()));
//!     let state = LockoutState::new(tracker.clone());
//!
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     tracker.spawn_sweeper(shutdown_rx);
//!
//!     let app = Router::new()
//!         .route("/auth/login", post(login_handler))
//!         .layer(from_fn_with_state(state.clone(), login_guard::<SystemClock>));
//!
//!     // Serve on an internal listener
//!     let _admin = admin_router(state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//!
//! async fn login_handler() -> &'static str {
//!     "ok"
//! }
//! ```

mod error;
mod extractors;
mod middleware;
mod routes;
mod types;

pub use error::{LockoutError, Result};
pub use extractors::LoginIdentity;
pub use middleware::{LockoutState, login_guard, login_outcome};
pub use routes::admin_router;
pub use types::{
    ClearResponse, GuardConfig, LockedResponse, REMAINING_ATTEMPTS_HEADER, RecordStatusResponse,
    TrackerSummaryResponse,
};
