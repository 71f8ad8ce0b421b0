//! Client library for the Warframe mobile account API.
//!
//! The mobile service is stateful: login issues a session (account id +
//! nonce) that session-backed calls present as form data, and logout
//! invalidates it. Passwords are never sent in the clear; the service
//! expects a Whirlpool digest. [`SessionClient`] owns that whole lifecycle
//! and maps the service's ad hoc HTTP failures into [`ApiError`] variants
//! callers can match on.
//!
//! ```no_run
//! use warframe_api::SessionClient;
//!
//! # async fn run() -> Result<(), warframe_api::ApiError> {
//! let mut client = SessionClient::new("tenno@example.com", "hunter2")?;
//! client.login().await?;
//! let inventory = client.get_inventory().await?;
//! println!("{} top-level entries", inventory.len());
//! client.logout().await?;
//! # Ok(())
//! # }
//! ```

#![allow(async_fn_in_trait)]

pub mod api;
pub mod auth;

pub use api::{ApiError, SessionClient, TransportError};
pub use auth::SessionState;
