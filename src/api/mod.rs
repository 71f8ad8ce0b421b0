//! Client module for the Warframe mobile API.
//!
//! This module provides the `SessionClient` for the service's stateful
//! login/logout/request cycle, the typed `ApiError` taxonomy its failures
//! classify into, and the `Transport` boundary the client talks through.

pub mod client;
pub mod error;
pub mod transport;

pub use client::SessionClient;
pub use error::{ApiError, TransportError};
pub use transport::{HttpTransport, RequestBody, Transport};
