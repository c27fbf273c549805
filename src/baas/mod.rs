//! BaaS — client for the hosted backend that owns accounts and storage.
//!
//! DESIGN
//! ======
//! Every authentication and data operation is a pass-through to the hosted
//! service. Handlers and services depend on the object-safe [`Backend`]
//! trait; [`BaasClient`] speaks the service's REST protocol and tests swap
//! in an in-memory implementation.

pub mod client;
pub mod config;
#[cfg(test)]
pub mod memory;
pub mod query;
pub mod types;

pub use client::BaasClient;
pub use query::Query;
pub use types::{Access, AuthSession, AuthUser, BaasError, Backend, Credentials, SignUpOutcome};
