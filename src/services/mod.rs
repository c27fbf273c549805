//! Domain services used by the page and API routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own validation and backend calls so route handlers can
//! stay focused on form/header translation and cookie plumbing.

pub mod auth;
pub mod issues;
