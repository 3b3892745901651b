//! Warden Types - Shared domain types
//!
//! This crate contains domain types used across warden crates:
//! - User identity and credentials
//! - Provisioned API keys and the applications they belong to

pub mod api_key;
pub mod user;

pub use api_key::*;
pub use user::*;
