//! HTTP handlers

mod auth;
mod health;

pub use auth::{login, me, register};
pub use health::health;
