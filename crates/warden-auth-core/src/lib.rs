//! Warden Auth Core - Authentication business logic
//!
//! Issuance and verification of HS256-signed access tokens, the minimum
//! entropy policy on the signing secret, password hashing and verification,
//! the per-request API-key admission gate, and the login flow tying them
//! together.
//!
//! Every operation here is a pure function of its inputs: the secret, the
//! current time (see [`Clock`]) and the key or user stores are passed in, so
//! the core holds no process-wide state.

pub mod api_key;
pub mod clock;
pub mod config;
pub mod crypto;
pub mod error;
pub mod login;
pub mod password;
pub mod service;
pub mod token;

pub use api_key::*;
pub use clock::*;
pub use config::*;
pub use crypto::*;
pub use error::*;
pub use login::*;
pub use password::*;
pub use service::*;
pub use token::*;
