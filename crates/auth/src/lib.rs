//! `staffgate-auth` — authentication boundary: claims, tokens, passwords.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod claims;
pub mod password;
pub mod token;

pub use claims::{Claims, TokenValidationError, validate_claims, TOKEN_TTL_HOURS};
pub use password::{hash_password, verify_password, PasswordError};
pub use token::{Hs256TokenCodec, TokenError, TokenVerifier};
