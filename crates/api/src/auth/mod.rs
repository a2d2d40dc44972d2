//! Session issuing and verification primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- HS256 session-token issuing and verification.
//! - [`cookie`] -- the `authToken` session cookie.

pub mod cookie;
pub mod jwt;
pub mod password;
