//! Credential adapters: password hashing and signed identity tokens.

mod jwt;
mod password;

pub use jwt::{JwtTokenIssuer, TokenSigningKey};
pub use password::Argon2PasswordHasher;
