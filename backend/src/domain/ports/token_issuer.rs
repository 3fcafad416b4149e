//! Port for minting and verifying signed identity tokens.

use crate::domain::{Caller, IssuedToken};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// The token could not be signed.
        Signing { message: String } => "token signing failed: {message}",
        /// The token is malformed, tampered with or carries unknown claims.
        Invalid { message: String } => "token is invalid: {message}",
        /// The token's expiry has passed.
        Expired => "token has expired",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    /// Mint a token bound to the caller's id and role.
    fn issue(&self, caller: &Caller) -> Result<IssuedToken, TokenError>;

    /// Verify signature and expiry, returning the bound identity.
    fn verify(&self, token: &str) -> Result<Caller, TokenError>;
}
