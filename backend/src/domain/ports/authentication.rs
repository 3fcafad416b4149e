//! Driving port for registration, login and token checks.
//!
//! Inbound adapters call it to authenticate callers without importing the
//! credential store or token implementation.

use async_trait::async_trait;

use crate::domain::{Caller, Error, IssuedToken, LoginCredentials, Registration, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authentication: Send + Sync {
    /// Create an account and issue its first token.
    async fn register(&self, registration: Registration) -> Result<IssuedToken, Error>;

    /// Verify credentials and issue a token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<IssuedToken, Error>;

    /// Resolve a bearer token into the caller it was issued to.
    fn authenticate(&self, token: &str) -> Result<Caller, Error>;

    /// Load the caller's own user record.
    async fn current_user(&self, caller: &Caller) -> Result<User, Error>;
}
