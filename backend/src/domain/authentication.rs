//! Authentication gate: registration, login and token resolution.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, error, info};

use crate::domain::ports::{
    Authentication, PasswordHashError, PasswordHasher, StoredUser, TokenError, TokenIssuer,
    UserPersistenceError, UserRepository,
};
use crate::domain::{Caller, Error, IssuedToken, LoginCredentials, Registration, User, UserId};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const NOT_AUTHORIZED: &str = "Not authorized to access this route";

fn map_user_error(message: &'static str) -> impl FnOnce(UserPersistenceError) -> Error {
    move |err| match err {
        UserPersistenceError::DuplicateEmail { email } => {
            Error::invalid_request(format!("Email {email} is already registered"))
                .with_details(json!({ "field": "email" }))
        }
        other => {
            error!(error = %other, kind = other.kind(), "{message}");
            Error::internal(message).with_details(json!({ "cause": other.to_string() }))
        }
    }
}

fn map_hash_error(err: PasswordHashError) -> Error {
    error!(error = %err, "password hashing failed");
    Error::internal("Cannot process credentials")
}

fn map_token_error(err: TokenError) -> Error {
    match err {
        TokenError::Signing { message } => {
            error!(error = %message, "token signing failed");
            Error::internal("Cannot issue token")
        }
        TokenError::Invalid { .. } | TokenError::Expired => {
            debug!(error = %err, "token rejected");
            Error::unauthorized(NOT_AUTHORIZED)
        }
    }
}

/// Hashing is CPU bound; keep it off the async workers.
async fn blocking<T, F>(work: F) -> Result<T, Error>
where
    F: FnOnce() -> Result<T, Error> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|err| {
        error!(error = %err, "credential task failed");
        Error::internal("Cannot process credentials")
    })?
}

/// Service implementing [`Authentication`] over the credential store.
#[derive(Clone)]
pub struct AuthenticationService<U> {
    users: Arc<U>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
    clock: Arc<dyn Clock>,
}

impl<U> AuthenticationService<U> {
    pub fn new(
        users: Arc<U>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }

    fn issue(&self, user: &User) -> Result<IssuedToken, Error> {
        self.tokens
            .issue(&Caller::new(user.id, user.role))
            .map_err(map_token_error)
    }
}

#[async_trait]
impl<U> Authentication for AuthenticationService<U>
where
    U: UserRepository,
{
    async fn register(&self, registration: Registration) -> Result<IssuedToken, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = registration.password().clone();
        let password_hash =
            blocking(move || hasher.hash(password.expose()).map_err(map_hash_error)).await?;

        let user = User {
            id: UserId::random(),
            name: registration.name().clone(),
            email: registration.email().clone(),
            role: registration.role(),
            created_at: self.clock.utc(),
        };
        self.users
            .insert(&StoredUser {
                user: user.clone(),
                password_hash,
            })
            .await
            .map_err(map_user_error("Cannot register user"))?;

        info!(user_id = %user.id, role = %user.role, "user registered");
        self.issue(&user)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<IssuedToken, Error> {
        let Some(stored) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error("Cannot log in"))?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let hasher = Arc::clone(&self.hasher);
        let password = credentials.clone();
        let hash = stored.password_hash.clone();
        let matches = blocking(move || {
            hasher
                .verify(password.password(), &hash)
                .map_err(map_hash_error)
        })
        .await?;
        if !matches {
            debug!(user_id = %stored.user.id, "password mismatch");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        self.issue(&stored.user)
    }

    fn authenticate(&self, token: &str) -> Result<Caller, Error> {
        self.tokens.verify(token).map_err(map_token_error)
    }

    async fn current_user(&self, caller: &Caller) -> Result<User, Error> {
        self.users
            .find_by_id(&caller.user_id)
            .await
            .map_err(map_user_error("Cannot find user"))?
            .ok_or_else(|| Error::unauthorized(NOT_AUTHORIZED))
    }
}
