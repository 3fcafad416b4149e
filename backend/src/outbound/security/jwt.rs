//! HS256 JSON Web Token implementation of the token port.
//!
//! Expiry is checked against the injected clock rather than the system time
//! so lifetimes can be exercised deterministically.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ports::{TokenError, TokenIssuer};
use crate::domain::{Caller, IssuedToken, Role, UserId};

/// HMAC secret used to sign tokens. Zeroed on drop.
#[derive(Clone)]
pub struct TokenSigningKey(Zeroizing<Vec<u8>>);

impl TokenSigningKey {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(bytes.into()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Debug for TokenSigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenSigningKey(<{} bytes>)", self.0.len())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    id: String,
    role: String,
    iat: i64,
    exp: i64,
}

/// Mints and verifies HS256 tokens carrying `{id, role, iat, exp}`.
#[derive(Clone)]
pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtTokenIssuer {
    pub fn new(key: &TokenSigningKey, lifetime: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(key.as_bytes()),
            decoding: DecodingKey::from_secret(key.as_bytes()),
            lifetime,
            clock,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation
    }

    fn expires_at(&self, issued_at: DateTime<Utc>) -> DateTime<Utc> {
        issued_at + self.lifetime
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, caller: &Caller) -> Result<IssuedToken, TokenError> {
        let issued_at = self.clock.utc();
        let expires_at = self.expires_at(issued_at);
        let claims = Claims {
            id: caller.user_id.to_string(),
            role: caller.role.as_str().to_owned(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::signing(err.to_string()))?;
        Ok(IssuedToken { token, expires_at })
    }

    fn verify(&self, token: &str) -> Result<Caller, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding, &Self::validation())
            .map_err(|err| TokenError::invalid(err.to_string()))?
            .claims;
        if claims.exp <= self.clock.utc().timestamp() {
            return Err(TokenError::expired());
        }
        let user_id =
            UserId::new(&claims.id).map_err(|err| TokenError::invalid(err.to_string()))?;
        let role: Role = claims
            .role
            .parse()
            .map_err(|err: crate::domain::UserValidationError| {
                TokenError::invalid(err.to_string())
            })?;
        Ok(Caller::new(user_id, role))
    }
}
