//! Token and cookie configuration parsing and validation.
//!
//! Reads the signing secret, token lifetime and cookie toggles from the
//! environment through [`mockable::Env`] so the rules can be tested without
//! touching process state.
//!
//! | Variable              | Meaning                              | Default |
//! |-----------------------|--------------------------------------|---------|
//! | `JWT_SECRET`          | HMAC secret                          | none    |
//! | `JWT_SECRET_FILE`     | file holding the HMAC secret         | none    |
//! | `JWT_EXPIRE_DAYS`     | token lifetime in days               | 30      |
//! | `JWT_COOKIE_EXPIRE`   | `token` cookie lifetime in days      | 30      |
//! | `TOKEN_COOKIE_SECURE` | mark the cookie `Secure`             | release |

use std::path::PathBuf;

use chrono::Duration;
use mockable::Env;
use rand::RngCore;
use tracing::warn;
use zeroize::Zeroizing;

use crate::outbound::security::TokenSigningKey;

const SECRET_ENV: &str = "JWT_SECRET";
const SECRET_FILE_ENV: &str = "JWT_SECRET_FILE";
const TOKEN_DAYS_ENV: &str = "JWT_EXPIRE_DAYS";
const COOKIE_DAYS_ENV: &str = "JWT_COOKIE_EXPIRE";
const COOKIE_SECURE_ENV: &str = "TOKEN_COOKIE_SECURE";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const DAYS_EXPECTED: &str = "a positive number of days";

/// Minimum secret length accepted in release builds.
pub const SECRET_MIN_LEN: usize = 32;
/// Default token and cookie lifetime.
pub const DEFAULT_EXPIRE_DAYS: i64 = 30;

/// Build mode for configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings.
    Debug,
    /// Release builds require a real secret and valid values.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Attributes of the `token` cookie set on login and registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenCookieSettings {
    pub max_age: Duration,
    pub secure: bool,
}

impl Default for TokenCookieSettings {
    fn default() -> Self {
        Self {
            max_age: Duration::days(DEFAULT_EXPIRE_DAYS),
            secure: true,
        }
    }
}

/// Validated token settings.
#[derive(Debug)]
pub struct TokenSettings {
    pub signing_key: TokenSigningKey,
    pub token_lifetime: Duration,
    pub cookie: TokenCookieSettings,
}

/// Errors raised while validating token configuration.
#[derive(thiserror::Error, Debug)]
pub enum TokenConfigError {
    /// Neither `JWT_SECRET` nor `JWT_SECRET_FILE` is set.
    #[error("missing required environment variable: {SECRET_ENV} or {SECRET_FILE_ENV}")]
    MissingSecret,
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the secret file failed.
    #[error("failed to read token secret at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The secret is too short for release builds.
    #[error("token secret too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort { length: usize, min_len: usize },
}

/// Build token settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use mockable::MockEnv;
/// use vaxbook::inbound::http::token_config::{BuildMode, token_settings_from_env};
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "JWT_SECRET" => Some("0123456789abcdef0123456789abcdef".to_owned()),
///     "JWT_EXPIRE_DAYS" => Some("7".to_owned()),
///     "TOKEN_COOKIE_SECURE" => Some("1".to_owned()),
///     _ => None,
/// });
///
/// let settings = token_settings_from_env(&env, BuildMode::Release).expect("valid settings");
/// assert_eq!(settings.token_lifetime.num_days(), 7);
/// assert!(settings.cookie.secure);
/// ```
pub fn token_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSettings, TokenConfigError> {
    let signing_key = signing_key_from_env(env, mode)?;
    let token_lifetime = days_from_env(env, mode, TOKEN_DAYS_ENV)?;
    let max_age = days_from_env(env, mode, COOKIE_DAYS_ENV)?;
    let secure = cookie_secure_from_env(env, mode)?;

    Ok(TokenSettings {
        signing_key,
        token_lifetime,
        cookie: TokenCookieSettings { max_age, secure },
    })
}

fn signing_key_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSigningKey, TokenConfigError> {
    let secret = match (env.string(SECRET_ENV), env.string(SECRET_FILE_ENV)) {
        (Some(value), _) => Some(Zeroizing::new(value.into_bytes())),
        (None, Some(path)) => {
            let path = PathBuf::from(path);
            match std::fs::read(&path) {
                Ok(bytes) => Some(Zeroizing::new(trim_trailing_newline(bytes))),
                Err(source) => return Err(TokenConfigError::SecretRead { path, source }),
            }
        }
        (None, None) => None,
    };

    match secret {
        Some(bytes) => {
            let length = bytes.len();
            if length < SECRET_MIN_LEN {
                if mode.is_debug() {
                    warn!(length, "token secret shorter than {SECRET_MIN_LEN} bytes");
                } else {
                    return Err(TokenConfigError::SecretTooShort {
                        length,
                        min_len: SECRET_MIN_LEN,
                    });
                }
            }
            Ok(TokenSigningKey::from_bytes(bytes.to_vec()))
        }
        None if mode.is_debug() => {
            warn!("{SECRET_ENV} not set; using temporary token secret (dev only)");
            let mut bytes = Zeroizing::new(vec![0_u8; 64]);
            rand::thread_rng().fill_bytes(bytes.as_mut_slice());
            Ok(TokenSigningKey::from_bytes(bytes.to_vec()))
        }
        None => Err(TokenConfigError::MissingSecret),
    }
}

fn trim_trailing_newline(mut bytes: Vec<u8>) -> Vec<u8> {
    while matches!(bytes.last(), Some(b'\n' | b'\r')) {
        bytes.pop();
    }
    bytes
}

fn days_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
) -> Result<Duration, TokenConfigError> {
    let Some(value) = env.string(name) else {
        return Ok(Duration::days(DEFAULT_EXPIRE_DAYS));
    };
    match value.trim().parse::<i64>() {
        Ok(days) if (1..=3650).contains(&days) => Ok(Duration::days(days)),
        _ if mode.is_debug() => {
            warn!(value = %value, "invalid {name}; defaulting to {DEFAULT_EXPIRE_DAYS} days");
            Ok(Duration::days(DEFAULT_EXPIRE_DAYS))
        }
        _ => Err(TokenConfigError::InvalidEnv {
            name,
            value,
            expected: DAYS_EXPECTED,
        }),
    }
}

fn cookie_secure_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, TokenConfigError> {
    let default_value = !mode.is_debug();
    let Some(value) = env.string(COOKIE_SECURE_ENV) else {
        return Ok(default_value);
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None if mode.is_debug() => {
            warn!(value = %value, "invalid {COOKIE_SECURE_ENV}; defaulting to {default_value}");
            Ok(default_value)
        }
        None => Err(TokenConfigError::InvalidEnv {
            name: COOKIE_SECURE_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
