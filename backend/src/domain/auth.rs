//! Authentication primitives: login credentials, registrations and callers.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use super::error::Error;
use super::user::{EmailAddress, Role, UserId, UserName, UserValidationError};

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN_LEN: usize = 6;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased and non-empty. It is not checked for
///   shape: an unknown address simply fails to authenticate.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use vaxbook::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Nurse@Clinic.test ", "secret").unwrap();
/// assert_eq!(creds.email(), "nurse@clinic.test");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalised = email.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalised,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email string suitable for user lookups.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validation errors raised while building a [`Registration`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    #[error(transparent)]
    User(#[from] UserValidationError),
    #[error("Please add a password")]
    EmptyPassword,
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
}

/// Plain-text password accepted at registration. Zeroed on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate the minimum length.
    pub fn new(raw: &str) -> Result<Self, RegistrationValidationError> {
        if raw.is_empty() {
            return Err(RegistrationValidationError::EmptyPassword);
        }
        if raw.chars().count() < PASSWORD_MIN_LEN {
            return Err(RegistrationValidationError::PasswordTooShort {
                min: PASSWORD_MIN_LEN,
            });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    name: UserName,
    email: EmailAddress,
    password: Password,
    role: Role,
}

impl Registration {
    /// Build a registration from raw inputs. A missing role means [`Role::User`].
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
        role: Option<&str>,
    ) -> Result<Self, RegistrationValidationError> {
        let name = UserName::new(name)?;
        let email = EmailAddress::new(email)?;
        let password = Password::new(password)?;
        let role = match role {
            Some(raw) => raw.parse()?,
            None => Role::default(),
        };
        Ok(Self {
            name,
            email,
            password,
            role,
        })
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &Password {
        &self.password
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

/// Authenticated identity attached to a request once its token verifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: UserId,
    pub role: Role,
}

impl Caller {
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Whether this caller may act on a record owned by `owner`.
    pub fn may_act_for(&self, owner: &UserId) -> bool {
        self.is_admin() || self.user_id == *owner
    }

    /// Reject callers whose role is not in `allowed`.
    pub fn authorize(&self, allowed: &[Role]) -> Result<(), Error> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(Error::forbidden(format!(
                "User role {} is not authorized to access this route",
                self.role
            )))
        }
    }
}

/// Signed token minted for a caller, with its absolute expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
