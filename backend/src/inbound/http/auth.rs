//! Authentication API handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"name":"Malee","email":"malee@example.com","password":"secret1"}
//! POST /api/v1/auth/login {"email":"malee@example.com","password":"secret1"}
//! GET /api/v1/auth/logout
//! GET /api/v1/auth/me
//! ```
//!
//! Register and login answer `201` with `{success:true, token}` and set the
//! `token` cookie so browser clients need not store the token themselves.

use actix_web::cookie::{Cookie, time::Duration as CookieDuration};
use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Error, IssuedToken, LoginCredentials, Registration, RegistrationValidationError, User,
    UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::{AuthenticatedCaller, TOKEN_COOKIE};
use crate::inbound::http::envelope::{Empty, Envelope};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::token_config::TokenCookieSettings;
use crate::inbound::http::validation::{ErrorCode, FieldName, field_error, invalid_field_error};

const LOGIN_FIELDS_REQUIRED: &str = "Please provide an email and password";

/// Registration body for `POST /api/v1/auth/register`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "Malee")]
    pub name: Option<String>,
    #[schema(example = "malee@example.com")]
    pub email: Option<String>,
    #[schema(example = "secret1")]
    pub password: Option<String>,
    /// `user` (default) or `admin`.
    #[schema(example = "user")]
    pub role: Option<String>,
}

/// Login body for `POST /api/v1/auth/login`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// `{success:true, token}` returned by register and login.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

/// Public projection of a user record.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[schema(example = "user")]
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserBody {
    fn from(user: User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            name: user.name.to_string(),
            email: user.email.to_string(),
            role: user.role.as_str().to_owned(),
            created_at: user.created_at,
        }
    }
}

fn registration_error(err: &RegistrationValidationError) -> Error {
    let field = match err {
        RegistrationValidationError::User(
            UserValidationError::EmptyName | UserValidationError::NameTooLong { .. },
        ) => "name",
        RegistrationValidationError::User(
            UserValidationError::EmptyEmail | UserValidationError::InvalidEmail,
        ) => "email",
        RegistrationValidationError::User(UserValidationError::UnknownRole) => "role",
        RegistrationValidationError::User(
            UserValidationError::EmptyId | UserValidationError::InvalidId,
        ) => "id",
        RegistrationValidationError::EmptyPassword => {
            return field_error(
                FieldName::new("password"),
                ErrorCode::MissingField,
                err.to_string(),
            );
        }
        RegistrationValidationError::PasswordTooShort { .. } => "password",
    };
    invalid_field_error(FieldName::new(field), err.to_string())
}

fn token_cookie(
    value: String,
    max_age: CookieDuration,
    settings: TokenCookieSettings,
) -> Cookie<'static> {
    Cookie::build(TOKEN_COOKIE, value)
        .path("/")
        .http_only(true)
        .secure(settings.secure)
        .max_age(max_age)
        .finish()
}

fn token_response(issued: IssuedToken, settings: TokenCookieSettings) -> HttpResponse {
    let max_age = CookieDuration::seconds(settings.max_age.num_seconds());
    HttpResponse::Created()
        .cookie(token_cookie(issued.token.clone(), max_age, settings))
        .json(TokenResponse {
            success: true,
            token: issued.token,
        })
}

/// Create an account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = TokenResponse,
            headers(("Set-Cookie" = String, description = "token cookie"))),
        (status = 400, description = "Invalid request or duplicate email", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        name,
        email,
        password,
        role,
    } = payload.into_inner();
    let registration = Registration::try_from_parts(
        name.as_deref().unwrap_or_default(),
        email.as_deref().unwrap_or_default(),
        password.as_deref().unwrap_or_default(),
        role.as_deref(),
    )
    .map_err(|err| registration_error(&err))?;

    let issued = state.auth.register(registration).await?;
    Ok(token_response(issued, state.cookie))
}

/// Exchange credentials for a token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 201, description = "Logged in", body = TokenResponse,
            headers(("Set-Cookie" = String, description = "token cookie"))),
        (status = 400, description = "Missing email or password", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(
        email.as_deref().unwrap_or_default(),
        password.as_deref().unwrap_or_default(),
    )
    .map_err(|_| Error::invalid_request(LOGIN_FIELDS_REQUIRED))?;

    let issued = state.auth.login(&credentials).await?;
    Ok(token_response(issued, state.cookie))
}

/// Overwrite the `token` cookie with a short-lived placeholder.
#[utoipa::path(
    get,
    path = "/api/v1/auth/logout",
    responses((status = 200, description = "Cookie cleared")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[get("/auth/logout")]
pub async fn logout(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(token_cookie(
            "none".to_owned(),
            CookieDuration::seconds(10),
            state.cookie,
        ))
        .json(Envelope::data(Empty::default()))
}

/// The authenticated caller's own record.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserBody),
        (status = 401, description = "Not authenticated", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn me(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
) -> ApiResult<HttpResponse> {
    let user = state.auth.current_user(&caller).await?;
    Ok(Envelope::data(UserBody::from(user)).ok())
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
