//! Caller extraction to keep HTTP handlers free of token plumbing.
//!
//! The token is read from `Authorization: Bearer <token>` first and the
//! `token` cookie second, then resolved through the authentication port held
//! in [`HttpState`]. Handlers that take an [`AuthenticatedCaller`] are only
//! reached by authenticated requests.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::{debug, error};

use crate::domain::{Caller, Error};

use super::state::HttpState;

/// Name of the cookie carrying the identity token.
pub const TOKEN_COOKIE: &str = "token";

const NOT_AUTHORIZED: &str = "Not authorized to access this route";

/// The authenticated identity behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedCaller(pub Caller);

impl std::ops::Deref for AuthenticatedCaller {
    type Target = Caller;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Token presented by the request, if any.
pub(crate) fn presented_token(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned);
    bearer.or_else(|| {
        req.cookie(TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_owned())
            .filter(|token| !token.is_empty())
    })
}

fn resolve(req: &HttpRequest) -> Result<AuthenticatedCaller, Error> {
    let Some(state) = req.app_data::<web::Data<HttpState>>() else {
        error!("HttpState missing from application data");
        return Err(Error::internal("Internal server error"));
    };
    let Some(token) = presented_token(req) else {
        debug!(path = req.path(), "request carried no token");
        return Err(Error::unauthorized(NOT_AUTHORIZED));
    };
    state.auth.authenticate(&token).map(AuthenticatedCaller)
}

impl FromRequest for AuthenticatedCaller {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockAuthentication;
    use crate::domain::{Role, UserId};
    use crate::inbound::http::test_utils::{StatePorts, auth_accepting, state_with};
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test};
    use rstest::rstest;

    async fn call(auth: MockAuthentication, request: test::TestRequest) -> (StatusCode, String) {
        let state = state_with(StatePorts {
            auth: Some(auth),
            ..StatePorts::default()
        });
        let app = test::init_service(App::new().app_data(state).route(
            "/whoami",
            web::get().to(|caller: AuthenticatedCaller| async move {
                HttpResponse::Ok().body(caller.user_id.to_string())
            }),
        ))
        .await;
        let response = test::call_service(&app, request.uri("/whoami").to_request()).await;
        let status = response.status();
        let body = test::read_body(response).await;
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[rstest]
    #[actix_web::test]
    async fn bearer_header_is_accepted() {
        let caller = Caller::new(UserId::random(), Role::User);
        let (status, body) = call(
            auth_accepting("good", caller),
            test::TestRequest::get().insert_header((AUTHORIZATION, "Bearer good")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, caller.user_id.to_string());
    }

    #[rstest]
    #[actix_web::test]
    async fn cookie_is_accepted() {
        let caller = Caller::new(UserId::random(), Role::Admin);
        let (status, _) = call(
            auth_accepting("good", caller),
            test::TestRequest::get().cookie(Cookie::new(TOKEN_COOKIE, "good")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn bearer_header_wins_over_cookie() {
        let caller = Caller::new(UserId::random(), Role::User);
        let (status, _) = call(
            auth_accepting("good", caller),
            test::TestRequest::get()
                .insert_header((AUTHORIZATION, "Bearer good"))
                .cookie(Cookie::new(TOKEN_COOKIE, "none")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[rstest]
    #[case::no_token(test::TestRequest::get())]
    #[case::bad_token(test::TestRequest::get().insert_header((AUTHORIZATION, "Bearer forged")))]
    #[case::other_scheme(test::TestRequest::get().insert_header((AUTHORIZATION, "Basic good")))]
    #[case::logged_out(test::TestRequest::get().cookie(Cookie::new(TOKEN_COOKIE, "none")))]
    #[actix_web::test]
    async fn missing_or_bad_tokens_are_unauthorised(#[case] request: test::TestRequest) {
        let caller = Caller::new(UserId::random(), Role::User);
        let (status, body) = call(auth_accepting("good", caller), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains(NOT_AUTHORIZED));
    }
}
