//! Shared HTTP harness for booking API tests.
//!
//! Builds the full `/api/v1` surface over a fresh in-memory store with the
//! real Argon2 hasher and JWT issuer, wrapped in the trace middleware.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use chrono::Duration;
use mockable::{Clock, DefaultClock};
use serde_json::{Value, json};

use vaxbook::Trace;
use vaxbook::domain::{
    AppointmentAdmissionService, AuthenticationService, HospitalBinding, HospitalDirectoryService,
    VacCenter,
};
use vaxbook::inbound::http::state::{HttpState, HttpStatePorts};
use vaxbook::inbound::http::token_config::TokenCookieSettings;
use vaxbook::inbound::http::{configure_api, json_error_handler};
use vaxbook::outbound::memory::InMemoryBookingStore;
use vaxbook::outbound::security::{Argon2PasswordHasher, JwtTokenIssuer, TokenSigningKey};

/// Vaccination centres every test store starts with.
pub fn seeded_vac_centers() -> Vec<VacCenter> {
    vec![
        VacCenter {
            id: 1,
            name: "Bang Sue Grand Station".to_owned(),
            tel: Some("02-220-4444".to_owned()),
        },
        VacCenter {
            id: 2,
            name: "Central Ladprao".to_owned(),
            tel: None,
        },
    ]
}

pub fn http_state(binding: HospitalBinding) -> web::Data<HttpState> {
    let store = Arc::new(InMemoryBookingStore::with_vac_centers(seeded_vac_centers()));
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let issuer = JwtTokenIssuer::new(
        &TokenSigningKey::from_bytes(b"integration-secret-integration-secret".to_vec()),
        Duration::days(1),
        clock.clone(),
    );
    let ports = HttpStatePorts {
        auth: Arc::new(AuthenticationService::new(
            store.clone(),
            Arc::new(Argon2PasswordHasher::new()),
            Arc::new(issuer),
            clock.clone(),
        )),
        hospitals: Arc::new(HospitalDirectoryService::new(store.clone(), clock.clone())),
        appointments: Arc::new(
            AppointmentAdmissionService::new(store.clone(), store, clock).with_binding(binding),
        ),
    };
    web::Data::new(HttpState::new(
        ports,
        TokenCookieSettings {
            max_age: Duration::days(1),
            secure: false,
        },
    ))
}

pub async fn init_app(
    binding: HospitalBinding,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(http_state(binding))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(configure_api)),
    )
    .await
}

/// Send `request` and decode the JSON body (`Null` when empty).
pub async fn send<S>(app: &S, request: TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body = test::read_body(response).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

/// Register an account and return its token.
pub async fn register<S>(app: &S, email: &str, role: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        TestRequest::post().uri("/api/v1/auth/register").set_json(json!({
            "name": email.split('@').next().unwrap_or("someone"),
            "email": email,
            "password": "secret1",
            "role": role,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register {email}: {body}");
    body["token"].as_str().expect("token in body").to_owned()
}

/// Create a hospital as `admin_token` and return its id.
pub async fn create_hospital<S>(app: &S, admin_token: &str, name: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        TestRequest::post()
            .uri("/api/v1/hospitals")
            .insert_header(bearer(admin_token))
            .set_json(json!({
                "name": name,
                "address": "1 Rama VI Rd",
                "district": "Ratchathewi",
                "province": "Bangkok",
                "postalcode": "10400",
                "tel": "02-201-1000",
                "region": "Central"
            })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create hospital: {body}");
    body["data"]["id"].as_str().expect("hospital id").to_owned()
}

/// Book a slot and return the raw response.
pub async fn book<S>(app: &S, token: &str, hospital_id: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    send(
        app,
        TestRequest::post()
            .uri(&format!("/api/v1/hospitals/{hospital_id}/appointments"))
            .insert_header(bearer(token))
            .set_json(json!({"apptDate": "2026-11-02T09:30:00Z"})),
    )
    .await
}
