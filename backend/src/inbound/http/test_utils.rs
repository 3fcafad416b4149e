//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;
use chrono::Duration;

use crate::domain::ports::{MockAppointmentAdmission, MockAuthentication, MockHospitalDirectory};
use crate::domain::{Caller, Error};

use super::state::{HttpState, HttpStatePorts};
use super::token_config::TokenCookieSettings;

/// Mocks to place in the state; absent ones are replaced by mocks without
/// expectations, which panic if a handler reaches them.
#[derive(Default)]
pub struct StatePorts {
    pub auth: Option<MockAuthentication>,
    pub hospitals: Option<MockHospitalDirectory>,
    pub appointments: Option<MockAppointmentAdmission>,
}

/// Cookie settings for local HTTP tests: one day, no `Secure` flag.
pub fn test_cookie_settings() -> TokenCookieSettings {
    TokenCookieSettings {
        max_age: Duration::days(1),
        secure: false,
    }
}

/// Build `web::Data<HttpState>` from mocks.
pub fn state_with(ports: StatePorts) -> web::Data<HttpState> {
    let StatePorts {
        auth,
        hospitals,
        appointments,
    } = ports;
    web::Data::new(HttpState::new(
        HttpStatePorts {
            auth: Arc::new(auth.unwrap_or_default()),
            hospitals: Arc::new(hospitals.unwrap_or_default()),
            appointments: Arc::new(appointments.unwrap_or_default()),
        },
        test_cookie_settings(),
    ))
}

/// Authentication mock accepting exactly one token for one caller.
pub fn auth_accepting(token: &'static str, caller: Caller) -> MockAuthentication {
    let mut auth = MockAuthentication::new();
    auth.expect_authenticate().returning(move |presented| {
        if presented == token {
            Ok(caller)
        } else {
            Err(Error::unauthorized("Not authorized to access this route"))
        }
    });
    auth
}
