//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AppointmentAdmission, Authentication, HospitalDirectory};

use super::token_config::TokenCookieSettings;

/// Parameter object bundling the port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub auth: Arc<dyn Authentication>,
    pub hospitals: Arc<dyn HospitalDirectory>,
    pub appointments: Arc<dyn AppointmentAdmission>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn Authentication>,
    pub hospitals: Arc<dyn HospitalDirectory>,
    pub appointments: Arc<dyn AppointmentAdmission>,
    pub cookie: TokenCookieSettings,
}

impl HttpState {
    /// Construct state from the ports bundle and `token` cookie settings.
    pub fn new(ports: HttpStatePorts, cookie: TokenCookieSettings) -> Self {
        let HttpStatePorts {
            auth,
            hospitals,
            appointments,
        } = ports;
        Self {
            auth,
            hospitals,
            appointments,
            cookie,
        }
    }
}
