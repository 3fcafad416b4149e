//! HTTP inbound adapter exposing the booking REST API.
//!
//! Handlers translate JSON payloads into domain calls through the driving
//! ports held in [`state::HttpState`] and render results in the
//! `{success, count?, data}` envelope.

pub mod appointments;
pub mod auth;
pub mod caller;
pub mod envelope;
pub mod error;
pub mod health;
pub mod hospitals;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod token_config;
pub mod validation;

use actix_web::web;

pub use error::{ApiResult, json_error_handler};

/// Register every `/api/v1` handler on `cfg`.
///
/// `GET /hospitals/vacCenters` is registered ahead of `GET /hospitals/{id}`
/// so the literal segment wins.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::register)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::me)
        .service(hospitals::list_hospitals)
        .service(hospitals::list_vac_centers)
        .service(hospitals::get_hospital)
        .service(hospitals::create_hospital)
        .service(hospitals::update_hospital)
        .service(hospitals::delete_hospital)
        .service(appointments::create_appointment)
        .service(appointments::list_appointments)
        .service(appointments::get_appointment)
        .service(appointments::update_appointment)
        .service(appointments::delete_appointment);
}
