//! Builders wiring repositories into the services behind [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use vaxbook::domain::ports::{AppointmentRepository, HospitalRepository, UserRepository};
use vaxbook::domain::{
    AppointmentAdmissionService, AuthenticationService, HospitalBinding, HospitalDirectoryService,
};
use vaxbook::inbound::http::state::{HttpState, HttpStatePorts};
use vaxbook::inbound::http::token_config::TokenSettings;
use vaxbook::outbound::memory::InMemoryBookingStore;
use vaxbook::outbound::persistence::{
    DbPool, DieselAppointmentRepository, DieselHospitalRepository, DieselUserRepository,
};
use vaxbook::outbound::security::{Argon2PasswordHasher, JwtTokenIssuer};

use super::ServerConfig;

/// Repositories backing one server instance.
struct Repositories<U, H, A> {
    users: Arc<U>,
    hospitals: Arc<H>,
    appointments: Arc<A>,
}

fn build_ports<U, H, A>(
    repos: Repositories<U, H, A>,
    tokens: &TokenSettings,
    binding: HospitalBinding,
) -> HttpStatePorts
where
    U: UserRepository + 'static,
    H: HospitalRepository + 'static,
    A: AppointmentRepository + 'static,
{
    let Repositories {
        users,
        hospitals,
        appointments,
    } = repos;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let issuer = JwtTokenIssuer::new(&tokens.signing_key, tokens.token_lifetime, clock.clone());

    HttpStatePorts {
        auth: Arc::new(AuthenticationService::new(
            users,
            Arc::new(Argon2PasswordHasher::new()),
            Arc::new(issuer),
            clock.clone(),
        )),
        hospitals: Arc::new(HospitalDirectoryService::new(
            hospitals.clone(),
            clock.clone(),
        )),
        appointments: Arc::new(
            AppointmentAdmissionService::new(appointments, hospitals, clock).with_binding(binding),
        ),
    }
}

fn diesel_repositories(
    pool: &DbPool,
) -> Repositories<DieselUserRepository, DieselHospitalRepository, DieselAppointmentRepository> {
    Repositories {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        hospitals: Arc::new(DieselHospitalRepository::new(pool.clone())),
        appointments: Arc::new(DieselAppointmentRepository::new(pool.clone())),
    }
}

fn memory_repositories()
-> Repositories<InMemoryBookingStore, InMemoryBookingStore, InMemoryBookingStore> {
    let store = Arc::new(InMemoryBookingStore::new());
    Repositories {
        users: store.clone(),
        hospitals: store.clone(),
        appointments: store,
    }
}

/// Build handler state over PostgreSQL when a pool is configured, otherwise
/// over a fresh in-memory store.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let ports = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL booking store");
            build_ports(diesel_repositories(pool), &config.tokens, config.binding)
        }
        None => {
            warn!("no database configured; bookings are kept in memory and lost on restart");
            build_ports(memory_repositories(), &config.tokens, config.binding)
        }
    };
    web::Data::new(HttpState::new(ports, config.tokens.cookie))
}
