//! Server settings loaded via OrthoConfig and the assembled server config.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

use vaxbook::domain::HospitalBinding;
use vaxbook::inbound::http::token_config::TokenSettings;
use vaxbook::outbound::persistence::DbPool;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 8080;

/// Listener and storage settings, read from `BOOKING_*` variables, config
/// files and command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BOOKING")]
pub struct ServerSettings {
    /// Interface to bind; defaults to all interfaces.
    pub host: Option<IpAddr>,
    /// Listening port; defaults to 8080.
    pub port: Option<u16>,
    /// PostgreSQL URL. Without one the in-memory store is used.
    pub database_url: Option<String>,
    /// Store the requested hospital id on new bookings instead of the
    /// caller's id.
    #[ortho_config(default = false)]
    pub bind_requested_hospital: bool,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(DEFAULT_HOST),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    pub fn hospital_binding(&self) -> HospitalBinding {
        if self.bind_requested_hospital {
            HospitalBinding::RequestedHospital
        } else {
            HospitalBinding::CallerId
        }
    }

    /// Database URL with blank values treated as absent.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// Everything `create_server` needs.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) tokens: TokenSettings,
    pub(crate) binding: HospitalBinding,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, tokens: TokenSettings, binding: HospitalBinding) -> Self {
        Self {
            bind_addr,
            tokens,
            binding,
            db_pool: None,
        }
    }

    /// Use PostgreSQL repositories instead of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
