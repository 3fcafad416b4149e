//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories are thin: they translate between Diesel row structs
//! (`models.rs`) and domain types, and map database failures into port
//! errors. Connections come from a `bb8` pool through `diesel-async`; the
//! schema is created by embedded migrations at startup.
//!
//! # Example
//!
//! ```ignore
//! use vaxbook::outbound::persistence::{DbPool, DieselHospitalRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/vaxbook")).await?;
//! let hospitals = DieselHospitalRepository::new(pool);
//! ```

mod diesel_appointment_repository;
mod diesel_error_mapping;
mod diesel_hospital_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_appointment_repository::DieselAppointmentRepository;
pub use diesel_hospital_repository::DieselHospitalRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
