//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod appointment_admission;
mod appointment_repository;
mod authentication;
mod hospital_directory;
mod hospital_repository;
mod password_hasher;
mod token_issuer;
mod user_repository;

#[cfg(test)]
pub use appointment_admission::MockAppointmentAdmission;
pub use appointment_admission::AppointmentAdmission;
#[cfg(test)]
pub use appointment_repository::MockAppointmentRepository;
pub use appointment_repository::{AppointmentRepository, AppointmentRepositoryError};
#[cfg(test)]
pub use authentication::MockAuthentication;
pub use authentication::Authentication;
#[cfg(test)]
pub use hospital_directory::MockHospitalDirectory;
pub use hospital_directory::HospitalDirectory;
#[cfg(test)]
pub use hospital_repository::MockHospitalRepository;
pub use hospital_repository::{HospitalRepository, HospitalRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use token_issuer::MockTokenIssuer;
pub use token_issuer::{TokenError, TokenIssuer};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredUser, UserPersistenceError, UserRepository};
