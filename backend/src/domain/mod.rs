//! Domain primitives, services and ports.
//!
//! Purpose: define the booking model (users, hospitals, appointments) and the
//! rules that govern it, independent of HTTP and storage. Inbound adapters
//! call the driving ports; outbound adapters implement the driven ports.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - TraceId: request correlation id kept in task-local storage.
//! - AppointmentAdmissionService: booking limit and ownership rules.
//! - AuthenticationService: registration, login and token checks.
//! - HospitalDirectoryService: hospital listings and admin mutations.

pub mod admission;
pub mod appointment;
pub mod auth;
pub mod authentication;
pub mod directory;
pub mod error;
pub mod hospital;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::admission::AppointmentAdmissionService;
pub use self::appointment::{
    Admission, Appointment, AppointmentDraft, AppointmentId, AppointmentPatch, AppointmentView,
    BOOKING_LIMIT, HospitalBinding,
};
pub use self::auth::{
    Caller, IssuedToken, LoginCredentials, LoginValidationError, PASSWORD_MIN_LEN, Password,
    Registration, RegistrationValidationError,
};
pub use self::authentication::AuthenticationService;
pub use self::directory::HospitalDirectoryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::hospital::{
    Hospital, HospitalDraft, HospitalFields, HospitalId, HospitalPatch, HospitalSummary,
    HospitalValidationError, VacCenter,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{EmailAddress, Role, User, UserId, UserName, UserValidationError};
