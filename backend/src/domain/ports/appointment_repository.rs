//! Port for appointment persistence, including the atomic admission write.

use async_trait::async_trait;

use crate::domain::{Admission, Appointment, AppointmentId, AppointmentView, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by appointment repository adapters.
    pub enum AppointmentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "appointment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "appointment repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Appointments joined with their hospital projection, optionally
    /// restricted to one owner.
    async fn list(
        &self,
        owner: Option<UserId>,
    ) -> Result<Vec<AppointmentView>, AppointmentRepositoryError>;

    async fn find_by_id(
        &self,
        id: &AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError>;

    async fn find_view(
        &self,
        id: &AppointmentId,
    ) -> Result<Option<AppointmentView>, AppointmentRepositoryError>;

    /// Count the owner's appointments and insert `appointment` only when the
    /// count is below `limit`, as one atomic step. `None` means unlimited.
    async fn insert_within_limit(
        &self,
        appointment: &Appointment,
        limit: Option<usize>,
    ) -> Result<Admission, AppointmentRepositoryError>;

    /// Overwrite a stored appointment. Returns `false` when it no longer exists.
    async fn update(&self, appointment: &Appointment) -> Result<bool, AppointmentRepositoryError>;

    /// Hard delete. Returns `false` when nothing was deleted.
    async fn delete(&self, id: &AppointmentId) -> Result<bool, AppointmentRepositoryError>;
}
