//! Driving port for the appointment admission engine.

use async_trait::async_trait;

use crate::domain::{
    Appointment, AppointmentDraft, AppointmentId, AppointmentPatch, AppointmentView, Caller,
    Error, HospitalId,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentAdmission: Send + Sync {
    /// The caller's own appointments, or every appointment for admins.
    async fn list(&self, caller: &Caller) -> Result<Vec<AppointmentView>, Error>;

    /// Any appointment by id, regardless of owner.
    async fn get(&self, caller: &Caller, id: &AppointmentId) -> Result<AppointmentView, Error>;

    /// Book an appointment at `hospital` for the caller.
    async fn create(
        &self,
        caller: &Caller,
        hospital: &HospitalId,
        draft: AppointmentDraft,
    ) -> Result<Appointment, Error>;

    /// Update an appointment owned by the caller (or any, for admins).
    async fn update(
        &self,
        caller: &Caller,
        id: &AppointmentId,
        patch: AppointmentPatch,
    ) -> Result<Appointment, Error>;

    /// Delete an appointment owned by the caller (or any, for admins).
    async fn delete(&self, caller: &Caller, id: &AppointmentId) -> Result<(), Error>;
}
