//! Appointment admission engine.
//!
//! Applies the booking rules in a fixed order: the hospital must exist, the
//! caller must be below [`BOOKING_LIMIT`] unless they are an admin, and only
//! the owner or an admin may change or remove a record. The count and the
//! insert happen in one repository call so concurrent bookings cannot
//! overshoot the limit.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::ports::{
    AppointmentAdmission, AppointmentRepository, AppointmentRepositoryError, HospitalRepository,
    HospitalRepositoryError,
};
use crate::domain::{
    Admission, Appointment, AppointmentDraft, AppointmentId, AppointmentPatch, AppointmentView,
    BOOKING_LIMIT, Caller, Error, HospitalBinding, HospitalId,
};

fn store_failure(
    message: &'static str,
    kind: &'static str,
    cause: &dyn std::fmt::Display,
) -> Error {
    error!(error = %cause, kind, "{message}");
    Error::internal(message).with_details(json!({ "cause": cause.to_string() }))
}

fn appointment_store_failure(
    message: &'static str,
) -> impl FnOnce(AppointmentRepositoryError) -> Error {
    move |err| store_failure(message, err.kind(), &err)
}

fn hospital_store_failure(message: &'static str) -> impl FnOnce(HospitalRepositoryError) -> Error {
    move |err| store_failure(message, err.kind(), &err)
}

fn no_appointment(id: &AppointmentId) -> Error {
    Error::not_found(format!("No appointment with the id {id}"))
}

fn no_hospital(id: &HospitalId) -> Error {
    Error::not_found(format!("No hospital with the id {id}"))
}

/// Service implementing [`AppointmentAdmission`] over the appointment and
/// hospital repositories.
#[derive(Clone)]
pub struct AppointmentAdmissionService<A, H> {
    appointments: Arc<A>,
    hospitals: Arc<H>,
    clock: Arc<dyn Clock>,
    binding: HospitalBinding,
}

impl<A, H> AppointmentAdmissionService<A, H> {
    pub fn new(appointments: Arc<A>, hospitals: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            appointments,
            hospitals,
            clock,
            binding: HospitalBinding::default(),
        }
    }

    /// Choose which id new bookings store as their hospital reference.
    #[must_use]
    pub fn with_binding(mut self, binding: HospitalBinding) -> Self {
        self.binding = binding;
        self
    }
}

impl<A, H> AppointmentAdmissionService<A, H>
where
    A: AppointmentRepository,
    H: HospitalRepository,
{
    async fn ensure_hospital(&self, id: &HospitalId) -> Result<(), Error> {
        self.hospitals
            .find_by_id(id)
            .await
            .map_err(hospital_store_failure("Cannot find Hospital"))?
            .map(|_| ())
            .ok_or_else(|| no_hospital(id))
    }

    /// Load a record and check the caller may act on it.
    async fn owned(
        &self,
        caller: &Caller,
        id: &AppointmentId,
        action: &'static str,
        failure: &'static str,
    ) -> Result<Appointment, Error> {
        let appointment = self
            .appointments
            .find_by_id(id)
            .await
            .map_err(appointment_store_failure(failure))?
            .ok_or_else(|| no_appointment(id))?;

        if !caller.may_act_for(&appointment.user) {
            warn!(
                user_id = %caller.user_id,
                appointment_id = %id,
                action,
                "appointment ownership check failed"
            );
            return Err(Error::forbidden(format!(
                "User {} is not authorized to {action} this appointment",
                caller.user_id
            )));
        }
        Ok(appointment)
    }
}

#[async_trait]
impl<A, H> AppointmentAdmission for AppointmentAdmissionService<A, H>
where
    A: AppointmentRepository,
    H: HospitalRepository,
{
    async fn list(&self, caller: &Caller) -> Result<Vec<AppointmentView>, Error> {
        let owner = (!caller.is_admin()).then_some(caller.user_id);
        self.appointments
            .list(owner)
            .await
            .map_err(appointment_store_failure("Cannot find Appointment"))
    }

    async fn get(&self, _caller: &Caller, id: &AppointmentId) -> Result<AppointmentView, Error> {
        self.appointments
            .find_view(id)
            .await
            .map_err(appointment_store_failure("Cannot find appointment"))?
            .ok_or_else(|| no_appointment(id))
    }

    async fn create(
        &self,
        caller: &Caller,
        hospital: &HospitalId,
        draft: AppointmentDraft,
    ) -> Result<Appointment, Error> {
        self.ensure_hospital(hospital).await?;

        let appointment = Appointment {
            id: AppointmentId::random(),
            user: caller.user_id,
            hospital: self.binding.bind(caller, *hospital),
            appt_date: draft.appt_date,
            created_at: self.clock.utc(),
        };
        let limit = (!caller.is_admin()).then_some(BOOKING_LIMIT);

        match self
            .appointments
            .insert_within_limit(&appointment, limit)
            .await
            .map_err(appointment_store_failure("Cannot add Appointment"))?
        {
            Admission::Admitted(stored) => {
                info!(
                    user_id = %caller.user_id,
                    appointment_id = %stored.id,
                    hospital_id = %hospital,
                    "appointment admitted"
                );
                Ok(stored)
            }
            Admission::CapacityReached { existing } => {
                info!(
                    user_id = %caller.user_id,
                    existing,
                    "appointment rejected at booking limit"
                );
                Err(Error::capacity_exceeded(format!(
                    "The user with id {} have already booked {BOOKING_LIMIT} appointments",
                    caller.user_id
                )))
            }
        }
    }

    async fn update(
        &self,
        caller: &Caller,
        id: &AppointmentId,
        patch: AppointmentPatch,
    ) -> Result<Appointment, Error> {
        const FAILURE: &str = "Cannot update Appointment";
        let mut appointment = self.owned(caller, id, "update", FAILURE).await?;
        if let Some(hospital) = patch.hospital.as_ref() {
            self.ensure_hospital(hospital).await?;
        }

        appointment.apply(&patch);
        let updated = self
            .appointments
            .update(&appointment)
            .await
            .map_err(appointment_store_failure(FAILURE))?;
        if !updated {
            return Err(no_appointment(id));
        }
        Ok(appointment)
    }

    async fn delete(&self, caller: &Caller, id: &AppointmentId) -> Result<(), Error> {
        const FAILURE: &str = "Cannot delete Appointment";
        self.owned(caller, id, "delete", FAILURE).await?;
        let deleted = self
            .appointments
            .delete(id)
            .await
            .map_err(appointment_store_failure(FAILURE))?;
        if !deleted {
            return Err(no_appointment(id));
        }
        info!(user_id = %caller.user_id, appointment_id = %id, "appointment deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "admission_tests.rs"]
mod tests;
