//! In-process booking store.
//!
//! Backs the server when no database URL is configured and the HTTP tests.
//! One mutex guards every collection, so the appointment count and insert
//! in [`AppointmentRepository::insert_within_limit`] form a single critical
//! section and hospital deletes cascade atomically.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    AppointmentRepository, AppointmentRepositoryError, HospitalRepository,
    HospitalRepositoryError, StoredUser, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Admission, Appointment, AppointmentId, AppointmentView, Hospital, HospitalId, User, UserId,
    VacCenter,
};

#[derive(Debug, Default)]
struct State {
    users: Vec<StoredUser>,
    hospitals: Vec<Hospital>,
    appointments: Vec<Appointment>,
    vac_centers: Vec<VacCenter>,
}

impl State {
    fn view(&self, appointment: &Appointment) -> AppointmentView {
        AppointmentView {
            appointment: appointment.clone(),
            hospital: self
                .hospitals
                .iter()
                .find(|hospital| hospital.id == appointment.hospital)
                .map(Hospital::summary),
        }
    }
}

/// Mutex-guarded store implementing every driven repository port.
#[derive(Debug, Default)]
pub struct InMemoryBookingStore {
    state: Mutex<State>,
}

const POISONED: &str = "in-memory store lock poisoned";

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the vaccination centre listing.
    pub fn with_vac_centers(vac_centers: Vec<VacCenter>) -> Self {
        Self {
            state: Mutex::new(State {
                vac_centers,
                ..State::default()
            }),
        }
    }

    fn lock(&self) -> Option<MutexGuard<'_, State>> {
        self.state.lock().ok()
    }
}

#[async_trait]
impl UserRepository for InMemoryBookingStore {
    async fn insert(&self, record: &StoredUser) -> Result<(), UserPersistenceError> {
        let mut state = self
            .lock()
            .ok_or_else(|| UserPersistenceError::connection(POISONED))?;
        if state
            .users
            .iter()
            .any(|existing| existing.user.email == record.user.email)
        {
            return Err(UserPersistenceError::duplicate_email(
                record.user.email.as_ref(),
            ));
        }
        state.users.push(record.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>, UserPersistenceError> {
        let state = self
            .lock()
            .ok_or_else(|| UserPersistenceError::connection(POISONED))?;
        Ok(state
            .users
            .iter()
            .find(|stored| stored.user.email.as_ref() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self
            .lock()
            .ok_or_else(|| UserPersistenceError::connection(POISONED))?;
        Ok(state
            .users
            .iter()
            .find(|stored| stored.user.id == *id)
            .map(|stored| stored.user.clone()))
    }
}

#[async_trait]
impl HospitalRepository for InMemoryBookingStore {
    async fn list(&self) -> Result<Vec<Hospital>, HospitalRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| HospitalRepositoryError::connection(POISONED))?;
        Ok(state.hospitals.clone())
    }

    async fn find_by_id(
        &self,
        id: &HospitalId,
    ) -> Result<Option<Hospital>, HospitalRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| HospitalRepositoryError::connection(POISONED))?;
        Ok(state.hospitals.iter().find(|h| h.id == *id).cloned())
    }

    async fn insert(&self, hospital: &Hospital) -> Result<(), HospitalRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| HospitalRepositoryError::connection(POISONED))?;
        if state.hospitals.iter().any(|h| h.name == hospital.name) {
            return Err(HospitalRepositoryError::duplicate_name(
                hospital.name.as_str(),
            ));
        }
        state.hospitals.push(hospital.clone());
        Ok(())
    }

    async fn update(&self, hospital: &Hospital) -> Result<bool, HospitalRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| HospitalRepositoryError::connection(POISONED))?;
        if state
            .hospitals
            .iter()
            .any(|h| h.name == hospital.name && h.id != hospital.id)
        {
            return Err(HospitalRepositoryError::duplicate_name(
                hospital.name.as_str(),
            ));
        }
        match state.hospitals.iter_mut().find(|h| h.id == hospital.id) {
            Some(slot) => {
                *slot = hospital.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &HospitalId) -> Result<bool, HospitalRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| HospitalRepositoryError::connection(POISONED))?;
        let before = state.hospitals.len();
        state.hospitals.retain(|h| h.id != *id);
        if state.hospitals.len() == before {
            return Ok(false);
        }
        state.appointments.retain(|a| a.hospital != *id);
        Ok(true)
    }

    async fn list_vac_centers(&self) -> Result<Vec<VacCenter>, HospitalRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| HospitalRepositoryError::connection(POISONED))?;
        Ok(state.vac_centers.clone())
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryBookingStore {
    async fn list(
        &self,
        owner: Option<UserId>,
    ) -> Result<Vec<AppointmentView>, AppointmentRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| AppointmentRepositoryError::connection(POISONED))?;
        Ok(state
            .appointments
            .iter()
            .filter(|a| owner.is_none_or(|owner| a.user == owner))
            .map(|a| state.view(a))
            .collect())
    }

    async fn find_by_id(
        &self,
        id: &AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| AppointmentRepositoryError::connection(POISONED))?;
        Ok(state.appointments.iter().find(|a| a.id == *id).cloned())
    }

    async fn find_view(
        &self,
        id: &AppointmentId,
    ) -> Result<Option<AppointmentView>, AppointmentRepositoryError> {
        let state = self
            .lock()
            .ok_or_else(|| AppointmentRepositoryError::connection(POISONED))?;
        Ok(state
            .appointments
            .iter()
            .find(|a| a.id == *id)
            .map(|a| state.view(a)))
    }

    async fn insert_within_limit(
        &self,
        appointment: &Appointment,
        limit: Option<usize>,
    ) -> Result<Admission, AppointmentRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| AppointmentRepositoryError::connection(POISONED))?;
        let existing = state
            .appointments
            .iter()
            .filter(|a| a.user == appointment.user)
            .count();
        if limit.is_some_and(|limit| existing >= limit) {
            return Ok(Admission::CapacityReached { existing });
        }
        state.appointments.push(appointment.clone());
        Ok(Admission::Admitted(appointment.clone()))
    }

    async fn update(&self, appointment: &Appointment) -> Result<bool, AppointmentRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| AppointmentRepositoryError::connection(POISONED))?;
        match state.appointments.iter_mut().find(|a| a.id == appointment.id) {
            Some(slot) => {
                *slot = appointment.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &AppointmentId) -> Result<bool, AppointmentRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| AppointmentRepositoryError::connection(POISONED))?;
        let before = state.appointments.len();
        state.appointments.retain(|a| a.id != *id);
        Ok(state.appointments.len() != before)
    }
}
