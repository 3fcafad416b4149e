//! Appointment records and the admission vocabulary used by the engine.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::auth::Caller;
use super::hospital::{HospitalId, HospitalSummary};
use super::user::UserId;

/// Number of appointments a non-admin user may own at once.
pub const BOOKING_LIMIT: usize = 3;

/// Appointment identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AppointmentId(Uuid);

impl AppointmentId {
    /// Parse an identifier taken from a path segment; `None` when malformed.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw).ok().map(Self)
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Stored appointment.
///
/// `hospital` is a reference that is not guaranteed to resolve: records
/// created under [`HospitalBinding::CallerId`] carry the owner's id there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub id: AppointmentId,
    pub user: UserId,
    pub hospital: HospitalId,
    pub appt_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// Apply a validated patch in place. Ownership never changes.
    pub fn apply(&mut self, patch: &AppointmentPatch) {
        if let Some(date) = patch.appt_date {
            self.appt_date = date;
        }
        if let Some(hospital) = patch.hospital {
            self.hospital = hospital;
        }
    }
}

/// Appointment joined with the hospital projection, when it resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentView {
    pub appointment: Appointment,
    pub hospital: Option<HospitalSummary>,
}

/// Scheduling payload for a new booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppointmentDraft {
    pub appt_date: DateTime<Utc>,
}

/// Partial update. `hospital`, when present, must name an existing hospital.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppointmentPatch {
    pub appt_date: Option<DateTime<Utc>>,
    pub hospital: Option<HospitalId>,
}

/// Outcome of an atomic count-and-insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The record was stored.
    Admitted(Appointment),
    /// The owner already holds `existing` appointments; nothing was stored.
    CapacityReached { existing: usize },
}

/// Which id is written into a new appointment's hospital reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HospitalBinding {
    /// Store the caller's id; records written this way never resolve to a
    /// hospital.
    #[default]
    CallerId,
    /// Store the validated hospital id from the request path.
    RequestedHospital,
}

impl HospitalBinding {
    /// Resolve the reference stored for a booking by `caller` at `requested`.
    pub fn bind(self, caller: &Caller, requested: HospitalId) -> HospitalId {
        match self {
            Self::CallerId => HospitalId::from_uuid(*caller.user_id.as_uuid()),
            Self::RequestedHospital => requested,
        }
    }
}
