//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer; repositories convert them
//! to domain types at the boundary.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{appointments, hospitals, users, vac_centers};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Hospital models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = hospitals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct HospitalRow {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub district: String,
    pub province: String,
    pub postalcode: String,
    pub tel: Option<String>,
    pub region: String,
    pub created_at: DateTime<Utc>,
}

/// Projection joined onto appointment listings.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = hospitals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HospitalSummaryRow {
    pub id: Uuid,
    pub name: String,
    pub province: String,
    pub tel: Option<String>,
}

// ---------------------------------------------------------------------------
// Appointment models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = appointments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AppointmentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub hospital_id: Uuid,
    pub appt_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Mutable appointment columns. Ownership is never rewritten.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = appointments)]
pub(crate) struct AppointmentUpdate {
    pub hospital_id: Uuid,
    pub appt_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = vac_centers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VacCenterRow {
    pub id: i32,
    pub name: String,
    pub tel: Option<String>,
}
