//! PostgreSQL-backed `AppointmentRepository` implementation.
//!
//! `insert_within_limit` locks the owner's `users` row before counting, so
//! concurrent bookings for the same user are serialised by the database and
//! the limit cannot be overshot.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{AppointmentRepository, AppointmentRepositoryError};
use crate::domain::{
    Admission, Appointment, AppointmentId, AppointmentView, HospitalId, HospitalSummary, UserId,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{AppointmentRow, AppointmentUpdate, HospitalSummaryRow};
use super::pool::{DbPool, PoolError};
use super::schema::{appointments, hospitals, users};

/// Diesel-backed appointment store.
#[derive(Clone)]
pub struct DieselAppointmentRepository {
    pool: DbPool,
}

impl DieselAppointmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> AppointmentRepositoryError {
    map_pool_error(error, |message| AppointmentRepositoryError::connection(message))
}

fn diesel_error(error: diesel::result::Error) -> AppointmentRepositoryError {
    map_diesel_error(
        error,
        |message| AppointmentRepositoryError::query(message),
        |message| AppointmentRepositoryError::connection(message),
    )
}

impl From<AppointmentRow> for Appointment {
    fn from(row: AppointmentRow) -> Self {
        Self {
            id: AppointmentId::from_uuid(row.id),
            user: UserId::from_uuid(row.user_id),
            hospital: HospitalId::from_uuid(row.hospital_id),
            appt_date: row.appt_date,
            created_at: row.created_at,
        }
    }
}

impl From<&Appointment> for AppointmentRow {
    fn from(appointment: &Appointment) -> Self {
        Self {
            id: *appointment.id.as_uuid(),
            user_id: *appointment.user.as_uuid(),
            hospital_id: *appointment.hospital.as_uuid(),
            appt_date: appointment.appt_date,
            created_at: appointment.created_at,
        }
    }
}

impl From<HospitalSummaryRow> for HospitalSummary {
    fn from(row: HospitalSummaryRow) -> Self {
        Self {
            id: HospitalId::from_uuid(row.id),
            name: row.name,
            province: row.province,
            tel: row.tel,
        }
    }
}

fn to_view((row, hospital): (AppointmentRow, Option<HospitalSummaryRow>)) -> AppointmentView {
    AppointmentView {
        appointment: row.into(),
        hospital: hospital.map(HospitalSummary::from),
    }
}

#[async_trait]
impl AppointmentRepository for DieselAppointmentRepository {
    async fn list(
        &self,
        owner: Option<UserId>,
    ) -> Result<Vec<AppointmentView>, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut query = appointments::table
            .left_join(hospitals::table.on(hospitals::id.eq(appointments::hospital_id)))
            .select((
                AppointmentRow::as_select(),
                Option::<HospitalSummaryRow>::as_select(),
            ))
            .order(appointments::created_at.asc())
            .into_boxed();
        if let Some(owner) = owner {
            query = query.filter(appointments::user_id.eq(*owner.as_uuid()));
        }
        let rows = query.load(&mut conn).await.map_err(diesel_error)?;
        Ok(rows.into_iter().map(to_view).collect())
    }

    async fn find_by_id(
        &self,
        id: &AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = appointments::table
            .filter(appointments::id.eq(id.as_uuid()))
            .select(AppointmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(row.map(Appointment::from))
    }

    async fn find_view(
        &self,
        id: &AppointmentId,
    ) -> Result<Option<AppointmentView>, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = appointments::table
            .left_join(hospitals::table.on(hospitals::id.eq(appointments::hospital_id)))
            .filter(appointments::id.eq(id.as_uuid()))
            .select((
                AppointmentRow::as_select(),
                Option::<HospitalSummaryRow>::as_select(),
            ))
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(row.map(to_view))
    }

    async fn insert_within_limit(
        &self,
        appointment: &Appointment,
        limit: Option<usize>,
    ) -> Result<Admission, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = AppointmentRow::from(appointment);
        let owner = row.user_id;

        conn.transaction(|conn| {
            async move {
                users::table
                    .filter(users::id.eq(owner))
                    .select(users::id)
                    .for_update()
                    .first::<Uuid>(conn)
                    .await?;

                let existing: i64 = appointments::table
                    .filter(appointments::user_id.eq(owner))
                    .count()
                    .get_result(conn)
                    .await?;
                let existing = usize::try_from(existing).unwrap_or(usize::MAX);
                if limit.is_some_and(|limit| existing >= limit) {
                    return Ok(Admission::CapacityReached { existing });
                }

                diesel::insert_into(appointments::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                Ok(Admission::Admitted(row.into()))
            }
            .scope_boxed()
        })
        .await
        .map_err(diesel_error)
    }

    async fn update(&self, appointment: &Appointment) -> Result<bool, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let changes = AppointmentUpdate {
            hospital_id: *appointment.hospital.as_uuid(),
            appt_date: appointment.appt_date,
        };
        let affected = diesel::update(
            appointments::table.filter(appointments::id.eq(appointment.id.as_uuid())),
        )
        .set(&changes)
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(affected > 0)
    }

    async fn delete(&self, id: &AppointmentId) -> Result<bool, AppointmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let removed = diesel::delete(appointments::table.filter(appointments::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(removed > 0)
    }
}
