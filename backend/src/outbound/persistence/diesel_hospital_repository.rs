//! PostgreSQL-backed `HospitalRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{HospitalRepository, HospitalRepositoryError};
use crate::domain::{Hospital, HospitalId, VacCenter};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error, unique_violation};
use super::models::{HospitalRow, VacCenterRow};
use super::pool::{DbPool, PoolError};
use super::schema::{appointments, hospitals, vac_centers};

const NAME_CONSTRAINT: &str = "hospitals_name_key";

/// Diesel-backed hospital directory.
#[derive(Clone)]
pub struct DieselHospitalRepository {
    pool: DbPool,
}

impl DieselHospitalRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> HospitalRepositoryError {
    map_pool_error(error, |message| HospitalRepositoryError::connection(message))
}

fn diesel_error(error: diesel::result::Error) -> HospitalRepositoryError {
    map_diesel_error(
        error,
        |message| HospitalRepositoryError::query(message),
        |message| HospitalRepositoryError::connection(message),
    )
}

fn write_error(
    hospital: &Hospital,
) -> impl FnOnce(diesel::result::Error) -> HospitalRepositoryError + '_ {
    move |err| {
        if unique_violation(&err) == Some(NAME_CONSTRAINT) {
            HospitalRepositoryError::duplicate_name(hospital.name.as_str())
        } else {
            diesel_error(err)
        }
    }
}

impl From<HospitalRow> for Hospital {
    fn from(row: HospitalRow) -> Self {
        Self {
            id: HospitalId::from_uuid(row.id),
            name: row.name,
            address: row.address,
            district: row.district,
            province: row.province,
            postalcode: row.postalcode,
            tel: row.tel,
            region: row.region,
            created_at: row.created_at,
        }
    }
}

impl From<&Hospital> for HospitalRow {
    fn from(hospital: &Hospital) -> Self {
        Self {
            id: *hospital.id.as_uuid(),
            name: hospital.name.clone(),
            address: hospital.address.clone(),
            district: hospital.district.clone(),
            province: hospital.province.clone(),
            postalcode: hospital.postalcode.clone(),
            tel: hospital.tel.clone(),
            region: hospital.region.clone(),
            created_at: hospital.created_at,
        }
    }
}

impl From<VacCenterRow> for VacCenter {
    fn from(row: VacCenterRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            tel: row.tel,
        }
    }
}

#[async_trait]
impl HospitalRepository for DieselHospitalRepository {
    async fn list(&self) -> Result<Vec<Hospital>, HospitalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = hospitals::table
            .order(hospitals::created_at.asc())
            .select(HospitalRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(Hospital::from).collect())
    }

    async fn find_by_id(
        &self,
        id: &HospitalId,
    ) -> Result<Option<Hospital>, HospitalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = hospitals::table
            .filter(hospitals::id.eq(id.as_uuid()))
            .select(HospitalRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(row.map(Hospital::from))
    }

    async fn insert(&self, hospital: &Hospital) -> Result<(), HospitalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(hospitals::table)
            .values(HospitalRow::from(hospital))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(write_error(hospital))
    }

    async fn update(&self, hospital: &Hospital) -> Result<bool, HospitalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let affected = diesel::update(
            hospitals::table.filter(hospitals::id.eq(hospital.id.as_uuid())),
        )
        .set(HospitalRow::from(hospital))
        .execute(&mut conn)
        .await
        .map_err(write_error(hospital))?;
        Ok(affected > 0)
    }

    async fn delete(&self, id: &HospitalId) -> Result<bool, HospitalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let hospital_id = *id.as_uuid();
        conn.transaction(|conn| {
            async move {
                let removed = diesel::delete(hospitals::table.filter(hospitals::id.eq(hospital_id)))
                    .execute(conn)
                    .await?;
                if removed == 0 {
                    return Ok(false);
                }
                diesel::delete(
                    appointments::table.filter(appointments::hospital_id.eq(hospital_id)),
                )
                .execute(conn)
                .await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(diesel_error)
    }

    async fn list_vac_centers(&self) -> Result<Vec<VacCenter>, HospitalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = vac_centers::table
            .order(vac_centers::id.asc())
            .select(VacCenterRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(VacCenter::from).collect())
    }
}
