//! Hospital directory service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info};

use crate::domain::ports::{HospitalDirectory, HospitalRepository, HospitalRepositoryError};
use crate::domain::{Error, Hospital, HospitalDraft, HospitalId, HospitalPatch, VacCenter};

fn map_repository_error(message: &'static str) -> impl FnOnce(HospitalRepositoryError) -> Error {
    move |err| match err {
        HospitalRepositoryError::DuplicateName { name } => {
            Error::invalid_request(format!("Hospital name {name} is already in use"))
                .with_details(json!({ "field": "name" }))
        }
        other => {
            error!(error = %other, kind = other.kind(), "{message}");
            Error::internal(message).with_details(json!({ "cause": other.to_string() }))
        }
    }
}

fn no_hospital(id: &HospitalId) -> Error {
    Error::not_found(format!("No hospital with the id {id}"))
}

/// Service implementing [`HospitalDirectory`].
#[derive(Clone)]
pub struct HospitalDirectoryService<R> {
    hospitals: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> HospitalDirectoryService<R> {
    pub fn new(hospitals: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { hospitals, clock }
    }
}

#[async_trait]
impl<R> HospitalDirectory for HospitalDirectoryService<R>
where
    R: HospitalRepository,
{
    async fn list(&self) -> Result<Vec<Hospital>, Error> {
        self.hospitals
            .list()
            .await
            .map_err(map_repository_error("Cannot find Hospitals"))
    }

    async fn get(&self, id: &HospitalId) -> Result<Hospital, Error> {
        self.hospitals
            .find_by_id(id)
            .await
            .map_err(map_repository_error("Cannot find Hospital"))?
            .ok_or_else(|| no_hospital(id))
    }

    async fn create(&self, draft: HospitalDraft) -> Result<Hospital, Error> {
        let hospital = draft.into_hospital(HospitalId::random(), self.clock.utc());
        self.hospitals
            .insert(&hospital)
            .await
            .map_err(map_repository_error("Cannot create Hospital"))?;
        info!(hospital_id = %hospital.id, "hospital created");
        Ok(hospital)
    }

    async fn update(&self, id: &HospitalId, patch: HospitalPatch) -> Result<Hospital, Error> {
        const FAILURE: &str = "Cannot update Hospital";
        let mut hospital = self
            .hospitals
            .find_by_id(id)
            .await
            .map_err(map_repository_error(FAILURE))?
            .ok_or_else(|| no_hospital(id))?;
        hospital.apply(patch);
        let updated = self
            .hospitals
            .update(&hospital)
            .await
            .map_err(map_repository_error(FAILURE))?;
        if !updated {
            return Err(no_hospital(id));
        }
        Ok(hospital)
    }

    async fn delete(&self, id: &HospitalId) -> Result<(), Error> {
        let deleted = self
            .hospitals
            .delete(id)
            .await
            .map_err(map_repository_error("Cannot delete Hospital"))?;
        if !deleted {
            return Err(no_hospital(id));
        }
        info!(hospital_id = %id, "hospital deleted with its appointments");
        Ok(())
    }

    async fn vac_centers(&self) -> Result<Vec<VacCenter>, Error> {
        self.hospitals
            .list_vac_centers()
            .await
            .map_err(map_repository_error("Some error occurred while retrieving Vaccine Centers"))
    }
}
