//! Driving port for hospital directory reads and admin mutations.

use async_trait::async_trait;

use crate::domain::{
    Error, Hospital, HospitalDraft, HospitalId, HospitalPatch, VacCenter,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HospitalDirectory: Send + Sync {
    async fn list(&self) -> Result<Vec<Hospital>, Error>;

    async fn get(&self, id: &HospitalId) -> Result<Hospital, Error>;

    async fn create(&self, draft: HospitalDraft) -> Result<Hospital, Error>;

    async fn update(&self, id: &HospitalId, patch: HospitalPatch) -> Result<Hospital, Error>;

    async fn delete(&self, id: &HospitalId) -> Result<(), Error>;

    async fn vac_centers(&self) -> Result<Vec<VacCenter>, Error>;
}
