//! Port for the hospital directory store and vaccination centre listings.

use async_trait::async_trait;

use crate::domain::{Hospital, HospitalId, VacCenter};

use super::define_port_error;

define_port_error! {
    /// Errors raised by hospital repository adapters.
    pub enum HospitalRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "hospital repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "hospital repository query failed: {message}",
        /// Another hospital already uses the name.
        DuplicateName { name: String } =>
            "hospital name {name} is already in use",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HospitalRepository: Send + Sync {
    /// All hospitals, oldest first.
    async fn list(&self) -> Result<Vec<Hospital>, HospitalRepositoryError>;

    async fn find_by_id(&self, id: &HospitalId)
    -> Result<Option<Hospital>, HospitalRepositoryError>;

    async fn insert(&self, hospital: &Hospital) -> Result<(), HospitalRepositoryError>;

    /// Overwrite a stored hospital. Returns `false` when it no longer exists.
    async fn update(&self, hospital: &Hospital) -> Result<bool, HospitalRepositoryError>;

    /// Delete a hospital and every appointment referencing it.
    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: &HospitalId) -> Result<bool, HospitalRepositoryError>;

    async fn list_vac_centers(&self) -> Result<Vec<VacCenter>, HospitalRepositoryError>;
}
