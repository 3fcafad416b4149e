//! Hospital directory API handlers.
//!
//! ```text
//! GET /api/v1/hospitals
//! GET /api/v1/hospitals/vacCenters
//! GET /api/v1/hospitals/{id}
//! POST /api/v1/hospitals            (admin)
//! PUT /api/v1/hospitals/{id}        (admin)
//! DELETE /api/v1/hospitals/{id}     (admin)
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Error, Hospital, HospitalDraft, HospitalFields, HospitalPatch, HospitalValidationError, Role,
    VacCenter,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::AuthenticatedCaller;
use crate::inbound::http::envelope::{Empty, Envelope};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    ErrorCode, FieldName, field_error, invalid_field_error, parse_hospital_id,
};

/// Hospital fields accepted by create and update.
///
/// Create requires every field except `tel`; update applies whichever are
/// present.
#[derive(Debug, Default, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HospitalRequest {
    #[schema(example = "Siriraj")]
    pub name: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    #[schema(example = "10700")]
    pub postalcode: Option<String>,
    pub tel: Option<String>,
    pub region: Option<String>,
}

impl From<HospitalRequest> for HospitalFields {
    fn from(value: HospitalRequest) -> Self {
        Self {
            name: value.name,
            address: value.address,
            district: value.district,
            province: value.province,
            postalcode: value.postalcode,
            tel: value.tel,
            region: value.region,
        }
    }
}

/// Hospital record as returned to clients.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HospitalBody {
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

impl From<Hospital> for HospitalBody {
    fn from(hospital: Hospital) -> Self {
        Self {
            id: *hospital.id.as_uuid(),
            name: hospital.name,
            address: hospital.address,
            district: hospital.district,
            province: hospital.province,
            postalcode: hospital.postalcode,
            tel: hospital.tel,
            region: hospital.region,
            created_at: hospital.created_at,
        }
    }
}

/// Vaccination centre listing entry.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct VacCenterBody {
    pub id: i32,
    pub name: String,
    pub tel: Option<String>,
}

impl From<VacCenter> for VacCenterBody {
    fn from(center: VacCenter) -> Self {
        Self {
            id: center.id,
            name: center.name,
            tel: center.tel,
        }
    }
}

fn hospital_validation_error(err: &HospitalValidationError) -> Error {
    match err {
        HospitalValidationError::Missing { field } => field_error(
            FieldName::new(*field),
            ErrorCode::MissingField,
            err.to_string(),
        ),
        HospitalValidationError::TooLong { field, .. } => {
            invalid_field_error(FieldName::new(*field), err.to_string())
        }
    }
}

/// List every hospital.
#[utoipa::path(
    get,
    path = "/api/v1/hospitals",
    responses(
        (status = 200, description = "Hospitals with their count", body = [HospitalBody]),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["hospitals"],
    operation_id = "listHospitals",
    security([])
)]
#[get("/hospitals")]
pub async fn list_hospitals(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let hospitals = state.hospitals.list().await?;
    let bodies = hospitals.into_iter().map(HospitalBody::from).collect();
    Ok(Envelope::list(bodies).ok())
}

/// List vaccination centres.
#[utoipa::path(
    get,
    path = "/api/v1/hospitals/vacCenters",
    responses(
        (status = 200, description = "Vaccination centres", body = [VacCenterBody]),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["hospitals"],
    operation_id = "listVacCenters",
    security([])
)]
#[get("/hospitals/vacCenters")]
pub async fn list_vac_centers(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let centers = state.hospitals.vac_centers().await?;
    let bodies: Vec<_> = centers.into_iter().map(VacCenterBody::from).collect();
    Ok(Envelope::data(bodies).ok())
}

/// Fetch one hospital.
#[utoipa::path(
    get,
    path = "/api/v1/hospitals/{id}",
    params(("id" = String, Path, description = "Hospital id")),
    responses(
        (status = 200, description = "Hospital", body = HospitalBody),
        (status = 400, description = "No such hospital", body = ErrorBody)
    ),
    tags = ["hospitals"],
    operation_id = "getHospital",
    security([])
)]
#[get("/hospitals/{id}")]
pub async fn get_hospital(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_hospital_id(&path)?;
    let hospital = state.hospitals.get(&id).await?;
    Ok(Envelope::data(HospitalBody::from(hospital)).ok())
}

/// Create a hospital.
#[utoipa::path(
    post,
    path = "/api/v1/hospitals",
    request_body = HospitalRequest,
    responses(
        (status = 201, description = "Created", body = HospitalBody),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Not an admin", body = ErrorBody)
    ),
    tags = ["hospitals"],
    operation_id = "createHospital"
)]
#[post("/hospitals")]
pub async fn create_hospital(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    payload: web::Json<HospitalRequest>,
) -> ApiResult<HttpResponse> {
    caller.authorize(&[Role::Admin])?;
    let draft = HospitalDraft::try_from_fields(payload.into_inner().into())
        .map_err(|err| hospital_validation_error(&err))?;
    let hospital = state.hospitals.create(draft).await?;
    Ok(Envelope::data(HospitalBody::from(hospital)).created())
}

/// Update a hospital's fields.
#[utoipa::path(
    put,
    path = "/api/v1/hospitals/{id}",
    params(("id" = String, Path, description = "Hospital id")),
    request_body = HospitalRequest,
    responses(
        (status = 200, description = "Updated", body = HospitalBody),
        (status = 400, description = "Invalid request or no such hospital", body = ErrorBody),
        (status = 401, description = "Not an admin", body = ErrorBody)
    ),
    tags = ["hospitals"],
    operation_id = "updateHospital"
)]
#[put("/hospitals/{id}")]
pub async fn update_hospital(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<String>,
    payload: web::Json<HospitalRequest>,
) -> ApiResult<HttpResponse> {
    caller.authorize(&[Role::Admin])?;
    let id = parse_hospital_id(&path)?;
    let patch = HospitalPatch::try_from_fields(payload.into_inner().into())
        .map_err(|err| hospital_validation_error(&err))?;
    let hospital = state.hospitals.update(&id, patch).await?;
    Ok(Envelope::data(HospitalBody::from(hospital)).ok())
}

/// Delete a hospital and its appointments.
#[utoipa::path(
    delete,
    path = "/api/v1/hospitals/{id}",
    params(("id" = String, Path, description = "Hospital id")),
    responses(
        (status = 200, description = "Deleted", body = Empty),
        (status = 400, description = "No such hospital", body = ErrorBody),
        (status = 401, description = "Not an admin", body = ErrorBody)
    ),
    tags = ["hospitals"],
    operation_id = "deleteHospital"
)]
#[delete("/hospitals/{id}")]
pub async fn delete_hospital(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    caller.authorize(&[Role::Admin])?;
    let id = parse_hospital_id(&path)?;
    state.hospitals.delete(&id).await?;
    Ok(Envelope::data(Empty::default()).ok())
}

#[cfg(test)]
#[path = "hospitals_tests.rs"]
mod tests;
