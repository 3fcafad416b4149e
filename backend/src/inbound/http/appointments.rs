//! Appointment API handlers.
//!
//! ```text
//! GET /api/v1/appointments
//! GET /api/v1/appointments/{id}
//! POST /api/v1/hospitals/{hospitalId}/appointments {"apptDate":"2026-11-02T09:30:00Z"}
//! PUT /api/v1/appointments/{id} {"apptDate":"2026-11-09T09:30:00Z"}
//! DELETE /api/v1/appointments/{id}
//! ```
//!
//! Every route requires an authenticated caller. Booking limits and
//! ownership are enforced by the admission port, not here.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Appointment, AppointmentDraft, AppointmentPatch, AppointmentView, HospitalSummary,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::AuthenticatedCaller;
use crate::inbound::http::envelope::{Empty, Envelope};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_appointment_id, parse_hospital_id,
    parse_optional_rfc3339_timestamp, parse_rfc3339_timestamp,
};

const APPT_DATE: FieldName = FieldName::new("apptDate");

/// Body for `POST /api/v1/hospitals/{hospitalId}/appointments`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    /// RFC 3339 timestamp of the slot.
    #[schema(example = "2026-11-02T09:30:00Z")]
    pub appt_date: Option<String>,
}

/// Body for `PUT /api/v1/appointments/{id}`. Absent fields are unchanged;
/// the owner cannot be reassigned.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    #[schema(example = "2026-11-09T09:30:00Z")]
    pub appt_date: Option<String>,
    /// Id of an existing hospital.
    pub hospital: Option<String>,
}

/// Hospital projection embedded in appointment listings.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HospitalSummaryBody {
    pub id: Uuid,
    pub name: String,
    pub province: String,
    pub tel: Option<String>,
}

impl From<HospitalSummary> for HospitalSummaryBody {
    fn from(summary: HospitalSummary) -> Self {
        Self {
            id: *summary.id.as_uuid(),
            name: summary.name,
            province: summary.province,
            tel: summary.tel,
        }
    }
}

/// Stored appointment as returned by create and update.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentBody {
    pub id: Uuid,
    pub appt_date: DateTime<Utc>,
    pub user: Uuid,
    pub hospital: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Appointment> for AppointmentBody {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: *appointment.id.as_uuid(),
            appt_date: appointment.appt_date,
            user: *appointment.user.as_uuid(),
            hospital: *appointment.hospital.as_uuid(),
            created_at: appointment.created_at,
        }
    }
}

/// Appointment with its hospital resolved; `hospital` is `null` when the
/// stored reference names no hospital.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentViewBody {
    pub id: Uuid,
    pub appt_date: DateTime<Utc>,
    pub user: Uuid,
    pub hospital: Option<HospitalSummaryBody>,
    pub created_at: DateTime<Utc>,
}

impl From<AppointmentView> for AppointmentViewBody {
    fn from(view: AppointmentView) -> Self {
        let AppointmentView {
            appointment,
            hospital,
        } = view;
        Self {
            id: *appointment.id.as_uuid(),
            appt_date: appointment.appt_date,
            user: *appointment.user.as_uuid(),
            hospital: hospital.map(HospitalSummaryBody::from),
            created_at: appointment.created_at,
        }
    }
}

/// List the caller's appointments, or all of them for admins.
#[utoipa::path(
    get,
    path = "/api/v1/appointments",
    responses(
        (status = 200, description = "Appointments with their count", body = [AppointmentViewBody]),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["appointments"],
    operation_id = "listAppointments"
)]
#[get("/appointments")]
pub async fn list_appointments(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
) -> ApiResult<HttpResponse> {
    let views = state.appointments.list(&caller).await?;
    let bodies = views.into_iter().map(AppointmentViewBody::from).collect();
    Ok(Envelope::list(bodies).ok())
}

/// Fetch one appointment.
#[utoipa::path(
    get,
    path = "/api/v1/appointments/{id}",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment", body = AppointmentViewBody),
        (status = 400, description = "No such appointment", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody)
    ),
    tags = ["appointments"],
    operation_id = "getAppointment"
)]
#[get("/appointments/{id}")]
pub async fn get_appointment(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_appointment_id(&path)?;
    let view = state.appointments.get(&caller, &id).await?;
    Ok(Envelope::data(AppointmentViewBody::from(view)).ok())
}

/// Book an appointment at a hospital.
#[utoipa::path(
    post,
    path = "/api/v1/hospitals/{hospitalId}/appointments",
    params(("hospitalId" = String, Path, description = "Hospital id")),
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Booked", body = AppointmentBody),
        (
            status = 400,
            description = "Invalid request, unknown hospital or booking limit reached",
            body = ErrorBody
        ),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["appointments"],
    operation_id = "createAppointment"
)]
#[post("/hospitals/{hospital_id}/appointments")]
pub async fn create_appointment(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<String>,
    payload: web::Json<CreateAppointmentRequest>,
) -> ApiResult<HttpResponse> {
    let hospital = parse_hospital_id(&path)?;
    let raw_date = payload
        .appt_date
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .ok_or_else(|| missing_field_error(APPT_DATE))?;
    let draft = AppointmentDraft {
        appt_date: parse_rfc3339_timestamp(raw_date, APPT_DATE)?,
    };

    let appointment = state.appointments.create(&caller, &hospital, draft).await?;
    Ok(Envelope::data(AppointmentBody::from(appointment)).created())
}

/// Change an appointment's date or hospital.
#[utoipa::path(
    put,
    path = "/api/v1/appointments/{id}",
    params(("id" = String, Path, description = "Appointment id")),
    request_body = UpdateAppointmentRequest,
    responses(
        (status = 200, description = "Updated", body = AppointmentBody),
        (status = 400, description = "Invalid request or no such appointment", body = ErrorBody),
        (status = 401, description = "Not the owner or an admin", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["appointments"],
    operation_id = "updateAppointment"
)]
#[put("/appointments/{id}")]
pub async fn update_appointment(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<String>,
    payload: web::Json<UpdateAppointmentRequest>,
) -> ApiResult<HttpResponse> {
    let id = parse_appointment_id(&path)?;
    let UpdateAppointmentRequest {
        appt_date,
        hospital,
    } = payload.into_inner();
    let patch = AppointmentPatch {
        appt_date: parse_optional_rfc3339_timestamp(appt_date.as_deref(), APPT_DATE)?,
        hospital: hospital.as_deref().map(parse_hospital_id).transpose()?,
    };

    let appointment = state.appointments.update(&caller, &id, patch).await?;
    Ok(Envelope::data(AppointmentBody::from(appointment)).ok())
}

/// Cancel an appointment.
#[utoipa::path(
    delete,
    path = "/api/v1/appointments/{id}",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Deleted", body = Empty),
        (status = 400, description = "No such appointment", body = ErrorBody),
        (status = 401, description = "Not the owner or an admin", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["appointments"],
    operation_id = "deleteAppointment"
)]
#[delete("/appointments/{id}")]
pub async fn delete_appointment(
    state: web::Data<HttpState>,
    caller: AuthenticatedCaller,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_appointment_id(&path)?;
    state.appointments.delete(&caller, &id).await?;
    Ok(Envelope::data(Empty::default()).ok())
}

#[cfg(test)]
#[path = "appointments_tests.rs"]
mod tests;
