//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into the `success:false` envelope with a
//! consistent status code.
//!
//! Status mapping:
//! - `invalid_request`, `not_found`, `capacity_exceeded` → 400
//! - `unauthorized`, `forbidden` → 401
//! - `internal_error` → 500

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Failure envelope written for every domain error.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Machine-readable error code.
    #[schema(example = "capacity_exceeded")]
    pub error: String,
    /// Human-readable explanation.
    #[schema(
        example = "The user with id 3fa85f64-5717-4562-b3fc-2c963f66afa6 have already booked 3 appointments"
    )]
    pub message: String,
    /// Field-level context for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Correlation id, also sent in the `trace-id` header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest | ErrorCode::NotFound | ErrorCode::CapacityExceeded => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::Unauthorized | ErrorCode::Forbidden => StatusCode::UNAUTHORIZED,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Internal failures keep their operation-level message but never expose
/// the store detail attached by the service.
fn body_for(error: &Error) -> ErrorBody {
    let details = if matches!(error.code(), ErrorCode::InternalError) {
        error!(
            message = error.message(),
            details = ?error.details(),
            trace_id = error.trace_id(),
            "internal error returned to client"
        );
        None
    } else {
        error.details().cloned()
    };
    ErrorBody {
        success: false,
        error: error.code().as_str().to_owned(),
        message: error.message().to_owned(),
        details,
        trace_id: error.trace_id().map(str::to_owned),
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(body_for(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Self::internal("Internal server error")
    }
}

/// Route malformed JSON bodies through the domain envelope.
///
/// Registered with `web::JsonConfig::error_handler`.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!(error = %err, "rejected malformed JSON payload");
    let message = match &err {
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_owned(),
        JsonPayloadError::Deserialize(inner) => format!("Invalid request body: {inner}"),
        _ => "Invalid request body".to_owned(),
    };
    Error::invalid_request(message).into()
}
