//! Success envelope shared by every JSON endpoint.
//!
//! ```text
//! {"success": true, "count": 2, "data": [...]}
//! {"success": true, "data": {...}}
//! ```

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

/// `{success:true, count?, data}` body.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            count: None,
            data,
        }
    }

    /// Render with the given status code.
    pub fn respond(self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }

    pub fn ok(self) -> HttpResponse {
        self.respond(StatusCode::OK)
    }

    pub fn created(self) -> HttpResponse {
        self.respond(StatusCode::CREATED)
    }
}

impl<T: Serialize> Envelope<Vec<T>> {
    /// List body carrying the number of items alongside them.
    pub fn list(items: Vec<T>) -> Self {
        Self {
            success: true,
            count: Some(items.len()),
            data: items,
        }
    }
}

/// Empty object used as `data` for deletes.
#[derive(Debug, Default, Serialize, utoipa::ToSchema)]
pub struct Empty {}
