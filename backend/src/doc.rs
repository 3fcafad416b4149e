//! OpenAPI documentation for the booking API.
//!
//! [`ApiDoc`] registers every handler under `inbound::http`, the request and
//! response bodies they exchange, and two equivalent security schemes for
//! the identity token: a bearer header and the `token` cookie. Swagger UI
//! serves it in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::appointments::{
    AppointmentBody, AppointmentViewBody, CreateAppointmentRequest, HospitalSummaryBody,
    UpdateAppointmentRequest,
};
use crate::inbound::http::auth::{LoginRequest, RegisterRequest, TokenResponse, UserBody};
use crate::inbound::http::envelope::Empty;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::hospitals::{HospitalBody, HospitalRequest, VacCenterBody};

/// Adds the token security schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token returned by register or login."))
                    .build(),
            ),
        );
        components.add_security_scheme(
            "TokenCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "token",
                "httpOnly cookie set by register or login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Vaccination booking API",
        description = "Hospital directory and appointment booking with a per-user booking limit."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("BearerToken" = []), ("TokenCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::me,
        crate::inbound::http::hospitals::list_hospitals,
        crate::inbound::http::hospitals::list_vac_centers,
        crate::inbound::http::hospitals::get_hospital,
        crate::inbound::http::hospitals::create_hospital,
        crate::inbound::http::hospitals::update_hospital,
        crate::inbound::http::hospitals::delete_hospital,
        crate::inbound::http::appointments::list_appointments,
        crate::inbound::http::appointments::get_appointment,
        crate::inbound::http::appointments::create_appointment,
        crate::inbound::http::appointments::update_appointment,
        crate::inbound::http::appointments::delete_appointment,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorBody,
        Empty,
        RegisterRequest,
        LoginRequest,
        TokenResponse,
        UserBody,
        HospitalRequest,
        HospitalBody,
        VacCenterBody,
        HospitalSummaryBody,
        CreateAppointmentRequest,
        UpdateAppointmentRequest,
        AppointmentBody,
        AppointmentViewBody
    )),
    tags(
        (name = "auth", description = "Registration, login and the current user"),
        (name = "hospitals", description = "Hospital directory"),
        (name = "appointments", description = "Appointment booking"),
        (name = "health", description = "Orchestrator probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn has_field(schema: &RefOr<Schema>, field: &str) -> bool {
        match schema {
            RefOr::T(Schema::Object(obj)) => obj.properties.contains_key(field),
            _ => false,
        }
    }

    #[rstest]
    #[case("ErrorBody", "success")]
    #[case("ErrorBody", "message")]
    #[case("AppointmentBody", "apptDate")]
    #[case("HospitalBody", "postalcode")]
    #[case("TokenResponse", "token")]
    fn schemas_expose_wire_field_names(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let found = schemas.get(schema).expect("registered schema");
        assert!(has_field(found, field), "{schema} should have field '{field}'");
    }

    #[rstest]
    #[case("/api/v1/auth/register")]
    #[case("/api/v1/hospitals/vacCenters")]
    #[case("/api/v1/hospitals/{hospitalId}/appointments")]
    #[case("/api/v1/appointments/{id}")]
    #[case("/health/ready")]
    fn paths_are_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn both_token_transports_are_declared() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("BearerToken"));
        assert!(components.security_schemes.contains_key("TokenCookie"));
    }
}
