//! Handler tests for the appointment endpoints.

use super::*;
use crate::domain::ports::MockAppointmentAdmission;
use crate::domain::{AppointmentId, Caller, Error, HospitalId, Role, UserId};
use crate::inbound::http::test_utils::{StatePorts, auth_accepting, state_with};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test};
use chrono::TimeZone;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const TOKEN: &str = "member-token";

#[fixture]
fn caller() -> Caller {
    Caller::new(UserId::random(), Role::User)
}

fn slot() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 11, 2, 9, 30, 0)
        .single()
        .expect("valid fixture time")
}

fn appointment(owner: UserId, hospital: HospitalId) -> Appointment {
    Appointment {
        id: AppointmentId::random(),
        user: owner,
        hospital,
        appt_date: slot(),
        created_at: slot(),
    }
}

async fn call(
    caller: Caller,
    appointments: MockAppointmentAdmission,
    request: actix_test::TestRequest,
) -> (StatusCode, Value) {
    let app = actix_test::init_service(
        App::new()
            .app_data(state_with(StatePorts {
                auth: Some(auth_accepting(TOKEN, caller)),
                appointments: Some(appointments),
                ..StatePorts::default()
            }))
            .service(
                web::scope("/api/v1")
                    .service(list_appointments)
                    .service(get_appointment)
                    .service(create_appointment)
                    .service(update_appointment)
                    .service(delete_appointment),
            ),
    )
    .await;
    let request = request.insert_header((AUTHORIZATION, format!("Bearer {TOKEN}")));
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

#[rstest]
#[actix_web::test]
async fn list_embeds_hospital_summaries(caller: Caller) {
    let hospital = HospitalSummary {
        id: HospitalId::random(),
        name: "Ramathibodi".into(),
        province: "Bangkok".into(),
        tel: None,
    };
    let resolved = AppointmentView {
        appointment: appointment(caller.user_id, hospital.id),
        hospital: Some(hospital.clone()),
    };
    let dangling = AppointmentView {
        appointment: appointment(caller.user_id, HospitalId::from_uuid(*caller.user_id.as_uuid())),
        hospital: None,
    };
    let mut appointments = MockAppointmentAdmission::new();
    appointments
        .expect_list()
        .withf(move |presented| *presented == caller)
        .returning(move |_| Ok(vec![resolved.clone(), dangling.clone()]));

    let (status, body) = call(
        caller,
        appointments,
        actix_test::TestRequest::get().uri("/api/v1/appointments"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(2));
    assert_eq!(body["data"][0]["hospital"]["name"], json!("Ramathibodi"));
    assert_eq!(body["data"][0]["apptDate"], json!("2026-11-02T09:30:00Z"));
    assert_eq!(body["data"][1]["hospital"], Value::Null);
    assert_eq!(body["data"][1]["user"], json!(caller.user_id.to_string()));
}

#[rstest]
#[actix_web::test]
async fn create_books_at_the_path_hospital(caller: Caller) {
    let hospital = HospitalId::random();
    let stored = appointment(caller.user_id, hospital);
    let mut appointments = MockAppointmentAdmission::new();
    appointments
        .expect_create()
        .withf(move |presented, requested, draft| {
            *presented == caller && *requested == hospital && draft.appt_date == slot()
        })
        .times(1)
        .returning(move |_, _, _| Ok(stored.clone()));

    let (status, body) = call(
        caller,
        appointments,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/hospitals/{hospital}/appointments"))
            .set_json(json!({"apptDate": "2026-11-02T16:30:00+07:00"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["hospital"], json!(hospital.to_string()));
}

#[rstest]
#[case::missing(json!({}), "Please add an apptDate")]
#[case::blank(json!({"apptDate": " "}), "Please add an apptDate")]
#[case::malformed(json!({"apptDate": "tomorrow"}), "apptDate must be an RFC 3339 timestamp")]
#[actix_web::test]
async fn create_requires_a_valid_date(
    caller: Caller,
    #[case] payload: Value,
    #[case] message: &str,
) {
    let (status, body) = call(
        caller,
        MockAppointmentAdmission::new(),
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/hospitals/{}/appointments", HospitalId::random()))
            .set_json(payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!(message));
}

#[rstest]
#[actix_web::test]
async fn booking_limit_is_a_bad_request(caller: Caller) {
    let message = format!(
        "The user with id {} have already booked 3 appointments",
        caller.user_id
    );
    let reply = message.clone();
    let mut appointments = MockAppointmentAdmission::new();
    appointments
        .expect_create()
        .returning(move |_, _, _| Err(Error::capacity_exceeded(reply.clone())));

    let (status, body) = call(
        caller,
        appointments,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/hospitals/{}/appointments", HospitalId::random()))
            .set_json(json!({"apptDate": "2026-11-02T09:30:00Z"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!(message));
}

#[rstest]
#[actix_web::test]
async fn update_forwards_only_supplied_fields(caller: Caller) {
    let target = HospitalId::random();
    let stored = appointment(caller.user_id, target);
    let id = stored.id;
    let mut appointments = MockAppointmentAdmission::new();
    appointments
        .expect_update()
        .withf(move |_, requested, patch| {
            *requested == id && patch.appt_date.is_none() && patch.hospital == Some(target)
        })
        .returning(move |_, _, _| Ok(stored.clone()));

    let (status, body) = call(
        caller,
        appointments,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/appointments/{id}"))
            .set_json(json!({
                "hospital": target.to_string(),
                "user": UserId::random().to_string()
            })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"], json!(caller.user_id.to_string()));
}

#[rstest]
#[actix_web::test]
async fn update_by_a_stranger_is_unauthorised(caller: Caller) {
    let id = AppointmentId::random();
    let message = format!("User {} is not authorized to update this appointment", caller.user_id);
    let reply = message.clone();
    let mut appointments = MockAppointmentAdmission::new();
    appointments
        .expect_update()
        .returning(move |_, _, _| Err(Error::forbidden(reply.clone())));

    let (status, body) = call(
        caller,
        appointments,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/appointments/{id}"))
            .set_json(json!({"apptDate": "2026-11-09T09:30:00Z"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], json!(message));
}

#[rstest]
#[actix_web::test]
async fn delete_answers_with_empty_data(caller: Caller) {
    let id = AppointmentId::random();
    let mut appointments = MockAppointmentAdmission::new();
    appointments
        .expect_delete()
        .withf(move |_, requested| *requested == id)
        .returning(|_, _| Ok(()));

    let (status, body) = call(
        caller,
        appointments,
        actix_test::TestRequest::delete().uri(&format!("/api/v1/appointments/{id}")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "data": {}}));
}

#[rstest]
#[actix_web::test]
async fn malformed_appointment_ids_are_missing(caller: Caller) {
    let (status, body) = call(
        caller,
        MockAppointmentAdmission::new(),
        actix_test::TestRequest::get().uri("/api/v1/appointments/65f0c0ffee"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("No appointment with the id 65f0c0ffee"));
}

#[rstest]
#[actix_web::test]
async fn get_returns_a_store_failure_as_500(caller: Caller) {
    let mut appointments = MockAppointmentAdmission::new();
    appointments.expect_get().returning(|_, _| {
        Err(Error::internal("Cannot find appointment")
            .with_details(json!({"cause": "connection reset"})))
    });

    let (status, body) = call(
        caller,
        appointments,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/appointments/{}", AppointmentId::random())),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], json!("internal_error"));
    assert!(body.get("details").is_none());
}
