use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use appointment_cell::router::{appointment_routes, availability_routes};
use shared_models::clinic::PaymentStatus;
use shared_utils::test_utils::ClinicFixture;

fn create_test_app(fixture: &ClinicFixture) -> Router {
    let state = fixture.state();
    Router::new()
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/doctors", availability_routes(state))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn slots_request(doctor_id: Uuid, date: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(format!("/doctors/{}/available-slots?date={}", doctor_id, date))
        .body(Body::empty())
        .unwrap()
}

fn booking_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/appointments")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn booking_body(fixture: &ClinicFixture, slot: &str) -> Value {
    json!({
        "doctor_id": fixture.doctor.doctor_id,
        "patient_id": fixture.patient.patient_id,
        "appointment_date": "2026-10-20",
        "appointment_time_slot": slot
    })
}

#[tokio::test]
async fn test_available_slots_lists_free_slots() {
    let fixture = ClinicFixture::new().await.with_availability("09:00-11:00").await;
    fixture.book(Uuid::new_v4(), "10:00-10:30", PaymentStatus::Pending).await;

    let (status, body) = send(
        create_test_app(&fixture),
        slots_request(fixture.doctor.doctor_id, "2026-10-20"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "2026-10-20");
    assert_eq!(
        body["available_time_slots"],
        json!(["09:00-09:30", "09:30-10:00", "10:30-11:00"])
    );
}

#[tokio::test]
async fn test_available_slots_rejects_bad_date() {
    let fixture = ClinicFixture::new().await.with_availability("09:00-11:00").await;

    let (status, body) = send(
        create_test_app(&fixture),
        slots_request(fixture.doctor.doctor_id, "20-10-2026"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid date format");
}

#[tokio::test]
async fn test_available_slots_without_availability_is_not_found() {
    let fixture = ClinicFixture::new().await;

    let (status, _) = send(
        create_test_app(&fixture),
        slots_request(fixture.doctor.doctor_id, "2026-10-20"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_book_appointment_returns_appointment_and_invoice() {
    let fixture = ClinicFixture::new().await.with_availability("09:00-11:00").await;

    let (status, body) = send(
        create_test_app(&fixture),
        booking_request(booking_body(&fixture, "09:30-10:00")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["appointment"]["appointment_time_slot"], "09:30-10:00");
    assert_eq!(body["appointment"]["booking_status"], "pending");
    assert_eq!(body["appointment"]["payment_status"], "pending");
    assert_eq!(body["invoice"]["total_amount"], 150.0);
    assert_eq!(body["invoice"]["payment_status"], "Pending");
    assert_eq!(body["invoice"]["appointment_id"], body["appointment"]["appointment_id"]);
}

#[tokio::test]
async fn test_booked_slot_disappears_from_listing() {
    let fixture = ClinicFixture::new().await.with_availability("09:00-10:00").await;
    let app = create_test_app(&fixture);

    let (status, _) = send(app.clone(), booking_request(booking_body(&fixture, "09:00-09:30"))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(app, slots_request(fixture.doctor.doctor_id, "2026-10-20")).await;
    assert_eq!(body["available_time_slots"], json!(["09:30-10:00"]));
}

#[tokio::test]
async fn test_book_appointment_unavailable_slot_is_bad_request() {
    let fixture = ClinicFixture::new().await.with_availability("09:00-11:00").await;

    let (status, body) = send(
        create_test_app(&fixture),
        booking_request(booking_body(&fixture, "12:00-12:30")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Appointment time slot not available");
}

#[tokio::test]
async fn test_book_appointment_paid_conflict_is_conflict() {
    let fixture = ClinicFixture::new().await.with_availability("09:00-11:00").await;
    fixture.book(Uuid::new_v4(), "09:00-09:30", PaymentStatus::Paid).await;

    let (status, _) = send(
        create_test_app(&fixture),
        booking_request(booking_body(&fixture, "09:00-09:30")),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_book_appointment_unknown_patient_is_not_found() {
    let fixture = ClinicFixture::new().await.with_availability("09:00-11:00").await;
    let mut body = booking_body(&fixture, "09:00-09:30");
    body["patient_id"] = json!(Uuid::new_v4());

    let (status, body) = send(create_test_app(&fixture), booking_request(body)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Patient not found");
    assert!(fixture.store.appointments().await.is_empty());
}

#[tokio::test]
async fn test_book_appointment_malformed_date_is_rejected() {
    let fixture = ClinicFixture::new().await.with_availability("09:00-11:00").await;
    let mut body = booking_body(&fixture, "09:00-09:30");
    body["appointment_date"] = json!("tomorrow");

    let (status, body) = send(create_test_app(&fixture), booking_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid date format");
    assert!(fixture.store.appointments().await.is_empty());
}

#[tokio::test]
async fn test_book_appointment_malformed_body_is_json_bad_request() {
    let fixture = ClinicFixture::new().await.with_availability("09:00-11:00").await;
    let mut body = booking_body(&fixture, "09:00-09:30");
    body["doctor_id"] = json!("not-a-uuid");

    let (status, body) = send(create_test_app(&fixture), booking_request(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(fixture.store.appointments().await.is_empty());
}

#[tokio::test]
async fn test_available_slots_without_date_is_bad_request() {
    let fixture = ClinicFixture::new().await.with_availability("09:00-11:00").await;
    let request = Request::builder()
        .method("GET")
        .uri(format!("/doctors/{}/available-slots", fixture.doctor.doctor_id))
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(create_test_app(&fixture), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid date format");
}
