use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use patient_cell::router::patient_routes;
use shared_database::DISEASE_CATALOG;
use shared_models::care::Disease;
use shared_models::user::User;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};
use shared_utils::AppState;

async fn setup() -> (AppState, Router) {
    let state = TestConfig::default().build_state().await;
    (state.clone(), patient_routes(state))
}

async fn call(app: &Router, state: &AppState, caller: Option<&User>, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(caller) = caller {
        let token = JwtTestUtils::token_for(state, caller);
        builder = builder.header("authorization", JwtTestUtils::bearer(&token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn diseases(state: &AppState) -> Vec<Disease> {
    state.store.list_diseases().await.unwrap()
}

#[tokio::test]
async fn test_doctor_assigns_patient_once() {
    let (state, app) = setup().await;
    let doctor = TestUser::doctor("doc@example.com").insert(&state).await;
    let patient = TestUser::patient("pat@example.com").named("Pat Example").insert(&state).await;

    let (status, body) = call(&app, &state, Some(&doctor), "POST", "/assign", Some(json!({ "patientId": patient.id }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["doctorId"], doctor.id.to_string());
    assert_eq!(body["patient"]["fullName"], "Pat Example");
    assert_eq!(body["patient"]["email"], "pat@example.com");

    let (status, body) = call(&app, &state, Some(&doctor), "POST", "/assign", Some(json!({ "patientId": patient.id }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "patient already assigned to this doctor");
}

#[tokio::test]
async fn test_patient_cannot_assign() {
    let (state, app) = setup().await;
    let patient = TestUser::patient("pat@example.com").insert(&state).await;
    let other = TestUser::patient("other@example.com").insert(&state).await;

    let (status, _) = call(&app, &state, Some(&patient), "POST", "/assign", Some(json!({ "patientId": other.id }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_assign_requires_existing_patient() {
    let (state, app) = setup().await;
    let doctor = TestUser::doctor("doc@example.com").insert(&state).await;
    let other_doctor = TestUser::doctor("doc2@example.com").insert(&state).await;

    let (status, body) = call(&app, &state, Some(&doctor), "POST", "/assign", Some(json!({ "patientId": other_doctor.id }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "patient not found");

    let (status, _) = call(&app, &state, Some(&doctor), "POST", "/assign", Some(json!({ "patientId": Uuid::new_v4() }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, &state, Some(&doctor), "POST", "/assign", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_patients_my_versus_all() {
    let (state, app) = setup().await;
    let doctor = TestUser::doctor("doc@example.com").insert(&state).await;
    let zoe = TestUser::patient("zoe@example.com").named("Zoe").insert(&state).await;
    let adam = TestUser::patient("adam@example.com").named("Adam").insert(&state).await;
    TestUser::patient("mia@example.com").named("Mia").insert(&state).await;

    for patient in [&zoe, &adam] {
        call(&app, &state, Some(&doctor), "POST", "/assign", Some(json!({ "patientId": patient.id }))).await;
    }

    let (status, body) = call(&app, &state, Some(&doctor), "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body.as_array().unwrap().iter().map(|p| p["fullName"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Adam", "Zoe"]);

    let (_, body) = call(&app, &state, Some(&doctor), "GET", "/?filter=all", None).await;
    let names: Vec<&str> = body.as_array().unwrap().iter().map(|p| p["fullName"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Adam", "Mia", "Zoe"]);

    let (_, body) = call(&app, &state, Some(&doctor), "GET", "/?filter=whatever", None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_medical_info_disease_set_is_replaced() {
    let (state, app) = setup().await;
    let doctor = TestUser::doctor("doc@example.com").named("Dr. Ada").insert(&state).await;
    let patient = TestUser::patient("pat@example.com").insert(&state).await;
    let catalog = diseases(&state).await;
    let (a, b, c) = (&catalog[0], &catalog[1], &catalog[2]);
    let uri = format!("/{}/medical-info", patient.id);

    let (status, body) = call(
        &app,
        &state,
        Some(&doctor),
        "POST",
        &uri,
        Some(json!({ "gender": "female", "ageGroup": "30-39", "diseaseIds": [a.id, b.id] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["diseases"].as_array().unwrap().len(), 2);
    assert_eq!(body["doctor"]["fullName"], "Dr. Ada");
    let first_id = body["id"].clone();

    let (status, body) = call(
        &app,
        &state,
        Some(&doctor),
        "POST",
        &uri,
        Some(json!({ "gender": "female", "ageGroup": "40-49", "diseaseIds": [c.id] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], first_id);
    assert_eq!(body["ageGroup"], "40-49");
    let ids: Vec<&str> = body["diseases"].as_array().unwrap().iter().map(|d| d["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec![c.id.to_string()]);
}

#[tokio::test]
async fn test_medical_info_ownership_moves_to_last_writer() {
    let (state, app) = setup().await;
    let first = TestUser::doctor("first@example.com").insert(&state).await;
    let second = TestUser::doctor("second@example.com").named("Dr. Second").insert(&state).await;
    let patient = TestUser::patient("pat@example.com").insert(&state).await;
    let uri = format!("/{}/medical-info", patient.id);
    let body = json!({ "gender": "male", "ageGroup": "18-29" });

    call(&app, &state, Some(&first), "POST", &uri, Some(body.clone())).await;
    let (status, response) = call(&app, &state, Some(&second), "POST", &uri, Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["doctorId"], second.id.to_string());

    call(&app, &state, Some(&second), "POST", "/assign", Some(json!({ "patientId": patient.id }))).await;
    let (_, list) = call(&app, &state, Some(&second), "GET", "/", None).await;
    assert_eq!(list[0]["medicalInfo"]["doctor"]["fullName"], "Dr. Second");
    assert_eq!(list[0]["medicalInfo"]["diseases"], json!([]));
}

#[tokio::test]
async fn test_medical_info_validation() {
    let (state, app) = setup().await;
    let doctor = TestUser::doctor("doc@example.com").insert(&state).await;
    let patient = TestUser::patient("pat@example.com").insert(&state).await;
    let uri = format!("/{}/medical-info", patient.id);

    let (status, body) = call(&app, &state, Some(&doctor), "POST", &uri, Some(json!({ "ageGroup": "18-29" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "gender is required");

    let (status, body) = call(
        &app,
        &state,
        Some(&doctor),
        "POST",
        &uri,
        Some(json!({ "gender": "male", "ageGroup": "18-29", "diseaseIds": [Uuid::new_v4()] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid disease ids");
    assert!(state.store.list_patient_charts(shared_models::care::PatientScope::All).await.unwrap()[0]
        .medical_info
        .is_none());

    let (status, _) = call(
        &app,
        &state,
        Some(&doctor),
        "POST",
        &format!("/{}/medical-info", doctor.id),
        Some(json!({ "gender": "male", "ageGroup": "18-29" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, &state, Some(&patient), "POST", &uri, Some(json!({ "gender": "male", "ageGroup": "18-29" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_disease_catalog_is_public_and_ordered() {
    let (state, app) = setup().await;
    state.store.seed_diseases(&DISEASE_CATALOG).await.unwrap();

    let (status, body) = call(&app, &state, None, "GET", "/diseases", None).await;
    assert_eq!(status, StatusCode::OK);

    let items = body.as_array().unwrap();
    assert_eq!(items.len(), DISEASE_CATALOG.len());
    let keys: Vec<(String, String)> = items
        .iter()
        .map(|d| (d["category"].as_str().unwrap().to_string(), d["name"].as_str().unwrap().to_string()))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[tokio::test]
async fn test_mistyped_body_is_bad_request() {
    let (state, app) = setup().await;
    let doctor = TestUser::doctor("doc@example.com").insert(&state).await;
    let patient = TestUser::patient("pat@example.com").insert(&state).await;

    let (status, body) = call(&app, &state, Some(&doctor), "POST", "/assign", Some(json!({ "patientId": 7 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = call(
        &app,
        &state,
        Some(&doctor),
        "POST",
        &format!("/{}/medical-info", patient.id),
        Some(json!({ "gender": "male", "ageGroup": "18-29", "diseaseIds": "all" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("diseaseIds"));
}
