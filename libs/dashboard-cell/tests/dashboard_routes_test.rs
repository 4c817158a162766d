use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, NaiveTime};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dashboard_cell::{dashboard_routes, DashboardFeed, DashboardState, RefreshOutcome};
use notification_cell::SmsNotifier;
use shared_database::{AppointmentStore, InMemoryStore, SupabaseStore};
use shared_models::catalog::ServiceCatalog;
use shared_utils::gate::STAFF_PASSCODE_HEADER;
use shared_utils::test_utils::{sample_new_appointment, TestConfig};

const PASSCODE: &str = "letmein";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn slot(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap()
}

async fn seeded_app() -> (Router, Arc<DashboardFeed>, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    store
        .insert(sample_new_appointment("+15550100", "1", date(2026, 9, 1), slot(9)))
        .await
        .unwrap();
    store
        .insert(sample_new_appointment("+15550111", "2", date(2026, 9, 2), slot(10)))
        .await
        .unwrap();

    let feed = Arc::new(DashboardFeed::new(store.clone()));
    feed.refresh().await;

    let state = Arc::new(DashboardState::new(
        feed.clone(),
        ServiceCatalog::standard(),
        Arc::new(SmsNotifier::simulated()),
    ));
    let config = TestConfig::default().to_arc();
    (dashboard_routes(state, config), feed, store)
}

fn get(uri: &str, passcode: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(code) = passcode {
        builder = builder.header(STAFF_PASSCODE_HEADER, code);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn gate_rejects_missing_and_wrong_passcode() {
    let (app, _, _) = seeded_app().await;

    let response = app
        .clone()
        .oneshot(get("/stats", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(get("/stats", Some("guess")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn gate_admits_the_configured_passcode() {
    let (app, _, _) = seeded_app().await;

    let response = app.oneshot(get("/stats", Some(PASSCODE))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["total"], json!(2));
    assert_eq!(body["revenue"], json!(6500.0));
}

#[tokio::test]
async fn appointments_filter_matches_name_and_phone() {
    let (app, _, _) = seeded_app().await;

    let response = app
        .clone()
        .oneshot(get("/appointments?q=maria", Some(PASSCODE)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["count"], json!(2));

    let response = app
        .clone()
        .oneshot(get("/appointments?q=%2B15550111", Some(PASSCODE)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["appointments"][0]["phone"], json!("+15550111"));

    let response = app
        .oneshot(get("/appointments?q=nobody", Some(PASSCODE)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["count"], json!(0));
}

#[tokio::test]
async fn patient_history_is_newest_first() {
    let (app, feed, store) = seeded_app().await;
    store
        .insert(sample_new_appointment("+15550100", "4", date(2026, 9, 5), slot(14)))
        .await
        .unwrap();
    feed.refresh().await;

    let response = app
        .oneshot(get("/patients/%2B15550100/history", Some(PASSCODE)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let visits = body["visits"].as_array().unwrap();
    assert_eq!(visits.len(), 2);
    assert_eq!(visits[0]["date"], json!("2026-09-05"));
    assert_eq!(visits[0]["service_name"], json!("Emergency Filling"));
    assert_eq!(visits[1]["date"], json!("2026-09-01"));
}

#[tokio::test]
async fn reminder_for_unknown_appointment_is_not_found() {
    let (app, _, _) = seeded_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/reminders/7c9e6679-7425-40de-944b-e07fc1f90ae7")
                .header(STAFF_PASSCODE_HEADER, PASSCODE)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reminder_for_snapshot_record_reports_simulated_receipt() {
    let (app, feed, _) = seeded_app().await;
    let id = feed.snapshot().await[0].id;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/reminders/{}", id))
                .header(STAFF_PASSCODE_HEADER, PASSCODE)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["sent"], json!(true));
    assert_eq!(body["receipt"]["simulated"], json!(true));
}

#[tokio::test]
async fn cancelled_refresh_releases_the_in_flight_guard() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_store_url(&mock_server.uri()).to_app_config();
    let store: Arc<dyn AppointmentStore> = Arc::new(SupabaseStore::new(&config));
    let feed = Arc::new(DashboardFeed::new(store));

    // Drop a refresh mid-fetch, the way axum drops the handler future
    // when the client disconnects.
    let cancelled = tokio::time::timeout(Duration::from_millis(50), feed.refresh()).await;
    assert!(cancelled.is_err());

    // The guard must be free again; the next refresh runs to completion
    // instead of reporting Skipped forever.
    assert_eq!(feed.refresh().await, RefreshOutcome::Completed);
}

#[tokio::test]
async fn overlapping_refreshes_fetch_only_once() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(250)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_store_url(&mock_server.uri()).to_app_config();
    let store: Arc<dyn AppointmentStore> = Arc::new(SupabaseStore::new(&config));
    let feed = Arc::new(DashboardFeed::new(store));

    let slow = {
        let feed = feed.clone();
        tokio::spawn(async move { feed.refresh().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(feed.refresh().await, RefreshOutcome::Skipped);
    assert_eq!(slow.await.unwrap(), RefreshOutcome::Completed);
    mock_server.verify().await;
}
