use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_database::{AppointmentStore, StoreError, SupabaseStore};
use shared_utils::test_utils::{
    appointment_row, missing_table_body, sample_new_appointment, TestConfig,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn slot(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap()
}

#[tokio::test]
async fn booked_times_sends_anon_key_and_parses_rows() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(header("apikey", "test-anon-key"))
        .and(query_param("appointment_date", "eq.2026-09-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "appointment_time": "09:00:00" },
            { "appointment_time": "14:00:00" }
        ])))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_store_url(&mock_server.uri()).to_app_config();
    let store = SupabaseStore::new(&config);

    let times = store.booked_times(date(2026, 9, 1)).await.unwrap();
    assert_eq!(times, vec![slot(9), slot(14)]);
}

#[tokio::test]
async fn missing_relation_is_reported_as_missing_table() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(404).set_body_json(missing_table_body()))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_store_url(&mock_server.uri()).to_app_config();
    let store = SupabaseStore::new(&config);

    let err = store.booked_times(date(2026, 9, 1)).await.unwrap_err();
    assert_matches!(err, StoreError::MissingTable(_));
}

#[tokio::test]
async fn insert_posts_one_row_and_returns_the_representation() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(header("Prefer", "return=representation"))
        .and(body_partial_json(json!([{
            "phone": "+15550100",
            "appointment_time": "09:00"
        }])))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            appointment_row("Maria", "+15550100", "1", "2026-09-01", "09:00")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_store_url(&mock_server.uri()).to_app_config();
    let store = SupabaseStore::new(&config);

    let inserted = store
        .insert(sample_new_appointment("+15550100", "1", date(2026, 9, 1), slot(9)))
        .await
        .unwrap();
    assert_eq!(inserted.phone, "+15550100");
    assert_eq!(inserted.appointment_time, slot(9));
}

#[tokio::test]
async fn rejection_carries_the_upstream_status() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint"
        })))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_store_url(&mock_server.uri()).to_app_config();
    let store = SupabaseStore::new(&config);

    let err = store
        .insert(sample_new_appointment("+15550100", "1", date(2026, 9, 1), slot(9)))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Rejected { status: 409, .. });
}

#[tokio::test]
async fn unconfigured_store_never_leaves_the_process() {
    let store = SupabaseStore::new(&TestConfig::unconfigured());

    assert_matches!(
        store.booked_times(date(2026, 9, 1)).await.unwrap_err(),
        StoreError::NotConfigured
    );
    assert_matches!(store.fetch_all().await.unwrap_err(), StoreError::NotConfigured);
}

#[tokio::test]
async fn fetch_all_requests_newest_first() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("order", "created_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row("Maria", "+15550100", "1", "2026-09-02", "10:00"),
            appointment_row("Jonas", "+15550111", "2", "2026-09-01", "09:00")
        ])))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_store_url(&mock_server.uri()).to_app_config();
    let store = SupabaseStore::new(&config);

    let all = store.fetch_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].first_name, "Maria");
}
