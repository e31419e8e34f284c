use chrono::NaiveDate;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use assert_matches::assert_matches;
use booking_cell::models::{BookingError, SelectionKey};
use booking_cell::services::availability::AvailabilityResolver;
use shared_config::ScheduleConfig;
use shared_utils::test_utils::TestConfig;

fn resolver_for(mock_server: &MockServer, schedule: ScheduleConfig) -> AvailabilityResolver {
    let mut config = TestConfig::with_store_url(&mock_server.uri());
    config.schedule = schedule;
    AvailabilityResolver::new(&config.to_app_config())
}

fn selection() -> SelectionKey {
    SelectionKey::new(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(), "popescu")
}

async fn mount_booked_times(mock_server: &MockServer, times: &[&str]) {
    let rows: Vec<serde_json::Value> = times
        .iter()
        .map(|t| serde_json::json!({ "time": t }))
        .collect();

    Mock::given(method("GET"))
        .and(path("/rest/v1/reservations"))
        .and(query_param("select", "time"))
        .and(query_param("date", "eq.2026-09-01"))
        .and(query_param("practitioner_id", "eq.popescu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn booked_times_are_removed_in_grid_order() {
    let mock_server = MockServer::start().await;
    mount_booked_times(&mock_server, &["10:00"]).await;

    let resolver = resolver_for(
        &mock_server,
        ScheduleConfig {
            open_hour: 9,
            close_hour: 12,
            slot_minutes: 60,
        },
    );

    let snapshot = resolver.resolve(&selection(), None).await.unwrap();
    assert_eq!(snapshot.free_slots, vec!["09:00", "11:00"]);
    assert!(!snapshot.stale);
}

#[tokio::test]
async fn a_day_with_no_bookings_exposes_the_whole_grid() {
    let mock_server = MockServer::start().await;
    mount_booked_times(&mock_server, &[]).await;

    let resolver = resolver_for(&mock_server, ScheduleConfig::default());

    let snapshot = resolver.resolve(&selection(), None).await.unwrap();
    assert_eq!(snapshot.free_slots.len(), 11);
    assert_eq!(snapshot.free_slots.first().map(String::as_str), Some("09:00"));
    assert_eq!(snapshot.free_slots.last().map(String::as_str), Some("19:00"));
}

#[tokio::test]
async fn a_fully_booked_day_yields_no_slots() {
    let mock_server = MockServer::start().await;
    let grid: Vec<String> = (9..20).map(|h| format!("{:02}:00", h)).collect();
    let times: Vec<&str> = grid.iter().map(String::as_str).collect();
    mount_booked_times(&mock_server, &times).await;

    let resolver = resolver_for(&mock_server, ScheduleConfig::default());

    let snapshot = resolver.resolve(&selection(), None).await.unwrap();
    assert!(snapshot.free_slots.is_empty());
}

#[tokio::test]
async fn store_failure_serves_the_last_known_good_list() {
    let mock_server = MockServer::start().await;

    // First fetch succeeds, everything after that fails.
    Mock::given(method("GET"))
        .and(path("/rest/v1/reservations"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([{ "time": "10:00" }])),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/reservations"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database is on fire"))
        .mount(&mock_server)
        .await;

    let resolver = resolver_for(
        &mock_server,
        ScheduleConfig {
            open_hour: 9,
            close_hour: 12,
            slot_minutes: 60,
        },
    );

    let first = resolver.resolve(&selection(), None).await.unwrap();
    assert_eq!(first.free_slots, vec!["09:00", "11:00"]);
    assert!(!first.stale);

    let second = resolver.resolve(&selection(), None).await.unwrap();
    assert_eq!(second.free_slots, vec!["09:00", "11:00"]);
    assert!(second.stale);
}

#[tokio::test]
async fn store_failure_with_no_history_is_an_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/reservations"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database is on fire"))
        .mount(&mock_server)
        .await;

    let resolver = resolver_for(&mock_server, ScheduleConfig::default());

    let result = resolver.resolve(&selection(), None).await;
    assert_matches!(result, Err(BookingError::StoreUnavailable(_)));
}

#[tokio::test]
async fn selections_are_cached_independently() {
    let mock_server = MockServer::start().await;
    mount_booked_times(&mock_server, &["10:00"]).await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/reservations"))
        .and(query_param("practitioner_id", "eq.ionescu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let resolver = resolver_for(
        &mock_server,
        ScheduleConfig {
            open_hour: 9,
            close_hour: 12,
            slot_minutes: 60,
        },
    );

    let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
    let busy = resolver
        .resolve(&SelectionKey::new(date, "popescu"), None)
        .await
        .unwrap();
    let free = resolver
        .resolve(&SelectionKey::new(date, "ionescu"), None)
        .await
        .unwrap();

    assert_eq!(busy.free_slots, vec!["09:00", "11:00"]);
    assert_eq!(free.free_slots, vec!["09:00", "10:00", "11:00"]);
}

#[tokio::test]
async fn a_degenerate_schedule_resolves_to_an_empty_grid() {
    let mock_server = MockServer::start().await;
    mount_booked_times(&mock_server, &["10:00"]).await;

    let resolver = resolver_for(
        &mock_server,
        ScheduleConfig {
            open_hour: 9,
            close_hour: 9,
            slot_minutes: 60,
        },
    );

    let snapshot = resolver.resolve(&selection(), None).await.unwrap();
    assert!(snapshot.free_slots.is_empty());
    assert!(!snapshot.stale);
}
