use crate::helpers::{spawn_fixture_app, spawn_missing_file_app, ALL_ROUTES};
use hyper::StatusCode;
use serde_json::{json, Value};

fn error_message(body: &Value) -> String {
    body["error"]
        .as_str()
        .unwrap_or_else(|| panic!("expected an error payload, got {}", body))
        .to_string()
}

#[tokio::test]
async fn missing_data_file_is_reported_with_ok_status() {
    let test_app = spawn_missing_file_app();

    for route in ALL_ROUTES {
        let (status, body) = test_app.get(route).await;
        assert_eq!(status, StatusCode::OK, "unexpected status for {}", route);

        let body: Value = serde_json::from_str(&body).expect("error body is JSON");
        assert!(!error_message(&body).is_empty(), "empty error for {}", route);
    }
}

#[tokio::test]
async fn missing_table_is_reported_per_route() {
    let test_app = spawn_fixture_app(
        r#"
        INSERT INTO station (id, station) VALUES (1, 'USC00519397');
        DROP TABLE measurement;
        "#,
    )
    .await;

    let body = test_app.get_json("/api/v1.0/precipitation").await;
    assert!(error_message(&body).contains("no such table"));

    let body = test_app.get_json("/api/v1.0/2017-01-01/2017-02-01").await;
    assert!(error_message(&body).contains("no such table"));

    // station queries do not touch the missing table
    let body = test_app.get_json("/api/v1.0/stations").await;
    assert_eq!(body, json!(["USC00519397"]));
}

#[tokio::test]
async fn unparseable_latest_date_is_reported() {
    let test_app = spawn_fixture_app(
        r#"
        INSERT INTO measurement (id, station, date, prcp, tobs) VALUES
            (1, 'USC00519397', '2017-08-23', 0.0, 81),
            (2, 'USC00519397', 'latest', 0.1, 79);
        "#,
    )
    .await;

    let body = test_app.get_json("/api/v1.0/precipitation").await;
    assert!(error_message(&body).contains("latest"));

    let body = test_app.get_json("/api/v1.0/tobs").await;
    assert!(error_message(&body).contains("not a valid YYYY-MM-DD"));
}

#[tokio::test]
async fn malformed_start_date_degrades_to_null_stats() {
    let test_app = spawn_fixture_app(
        r#"
        INSERT INTO measurement (id, station, date, prcp, tobs) VALUES
            (1, 'USC00519397', '2017-08-23', 0.0, 81);
        "#,
    )
    .await;

    let body = test_app.get_json("/api/v1.0/not-a-date").await;

    assert_eq!(
        body,
        json!({
            "Starting on not-a-date, and ending on 2017-08-23:": {
                "Maximum Temperature:": null,
                "Minimum Temperature:": null,
                "Average Temperature:": null
            }
        })
    );
}
