//! End-to-end tests for the transform endpoint.
//!
//! These mount the real router over the minimal gazetteer fixture and
//! exercise the full parse → enrich → stream path.

use axum::http::{header, StatusCode};
use axum_test::TestServer;
use nearplace_lib::SpatialIndex;
use nearplace_service_shared::test_utils::{fixture_places, test_state};
use nearplace_service_shared::AppState;
use nearplace_service_transform::build_router;
use serde_json::{json, Value};

fn server() -> TestServer {
    TestServer::new(build_router(test_state())).expect("test server starts")
}

#[tokio::test]
async fn empty_array_round_trips() {
    let server = server();

    let response = server.post("/transform").json(&json!([])).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "[]");

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    assert_eq!(content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn non_json_body_is_rejected() {
    let server = server();

    let response = server.post("/transform").text("this is not json").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(!response.text().is_empty());
}

#[tokio::test]
async fn missing_body_is_rejected() {
    let server = server();

    let response = server.post("/transform").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_array_body_is_rejected() {
    let server = server();

    let response = server.post("/transform").json(&json!({"lat": 1.0})).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn array_of_scalars_is_rejected() {
    let server = server();

    let response = server.post("/transform").json(&json!([1, 2, 3])).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn entity_on_a_place_is_enriched_with_zero_distance() {
    let server = server();
    let (postal_code, lat, lon) = fixture_places::OSLO;

    let response = server
        .post("/transform")
        .json(&json!([{"lat": lat, "lon": lon, "mmsi": 257012345u64}]))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 1);

    let entity = &body[0];
    assert_eq!(entity["mmsi"], json!(257012345u64));

    let nearest = &entity["nearest_place"];
    assert_eq!(nearest["postal_code"], json!(postal_code));
    assert_eq!(nearest["distance"], json!(0.0));
    assert_eq!(nearest["bearing"], json!(0.0));
    assert_eq!(nearest["direction"], json!("N"));
    assert_eq!(nearest["lat"], json!(lat));
    assert_eq!(nearest["lon"], json!(lon));
}

#[tokio::test]
async fn tagged_string_coordinates_are_decoded() {
    let server = server();
    let (postal_code, lat, lon) = fixture_places::OSLO;

    let response = server
        .post("/transform")
        .json(&json!([{"lat": format!("~f{}", lat), "lon": format!("~d{}", lon)}]))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Vec<Value> = response.json();
    assert_eq!(body[0]["nearest_place"]["postal_code"], json!(postal_code));
}

#[tokio::test]
async fn filtered_places_are_never_matched() {
    let server = server();

    // Probe exactly on the reserved "00" place next to Oslo: the admitted
    // Oslo entry must win instead.
    let (_, lat, lon) = fixture_places::RESERVED_OSLO;
    let response = server
        .post("/transform")
        .json(&json!([{"lat": lat, "lon": lon}]))
        .await;
    let body: Vec<Value> = response.json();
    let nearest = &body[0]["nearest_place"];
    assert_eq!(nearest["postal_code"], json!(fixture_places::OSLO.0));
    assert!(nearest["distance"].as_f64().unwrap() > 0.0);

    // Probe exactly on the decommissioned place: the nearest admitted
    // neighbour is Stavanger.
    let (_, lat, lon) = fixture_places::DECOMMISSIONED_KRISTIANSAND;
    let response = server
        .post("/transform")
        .json(&json!([{"lat": lat, "lon": lon}]))
        .await;
    let body: Vec<Value> = response.json();
    assert_eq!(
        body[0]["nearest_place"]["postal_code"],
        json!(fixture_places::STAVANGER.0)
    );
}

#[tokio::test]
async fn entities_without_coordinates_pass_through_unchanged() {
    let server = server();
    let input = json!([{"name": "MS Testbaat", "speed": 11.2}]);

    let response = server.post("/transform").json(&input).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body, input);
}

#[tokio::test]
async fn malformed_coordinates_are_isolated_to_their_entity() {
    let server = server();
    let (_, lat, lon) = fixture_places::BERGEN;

    let response = server
        .post("/transform")
        .json(&json!([
            {"id": 1, "lat": "not a coordinate", "lon": lon},
            {"id": 2, "lat": lat, "lon": lon}
        ]))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Vec<Value> = response.json();

    // The malformed entity passes through untouched.
    assert_eq!(
        body[0],
        json!({"id": 1, "lat": "not a coordinate", "lon": lon})
    );
    // Its neighbour is still enriched.
    assert_eq!(
        body[1]["nearest_place"]["postal_code"],
        json!(fixture_places::BERGEN.0)
    );
}

#[tokio::test]
async fn output_order_matches_input_order() {
    let server = server();
    let (_, oslo_lat, oslo_lon) = fixture_places::OSLO;
    let (_, bergen_lat, bergen_lon) = fixture_places::BERGEN;

    let response = server
        .post("/transform")
        .json(&json!([
            {"seq": 0, "lat": bergen_lat, "lon": bergen_lon},
            {"seq": 1},
            {"seq": 2, "lat": oslo_lat, "lon": oslo_lon},
            {"seq": 3, "lat": "bad", "lon": "worse"}
        ]))
        .await;

    let body: Vec<Value> = response.json();
    let sequence: Vec<i64> = body.iter().map(|e| e["seq"].as_i64().unwrap()).collect();
    assert_eq!(sequence, vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn empty_index_fails_enrichable_requests() {
    let state = AppState::from_index(SpatialIndex::build(Vec::new()));
    let server = TestServer::new(build_router(state)).expect("test server starts");

    let response = server
        .post("/transform")
        .json(&json!([{"lat": 60.0, "lon": 10.0}]))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!response.text().is_empty());
}

#[tokio::test]
async fn empty_index_still_passes_plain_entities_through() {
    let state = AppState::from_index(SpatialIndex::build(Vec::new()));
    let server = TestServer::new(build_router(state)).expect("test server starts");

    let input = json!([{"name": "no coordinates here"}]);
    let response = server.post("/transform").json(&input).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body, input);
}

#[tokio::test]
async fn health_probes_respond() {
    let server = server();

    let live = server.get("/health/live").await;
    assert_eq!(live.status_code(), StatusCode::OK);

    let ready = server.get("/health/ready").await;
    assert_eq!(ready.status_code(), StatusCode::OK);
    let body: Value = ready.json();
    assert_eq!(
        body["places_indexed"],
        json!(fixture_places::ADMITTED_COUNT)
    );
}

#[tokio::test]
async fn readiness_fails_on_an_empty_index() {
    let state = AppState::from_index(SpatialIndex::build(Vec::new()));
    let server = TestServer::new(build_router(state)).expect("test server starts");

    let ready = server.get("/health/ready").await;
    assert_eq!(ready.status_code(), StatusCode::SERVICE_UNAVAILABLE);
}
