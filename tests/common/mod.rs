//! Shared mock backend for integration tests

#![allow(dead_code)]

use std::time::Duration;

use saferoute::{Backend, BackendConfig, Coordinate};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[ctor::ctor]
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn config_for(server: &MockServer) -> BackendConfig {
    BackendConfig {
        time_zone_url: format!("{}/getTimeZone", server.uri()),
        ..BackendConfig::default().with_base_url(server.uri())
    }
}

pub fn backend_for(server: &MockServer) -> Backend {
    Backend::new(config_for(server))
}

pub async fn mount_node(server: &MockServer, at: Coordinate, node_id: &str) {
    Mock::given(method("POST"))
        .and(path("/find_or_create_node"))
        .and(body_json(serde_json::json!({"lat": at.lat, "lng": at.lng})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"node_id": node_id})))
        .mount(server)
        .await;
}

pub async fn mount_time_context(server: &MockServer, day_or_night: &str) {
    Mock::given(method("GET"))
        .and(path("/getTimeZone"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "timeZoneId": "Asia/Seoul",
            "localTime": "2025-05-21 13:30",
            "dayOrNight": day_or_night
        })))
        .mount(server)
        .await;
}

pub fn path_json(points: usize) -> serde_json::Value {
    (0..points)
        .map(|i| serde_json::json!({"lat": 37.50 + i as f64 * 0.002, "lng": 127.00 + i as f64 * 0.002}))
        .collect()
}

/// Route for a given (start, end, mode) triple, answered once per expected call
pub async fn mount_route(
    server: &MockServer,
    (start, end, mode): (&str, &str, &str),
    distance: f64,
    points: usize,
    delay: Duration,
) {
    Mock::given(method("GET"))
        .and(path("/find_route"))
        .and(query_param("start", start))
        .and(query_param("end", end))
        .and(query_param("mode", mode))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({
                    "distance": distance,
                    "mode": mode,
                    "num_nodes": points,
                    "path": path_json(points)
                }))
                .set_delay(delay),
        )
        .expect(1)
        .mount(server)
        .await;
}
