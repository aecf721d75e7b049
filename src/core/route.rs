//! Single-route fetch from the backend router

use log::{debug, warn};

use crate::core::client::Backend;
use crate::core::error::{Cause, Error, Result};
use crate::core::model::{Coordinate, NodeId, RouteCandidate, RouteMode};
use crate::core::wire::RouteResponse;

/// Requests one route between two nodes via `GET /find_route`.
///
/// The fetcher knows modes, not label text; callers pass the label in.
#[derive(Debug, Clone, Default)]
pub struct RouteFetcher {
    backend: Backend,
}

impl RouteFetcher {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// Transport and HTTP failures are `RouteFetch`; a body that does not decode is `RouteParse`.
    pub async fn fetch_route(
        &self,
        start: &NodeId,
        end: &NodeId,
        mode: RouteMode,
        label: &str,
    ) -> Result<RouteCandidate> {
        debug!("Requesting {mode} route {start} -> {end}");

        let request = self.backend.client().get(self.backend.config().route_url()).query(&[
            ("start", start.as_str()),
            ("end", end.as_str()),
            ("mode", mode.as_wire()),
        ]);

        let response: RouteResponse = self
            .backend
            .json(request)
            .await
            .map_err(|cause| match cause {
                Cause::Decode(reason) => Error::RouteParse { mode, reason },
                cause => Error::RouteFetch { mode, cause },
            })?;

        build_candidate(response, mode, label)
    }
}

/// Normalize a decoded response into a candidate.
///
/// Points missing `lat` or `lng` are dropped, keeping the order of the rest.
fn build_candidate(response: RouteResponse, mode: RouteMode, label: &str) -> Result<RouteCandidate> {
    let parse_error = |reason: &str| Error::RouteParse { mode, reason: reason.to_string() };

    let raw_path = response.path.ok_or_else(|| parse_error("response has no `path`"))?;
    let distance = response.distance.ok_or_else(|| parse_error("response has no `distance`"))?;

    let raw_len = raw_path.len();
    let path: Vec<Coordinate> = raw_path.iter().filter_map(|p| p.to_coordinate()).collect();
    if path.len() < raw_len {
        warn!("Dropped {} malformed point(s) from {mode} route", raw_len - path.len());
    }

    if let (Some(served), Some(nodes)) = (response.mode.as_deref(), response.num_nodes) {
        debug!("Backend served {served} route over {nodes} nodes");
    }

    RouteCandidate::new(label, mode, distance, path).ok_or_else(|| parse_error("route path is empty"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::BackendConfig;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn decode(body: serde_json::Value) -> RouteResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_malformed_points_are_compacted() {
        let response = decode(serde_json::json!({
            "distance": 640.0,
            "path": [
                {"lat": 1.0, "lng": 10.0},
                {"lat": 2.0, "lng": 20.0},
                {"lat": 3.0},
                {"lat": 4.0, "lng": 40.0},
                {"lat": 5.0, "lng": 50.0},
                {"lat": 6.0, "lng": 60.0}
            ]
        }));

        let candidate = build_candidate(response, RouteMode::Shortest, "Shortest Route").unwrap();
        let lats: Vec<f64> = candidate.path.iter().map(|c| c.lat).collect();
        assert_eq!(lats, vec![1.0, 2.0, 4.0, 5.0, 6.0]);
        assert_eq!(candidate.estimated_minutes, 8);
    }

    #[test]
    fn test_missing_fields_are_parse_errors() {
        let no_path = decode(serde_json::json!({"distance": 10.0}));
        assert!(matches!(
            build_candidate(no_path, RouteMode::SafestDay, "x"),
            Err(Error::RouteParse { mode: RouteMode::SafestDay, .. })
        ));

        let no_distance = decode(serde_json::json!({"path": [{"lat": 1.0, "lng": 2.0}]}));
        assert!(matches!(
            build_candidate(no_distance, RouteMode::Shortest, "x"),
            Err(Error::RouteParse { mode: RouteMode::Shortest, .. })
        ));

        let all_dropped = decode(serde_json::json!({"distance": 10.0, "path": [{"lng": 2.0}]}));
        assert!(matches!(
            build_candidate(all_dropped, RouteMode::Shortest, "x"),
            Err(Error::RouteParse { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_route_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/find_route"))
            .and(query_param("start", "n1"))
            .and(query_param("end", "n2"))
            .and(query_param("mode", "safest_night"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "distance": 1000.0,
                "mode": "safest_night",
                "num_nodes": 3,
                "path": [
                    {"lat": 37.50, "lng": 127.00},
                    {"lat": 37.505, "lng": 127.005},
                    {"lat": 37.51, "lng": 127.01}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = RouteFetcher::new(Backend::new(BackendConfig::default().with_base_url(server.uri())));
        let candidate = fetcher
            .fetch_route(&NodeId::new("n1"), &NodeId::new("n2"), RouteMode::SafestNight, "Night Safety Route")
            .await
            .unwrap();

        assert_eq!(candidate.label, "Night Safety Route");
        assert_eq!(candidate.mode, RouteMode::SafestNight);
        assert_eq!(candidate.distance_meters, 1000.0);
        assert_eq!(candidate.estimated_minutes, 13);
        assert_eq!(candidate.path.first(), Some(&Coordinate::new(37.50, 127.00)));
        assert_eq!(candidate.path.len(), 3);
    }

    async fn fetch_with_body(body: ResponseTemplate) -> Result<RouteCandidate> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/find_route"))
            .respond_with(body)
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = RouteFetcher::new(Backend::new(BackendConfig::default().with_base_url(server.uri())));
        fetcher
            .fetch_route(&NodeId::new("a"), &NodeId::new("b"), RouteMode::Shortest, "Shortest Route")
            .await
    }

    #[tokio::test]
    async fn test_mistyped_distance_is_parse_error() {
        let body = ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "distance": "1000",
            "path": [{"lat": 1.0, "lng": 2.0}]
        }));
        assert!(matches!(
            fetch_with_body(body).await,
            Err(Error::RouteParse { mode: RouteMode::Shortest, .. })
        ));
    }

    #[tokio::test]
    async fn test_wrong_shape_path_is_parse_error() {
        let scalar_path = ResponseTemplate::new(200).set_body_json(serde_json::json!({"distance": 10.0, "path": 5}));
        assert!(matches!(fetch_with_body(scalar_path).await, Err(Error::RouteParse { .. })));

        let scalar_point =
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"distance": 10.0, "path": [1.0, 2.0]}));
        assert!(matches!(fetch_with_body(scalar_point).await, Err(Error::RouteParse { .. })));
    }

    #[tokio::test]
    async fn test_non_json_body_is_parse_error() {
        let body = ResponseTemplate::new(200).set_body_string("<html>gateway</html>");
        assert!(matches!(
            fetch_with_body(body).await,
            Err(Error::RouteParse { mode: RouteMode::Shortest, .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_route_http_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/find_route"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = RouteFetcher::new(Backend::new(BackendConfig::default().with_base_url(server.uri())));
        let result = fetcher
            .fetch_route(&NodeId::new("a"), &NodeId::new("b"), RouteMode::Shortest, "Shortest Route")
            .await;
        assert!(matches!(
            result,
            Err(Error::RouteFetch { mode: RouteMode::Shortest, cause: Cause::Http(_) })
        ));
    }
}
