//! Human-readable and JSON output for the CLI

use std::fmt::Write;

use saferoute::{AggregateRouteResult, HeatmapPoint, RouteCandidate};
use serde::Serialize;

/// Table of candidates, one per line, plus notes for dropped legs
pub fn route_table(result: &AggregateRouteResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<20} {:>10} {:>8} {:>7}", "ROUTE", "DISTANCE", "TIME", "POINTS");
    for route in &result.candidates {
        let _ = writeln!(out, "{}", route_line(route));
    }
    for failure in &result.failures {
        let _ = writeln!(out, "⚠️  {failure}");
    }
    out
}

fn route_line(route: &RouteCandidate) -> String {
    format!(
        "{:<20} {:>7.2} km {:>4} min {:>7}",
        route.label,
        route.distance_km(),
        route.estimated_minutes,
        route.path.len()
    )
}

#[derive(Serialize)]
struct RoutesJson<'a> {
    routes: &'a [RouteCandidate],
    failures: Vec<String>,
}

pub fn routes_json(result: &AggregateRouteResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&RoutesJson {
        routes: &result.candidates,
        failures: result.failures.iter().map(ToString::to_string).collect(),
    })
}

/// Count of points per rendering weight band, highest weight (least safe) first
pub fn weight_histogram(points: &[HeatmapPoint]) -> Vec<(f64, usize)> {
    [1.0, 0.75, 0.5, 0.2]
        .into_iter()
        .map(|band| (band, points.iter().filter(|p| p.weight() == band).count()))
        .collect()
}

pub fn heatmap_summary(points: &[HeatmapPoint]) -> String {
    let mut out = format!("{} heatmap point(s)\n", points.len());
    for (band, count) in weight_histogram(points) {
        let _ = writeln!(out, "  weight {band:<4} {count:>6}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use saferoute::{Coordinate, Error, RouteMode};

    fn sample() -> AggregateRouteResult {
        let path = vec![Coordinate::new(37.50, 127.00), Coordinate::new(37.51, 127.01)];
        AggregateRouteResult {
            candidates: vec![
                RouteCandidate::new("Shortest Route", RouteMode::Shortest, 1000.0, path).unwrap(),
            ],
            failures: vec![Error::InvalidInput("safety leg unavailable".into())],
        }
    }

    #[test]
    fn test_route_table() {
        let table = route_table(&sample());
        assert!(table.contains("Shortest Route"));
        assert!(table.contains("1.00 km"));
        assert!(table.contains("13 min"));
        assert!(table.contains("safety leg unavailable"));
    }

    #[test]
    fn test_routes_json() {
        let json: serde_json::Value = serde_json::from_str(&routes_json(&sample()).unwrap()).unwrap();
        assert_eq!(json["routes"][0]["mode"], "shortest");
        assert_eq!(json["routes"][0]["estimated_minutes"], 13);
        assert_eq!(json["routes"][0]["path"][1]["lat"], 37.51);
        assert_eq!(json["failures"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_weight_histogram() {
        let point = |score| HeatmapPoint { coordinate: Coordinate::new(0.0, 0.0), safety_score: score };
        let points = vec![point(0.9), point(0.9), point(0.6), point(0.1)];
        assert_eq!(weight_histogram(&points), vec![(1.0, 1), (0.75, 1), (0.5, 0), (0.2, 2)]);
    }
}
