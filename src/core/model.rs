//! Domain types shared by the resolvers, fetchers and the aggregator
//!
//! Everything here is an immutable value once constructed. Wire-format
//! details live in `wire.rs`; this module only knows about the normalized shapes.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::core::error::{suggest_mode, Error, Result};

/// Assumed average walking speed in meters per minute
pub const WALKING_SPEED_M_PER_MIN: f64 = 75.0;

/// A raw (latitude, longitude) pair.
///
/// No bounds validation is performed; malformed values are passed through
/// and fail at the network boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Opaque identifier of a routing graph node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Routing objective requested from the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteMode {
    Shortest,
    SafestDay,
    SafestNight,
}

impl RouteMode {
    pub const ALL: [RouteMode; 3] = [RouteMode::Shortest, RouteMode::SafestDay, RouteMode::SafestNight];

    /// Literal string transmitted in the `mode` query parameter
    pub fn as_wire(&self) -> &'static str {
        match self {
            RouteMode::Shortest => "shortest",
            RouteMode::SafestDay => "safest_day",
            RouteMode::SafestNight => "safest_night",
        }
    }

    /// Safety mode matching a day/night context
    pub fn safest_for(context: DayOrNight) -> Self {
        match context {
            DayOrNight::Day => RouteMode::SafestDay,
            DayOrNight::Night => RouteMode::SafestNight,
        }
    }

    /// Coarse bucket used by the heatmap endpoint.
    ///
    /// Only `SafestDay` maps to `day`; `Shortest` falls into `night` along
    /// with `SafestNight`. Pending product clarification, keep it that way.
    pub fn heatmap_bucket(&self) -> HeatmapBucket {
        match self {
            RouteMode::SafestDay => HeatmapBucket::Day,
            RouteMode::Shortest | RouteMode::SafestNight => HeatmapBucket::Night,
        }
    }
}

impl fmt::Display for RouteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for RouteMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        RouteMode::ALL
            .into_iter()
            .find(|mode| mode.as_wire() == normalized)
            .ok_or_else(|| match suggest_mode(&normalized) {
                Some(suggestion) => Error::InvalidInput(format!(
                    "Unknown route mode '{s}'. Did you mean '{suggestion}'?"
                )),
                None => Error::InvalidInput(format!(
                    "Unknown route mode '{s}'. Expected one of: shortest, safest_day, safest_night"
                )),
            })
    }
}

/// Time-of-day context at a coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOrNight {
    Day,
    Night,
}

/// Day/night bucket sent to the heatmap endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatmapBucket {
    Day,
    Night,
}

impl HeatmapBucket {
    pub fn as_wire(&self) -> &'static str {
        match self {
            HeatmapBucket::Day => "day",
            HeatmapBucket::Night => "night",
        }
    }
}

/// Display label per route mode, supplied by the caller
#[derive(Debug, Clone)]
pub struct RouteLabels {
    pub shortest: String,
    pub safest_day: String,
    pub safest_night: String,
}

impl Default for RouteLabels {
    fn default() -> Self {
        Self {
            shortest: "Shortest Route".to_string(),
            safest_day: "Day Safety Route".to_string(),
            safest_night: "Night Safety Route".to_string(),
        }
    }
}

impl RouteLabels {
    pub fn label_for(&self, mode: RouteMode) -> &str {
        match mode {
            RouteMode::Shortest => &self.shortest,
            RouteMode::SafestDay => &self.safest_day,
            RouteMode::SafestNight => &self.safest_night,
        }
    }
}

/// One candidate route, ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteCandidate {
    pub label: String,
    pub mode: RouteMode,
    pub distance_meters: f64,
    pub estimated_minutes: u32,
    /// Traversal order; never empty
    pub path: Vec<Coordinate>,
}

impl RouteCandidate {
    /// Build a candidate, deriving the walking time from the distance.
    ///
    /// Returns `None` for an empty path; callers turn that into a parse error.
    pub fn new(label: impl Into<String>, mode: RouteMode, distance_meters: f64, path: Vec<Coordinate>) -> Option<Self> {
        if path.is_empty() {
            return None;
        }
        Some(Self {
            label: label.into(),
            mode,
            distance_meters,
            estimated_minutes: estimated_minutes(distance_meters),
            path,
        })
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }
}

/// Walking time in whole minutes, floored
pub fn estimated_minutes(distance_meters: f64) -> u32 {
    // `as` saturates, so NaN and negatives land on 0
    (distance_meters / WALKING_SPEED_M_PER_MIN).floor().max(0.0) as u32
}

/// A safety-scored location near a route
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatmapPoint {
    pub coordinate: Coordinate,
    /// In [0, 1]; higher is safer
    pub safety_score: f64,
}

impl HeatmapPoint {
    /// Rendering weight: a monotonic step function, higher score gives lower weight
    pub fn weight(&self) -> f64 {
        match self.safety_score {
            s if s >= 0.85 => 0.2,
            s if s >= 0.70 => 0.5,
            s if s >= 0.55 => 0.75,
            _ => 1.0,
        }
    }
}

/// Outcome of one aggregate request
///
/// `candidates` holds the succeeded legs in fixed order (shortest first),
/// `failures` the errors of the legs that did not make it.
#[derive(Debug, Default)]
pub struct AggregateRouteResult {
    pub candidates: Vec<RouteCandidate>,
    pub failures: Vec<Error>,
}

impl AggregateRouteResult {
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn candidate(&self, mode: RouteMode) -> Option<&RouteCandidate> {
        self.candidates.iter().find(|c| c.mode == mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimated_minutes() {
        assert_eq!(estimated_minutes(1000.0), 13);
        assert_eq!(estimated_minutes(1200.0), 16);
        assert_eq!(estimated_minutes(74.9), 0);
        assert_eq!(estimated_minutes(75.0), 1);
        assert_eq!(estimated_minutes(0.0), 0);
        assert_eq!(estimated_minutes(-50.0), 0);
    }

    #[test]
    fn test_candidate_requires_path() {
        assert!(RouteCandidate::new("Shortest Route", RouteMode::Shortest, 10.0, vec![]).is_none());

        let candidate = RouteCandidate::new(
            "Shortest Route",
            RouteMode::Shortest,
            1500.0,
            vec![Coordinate::new(37.5, 127.0)],
        )
        .unwrap();
        assert_eq!(candidate.estimated_minutes, 20);
        assert_eq!(candidate.distance_km(), 1.5);
    }

    #[test]
    fn test_mode_wire_strings() {
        assert_eq!(RouteMode::Shortest.as_wire(), "shortest");
        assert_eq!(RouteMode::SafestDay.as_wire(), "safest_day");
        assert_eq!(RouteMode::SafestNight.as_wire(), "safest_night");
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("shortest".parse::<RouteMode>().unwrap(), RouteMode::Shortest);
        assert_eq!("SAFEST_DAY".parse::<RouteMode>().unwrap(), RouteMode::SafestDay);
        assert_eq!("safest-night".parse::<RouteMode>().unwrap(), RouteMode::SafestNight);
    }

    #[test]
    fn test_mode_from_str_suggests() {
        let err = "safest_dya".parse::<RouteMode>().unwrap_err();
        assert!(err.to_string().contains("Did you mean 'safest_day'?"), "{err}");

        let err = "fastest-possible-route".parse::<RouteMode>().unwrap_err();
        assert!(err.to_string().contains("Expected one of"), "{err}");
    }

    #[test]
    fn test_safest_for_context() {
        assert_eq!(RouteMode::safest_for(DayOrNight::Day), RouteMode::SafestDay);
        assert_eq!(RouteMode::safest_for(DayOrNight::Night), RouteMode::SafestNight);
    }

    #[test]
    fn test_heatmap_bucketing() {
        // Shortest shares the night bucket
        assert_eq!(RouteMode::SafestDay.heatmap_bucket(), HeatmapBucket::Day);
        assert_eq!(RouteMode::SafestNight.heatmap_bucket(), HeatmapBucket::Night);
        assert_eq!(RouteMode::Shortest.heatmap_bucket(), HeatmapBucket::Night);
    }

    #[test]
    fn test_heatmap_weight_bands() {
        let point = |score| HeatmapPoint { coordinate: Coordinate::new(0.0, 0.0), safety_score: score };
        assert_eq!(point(0.95).weight(), 0.2);
        assert_eq!(point(0.85).weight(), 0.2);
        assert_eq!(point(0.70).weight(), 0.5);
        assert_eq!(point(0.60).weight(), 0.75);
        assert_eq!(point(0.55).weight(), 0.75);
        assert_eq!(point(0.10).weight(), 1.0);

        let weights: Vec<f64> = [0.0, 0.56, 0.71, 0.9].iter().map(|&s| point(s).weight()).collect();
        assert!(weights.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_labels() {
        let labels = RouteLabels::default();
        assert_eq!(labels.label_for(RouteMode::Shortest), "Shortest Route");
        assert_eq!(labels.label_for(RouteMode::SafestDay), "Day Safety Route");
        assert_eq!(labels.label_for(RouteMode::SafestNight), "Night Safety Route");
    }
}
