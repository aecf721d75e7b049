//! Request and response shapes of the routing backend
//!
//! One typed decode per endpoint. Required fields are plain types or are
//! checked right after decoding; everything the client does not need stays `Option`.

use serde::{Deserialize, Serialize};

use crate::core::model::{Coordinate, HeatmapPoint, NodeId};

/// Body of `POST /find_or_create_node`
#[derive(Debug, Serialize)]
pub struct NodeRequest {
    pub lat: f64,
    pub lng: f64,
}

impl From<Coordinate> for NodeRequest {
    fn from(c: Coordinate) -> Self {
        Self { lat: c.lat, lng: c.lng }
    }
}

/// The backend sends `node_id` either as a string or as a number
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NodeIdValue {
    Text(String),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
}

impl From<NodeIdValue> for NodeId {
    fn from(value: NodeIdValue) -> Self {
        match value {
            NodeIdValue::Text(s) => NodeId::new(s),
            NodeIdValue::Integer(n) => NodeId::new(n.to_string()),
            NodeIdValue::Unsigned(n) => NodeId::new(n.to_string()),
            NodeIdValue::Float(n) => NodeId::new(n.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NodeResponse {
    pub node_id: Option<NodeIdValue>,
}

/// One element of a route path; either coordinate may be absent
#[derive(Debug, Deserialize)]
pub struct PathPoint {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl PathPoint {
    pub fn to_coordinate(&self) -> Option<Coordinate> {
        Some(Coordinate::new(self.lat?, self.lng?))
    }
}

/// Response of `GET /find_route`
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    pub path: Option<Vec<PathPoint>>,
    pub distance: Option<f64>,
    pub mode: Option<String>,
    pub num_nodes: Option<u64>,
}

/// Response of the time-zone function
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeZoneResponse {
    pub day_or_night: String,
    pub time_zone_id: Option<String>,
    pub local_time: Option<String>,
}

/// Body of `POST /safety_heatmap_batch`
#[derive(Debug, Serialize)]
pub struct HeatmapRequest<'a> {
    pub path: Vec<NodeRequest>,
    pub mode: &'a str,
    pub radius: u32,
}

#[derive(Debug, Deserialize)]
pub struct HeatmapPointDto {
    pub lat: f64,
    pub lng: f64,
    pub avg_safety_score: f64,
}

impl From<HeatmapPointDto> for HeatmapPoint {
    fn from(dto: HeatmapPointDto) -> Self {
        HeatmapPoint {
            coordinate: Coordinate::new(dto.lat, dto.lng),
            safety_score: dto.avg_safety_score,
        }
    }
}
