//! Safety heatmap along a chosen route
//!
//! Independent of the aggregate workflow: it runs after the user picks a route
//! and its failure never touches the route list. The backend aggregates scores
//! over every path point, so this call runs on the extended timeout budget.

use log::{debug, info};

use crate::core::client::Backend;
use crate::core::error::{Error, Result};
use crate::core::model::{Coordinate, HeatmapPoint, RouteMode};
use crate::core::wire::{HeatmapPointDto, HeatmapRequest, NodeRequest};

#[derive(Debug, Clone, Default)]
pub struct HeatmapFetcher {
    backend: Backend,
}

impl HeatmapFetcher {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// Fetch safety-scored points around `path`.
    ///
    /// An empty array is a valid answer and yields an empty vector.
    pub async fn fetch_heatmap(&self, path: &[Coordinate], mode: RouteMode) -> Result<Vec<HeatmapPoint>> {
        let config = self.backend.config();
        let bucket = mode.heatmap_bucket();
        debug!(
            "Requesting heatmap: mode={} bucket={} points={} radius={}m",
            mode,
            bucket.as_wire(),
            path.len(),
            config.heatmap_radius_m
        );

        let body = HeatmapRequest {
            path: path.iter().copied().map(NodeRequest::from).collect(),
            mode: bucket.as_wire(),
            radius: config.heatmap_radius_m,
        };
        let request = self.backend.client().post(config.heatmap_url()).json(&body);

        let points: Vec<HeatmapPointDto> = self
            .backend
            .json_extended(request)
            .await
            .map_err(Error::HeatmapFetch)?;

        info!("Received {} heatmap point(s)", points.len());
        Ok(points.into_iter().map(HeatmapPoint::from).collect())
    }
}
