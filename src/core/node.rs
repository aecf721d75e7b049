//! Coordinate to graph-node resolution

use log::debug;

use crate::core::client::Backend;
use crate::core::error::{Cause, Error, Result};
use crate::core::model::{Coordinate, NodeId};
use crate::core::wire::{NodeRequest, NodeResponse};

/// Turns coordinates into backend graph node ids via `POST /find_or_create_node`.
///
/// Every call hits the backend; nothing is cached and nothing is retried.
#[derive(Debug, Clone, Default)]
pub struct GeoNodeResolver {
    backend: Backend,
}

impl GeoNodeResolver {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    pub async fn resolve_node(&self, coordinate: Coordinate) -> Result<NodeId> {
        let url = self.backend.config().node_url();
        debug!("Resolving node for {coordinate}");

        let request = self.backend.client().post(&url).json(&NodeRequest::from(coordinate));
        let response: NodeResponse = self
            .backend
            .json(request)
            .await
            .map_err(|cause| Error::NodeResolution { coordinate, cause })?;

        let node_id: NodeId = response
            .node_id
            .ok_or_else(|| Error::NodeResolution {
                coordinate,
                cause: Cause::Decode("response has no `node_id`".to_string()),
            })?
            .into();

        debug!("Resolved {coordinate} to node {node_id}");
        Ok(node_id)
    }
}
