//! Route acquisition workflow
//!
//! One invocation of [`RouteAggregator::request_all_routes`] goes through:
//!
//! 1. **Resolving**: both endpoints are turned into node ids concurrently. Either
//!    failing aborts the whole request with `Error::NodeResolution`.
//! 2. **Branching**: two legs run concurrently. Leg A fetches the shortest route,
//!    leg B looks up day/night at the start and fetches the matching safety route.
//! 3. **Joining**: both legs are awaited to completion. Succeeded candidates are
//!    published shortest first; failed legs are reported in `failures`. If both
//!    legs fail the request fails once with `Error::AllLegsFailed`.
//!
//! All state lives in the invocation; concurrent calls share nothing.
//! [`RouteSession`] adds supersede/cancel semantics on top.

use std::sync::{Arc, Mutex};

use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::core::client::Backend;
use crate::core::error::{Error, Result};
use crate::core::model::{AggregateRouteResult, Coordinate, NodeId, RouteCandidate, RouteLabels, RouteMode};
use crate::core::node::GeoNodeResolver;
use crate::core::route::RouteFetcher;
use crate::core::time_context::TimeContextResolver;

/// Node ids of one request, never carried over to the next
#[derive(Debug)]
struct ResolvedEndpoints {
    start: NodeId,
    end: NodeId,
}

/// Orchestrates node resolution, the two route legs and their join
#[derive(Debug, Clone, Default)]
pub struct RouteAggregator {
    nodes: GeoNodeResolver,
    time_context: TimeContextResolver,
    routes: RouteFetcher,
    labels: RouteLabels,
}

impl RouteAggregator {
    pub fn new(backend: Backend) -> Self {
        Self {
            nodes: GeoNodeResolver::new(backend.clone()),
            time_context: TimeContextResolver::new(backend.clone()),
            routes: RouteFetcher::new(backend),
            labels: RouteLabels::default(),
        }
    }

    /// Replace the display labels used for the candidates
    pub fn with_labels(mut self, labels: RouteLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Request the shortest route and the time-appropriate safety route.
    ///
    /// Returns at most two candidates, shortest first.
    pub async fn request_all_routes(&self, start: Coordinate, end: Coordinate) -> Result<AggregateRouteResult> {
        info!("Requesting routes {start} -> {end}");

        let endpoints = self.resolve_endpoints(start, end).await?;

        let (shortest, safety) = futures::future::join(
            self.shortest_leg(&endpoints),
            self.safety_leg(start, &endpoints),
        )
        .await;

        join_legs(shortest, safety)
    }

    async fn resolve_endpoints(&self, start: Coordinate, end: Coordinate) -> Result<ResolvedEndpoints> {
        let (start_node, end_node) =
            tokio::try_join!(self.nodes.resolve_node(start), self.nodes.resolve_node(end))?;
        debug!("Endpoints resolved: {start_node} -> {end_node}");
        Ok(ResolvedEndpoints { start: start_node, end: end_node })
    }

    async fn shortest_leg(&self, endpoints: &ResolvedEndpoints) -> Result<RouteCandidate> {
        let mode = RouteMode::Shortest;
        self.routes
            .fetch_route(&endpoints.start, &endpoints.end, mode, self.labels.label_for(mode))
            .await
    }

    async fn safety_leg(&self, start: Coordinate, endpoints: &ResolvedEndpoints) -> Result<RouteCandidate> {
        let context = self.time_context.resolve_day_or_night(start).await?;
        let mode = RouteMode::safest_for(context);
        debug!("Time context {context:?}, requesting {mode}");
        self.routes
            .fetch_route(&endpoints.start, &endpoints.end, mode, self.labels.label_for(mode))
            .await
    }
}

/// Combine settled legs; the order is fixed here, not by completion time
fn join_legs(shortest: Result<RouteCandidate>, safety: Result<RouteCandidate>) -> Result<AggregateRouteResult> {
    match (shortest, safety) {
        (Err(shortest), Err(safety)) => {
            warn!("Both route legs failed");
            Err(Error::AllLegsFailed {
                shortest: Box::new(shortest),
                safety: Box::new(safety),
            })
        }
        (shortest, safety) => {
            let mut result = AggregateRouteResult::default();
            for leg in [shortest, safety] {
                match leg {
                    Ok(candidate) => result.candidates.push(candidate),
                    Err(err) => {
                        warn!("Route leg dropped: {err}");
                        result.failures.push(err);
                    }
                }
            }
            info!("Published {} route candidate(s)", result.candidates.len());
            Ok(result)
        }
    }
}

/// Completion of one session request
#[derive(Debug)]
pub struct SessionEvent {
    pub request_id: u64,
    pub outcome: Result<AggregateRouteResult>,
}

/// Holds at most one in-flight aggregate request.
///
/// A new request cancels the previous one. Results arrive on the receiver
/// returned by [`RouteSession::new`]; a request cancelled before it finished
/// never produces an event.
pub struct RouteSession {
    aggregator: Arc<RouteAggregator>,
    events: mpsc::UnboundedSender<SessionEvent>,
    current: Option<CancellationToken>,
    // Held while emitting and while cancelling, so a cancel cannot interleave with a send
    emit_gate: Arc<Mutex<()>>,
    next_request_id: u64,
}

impl RouteSession {
    pub fn new(aggregator: RouteAggregator) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let session = Self {
            aggregator: Arc::new(aggregator),
            events,
            current: None,
            emit_gate: Arc::new(Mutex::new(())),
            next_request_id: 0,
        };
        (session, receiver)
    }

    /// Start a fresh request, superseding any in-flight one. Must be called within a tokio runtime.
    pub fn request(&mut self, start: Coordinate, end: Coordinate) -> u64 {
        self.cancel();

        self.next_request_id += 1;
        let request_id = self.next_request_id;
        let token = CancellationToken::new();
        self.current = Some(token.clone());

        let aggregator = Arc::clone(&self.aggregator);
        let events = self.events.clone();
        let emit_gate = Arc::clone(&self.emit_gate);

        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => {
                    debug!("Route request #{request_id} cancelled");
                    return;
                }
                outcome = aggregator.request_all_routes(start, end) => outcome,
            };

            let _gate = emit_gate.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            if token.is_cancelled() {
                debug!("Discarding stale result of route request #{request_id}");
                return;
            }
            // Receiver may be gone; nothing left to notify then
            let _ = events.send(SessionEvent { request_id, outcome });
        });

        request_id
    }

    /// Cancel the in-flight request, if any
    pub fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            let _gate = self.emit_gate.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            token.cancel();
        }
    }
}

impl Drop for RouteSession {
    fn drop(&mut self) {
        self.cancel();
    }
}
