//! # Saferoute Library
//!
//! Client for a safety-aware walking router. Given two coordinates it asks the
//! backend for the shortest route and for the safest route for the current time
//! of day, and joins both into one ordered candidate list.
//!
//! ## Features
//!
//! - **Concurrent legs**: shortest and safety routes are fetched in parallel and joined
//! - **Partial results**: a failed leg shrinks the list instead of failing the request
//! - **Supersede and cancel**: [`RouteSession`] drops results of outdated requests
//! - **Heatmap overlay**: safety scores along a chosen route, on its own timeout budget
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use saferoute::Coordinate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let start = Coordinate::new(37.50, 127.00);
//!     let end = Coordinate::new(37.51, 127.01);
//!
//!     let result = saferoute::routes(start, end).await?;
//!     for route in &result.candidates {
//!         println!("{}: {:.1} km, {} min", route.label, route.distance_km(), route.estimated_minutes);
//!     }
//!
//!     if let Some(route) = result.candidates.last() {
//!         let points = saferoute::heatmap(&route.path, route.mode).await?;
//!         println!("{} heatmap points", points.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

// Re-export core types that users might need
pub use crate::core::error::{Cause, Error, Result};
pub use crate::core::model::{
    estimated_minutes, AggregateRouteResult, Coordinate, DayOrNight, HeatmapBucket, HeatmapPoint, NodeId,
    RouteCandidate, RouteLabels, RouteMode, WALKING_SPEED_M_PER_MIN,
};
pub use crate::core::node::GeoNodeResolver;
pub use crate::core::retry::{retry_transport, RetryPolicy};
pub use crate::core::route::RouteFetcher;
pub use crate::core::time_context::TimeContextResolver;

// Internal modules
mod core;

/// Request the shortest and the time-appropriate safety route
///
/// Uses [`BackendConfig::from_env`].
///
/// # Arguments
/// * `start` - Where the walk begins; also decides day or night
/// * `end` - Destination
pub async fn routes(start: Coordinate, end: Coordinate) -> Result<AggregateRouteResult> {
    routes_with_config(start, end, BackendConfig::from_env()?).await
}

/// Request routes against an explicit backend configuration
///
/// # Examples
/// ```rust,no_run
/// use saferoute::{BackendConfig, Coordinate};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = BackendConfig::default().with_base_url("http://localhost:5000");
/// let result = saferoute::routes_with_config(
///     Coordinate::new(37.50, 127.00),
///     Coordinate::new(37.51, 127.01),
///     config,
/// ).await?;
/// println!("{} candidates", result.candidates.len());
/// # Ok(())
/// # }
/// ```
pub async fn routes_with_config(
    start: Coordinate,
    end: Coordinate,
    config: BackendConfig,
) -> Result<AggregateRouteResult> {
    RouteAggregator::new(Backend::new(config))
        .request_all_routes(start, end)
        .await
}

/// Fetch safety heatmap points along a route
///
/// Runs on the extended heatmap timeout. An empty vector is a valid answer.
pub async fn heatmap(path: &[Coordinate], mode: RouteMode) -> Result<Vec<HeatmapPoint>> {
    let backend = Backend::new(BackendConfig::from_env()?);
    HeatmapFetcher::new(backend).fetch_heatmap(path, mode).await
}

/// Advanced API: components with custom configuration
///
/// # Examples
/// ```rust,no_run
/// use saferoute::{Backend, BackendConfig, Coordinate, RouteAggregator, RouteSession};
///
/// # #[tokio::main]
/// # async fn main() {
/// let backend = Backend::new(BackendConfig::default());
/// let (mut session, mut events) = RouteSession::new(RouteAggregator::new(backend));
///
/// session.request(Coordinate::new(37.50, 127.00), Coordinate::new(37.51, 127.01));
/// // A newer request supersedes the first one; only its result is delivered
/// let latest = session.request(Coordinate::new(37.50, 127.00), Coordinate::new(37.52, 127.02));
///
/// if let Some(event) = events.recv().await {
///     assert_eq!(event.request_id, latest);
/// }
/// # }
/// ```
pub use crate::core::{Backend, BackendConfig, HeatmapFetcher, RouteAggregator, RouteSession, SessionEvent};
