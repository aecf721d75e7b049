//! Core library modules for saferoute
//!
//! This module contains the internal implementation of the route workflow.

pub mod error;
pub mod model;
pub mod wire;
pub mod config;
pub mod client;
pub mod node;
pub mod time_context;
pub mod route;
pub mod aggregator;
pub mod heatmap;
pub mod retry;

// Re-export main types for internal use
pub use aggregator::{RouteAggregator, RouteSession, SessionEvent};
pub use client::Backend;
pub use config::BackendConfig;
pub use heatmap::HeatmapFetcher;
