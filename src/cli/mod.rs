//! CLI-specific utilities for saferoute
//!
//! This module contains code specific to the command-line interface,
//! separate from the core library functionality.

pub mod progress;
pub mod render;

pub use progress::ProgressManager;
