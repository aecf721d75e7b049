//! Error types for saferoute
//!
//! Every failure of the route workflow is reported through this one enum.
//! None of them are fatal to the process; the aggregator decides which ones
//! shrink the candidate list and which ones abort the request.

use std::fmt;

use crate::core::model::{Coordinate, RouteMode};

/// Underlying reason a backend call failed
#[derive(Debug, Clone, PartialEq)]
pub enum Cause {
    /// Connection refused, reset or timed out
    Network(String),
    /// Non-success status or other HTTP-level failure
    Http(String),
    /// Body was not the expected JSON shape
    Decode(String),
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Network(msg) => write!(f, "network error: {}", msg),
            Cause::Http(msg) => write!(f, "HTTP error: {}", msg),
            Cause::Decode(msg) => write!(f, "decode error: {}", msg),
        }
    }
}

impl From<reqwest::Error> for Cause {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Cause::Network(err.to_string())
        } else if err.is_decode() {
            Cause::Decode(err.to_string())
        } else {
            Cause::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Cause {
    fn from(err: serde_json::Error) -> Self {
        Cause::Decode(err.to_string())
    }
}

/// Main error type for saferoute operations
#[derive(Debug, Clone)]
pub enum Error {
    /// A coordinate could not be turned into a graph node id
    NodeResolution { coordinate: Coordinate, cause: Cause },

    /// Day/night lookup failed
    TimeContext(Cause),

    /// The route request itself failed
    RouteFetch { mode: RouteMode, cause: Cause },

    /// The route response was missing required fields
    RouteParse { mode: RouteMode, reason: String },

    /// Heatmap request or decode failed
    HeatmapFetch(Cause),

    /// Both legs of an aggregate request failed
    AllLegsFailed { shortest: Box<Error>, safety: Box<Error> },

    /// Invalid configuration or parameters
    InvalidInput(String),
}

impl Error {
    /// True when the failure came from the transport rather than the payload.
    ///
    /// Caller-level retry policies key off this.
    pub fn is_transport(&self) -> bool {
        match self {
            Error::NodeResolution { cause, .. }
            | Error::TimeContext(cause)
            | Error::RouteFetch { cause, .. }
            | Error::HeatmapFetch(cause) => matches!(cause, Cause::Network(_)),
            Error::AllLegsFailed { shortest, safety } => shortest.is_transport() || safety.is_transport(),
            Error::RouteParse { .. } | Error::InvalidInput(_) => false,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NodeResolution { coordinate, cause } => {
                write!(f, "Could not resolve graph node for {}: {}", coordinate, cause)
            }
            Error::TimeContext(cause) => {
                write!(f, "Could not determine day/night context: {}", cause)
            }
            Error::RouteFetch { mode, cause } => {
                write!(f, "Route request ({}) failed: {}", mode, cause)
            }
            Error::RouteParse { mode, reason } => {
                write!(f, "Malformed route response ({}): {}", mode, reason)
            }
            Error::HeatmapFetch(cause) => {
                write!(f, "Heatmap request failed: {}", cause)
            }
            Error::AllLegsFailed { shortest, safety } => {
                write!(f, "No route available: {}; {}", shortest, safety)
            }
            Error::InvalidInput(msg) => {
                write!(f, "Invalid input: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::AllLegsFailed { shortest, .. } => Some(shortest.as_ref()),
            _ => None,
        }
    }
}

/// Suggest the closest route mode for a mistyped one
pub fn suggest_mode(input: &str) -> Option<&'static str> {
    let input = input.to_lowercase();
    RouteMode::ALL
        .iter()
        .map(|mode| (mode.as_wire(), strsim::levenshtein(&input, mode.as_wire())))
        .filter(|&(_, distance)| distance > 0 && distance <= 3)
        .min_by_key(|&(_, distance)| distance)
        .map(|(wire, _)| wire)
}

/// Convenience result type for saferoute operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggest_mode() {
        assert_eq!(suggest_mode("shortst"), Some("shortest"));
        assert_eq!(suggest_mode("safest_dy"), Some("safest_day"));
        assert_eq!(suggest_mode("safestnight"), Some("safest_night"));
        assert_eq!(suggest_mode("shortest"), None);
        assert_eq!(suggest_mode("walk-me-home"), None);
    }

    #[test]
    fn test_is_transport() {
        let coordinate = Coordinate::new(37.5, 127.0);
        let network = Error::NodeResolution { coordinate, cause: Cause::Network("timed out".into()) };
        let decode = Error::NodeResolution { coordinate, cause: Cause::Decode("missing node_id".into()) };
        assert!(network.is_transport());
        assert!(!decode.is_transport());
        assert!(!Error::RouteParse { mode: RouteMode::Shortest, reason: "no path".into() }.is_transport());
        assert!(!Error::InvalidInput("bad mode".into()).is_transport());

        let both = Error::AllLegsFailed {
            shortest: Box::new(Error::RouteFetch { mode: RouteMode::Shortest, cause: Cause::Http("500".into()) }),
            safety: Box::new(Error::TimeContext(Cause::Network("reset".into()))),
        };
        assert!(both.is_transport());
    }

    #[test]
    fn test_display_carries_context() {
        let err = Error::NodeResolution {
            coordinate: Coordinate::new(37.5, 127.0),
            cause: Cause::Http("503 Service Unavailable".into()),
        };
        let msg = err.to_string();
        assert!(msg.contains("37.500000"), "{msg}");
        assert!(msg.contains("503"), "{msg}");

        let err = Error::RouteParse { mode: RouteMode::SafestNight, reason: "missing `distance`".into() };
        assert!(err.to_string().contains("safest_night"));
    }
}
