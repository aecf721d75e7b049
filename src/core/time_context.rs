//! Day/night lookup for a coordinate

use log::debug;

use crate::core::client::Backend;
use crate::core::error::{Cause, Error, Result};
use crate::core::model::{Coordinate, DayOrNight};
use crate::core::wire::TimeZoneResponse;

/// Asks the time-zone function whether it is currently day or night at a coordinate
#[derive(Debug, Clone, Default)]
pub struct TimeContextResolver {
    backend: Backend,
}

impl TimeContextResolver {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    pub async fn resolve_day_or_night(&self, coordinate: Coordinate) -> Result<DayOrNight> {
        let request = self
            .backend
            .client()
            .get(&self.backend.config().time_zone_url)
            .query(&[("lat", coordinate.lat), ("lng", coordinate.lng)]);

        let response: TimeZoneResponse = self.backend.json(request).await.map_err(Error::TimeContext)?;
        debug!(
            "Time zone at {coordinate}: {} ({}), local time {}",
            response.day_or_night,
            response.time_zone_id.as_deref().unwrap_or("unknown zone"),
            response.local_time.as_deref().unwrap_or("?"),
        );

        parse_day_or_night(&response.day_or_night)
    }
}

fn parse_day_or_night(value: &str) -> Result<DayOrNight> {
    match value.trim().to_lowercase().as_str() {
        "day" => Ok(DayOrNight::Day),
        "night" => Ok(DayOrNight::Night),
        other => Err(Error::TimeContext(Cause::Decode(format!(
            "unexpected dayOrNight value '{other}'"
        )))),
    }
}
