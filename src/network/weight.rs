use std::fmt;

use geo::{line_string, Geodesic, Length, LineString};
use geo_types::Point;

use crate::{error::NetworkError, network::station::StationId};

/// Fixed dwell penalty added to every timed hop, in minutes.
pub const DWELL_MINUTES: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightUnit {
    Kilometres,
    Minutes,
}

impl WeightUnit {
    pub fn from_use_time(use_time: bool) -> Self {
        if use_time {
            WeightUnit::Minutes
        } else {
            WeightUnit::Kilometres
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightUnit::Kilometres => f.write_str("km"),
            WeightUnit::Minutes => f.write_str("min"),
        }
    }
}

/// Geodesic distance between two positions on the WGS-84 ellipsoid. NaN when
/// either position has a non-finite coordinate.
pub fn distance_km(a: Point<f64>, b: Point<f64>) -> f64 {
    if [a.x(), a.y(), b.x(), b.y()].iter().any(|c| !c.is_finite()) {
        return f64::NAN;
    }
    let line: LineString<f64> = line_string![a.0, b.0];
    Geodesic.length(&line) / 1000.0
}

/// Minutes to cover `distance_km` at `speed_kmh`, plus the dwell penalty.
pub fn travel_time(distance_km: f64, speed_kmh: f64) -> f64 {
    distance_km / speed_kmh * 60.0 + DWELL_MINUTES
}

/// Passes `weight` through if it is usable as an edge weight.
pub fn checked_weight(
    from: &StationId,
    to: &StationId,
    weight: f64,
) -> Result<f64, NetworkError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(weight)
    } else {
        Err(NetworkError::InvalidWeight {
            from: from.clone(),
            to: to.clone(),
            weight,
        })
    }
}

pub fn edge_weight(a: Point<f64>, b: Point<f64>, speed_kmh: f64, use_time: bool) -> f64 {
    let distance = distance_km(a, b);
    if use_time {
        travel_time(distance, speed_kmh)
    } else {
        distance
    }
}
