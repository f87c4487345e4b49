// Time series domain models
use crate::domain::error::QueryError;
use crate::domain::geometry::LatLon;
use chrono::{DateTime, Utc};

/// The datastore's record identifying one time series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesDescriptor {
    pub id: i64,
    pub station_id: String,
    pub parameter_id: String,
    pub unit: Option<String>,
    pub location: LatLon,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub time: DateTime<Utc>,
    /// `None` for a missing value.
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(time: DateTime<Utc>, value: Option<f64>) -> Self {
        // NaN is treated the same as a missing value
        Self {
            time,
            value: value.filter(|v| !v.is_nan()),
        }
    }
}

/// Observations of one series, in non-decreasing time order.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationStream {
    pub series_id: i64,
    pub observations: Vec<Observation>,
}

impl ObservationStream {
    pub fn new(series_id: i64, observations: Vec<Observation>) -> Self {
        Self {
            series_id,
            observations,
        }
    }
}

/// Half-open `[from, to)` time interval for an observation fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self, QueryError> {
        if from >= to {
            return Err(QueryError::InvalidParameter(format!(
                "time window start {} is not before end {}",
                from.to_rfc3339(),
                to.to_rfc3339()
            )));
        }
        Ok(Self { from, to })
    }
}
