// Coverage domain models
use crate::domain::geometry::LatLon;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// One aligned series: where it was observed, what, and the values over time.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesData {
    pub location: LatLon,
    pub parameter_id: String,
    pub unit: Option<String>,
    pub times: Vec<DateTime<Utc>>,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterInfo {
    pub unit: Option<String>,
}

/// A point series: one location, one time axis, one value array per parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Coverage {
    pub location: LatLon,
    pub times: Vec<DateTime<Utc>>,
    pub parameters: BTreeMap<String, ParameterInfo>,
    pub ranges: BTreeMap<String, Vec<Option<f64>>>,
}

impl Coverage {
    pub fn new(location: LatLon, times: Vec<DateTime<Utc>>) -> Self {
        Self {
            location,
            times,
            parameters: BTreeMap::new(),
            ranges: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CoverageResult {
    Single(Coverage),
    /// Ordered by ascending (lat, lon).
    Collection(Vec<Coverage>),
}

impl CoverageResult {
    pub fn coverages(&self) -> &[Coverage] {
        match self {
            CoverageResult::Single(coverage) => std::slice::from_ref(coverage),
            CoverageResult::Collection(coverages) => coverages,
        }
    }

    pub fn empty() -> Self {
        CoverageResult::Collection(Vec::new())
    }
}
