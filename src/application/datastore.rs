// Datastore trait and request types for the remote time series store
use crate::domain::geometry::PolygonRing;
use crate::domain::series::{ObservationStream, SeriesDescriptor, TimeWindow};
use async_trait::async_trait;
use std::collections::BTreeSet;

/// Time series lookup by geometry, station and parameter.
/// Omitted filters do not constrain the match.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LookupRequest {
    pub inside: Option<PolygonRing>,
    pub station_ids: Option<Vec<String>>,
    pub parameter_ids: Option<Vec<String>>,
}

impl LookupRequest {
    /// The ring keeps its vertex order since the store is sensitive to winding.
    pub fn build(
        polygon: Option<PolygonRing>,
        station_ids: Option<BTreeSet<String>>,
        parameter_ids: Option<BTreeSet<String>>,
    ) -> Self {
        Self {
            inside: polygon,
            station_ids: station_ids.map(|ids| ids.into_iter().collect()),
            parameter_ids: parameter_ids.map(|ids| ids.into_iter().collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRequest {
    pub series_ids: Vec<i64>,
    pub window: TimeWindow,
}

#[async_trait]
pub trait Datastore: Send + Sync {
    /// Find time series matching the request's filters
    async fn find_time_series(&self, request: &LookupRequest)
        -> anyhow::Result<Vec<SeriesDescriptor>>;

    /// Get observations for the given series, in the same order as `series_ids`
    async fn get_observations(
        &self,
        request: &ObservationRequest,
    ) -> anyhow::Result<Vec<ObservationStream>>;
}
