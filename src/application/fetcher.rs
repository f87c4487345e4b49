// Time series fetcher - the two sequential datastore round trips
use crate::application::datastore::{Datastore, LookupRequest, ObservationRequest};
use crate::domain::error::QueryError;
use crate::domain::series::{ObservationStream, SeriesDescriptor, TimeWindow};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct TimeSeriesFetcher {
    store: Arc<dyn Datastore>,
    timeout: Duration,
}

impl TimeSeriesFetcher {
    pub fn new(store: Arc<dyn Datastore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub async fn lookup(&self, request: &LookupRequest) -> Result<Vec<SeriesDescriptor>, QueryError> {
        let series = self
            .with_deadline("lookup", self.store.find_time_series(request))
            .await?;
        tracing::debug!(
            "Lookup matched {} time series (stations={:?}, parameters={:?}, polygon={})",
            series.len(),
            request.station_ids,
            request.parameter_ids,
            request.inside.is_some()
        );
        Ok(series)
    }

    /// Fetch observations for `ids`, position-aligned with `ids`.
    pub async fn fetch_observations(
        &self,
        ids: &[i64],
        window: TimeWindow,
    ) -> Result<Vec<ObservationStream>, QueryError> {
        let request = ObservationRequest {
            series_ids: ids.to_vec(),
            window,
        };
        tracing::debug!(
            "Fetching observations for {} series in [{}, {})",
            ids.len(),
            window.from.to_rfc3339(),
            window.to.to_rfc3339()
        );

        let streams = self
            .with_deadline("observation fetch", self.store.get_observations(&request))
            .await?;

        if streams.len() != ids.len() {
            tracing::warn!(
                "Observation fetch for window [{}, {}) came back short",
                window.from.to_rfc3339(),
                window.to.to_rfc3339()
            );
            return Err(QueryError::PartialResponse {
                requested: ids.to_vec(),
                returned: streams.iter().map(|s| s.series_id).collect(),
            });
        }
        for (position, (expected, stream)) in ids.iter().zip(&streams).enumerate() {
            if stream.series_id != *expected {
                return Err(QueryError::Misalignment {
                    position,
                    expected: Some(*expected),
                    found: Some(stream.series_id),
                });
            }
        }

        Ok(streams)
    }

    async fn with_deadline<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = anyhow::Result<T>>,
    ) -> Result<T, QueryError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(QueryError::UpstreamUnavailable {
                operation,
                reason: format!("{:#}", e),
            }),
            Err(_) => Err(QueryError::UpstreamUnavailable {
                operation,
                reason: format!("no response within {:?}", self.timeout),
            }),
        }
    }
}
