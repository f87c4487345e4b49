// In-memory datastore used by unit tests
use crate::application::datastore::{Datastore, LookupRequest, ObservationRequest};
use crate::domain::geometry::LatLon;
use crate::domain::series::{Observation, ObservationStream, SeriesDescriptor};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Mutex;
use std::time::Duration;

/// Canned responses plus a record of the requests that reached the store.
#[derive(Default)]
pub struct MockDatastore {
    pub series: Vec<SeriesDescriptor>,
    pub streams: Vec<ObservationStream>,
    pub fail: bool,
    pub delay: Option<Duration>,
    pub lookups: Mutex<Vec<LookupRequest>>,
    pub fetches: Mutex<Vec<ObservationRequest>>,
}

impl MockDatastore {
    pub fn new(series: Vec<SeriesDescriptor>, streams: Vec<ObservationStream>) -> Self {
        Self {
            series,
            streams,
            ..Default::default()
        }
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().unwrap().len()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }
}

#[async_trait]
impl Datastore for MockDatastore {
    async fn find_time_series(
        &self,
        request: &LookupRequest,
    ) -> anyhow::Result<Vec<SeriesDescriptor>> {
        self.lookups.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            anyhow::bail!("connection refused");
        }
        Ok(self.series.clone())
    }

    async fn get_observations(
        &self,
        request: &ObservationRequest,
    ) -> anyhow::Result<Vec<ObservationStream>> {
        self.fetches.lock().unwrap().push(request.clone());
        if self.fail {
            anyhow::bail!("connection refused");
        }
        Ok(self.streams.clone())
    }
}

pub fn hour(h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 1, h, 0, 0).unwrap()
}

pub fn descriptor(id: i64, station: &str, param: &str, lat: f64, lon: f64) -> SeriesDescriptor {
    SeriesDescriptor {
        id,
        station_id: station.to_string(),
        parameter_id: param.to_string(),
        unit: None,
        location: LatLon::new(lat, lon),
    }
}

/// A stream with one observation per hour starting at midnight.
pub fn stream(id: i64, values: &[f64]) -> ObservationStream {
    ObservationStream::new(
        id,
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Observation::new(hour(i as u32), Some(*v)))
            .collect(),
    )
}
