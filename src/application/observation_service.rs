// Observation service - Use cases for area, position and named location queries
use crate::application::aligner::align;
use crate::application::assembler::CoverageAssembler;
use crate::application::datastore::LookupRequest;
use crate::application::fetcher::TimeSeriesFetcher;
use crate::domain::coverage::CoverageResult;
use crate::domain::error::QueryError;
use crate::domain::geometry::{normalize, GeoFilter, LatLon};
use crate::domain::series::TimeWindow;
use std::collections::BTreeSet;

#[derive(Clone)]
pub struct ObservationService {
    fetcher: TimeSeriesFetcher,
    assembler: CoverageAssembler,
    position_buffer: f64,
}

impl ObservationService {
    pub fn new(fetcher: TimeSeriesFetcher, assembler: CoverageAssembler, position_buffer: f64) -> Self {
        Self {
            fetcher,
            assembler,
            position_buffer,
        }
    }

    /// Coverages for every series inside `area`.
    pub async fn query_area(
        &self,
        area: GeoFilter,
        parameter_ids: Option<BTreeSet<String>>,
        window: TimeWindow,
    ) -> Result<CoverageResult, QueryError> {
        let polygon = normalize(area)?;
        let request = LookupRequest::build(Some(polygon), None, parameter_ids);
        self.run(request, window).await
    }

    /// Coverages for series within the configured buffer around a point.
    pub async fn query_position(
        &self,
        point: LatLon,
        parameter_ids: Option<BTreeSet<String>>,
        window: TimeWindow,
    ) -> Result<CoverageResult, QueryError> {
        let area = GeoFilter::BufferedPoint {
            lat: point.lat,
            lon: point.lon,
            radius: self.position_buffer,
        };
        self.query_area(area, parameter_ids, window).await
    }

    /// Coverages for one station, looked up by identifier rather than geometry.
    pub async fn query_location(
        &self,
        station_id: &str,
        parameter_ids: Option<BTreeSet<String>>,
        window: TimeWindow,
    ) -> Result<CoverageResult, QueryError> {
        let stations = BTreeSet::from([station_id.to_string()]);
        let request = LookupRequest::build(None, Some(stations), parameter_ids);
        self.run(request, window).await
    }

    async fn run(
        &self,
        request: LookupRequest,
        window: TimeWindow,
    ) -> Result<CoverageResult, QueryError> {
        let descriptors = self.fetcher.lookup(&request).await?;
        if descriptors.is_empty() {
            return Ok(CoverageResult::empty());
        }

        let ids: Vec<i64> = descriptors.iter().map(|d| d.id).collect();
        let streams = self.fetcher.fetch_observations(&ids, window).await?;
        let series = align(descriptors, streams)?;
        self.assembler.assemble(series)
    }
}
