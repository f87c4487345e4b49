// Location service - Use case for listing station locations in an area
use crate::application::datastore::LookupRequest;
use crate::application::fetcher::TimeSeriesFetcher;
use crate::domain::error::QueryError;
use crate::domain::geometry::{normalize, GeoFilter};
use crate::domain::location::LocationFeature;
use crate::domain::series::SeriesDescriptor;
use std::collections::BTreeSet;

/// One feature per descriptor, in lookup order.
pub fn list_features(descriptors: &[SeriesDescriptor]) -> Vec<LocationFeature> {
    descriptors.iter().map(LocationFeature::from).collect()
}

#[derive(Clone)]
pub struct LocationService {
    fetcher: TimeSeriesFetcher,
}

impl LocationService {
    pub fn new(fetcher: TimeSeriesFetcher) -> Self {
        Self { fetcher }
    }

    pub async fn locations_in_area(
        &self,
        area: GeoFilter,
        parameter_ids: Option<BTreeSet<String>>,
    ) -> Result<Vec<LocationFeature>, QueryError> {
        let polygon = normalize(area)?;
        let request = LookupRequest::build(Some(polygon), None, parameter_ids);
        let descriptors = self.fetcher.lookup(&request).await?;
        Ok(list_features(&descriptors))
    }
}
