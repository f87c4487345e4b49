// Location feature domain model
use crate::domain::geometry::LatLon;
use crate::domain::series::SeriesDescriptor;

/// A matched series shown as a point feature.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFeature {
    pub station_id: String,
    pub series_id: i64,
    pub parameter_id: String,
    pub location: LatLon,
}

impl From<&SeriesDescriptor> for LocationFeature {
    fn from(descriptor: &SeriesDescriptor) -> Self {
        Self {
            station_id: descriptor.station_id.clone(),
            series_id: descriptor.id,
            parameter_id: descriptor.parameter_id.clone(),
            location: descriptor.location,
        }
    }
}
