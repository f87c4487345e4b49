// Application state for HTTP handlers
use crate::application::location_service::LocationService;
use crate::application::observation_service::ObservationService;

#[derive(Clone)]
pub struct AppState {
    pub observation_service: ObservationService,
    pub location_service: LocationService,
    /// Observation window in hours when a request has no `datetime`
    pub default_window_hours: i64,
}
