// Query error taxonomy
use thiserror::Error;

/// Errors surfaced by the spatial query pipeline.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Malformed or out-of-range spatial filter.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Malformed non-spatial query input (datetime, bbox string, parameter list).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The datastore could not be reached, errored, or timed out.
    #[error("Datastore unavailable during {operation}: {reason}")]
    UpstreamUnavailable {
        operation: &'static str,
        reason: String,
    },

    #[error(
        "Datastore returned {} observation series for {} requested ids (requested {requested:?}, returned {returned:?})",
        id_count(.returned),
        id_count(.requested)
    )]
    PartialResponse {
        requested: Vec<i64>,
        returned: Vec<i64>,
    },

    /// A series id absent on either side is reported as `None`.
    #[error(
        "Observation series at position {position} has id {}, expected {}",
        show_id(.found),
        show_id(.expected)
    )]
    Misalignment {
        position: usize,
        expected: Option<i64>,
        found: Option<i64>,
    },

    /// A stream's timestamps go backwards.
    #[error("Observation series {series_id} is not in time order at index {index}")]
    UnorderedObservations { series_id: i64, index: usize },

    /// Series at one location disagree on their timestamps.
    #[error("Time axis of parameter '{parameter}' at ({lat}, {lon}) differs from the other series there")]
    InconsistentTimeAxis {
        lat: f64,
        lon: f64,
        parameter: String,
    },

    #[error("Parameter '{parameter}' occurs in more than one series at ({lat}, {lon})")]
    DuplicateParameter {
        lat: f64,
        lon: f64,
        parameter: String,
    },
}

fn id_count(ids: &[i64]) -> usize {
    ids.len()
}

fn show_id(id: &Option<i64>) -> String {
    id.map_or_else(|| "<none>".to_string(), |id| id.to_string())
}

impl QueryError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            QueryError::InvalidGeometry(_) | QueryError::InvalidParameter(_) => 400,
            QueryError::UpstreamUnavailable { .. } => 503,
            QueryError::PartialResponse { .. }
            | QueryError::Misalignment { .. }
            | QueryError::UnorderedObservations { .. }
            | QueryError::InconsistentTimeAxis { .. }
            | QueryError::DuplicateParameter { .. } => 502,
        }
    }

    /// True for errors caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// Short machine readable name, used in exception responses.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::InvalidGeometry(_) => "invalid-geometry",
            QueryError::InvalidParameter(_) => "invalid-parameter",
            QueryError::UpstreamUnavailable { .. } => "upstream-unavailable",
            QueryError::PartialResponse { .. } => "partial-response",
            QueryError::Misalignment { .. } => "misalignment",
            QueryError::UnorderedObservations { .. } => "unordered-observations",
            QueryError::InconsistentTimeAxis { .. } => "inconsistent-time-axis",
            QueryError::DuplicateParameter { .. } => "duplicate-parameter",
        }
    }
}
