// HTTP request handlers
use crate::domain::coverage::CoverageResult;
use crate::domain::error::QueryError;
use crate::infrastructure::covjson_mapper::{coverage_result_to_covjson, locations_to_geojson};
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::infrastructure::query_parser::{
    parse_bbox, parse_datetime, parse_parameter_names, parse_point, parse_polygon,
};
use crate::presentation::app_state::AppState;
use crate::presentation::error_response::error_response;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, Response, StatusCode},
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

const COVERAGE_JSON: &str = "application/prs.coverage+json";
const GEO_JSON: &str = "application/geo+json";
const JSON: &str = "application/json";

#[derive(Debug, Deserialize)]
pub struct LocationsQuery {
    /// `minLon,minLat,maxLon,maxLat`
    pub bbox: Option<String>,
    #[serde(rename = "parameter-name")]
    pub parameter_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DataQuery {
    /// WKT geometry, `lon lat` axis order
    pub coords: Option<String>,
    #[serde(rename = "parameter-name")]
    pub parameter_name: Option<String>,
    pub datetime: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Landing page
pub async fn landing_page(headers: HeaderMap) -> Response<Body> {
    let body = json!({
        "title": "Observations EDR API",
        "description": "Environmental data retrieval over station observation time series",
        "links": [
            { "href": "/", "rel": "self", "type": JSON, "title": "This document" },
            { "href": "/collections", "rel": "data", "type": JSON, "title": "Collections" },
        ]
    });
    render(StatusCode::OK, JSON, &body, &headers).await
}

/// List collections
pub async fn list_collections(headers: HeaderMap) -> Response<Body> {
    let body = json!({
        "links": [{ "href": "/collections", "rel": "self", "type": JSON }],
        "collections": [collection_description()],
    });
    render(StatusCode::OK, JSON, &body, &headers).await
}

/// Metadata for the observations collection
pub async fn collection_metadata(headers: HeaderMap) -> Response<Body> {
    render(StatusCode::OK, JSON, &collection_description(), &headers).await
}

fn collection_description() -> serde_json::Value {
    json!({
        "id": "observations",
        "title": "Station observations",
        "links": [{ "href": "/collections/observations", "rel": "self", "type": JSON }],
        "data_queries": {
            "locations": { "link": { "href": "/collections/observations/locations", "rel": "data" } },
            "position": { "link": { "href": "/collections/observations/position", "rel": "data" } },
            "area": { "link": { "href": "/collections/observations/area", "rel": "data" } },
        },
        "crs": ["http://www.opengis.net/def/crs/EPSG/0/4326"],
        "output_formats": ["CoverageJSON", "GeoJSON"],
    })
}

/// Station locations inside a bounding box
pub async fn get_locations(
    Query(query): Query<LocationsQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response<Body> {
    let compress = accepts_brotli(&headers);

    let result = async {
        let bbox = required(query.bbox.as_deref(), "bbox")?;
        let area = parse_bbox(bbox)?;
        let parameters = parse_parameter_names(query.parameter_name.as_deref());
        state.location_service.locations_in_area(area, parameters).await
    }
    .await;

    match result {
        Ok(features) => {
            tracing::debug!("Found {} locations", features.len());
            finish(json_response(StatusCode::OK, GEO_JSON, &locations_to_geojson(features), compress).await)
        }
        Err(e) => error_response(e, compress).await,
    }
}

/// Observations for one named station
pub async fn get_location_data(
    Path(location_id): Path<String>,
    Query(query): Query<DataQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response<Body> {
    let compress = accepts_brotli(&headers);

    let result = async {
        let window = parse_datetime(query.datetime.as_deref(), Utc::now(), state.default_window_hours)?;
        let parameters = parse_parameter_names(query.parameter_name.as_deref());
        state
            .observation_service
            .query_location(&location_id, parameters, window)
            .await
    }
    .await;

    coverage_response(result, compress).await
}

/// Observations near a WKT point
pub async fn get_position(
    Query(query): Query<DataQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response<Body> {
    let compress = accepts_brotli(&headers);

    let result = async {
        let point = parse_point(required(query.coords.as_deref(), "coords")?)?;
        let window = parse_datetime(query.datetime.as_deref(), Utc::now(), state.default_window_hours)?;
        let parameters = parse_parameter_names(query.parameter_name.as_deref());
        state
            .observation_service
            .query_position(point, parameters, window)
            .await
    }
    .await;

    coverage_response(result, compress).await
}

/// Observations inside a WKT polygon
pub async fn get_area(
    Query(query): Query<DataQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response<Body> {
    let compress = accepts_brotli(&headers);

    let result = async {
        let area = parse_polygon(required(query.coords.as_deref(), "coords")?)?;
        let window = parse_datetime(query.datetime.as_deref(), Utc::now(), state.default_window_hours)?;
        let parameters = parse_parameter_names(query.parameter_name.as_deref());
        state
            .observation_service
            .query_area(area, parameters, window)
            .await
    }
    .await;

    coverage_response(result, compress).await
}

fn required<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, QueryError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| QueryError::InvalidParameter(format!("missing required parameter: {}", name)))
}

async fn coverage_response(
    result: Result<CoverageResult, QueryError>,
    compress: bool,
) -> Response<Body> {
    match result {
        Ok(coverages) => {
            tracing::debug!("Returning {} coverages", coverages.coverages().len());
            let document = coverage_result_to_covjson(coverages);
            finish(json_response(StatusCode::OK, COVERAGE_JSON, &document, compress).await)
        }
        Err(e) => error_response(e, compress).await,
    }
}

async fn render<T: serde::Serialize>(
    status: StatusCode,
    content_type: &'static str,
    body: &T,
    headers: &HeaderMap,
) -> Response<Body> {
    finish(json_response(status, content_type, body, accepts_brotli(headers)).await)
}

fn finish(response: Result<Response<Body>, StatusCode>) -> Response<Body> {
    match response {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
