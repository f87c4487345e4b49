// Parsing of EDR query parameters (bbox, WKT coords, parameter-name, datetime)
use crate::domain::error::QueryError;
use crate::domain::geometry::{GeoFilter, LatLon};
use crate::domain::series::TimeWindow;
use chrono::{DateTime, Duration, TimeZone, Utc};
use geo_types::Geometry;
use std::collections::BTreeSet;
use std::str::FromStr;

/// Leeway added to "now" so the newest observations are not cut off.
const NOW_LEEWAY_SECS: i64 = 2;

/// Parse a `minLon,minLat,maxLon,maxLat` bounding box.
pub fn parse_bbox(bbox: &str) -> Result<GeoFilter, QueryError> {
    let parts: Vec<f64> = bbox
        .split(',')
        .map(|p| {
            p.trim()
                .parse::<f64>()
                .map_err(|_| QueryError::InvalidParameter(format!("bbox value '{}' is not a number", p.trim())))
        })
        .collect::<Result<_, _>>()?;

    let &[min_lon, min_lat, max_lon, max_lat] = parts.as_slice() else {
        return Err(QueryError::InvalidParameter(format!(
            "bbox must have 4 values, got {}",
            parts.len()
        )));
    };

    Ok(GeoFilter::BoundingBox {
        min_lat,
        min_lon,
        max_lat,
        max_lon,
    })
}

fn parse_wkt(coords: &str) -> Result<Geometry<f64>, QueryError> {
    let parsed = wkt::Wkt::<f64>::from_str(coords.trim())
        .map_err(|e| QueryError::InvalidGeometry(format!("invalid WKT '{}': {}", coords, e)))?;
    let geometry: Geometry<f64> = parsed
        .try_into()
        .map_err(|e| QueryError::InvalidGeometry(format!("unsupported WKT '{}': {:?}", coords, e)))?;
    Ok(geometry)
}

/// Parse a WKT `POLYGON`. Only the exterior ring is used.
pub fn parse_polygon(coords: &str) -> Result<GeoFilter, QueryError> {
    match parse_wkt(coords)? {
        Geometry::Polygon(polygon) => {
            if !polygon.interiors().is_empty() {
                tracing::warn!(
                    "Ignoring {} interior ring(s) of area polygon",
                    polygon.interiors().len()
                );
            }
            let ring = polygon
                .exterior()
                .coords()
                .map(|c| LatLon::new(c.y, c.x))
                .collect();
            Ok(GeoFilter::Polygon(ring))
        }
        other => Err(QueryError::InvalidGeometry(format!(
            "expected a POLYGON, got {}",
            geometry_name(&other)
        ))),
    }
}

/// Parse a WKT `POINT`.
pub fn parse_point(coords: &str) -> Result<LatLon, QueryError> {
    match parse_wkt(coords)? {
        Geometry::Point(point) => Ok(LatLon::new(point.y(), point.x())),
        other => Err(QueryError::InvalidGeometry(format!(
            "expected a POINT, got {}",
            geometry_name(&other)
        ))),
    }
}

fn geometry_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "POINT",
        Geometry::Line(_) | Geometry::LineString(_) => "LINESTRING",
        Geometry::Polygon(_) => "POLYGON",
        Geometry::MultiPoint(_) => "MULTIPOINT",
        Geometry::MultiLineString(_) => "MULTILINESTRING",
        Geometry::MultiPolygon(_) => "MULTIPOLYGON",
        Geometry::GeometryCollection(_) => "GEOMETRYCOLLECTION",
        Geometry::Rect(_) | Geometry::Triangle(_) => "POLYGON-like shape",
    }
}

/// Split a comma separated parameter list. `None` or an all-blank list means
/// no parameter filter.
pub fn parse_parameter_names(names: Option<&str>) -> Option<BTreeSet<String>> {
    let set: BTreeSet<String> = names?
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if set.is_empty() { None } else { Some(set) }
}

/// Turn an EDR `datetime` value into a half-open fetch window.
///
/// The datastore treats the end as exclusive, so an instant `T` becomes
/// `[T, T+1s)` and a closed end `B` becomes `B+1s`. Without a datetime the
/// window covers the last `default_hours` up to `now`.
pub fn parse_datetime(
    datetime: Option<&str>,
    now: DateTime<Utc>,
    default_hours: i64,
) -> Result<TimeWindow, QueryError> {
    let one_second = Duration::seconds(1);

    let Some(datetime) = datetime.map(str::trim).filter(|s| !s.is_empty()) else {
        return TimeWindow::new(
            now - Duration::hours(default_hours),
            now + Duration::seconds(NOW_LEEWAY_SECS),
        );
    };

    match datetime.split_once('/') {
        None => {
            let instant = parse_instant(datetime)?;
            TimeWindow::new(instant, instant + one_second)
        }
        Some((start, end)) => {
            let from = match start.trim() {
                ".." | "" => earliest(),
                s => parse_instant(s)?,
            };
            let to = match end.trim() {
                ".." | "" => latest(),
                s => parse_instant(s)? + one_second,
            };
            TimeWindow::new(from, to)
        }
    }
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, QueryError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            QueryError::InvalidParameter(format!(
                "datetime '{}' is not an RFC 3339 timestamp with offset: {}",
                value, e
            ))
        })
}

fn earliest() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn latest() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59)
        .single()
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
