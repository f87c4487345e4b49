// Spatial filter domain model and polygon normalization
use crate::domain::error::QueryError;
use std::f64::consts::FRAC_PI_2;

/// Segments per quarter circle when approximating a buffered point.
pub const QUAD_SEGMENTS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Bit-exact key used for grouping and distinct-vertex counting.
    pub fn key(&self) -> (u64, u64) {
        (self.lat.to_bits(), self.lon.to_bits())
    }

    fn validate(&self) -> Result<(), QueryError> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(QueryError::InvalidGeometry(format!(
                "latitude {} outside [-90, 90]",
                self.lat
            )));
        }
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(QueryError::InvalidGeometry(format!(
                "longitude {} outside [-180, 180]",
                self.lon
            )));
        }
        Ok(())
    }
}

/// User supplied spatial filter
#[derive(Debug, Clone, PartialEq)]
pub enum GeoFilter {
    BoundingBox {
        min_lat: f64,
        min_lon: f64,
        max_lat: f64,
        max_lon: f64,
    },
    BufferedPoint {
        lat: f64,
        lon: f64,
        radius: f64,
    },
    Polygon(Vec<LatLon>),
}

/// A closed polygon ring: at least 3 distinct vertices and first == last.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonRing(Vec<LatLon>);

impl PolygonRing {
    pub fn vertices(&self) -> &[LatLon] {
        &self.0
    }
}

impl From<PolygonRing> for GeoFilter {
    fn from(ring: PolygonRing) -> Self {
        GeoFilter::Polygon(ring.0)
    }
}

/// Turn any spatial filter into a single closed polygon ring.
pub fn normalize(filter: GeoFilter) -> Result<PolygonRing, QueryError> {
    let ring = match filter {
        GeoFilter::BoundingBox {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        } => {
            if min_lat > max_lat || min_lon > max_lon {
                return Err(QueryError::InvalidGeometry(format!(
                    "bounding box min ({}, {}) exceeds max ({}, {})",
                    min_lat, min_lon, max_lat, max_lon
                )));
            }
            // Counter-clockwise from the lower-left corner
            vec![
                LatLon::new(min_lat, min_lon),
                LatLon::new(min_lat, max_lon),
                LatLon::new(max_lat, max_lon),
                LatLon::new(max_lat, min_lon),
                LatLon::new(min_lat, min_lon),
            ]
        }
        GeoFilter::BufferedPoint { lat, lon, radius } => {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(QueryError::InvalidGeometry(format!(
                    "buffer radius must be positive, got {}",
                    radius
                )));
            }
            LatLon::new(lat, lon).validate()?;
            circle_ring(LatLon::new(lat, lon), radius, QUAD_SEGMENTS)
        }
        GeoFilter::Polygon(vertices) => {
            if vertices.first() != vertices.last() {
                return Err(QueryError::InvalidGeometry(
                    "polygon ring is not closed".to_string(),
                ));
            }
            vertices
        }
    };

    validate_ring(&ring)?;
    Ok(PolygonRing(ring))
}

/// Regular polygon around `center`, counter-clockwise starting east.
/// Vertices past a pole or the antimeridian are clamped onto the limit.
fn circle_ring(center: LatLon, radius: f64, quad_segs: usize) -> Vec<LatLon> {
    let steps = 4 * quad_segs.max(1);
    let mut ring: Vec<LatLon> = (0..steps)
        .map(|i| {
            let angle = FRAC_PI_2 * i as f64 / quad_segs.max(1) as f64;
            LatLon::new(
                (center.lat + radius * angle.sin()).clamp(-90.0, 90.0),
                (center.lon + radius * angle.cos()).clamp(-180.0, 180.0),
            )
        })
        .collect();
    ring.push(ring[0]);
    ring
}

fn validate_ring(ring: &[LatLon]) -> Result<(), QueryError> {
    for vertex in ring {
        vertex.validate()?;
    }

    let mut distinct: Vec<(u64, u64)> = ring.iter().map(LatLon::key).collect();
    distinct.sort_unstable();
    distinct.dedup();
    if distinct.len() < 3 {
        return Err(QueryError::InvalidGeometry(format!(
            "polygon needs at least 3 distinct vertices, got {}",
            distinct.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance(a: LatLon, b: LatLon) -> f64 {
        ((a.lat - b.lat).powi(2) + (a.lon - b.lon).powi(2)).sqrt()
    }

    #[test]
    fn test_bounding_box_ring() {
        let ring = normalize(GeoFilter::BoundingBox {
            min_lat: 52.0,
            min_lon: 5.0,
            max_lat: 52.1,
            max_lon: 6.0,
        })
        .unwrap();

        let v = ring.vertices();
        assert_eq!(v.len(), 5);
        assert_eq!(v[0], LatLon::new(52.0, 5.0));
        assert_eq!(v[1], LatLon::new(52.0, 6.0));
        assert_eq!(v[2], LatLon::new(52.1, 6.0));
        assert_eq!(v[3], LatLon::new(52.1, 5.0));
        assert_eq!(v[0], v[4]);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize(GeoFilter::BoundingBox {
            min_lat: 51.66,
            min_lon: 4.90,
            max_lat: 52.15,
            max_lon: 5.37,
        })
        .unwrap();
        let twice = normalize(once.clone().into()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_buffered_point_stays_within_radius() {
        let center = LatLon::new(52.0988218, 5.179705);
        let radius = 0.0001;
        let ring = normalize(GeoFilter::BufferedPoint {
            lat: center.lat,
            lon: center.lon,
            radius,
        })
        .unwrap();

        let v = ring.vertices();
        assert!(v.len() - 1 >= 4);
        assert_eq!(v.first(), v.last());
        for vertex in v {
            assert!(distance(*vertex, center) <= radius + 1e-12);
        }
    }

    #[test]
    fn test_buffered_point_near_pole_is_clamped() {
        let ring = normalize(GeoFilter::BufferedPoint {
            lat: 89.99995,
            lon: 5.0,
            radius: 0.0001,
        })
        .unwrap();

        let v = ring.vertices();
        assert!(v.iter().all(|p| p.lat <= 90.0));
        assert_eq!(v[1].lat, 90.0);
        assert_eq!(v.first(), v.last());
    }

    #[test]
    fn test_buffered_point_on_antimeridian_is_clamped() {
        let ring = normalize(GeoFilter::BufferedPoint {
            lat: 0.0,
            lon: 180.0,
            radius: 0.0001,
        })
        .unwrap();

        assert_eq!(ring.vertices()[0].lon, 180.0);
        assert!(ring.vertices().iter().all(|p| p.lon <= 180.0));
    }

    #[test]
    fn test_degenerate_polygon_rejected() {
        let ring = vec![
            LatLon::new(52.0, 5.0),
            LatLon::new(52.0, 6.0),
            LatLon::new(52.0, 5.0),
        ];
        let err = normalize(GeoFilter::Polygon(ring)).unwrap_err();
        assert!(matches!(err, QueryError::InvalidGeometry(_)));

        let flat = normalize(GeoFilter::BoundingBox {
            min_lat: 52.0,
            min_lon: 5.0,
            max_lat: 52.0,
            max_lon: 5.0,
        });
        assert!(matches!(flat, Err(QueryError::InvalidGeometry(_))));
    }

    #[test]
    fn test_open_ring_rejected() {
        let ring = vec![
            LatLon::new(52.0, 5.0),
            LatLon::new(52.0, 6.0),
            LatLon::new(53.0, 6.0),
        ];
        assert!(matches!(
            normalize(GeoFilter::Polygon(ring)),
            Err(QueryError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_out_of_range_coordinates() {
        let lat = normalize(GeoFilter::BoundingBox {
            min_lat: -91.0,
            min_lon: 0.0,
            max_lat: 10.0,
            max_lon: 10.0,
        });
        assert!(matches!(lat, Err(QueryError::InvalidGeometry(_))));

        let lon = normalize(GeoFilter::BufferedPoint {
            lat: 10.0,
            lon: 181.0,
            radius: 0.1,
        });
        assert!(matches!(lon, Err(QueryError::InvalidGeometry(_))));
    }

    #[test]
    fn test_inverted_bounding_box_rejected() {
        let inverted = normalize(GeoFilter::BoundingBox {
            min_lat: 53.0,
            min_lon: 5.0,
            max_lat: 52.0,
            max_lon: 6.0,
        });
        assert!(matches!(inverted, Err(QueryError::InvalidGeometry(_))));
    }
}
