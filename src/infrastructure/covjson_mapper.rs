// Mapping of domain coverages to CoverageJSON and of locations to GeoJSON
use crate::domain::coverage::{Coverage, CoverageResult, ParameterInfo};
use crate::domain::location::LocationFeature;
use chrono::SecondsFormat;
use serde::Serialize;
use std::collections::BTreeMap;

const EPSG_4326: &str = "http://www.opengis.net/def/crs/EPSG/0/4326";

/// Either a single coverage or a collection, serialized untagged.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum CovJsonDocument {
    Coverage(CovJsonCoverage),
    Collection(CovJsonCollection),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CovJsonCoverage {
    #[serde(rename = "type")]
    pub type_: &'static str,
    pub domain: CovJsonDomain,
    pub parameters: BTreeMap<String, CovJsonParameter>,
    pub ranges: BTreeMap<String, NdArray>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CovJsonCollection {
    #[serde(rename = "type")]
    pub type_: &'static str,
    #[serde(rename = "domainType")]
    pub domain_type: &'static str,
    pub parameters: BTreeMap<String, CovJsonParameter>,
    pub coverages: Vec<CovJsonCoverage>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CovJsonDomain {
    #[serde(rename = "type")]
    pub type_: &'static str,
    #[serde(rename = "domainType")]
    pub domain_type: &'static str,
    pub axes: PointSeriesAxes,
    pub referencing: Vec<ReferenceSystemConnection>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PointSeriesAxes {
    pub x: ValuesAxis<f64>,
    pub y: ValuesAxis<f64>,
    pub t: ValuesAxis<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValuesAxis<T> {
    pub values: Vec<T>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReferenceSystemConnection {
    pub coordinates: Vec<&'static str>,
    pub system: ReferenceSystem,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type")]
pub enum ReferenceSystem {
    #[serde(rename = "GeographicCRS")]
    Geographic { id: &'static str },
    #[serde(rename = "TemporalRS")]
    Temporal { calendar: &'static str },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct I18nLabel {
    pub en: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ObservedProperty {
    pub label: I18nLabel,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Unit {
    pub label: I18nLabel,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CovJsonParameter {
    #[serde(rename = "type")]
    pub type_: &'static str,
    #[serde(rename = "observedProperty")]
    pub observed_property: ObservedProperty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

/// Values along `[t, y, x]`; missing values serialize as `null`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NdArray {
    #[serde(rename = "type")]
    pub type_: &'static str,
    #[serde(rename = "dataType")]
    pub data_type: &'static str,
    #[serde(rename = "axisNames")]
    pub axis_names: [&'static str; 3],
    pub shape: [usize; 3],
    pub values: Vec<Option<f64>>,
}

pub fn coverage_result_to_covjson(result: CoverageResult) -> CovJsonDocument {
    match result {
        CoverageResult::Single(coverage) => CovJsonDocument::Coverage(coverage_to_covjson(coverage)),
        CoverageResult::Collection(coverages) => {
            let coverages: Vec<CovJsonCoverage> =
                coverages.into_iter().map(coverage_to_covjson).collect();

            let mut parameters = BTreeMap::new();
            for coverage in &coverages {
                for (name, parameter) in &coverage.parameters {
                    parameters
                        .entry(name.clone())
                        .or_insert_with(|| parameter.clone());
                }
            }

            CovJsonDocument::Collection(CovJsonCollection {
                type_: "CoverageCollection",
                domain_type: "PointSeries",
                parameters,
                coverages,
            })
        }
    }
}

fn coverage_to_covjson(coverage: Coverage) -> CovJsonCoverage {
    let time_steps = coverage.times.len();
    let domain = CovJsonDomain {
        type_: "Domain",
        domain_type: "PointSeries",
        axes: PointSeriesAxes {
            x: ValuesAxis {
                values: vec![coverage.location.lon],
            },
            y: ValuesAxis {
                values: vec![coverage.location.lat],
            },
            t: ValuesAxis {
                values: coverage
                    .times
                    .iter()
                    .map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
                    .collect(),
            },
        },
        referencing: vec![
            ReferenceSystemConnection {
                coordinates: vec!["y", "x"],
                system: ReferenceSystem::Geographic { id: EPSG_4326 },
            },
            ReferenceSystemConnection {
                coordinates: vec!["t"],
                system: ReferenceSystem::Temporal {
                    calendar: "Gregorian",
                },
            },
        ],
    };

    let parameters = coverage
        .parameters
        .into_iter()
        .map(|(name, info)| {
            let parameter = parameter_to_covjson(&name, info);
            (name, parameter)
        })
        .collect();

    let ranges = coverage
        .ranges
        .into_iter()
        .map(|(name, values)| {
            (
                name,
                NdArray {
                    type_: "NdArray",
                    data_type: "float",
                    axis_names: ["t", "y", "x"],
                    shape: [time_steps, 1, 1],
                    values,
                },
            )
        })
        .collect();

    CovJsonCoverage {
        type_: "Coverage",
        domain,
        parameters,
        ranges,
    }
}

fn parameter_to_covjson(name: &str, info: ParameterInfo) -> CovJsonParameter {
    CovJsonParameter {
        type_: "Parameter",
        observed_property: ObservedProperty {
            label: I18nLabel { en: name.to_string() },
        },
        unit: info.unit.map(|unit| Unit {
            label: I18nLabel { en: unit },
        }),
    }
}

/// A GeoJSON FeatureCollection of station locations.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub type_: &'static str,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Feature {
    #[serde(rename = "type")]
    pub type_: &'static str,
    pub id: String,
    pub geometry: PointGeometry,
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub type_: &'static str,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeatureProperties {
    pub timeseries_id: i64,
    pub parameter_id: String,
}

pub fn locations_to_geojson(features: Vec<LocationFeature>) -> FeatureCollection {
    FeatureCollection {
        type_: "FeatureCollection",
        features: features
            .into_iter()
            .map(|f| Feature {
                type_: "Feature",
                id: f.station_id,
                geometry: PointGeometry {
                    type_: "Point",
                    coordinates: [f.location.lon, f.location.lat],
                },
                properties: FeatureProperties {
                    timeseries_id: f.series_id,
                    parameter_id: f.parameter_id,
                },
            })
            .collect(),
    }
}
