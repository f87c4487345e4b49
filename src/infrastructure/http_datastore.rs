// Datastore client speaking JSON to the datastore gateway
use crate::application::datastore::{Datastore, LookupRequest, ObservationRequest};
use crate::domain::geometry::LatLon;
use crate::domain::series::{Observation, ObservationStream, SeriesDescriptor};
use crate::infrastructure::config::DatastoreSettings;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct HttpDatastore {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
struct WirePoint {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FindTimeSeriesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    station_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameter_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inside_polygon: Option<Vec<WirePoint>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FindTimeSeriesResponse {
    #[serde(default)]
    time_series: Vec<WireTimeSeries>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTimeSeries {
    id: i64,
    station_id: String,
    parameter_id: String,
    #[serde(default)]
    unit: Option<String>,
    position: WirePoint,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetObservationsRequest {
    series_ids: Vec<i64>,
    from_time: DateTime<Utc>,
    to_time: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetObservationsResponse {
    #[serde(default)]
    series_observations: Vec<WireSeriesObservations>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSeriesObservations {
    series_id: i64,
    #[serde(default)]
    observations: Vec<WireObservation>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireObservation {
    time: DateTime<Utc>,
    value: Option<f64>,
}

impl HttpDatastore {
    pub fn new(settings: &DatastoreSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .context("Failed to build datastore HTTP client")?;

        Ok(Self {
            base_url: settings.base_url().trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn post<Req: Serialize, Resp: DeserializeOwned>(&self, path: &str, body: &Req) -> Result<Resp> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send request to datastore at {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Datastore request to {} failed with status {}: {}", path, status, body);
        }

        response
            .json::<Resp>()
            .await
            .with_context(|| format!("Failed to parse datastore response from {}", path))
    }
}

#[async_trait]
impl Datastore for HttpDatastore {
    async fn find_time_series(&self, request: &LookupRequest) -> Result<Vec<SeriesDescriptor>> {
        let body = FindTimeSeriesRequest {
            station_ids: request.station_ids.clone(),
            parameter_ids: request.parameter_ids.clone(),
            inside_polygon: request.inside.as_ref().map(|ring| {
                ring.vertices()
                    .iter()
                    .map(|v| WirePoint { lat: v.lat, lon: v.lon })
                    .collect()
            }),
        };

        let response: FindTimeSeriesResponse = self.post("/v1/timeseries/find", &body).await?;

        Ok(response
            .time_series
            .into_iter()
            .map(|ts| SeriesDescriptor {
                id: ts.id,
                station_id: ts.station_id,
                parameter_id: ts.parameter_id,
                unit: ts.unit,
                location: LatLon::new(ts.position.lat, ts.position.lon),
            })
            .collect())
    }

    async fn get_observations(&self, request: &ObservationRequest) -> Result<Vec<ObservationStream>> {
        let body = GetObservationsRequest {
            series_ids: request.series_ids.clone(),
            from_time: request.window.from,
            to_time: request.window.to,
        };

        let response: GetObservationsResponse = self.post("/v1/observations/get", &body).await?;

        Ok(response
            .series_observations
            .into_iter()
            .map(|series| {
                ObservationStream::new(
                    series.series_id,
                    series
                        .observations
                        .into_iter()
                        .map(|obs| Observation::new(obs.time, obs.value))
                        .collect(),
                )
            })
            .collect())
    }
}
