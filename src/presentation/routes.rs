// HTTP routes
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    collection_metadata, get_area, get_location_data, get_locations, get_position, health_check,
    landing_page, list_collections,
};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/", get(landing_page))
        .route("/collections", get(list_collections))
        .route("/collections/observations", get(collection_metadata))
        .route("/collections/observations/locations", get(get_locations))
        .route(
            "/collections/observations/locations/:location_id",
            get(get_location_data),
        )
        .route("/collections/observations/position", get(get_position))
        .route("/collections/observations/area", get(get_area))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::assembler::CoverageAssembler;
    use crate::application::fetcher::TimeSeriesFetcher;
    use crate::application::location_service::LocationService;
    use crate::application::observation_service::ObservationService;
    use crate::application::testing::{descriptor, stream, MockDatastore};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_app(store: MockDatastore) -> (Arc<MockDatastore>, Router) {
        let store = Arc::new(store);
        let fetcher = TimeSeriesFetcher::new(store.clone(), Duration::from_secs(1));
        let state = Arc::new(AppState {
            observation_service: ObservationService::new(
                fetcher.clone(),
                CoverageAssembler::default(),
                0.0001,
            ),
            location_service: LocationService::new(fetcher),
            default_window_hours: 24,
        });
        (store, router(state))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn area_uri(wkt: &str, params: &str) -> String {
        format!(
            "/collections/observations/area?coords={}&parameter-name={}&datetime={}",
            urlencoding::encode(wkt),
            urlencoding::encode(params),
            urlencoding::encode("2023-01-01T00:00:00Z/2023-01-02T00:00:00Z"),
        )
    }

    #[tokio::test]
    async fn test_health_check() {
        let (_, app) = test_app(MockDatastore::default());
        let response = app
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_area_single_coverage() {
        let (store, app) = test_app(MockDatastore::new(
            vec![
                descriptor(1, "06260", "tn", 52.0, 5.0),
                descriptor(2, "06260", "rh", 52.0, 5.0),
            ],
            vec![stream(1, &[1.0, 2.0, 3.0]), stream(2, &[90.0, 91.0, 92.0])],
        ));

        let (status, body) = get_json(
            app,
            &area_uri("POLYGON((4.0 51.0, 7.0 51.0, 7.0 54.0, 4.0 54.0, 4.0 51.0))", "tn, rh"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "Coverage");
        assert_eq!(body["ranges"]["tn"]["shape"], serde_json::json!([3, 1, 1]));
        assert_eq!(body["ranges"]["rh"]["values"].as_array().unwrap().len(), 3);

        let lookups = store.lookups.lock().unwrap();
        assert_eq!(
            lookups[0].parameter_ids,
            Some(vec!["rh".to_string(), "tn".to_string()])
        );
        let first = lookups[0].inside.as_ref().unwrap().vertices()[0];
        assert_eq!((first.lat, first.lon), (51.0, 4.0));
    }

    #[tokio::test]
    async fn test_area_collection() {
        let (_, app) = test_app(MockDatastore::new(
            vec![
                descriptor(1, "06280", "tn", 53.0, 6.0),
                descriptor(2, "06260", "tn", 52.0, 5.0),
            ],
            vec![stream(1, &[1.0]), stream(2, &[2.0])],
        ));

        let (status, body) = get_json(
            app,
            &area_uri("POLYGON((4.0 51.0, 7.0 51.0, 7.0 54.0, 4.0 54.0, 4.0 51.0))", "tn"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "CoverageCollection");
        assert_eq!(body["coverages"][0]["domain"]["axes"]["y"]["values"][0], 52.0);
        assert_eq!(body["coverages"][1]["domain"]["axes"]["y"]["values"][0], 53.0);
    }

    #[tokio::test]
    async fn test_area_rejects_point() {
        let (store, app) = test_app(MockDatastore::default());

        let (status, body) = get_json(app, &area_uri("POINT(5.0 52.0)", "tn")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);
        assert_eq!(store.lookup_count(), 0);
    }

    #[tokio::test]
    async fn test_position_empty_result() {
        let (_, app) = test_app(MockDatastore::default());
        let uri = format!(
            "/collections/observations/position?coords={}&parameter-name=tn",
            urlencoding::encode("POINT(5.179705 52.0988218)")
        );

        let (status, body) = get_json(app, &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "CoverageCollection");
        assert_eq!(body["coverages"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_partial_response_is_bad_gateway() {
        let (_, app) = test_app(MockDatastore::new(
            vec![
                descriptor(1, "06260", "tn", 52.0, 5.0),
                descriptor(2, "06260", "rh", 52.0, 5.0),
            ],
            vec![stream(1, &[1.0])],
        ));

        let (status, body) = get_json(app, "/collections/observations/locations/06260").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["detail"].as_str().unwrap().contains("2 requested"));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_service_unavailable() {
        let (_, app) = test_app(MockDatastore {
            fail: true,
            ..Default::default()
        });

        let (status, _) = get_json(app, "/collections/observations/locations?bbox=5.0,52.0,6.0,52.1").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_locations() {
        let (store, app) = test_app(MockDatastore::new(
            vec![
                descriptor(1, "06260", "tn", 52.1, 5.18),
                descriptor(2, "06348", "tn", 51.97, 4.93),
            ],
            vec![],
        ));

        let (status, body) = get_json(
            app,
            "/collections/observations/locations?bbox=4.0,51.0,6.0,52.5&parameter-name=tn",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "FeatureCollection");
        assert_eq!(body["features"][0]["id"], "06260");
        assert_eq!(body["features"][1]["geometry"]["coordinates"], serde_json::json!([4.93, 51.97]));
        assert_eq!(store.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_locations_requires_bbox() {
        let (_, app) = test_app(MockDatastore::default());

        let (status, body) = get_json(app, "/collections/observations/locations").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("bbox"));
    }

    #[tokio::test]
    async fn test_brotli_when_accepted() {
        let (_, app) = test_app(MockDatastore::default());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/collections")
                    .header(header::ACCEPT_ENCODING, "br")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_ENCODING], "br");
    }
}
