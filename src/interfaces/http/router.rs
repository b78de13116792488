//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::ApiResponse;
use super::modules::health::{self, HealthState};
use super::modules::lines::{self, LineState};
use super::modules::metrics::{self as http_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::stations::{self, StationState};
use crate::application::{LineService, StationService};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        stations::create_station,
        stations::list_stations,
        stations::get_station,
        stations::delete_station,
        lines::create_line,
        lines::list_lines,
        lines::get_line,
        lines::update_line,
        lines::delete_line,
        lines::add_section,
        lines::delete_section,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            health::ComponentHealth,
            stations::StationResponse,
            stations::CreateStationRequest,
            lines::LineResponse,
            lines::CreateLineRequest,
            lines::UpdateLineRequest,
            lines::AddSectionRequest,
        )
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Stations", description = "Station registry"),
        (name = "Lines", description = "Subway lines"),
        (name = "Sections", description = "Appending and removing sections at a line's down terminus"),
    ),
    info(
        title = "Subway Service API",
        version = "0.1.0",
        description = "REST API for managing subway lines, their sections and stations"
    )
)]
pub struct ApiDoc;

/// Everything the router needs from the running server.
pub struct RouterDeps {
    pub lines: Arc<LineService>,
    pub stations: Arc<StationService>,
    /// Database to ping on `/health`; `None` for in-memory storage
    pub db: Option<DatabaseConnection>,
    pub prometheus: PrometheusHandle,
}

/// Create the API router with all routes
pub fn create_api_router(deps: RouterDeps) -> Router {
    let station_routes = Router::new()
        .route(
            "/",
            post(stations::create_station).get(stations::list_stations),
        )
        .route(
            "/{id}",
            get(stations::get_station).delete(stations::delete_station),
        )
        .with_state(StationState {
            service: deps.stations,
        });

    let line_routes = Router::new()
        .route("/", post(lines::create_line).get(lines::list_lines))
        .route(
            "/{id}",
            get(lines::get_line)
                .put(lines::update_line)
                .delete(lines::delete_line),
        )
        .route(
            "/{id}/sections",
            post(lines::add_section).delete(lines::delete_section),
        )
        .with_state(LineState {
            service: deps.lines,
        });

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(HealthState {
            db: deps.db,
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(http_metrics::prometheus_metrics))
        .with_state(MetricsState {
            handle: deps.prometheus,
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .nest("/api/v1/stations", station_routes)
        .nest("/api/v1/lines", line_routes)
        .merge(health_routes)
        // MatchedPath is only known once a route matched
        .route_layer(middleware::from_fn(http_metrics::http_metrics_middleware))
        .merge(metrics_routes)
        .merge(swagger_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::application::StationGuard;
    use crate::infrastructure::InMemoryRepositoryProvider;

    fn app() -> Router {
        let repos: Arc<InMemoryRepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
        let guard = StationGuard::new();
        create_api_router(RouterDeps {
            lines: Arc::new(LineService::new(repos.clone(), guard.clone())),
            stations: Arc::new(StationService::new(repos, guard)),
            db: None,
            prometheus: PrometheusBuilder::new().build_recorder().handle(),
        })
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn station(app: &Router, name: &str) -> i64 {
        let (status, body) = send(app, "POST", "/api/v1/stations", Some(json!({"name": name}))).await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["id"].as_i64().unwrap()
    }

    async fn line(app: &Router, up: i64, down: i64, distance: i32) -> i64 {
        let (status, body) = send(
            app,
            "POST",
            "/api/v1/lines",
            Some(json!({
                "name": "Shinbundang",
                "color": "bg-red-600",
                "up_station_id": up,
                "down_station_id": down,
                "distance": distance
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["id"].as_i64().unwrap()
    }

    fn station_names(body: &Value) -> Vec<String> {
        body["data"]["stations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn health_reports_memory_storage() {
        let app = app();
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["storage"]["kind"], "memory");
    }

    #[tokio::test]
    async fn create_line_sets_location_and_request_id() {
        let app = app();
        let a = station(&app, "Gangnam").await;
        let b = station(&app, "Yangjae").await;

        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/lines")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-request-id", "req-42")
            .body(Body::from(
                json!({
                    "name": "Shinbundang",
                    "color": "bg-red-600",
                    "up_station_id": a,
                    "down_station_id": b,
                    "distance": 10
                })
                .to_string(),
            ))
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::CREATED);
        let location = resp.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("/api/v1/lines/"));
        assert_eq!(resp.headers()["x-request-id"], "req-42");
    }

    #[tokio::test]
    async fn section_lifecycle_over_http() {
        let app = app();
        let a = station(&app, "Gangnam").await;
        let b = station(&app, "Yangjae").await;
        let c = station(&app, "Pangyo").await;
        let d = station(&app, "Jeongja").await;
        let id = line(&app, a, b, 10).await;
        let sections = format!("/api/v1/lines/{}/sections", id);

        let (status, body) = send(
            &app,
            "POST",
            &sections,
            Some(json!({"up_station_id": b, "down_station_id": c, "distance": 7})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["distance"], 17);
        assert_eq!(station_names(&body), vec!["Gangnam", "Yangjae", "Pangyo"]);

        // does not continue from the down terminus
        let (status, body) = send(
            &app,
            "POST",
            &sections,
            Some(json!({"up_station_id": a, "down_station_id": d, "distance": 3})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let (status, _) = send(&app, "DELETE", &format!("{}?station_id={}", sections, c), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, "DELETE", &format!("{}?station_id={}", sections, b), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, "GET", &format!("/api/v1/lines/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["distance"], 10);
        assert_eq!(body["data"]["down_station"]["name"], "Yangjae");
    }

    #[tokio::test]
    async fn update_and_delete_line() {
        let app = app();
        let a = station(&app, "Gangnam").await;
        let b = station(&app, "Yangjae").await;
        let id = line(&app, a, b, 10).await;
        let uri = format!("/api/v1/lines/{}", id);

        let (status, body) = send(&app, "PUT", &uri, Some(json!({"color": "bg-blue-600"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["color"], "bg-blue-600");
        assert_eq!(body["data"]["name"], "Shinbundang");

        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);

        let (status, body) = send(&app, "GET", "/api/v1/lines", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn error_statuses_per_kind() {
        let app = app();
        let a = station(&app, "Gangnam").await;

        // unknown station
        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/lines",
            Some(json!({
                "name": "L", "color": "red",
                "up_station_id": a, "down_station_id": 999, "distance": 5
            })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // field rule
        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/lines",
            Some(json!({
                "name": "L", "color": "red",
                "up_station_id": a, "down_station_id": 2, "distance": 0
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        // distance above the per-section bound
        let b = station(&app, "Yangjae").await;
        let id = line(&app, a, b, 10).await;
        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/v1/lines/{}/sections", id),
            Some(json!({"up_station_id": b, "down_station_id": a + 100, "distance": i32::MAX})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().starts_with("distance:"));

        // duplicate station name
        let (status, _) = send(&app, "POST", "/api/v1/stations", Some(json!({"name": "Gangnam"}))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        // missing query parameter
        let (status, _) = send(&app, "DELETE", "/api/v1/lines/1/sections", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn referenced_station_cannot_be_deleted() {
        let app = app();
        let a = station(&app, "Gangnam").await;
        let b = station(&app, "Yangjae").await;
        let c = station(&app, "Pangyo").await;
        line(&app, a, b, 10).await;

        let (status, _) = send(&app, "DELETE", &format!("/api/v1/stations/{}", a), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(&app, "DELETE", &format!("/api/v1/stations/{}", c), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, "GET", "/api/v1/stations", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = app();
        let (status, body) = send(&app, "GET", "/api-doc/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/v1/lines/{id}/sections"].is_object());
    }
}
