/*!
shroommap REST API Server

Keeps one map pipeline per process and exposes its filters and markers over
HTTP.

## Usage

```bash
shroommap-rest --host 127.0.0.1 --port 3335 --source builtin://mushrooms
```

## Endpoints

- `GET  /api/v1/health`  - Health check
- `GET  /api/v1/version` - Version information
- `GET  /api/v1/options` - Filter controls and their options
- `GET  /api/v1/markers` - Current markers as GeoJSON
- `POST /api/v1/select`  - Pick a filter value (`{"attribute": "color", "value": "0"}`)
- `POST /api/v1/reset`   - Clear a filter (`{"attribute": "spots"}`)
*/

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shroommap::{
    Attribute, FilterControl, FilterSelection, MapConfig, MarkerLayer, Orchestrator, RenderSummary,
    ShroomError, Source, Status, VERSION,
};

/// CLI arguments for the REST API server
#[derive(Parser)]
#[command(name = "shroommap-rest")]
#[command(about = "shroommap REST API Server")]
#[command(version = VERSION)]
struct Cli {
    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind to
    #[arg(long, default_value = "3335")]
    port: u16,

    /// CORS allowed origins (comma-separated)
    #[arg(long, default_value = "*")]
    cors_origin: String,

    /// Data source connection string
    #[arg(long, default_value = "builtin://mushrooms")]
    source: String,
}

/// Shared application state
///
/// The tokio mutex hands out the pipeline in request order, so one
/// refilter-and-render never interleaves with another.
#[derive(Clone)]
struct AppState {
    app: Arc<Mutex<Orchestrator<MarkerLayer>>>,
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for /api/v1/select
#[derive(Debug, Deserialize)]
struct SelectRequest {
    attribute: Attribute,
    /// Option value or tag name; empty clears the filter
    #[serde(default)]
    value: String,
}

/// Request body for /api/v1/reset
#[derive(Debug, Deserialize)]
struct ResetRequest {
    attribute: Attribute,
}

/// Successful API response
#[derive(Debug, Serialize)]
struct ApiSuccess<T> {
    status: String,
    data: T,
}

impl<T> ApiSuccess<T> {
    fn new(data: T) -> Self {
        Self {
            status: "success".to_string(),
            data,
        }
    }
}

/// Error API response
#[derive(Debug, Serialize)]
struct ApiError {
    status: String,
    error: ErrorDetails,
}

#[derive(Debug, Serialize)]
struct ErrorDetails {
    message: String,
    #[serde(rename = "type")]
    error_type: String,
}

/// Filter controls as shown to the user
#[derive(Debug, Serialize)]
struct OptionsResult {
    status: Status,
    controls: Vec<FilterControl>,
}

/// Current map contents
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MarkersResult {
    status: Status,
    selection: FilterSelection,
    visible: usize,
    total: usize,
    /// Records the surface refused to place in the last render
    skipped: usize,
    markers: serde_json::Value,
}

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    map: Status,
}

/// Version response
#[derive(Debug, Serialize)]
struct VersionResponse {
    version: String,
    features: Vec<String>,
}

// ============================================================================
// Error Handling
// ============================================================================

/// Custom error type for API responses
struct ApiErrorResponse {
    status: StatusCode,
    error: ApiError,
}

impl ApiErrorResponse {
    fn new(status: StatusCode, error_type: &str, message: String) -> Self {
        ApiErrorResponse {
            status,
            error: ApiError {
                status: "error".to_string(),
                error: ErrorDetails {
                    message,
                    error_type: error_type.to_string(),
                },
            },
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let json = Json(self.error);
        (self.status, json).into_response()
    }
}

impl From<ShroomError> for ApiErrorResponse {
    fn from(err: ShroomError) -> Self {
        let (status, error_type) = match &err {
            ShroomError::Fetch(_) => (StatusCode::BAD_GATEWAY, "FetchError"),
            ShroomError::Surface(_) => (StatusCode::INTERNAL_SERVER_ERROR, "SurfaceError"),
            ShroomError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ConfigError"),
            ShroomError::SourceError(_) => (StatusCode::BAD_REQUEST, "SourceError"),
            ShroomError::WriterError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "WriterError"),
        };
        ApiErrorResponse::new(status, error_type, err.to_string())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn markers_result(
    app: &Orchestrator<MarkerLayer>,
    summary: Option<&RenderSummary>,
) -> MarkersResult {
    MarkersResult {
        status: app.status(),
        selection: app.selection().clone(),
        visible: app.visible().len(),
        total: app.canonical().len(),
        skipped: summary.map_or(0, |s| s.skipped.len()),
        markers: app.surface().to_geojson(),
    }
}

fn filters_unavailable(status: Status) -> ApiErrorResponse {
    ApiErrorResponse::new(
        StatusCode::CONFLICT,
        "FiltersUnavailable",
        format!("Filters are not available while the map is {:?}", status),
    )
}

// ============================================================================
// Handler Functions
// ============================================================================

/// POST /api/v1/select - Pick a filter value
async fn select_handler(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<ApiSuccess<MarkersResult>>, ApiErrorResponse> {
    info!("Select {} = '{}'", request.attribute, request.value);
    let mut app = state.app.lock().await;
    let summary = app
        .select(request.attribute, &request.value)
        .ok_or_else(|| filters_unavailable(app.status()))?;
    Ok(Json(ApiSuccess::new(markers_result(&app, Some(&summary)))))
}

/// POST /api/v1/reset - Clear a filter
async fn reset_handler(
    State(state): State<AppState>,
    Json(request): Json<ResetRequest>,
) -> Result<Json<ApiSuccess<MarkersResult>>, ApiErrorResponse> {
    info!("Reset {}", request.attribute);
    let mut app = state.app.lock().await;
    let summary = app
        .reset(request.attribute)
        .ok_or_else(|| filters_unavailable(app.status()))?;
    Ok(Json(ApiSuccess::new(markers_result(&app, Some(&summary)))))
}

/// GET /api/v1/markers - Current markers
async fn markers_handler(State(state): State<AppState>) -> Json<ApiSuccess<MarkersResult>> {
    let app = state.app.lock().await;
    Json(ApiSuccess::new(markers_result(&app, None)))
}

/// GET /api/v1/options - Filter controls
async fn options_handler(State(state): State<AppState>) -> Json<ApiSuccess<OptionsResult>> {
    let app = state.app.lock().await;
    let controls = Attribute::ALL
        .iter()
        .map(|attribute| app.control(*attribute).clone())
        .collect();
    Json(ApiSuccess::new(OptionsResult {
        status: app.status(),
        controls,
    }))
}

/// GET /api/v1/health - Health check
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let app = state.app.lock().await;
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: VERSION.to_string(),
        map: app.status(),
    })
}

/// GET /api/v1/version - Version information
async fn version_handler() -> Json<VersionResponse> {
    let mut features = Vec::new();

    #[cfg(feature = "builtin-data")]
    features.push("builtin-data".to_string());

    #[cfg(feature = "http")]
    features.push("http".to_string());

    Json(VersionResponse {
        version: VERSION.to_string(),
        features,
    })
}

/// Root handler
async fn root_handler() -> &'static str {
    "shroommap REST API Server - See /api/v1/health for status"
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/version", get(version_handler))
        .route("/api/v1/options", get(options_handler))
        .route("/api/v1/markers", get(markers_handler))
        .route("/api/v1/select", post(select_handler))
        .route("/api/v1/reset", post(reset_handler))
        .with_state(state)
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shroommap=info,shroommap_rest=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = MapConfig::from_env()?;
    let source = Source::from_connection_string(&cli.source)?;
    let mut app = Orchestrator::boot(MarkerLayer::new(), &config)?;
    app.load(&source).await;
    info!("Map status: {:?}", app.status());

    let state = AppState {
        app: Arc::new(Mutex::new(app)),
    };

    // Configure CORS
    let cors = if cli.cors_origin == "*" {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(vec![header::CONTENT_TYPE])
    } else {
        let origins: Vec<_> = cli
            .cors_origin
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(vec![header::CONTENT_TYPE])
    };

    let app = router(state)
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;

    info!("Starting shroommap REST API server on {}", addr);
    info!("API documentation:");
    info!("  GET  /api/v1/options - Filter controls");
    info!("  GET  /api/v1/markers - Current markers (GeoJSON)");
    info!("  POST /api/v1/select  - Pick a filter value");
    info!("  POST /api/v1/reset   - Clear a filter");
    info!("  GET  /api/v1/health  - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
