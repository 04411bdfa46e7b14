use axum::{
    extract::{Json, Query, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use campus_locator::{
    mapper, router, Building, Campus, FloorPlanLookup, Point, ResolvedMatch, Route, RoomLookup,
    RoomCoordinate, Segment, Suggestions, ViewportGeometry,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub mod config;

pub use config::ServerConfig;

// Queries longer than this are rejected before classification
const MAX_QUERY_LEN: usize = 256;

/// Read-only state shared by every request
pub struct AppState {
    pub campus: Campus,
    pub floor_plan_root: PathBuf,
}

impl AppState {
    pub fn new(campus: Campus, floor_plan_root: PathBuf) -> Self {
        Self {
            campus,
            floor_plan_root,
        }
    }
}

pub type SharedState = Arc<AppState>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: &str, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message: message.into(),
        }),
    )
}

/// Mapper and router failures: geometry not ready yet, or unusable points
fn geometry_error(err: campus_locator::Error) -> ApiError {
    match err {
        campus_locator::Error::MissingGeometry(reason) => {
            api_error(StatusCode::UNPROCESSABLE_ENTITY, "MISSING_GEOMETRY", reason)
        }
        campus_locator::Error::InvalidPoint(reason) => {
            api_error(StatusCode::BAD_REQUEST, "INVALID_POINT", reason)
        }
        other => api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "GEOMETRY_FAILED",
            other.to_string(),
        ),
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    buildings: usize,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

impl SearchParams {
    fn validated(&self) -> Result<&str, ApiError> {
        if self.q.len() > MAX_QUERY_LEN {
            warn!("Query rejected: too long ({} > {})", self.q.len(), MAX_QUERY_LEN);
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                "QUERY_TOO_LONG",
                format!(
                    "Query too long. Maximum allowed: {}. Received: {}",
                    MAX_QUERY_LEN,
                    self.q.len()
                ),
            ));
        }
        Ok(&self.q)
    }
}

#[derive(Debug, Serialize)]
struct BuildingsResponse {
    buildings: Vec<Building>,
    total: usize,
}

#[derive(Debug, Deserialize)]
struct PixelRequest {
    normalized: RoomCoordinate,
    viewport: ViewportGeometry,
}

#[derive(Debug, Deserialize)]
struct RouteRequest {
    building: String,
    level: String,
    room: String,
    start: Point,
    viewport: ViewportGeometry,
}

#[derive(Debug, Serialize)]
struct RouteResponse {
    /// Room number as stored in the coordinate table
    room_number: String,
    target: Point,
    route: Route,
    segments: Vec<Segment>,
    length: f64,
}

async fn health_check(State(state): State<SharedState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        buildings: state.campus.directory().len(),
    })
}

async fn search_buildings_handler(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<BuildingsResponse>, ApiError> {
    let q = params.validated()?;
    let buildings = state.campus.resolver().search_buildings(q);

    Ok(Json(BuildingsResponse {
        total: buildings.len(),
        buildings,
    }))
}

async fn resolve_handler(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ResolvedMatch>, ApiError> {
    let q = params.validated()?;

    match state.campus.resolver().resolve(q) {
        Some(resolved) => {
            info!("Resolved {:?} to {}", q, resolved.label());
            Ok(Json(resolved))
        }
        None => Err(api_error(
            StatusCode::NOT_FOUND,
            "NO_MATCH",
            format!("No building or room matches {:?}", q.trim()),
        )),
    }
}

async fn suggest_handler(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Suggestions>, ApiError> {
    let q = params.validated()?;
    Ok(Json(state.campus.resolver().suggest(q)))
}

async fn pixel_handler(Json(request): Json<PixelRequest>) -> Result<Json<Point>, ApiError> {
    mapper::to_pixel(request.normalized, &request.viewport)
        .map(Json)
        .map_err(geometry_error)
}

async fn route_handler(
    State(state): State<SharedState>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<RouteResponse>, ApiError> {
    info!(
        "Route request to {} {} on level {}",
        request.building, request.room, request.level
    );

    let located = state
        .campus
        .rooms()
        .locate(&request.building, &request.level, &request.room)
        .ok_or_else(|| {
            api_error(
                StatusCode::NOT_FOUND,
                "ROOM_NOT_FOUND",
                format!(
                    "Room {} {} is not available in the floor plan data",
                    request.building, request.room
                ),
            )
        })?;

    let mut viewport = request.viewport;
    if viewport.image_size().is_none() {
        let probed = probe_image_size(&state, &request.building, &request.level).await?;
        if let Some((width, height)) = probed {
            viewport = viewport.with_image(f64::from(width), f64::from(height));
        }
    }

    let target = mapper::to_pixel(located.coordinate, &viewport).map_err(geometry_error)?;
    let route = router::route(request.start, target, &viewport).map_err(geometry_error)?;

    Ok(Json(RouteResponse {
        room_number: located.number,
        target,
        segments: route.segments(),
        length: route.length(),
        route,
    }))
}

/// Intrinsic size of the registered floor-plan image, read off the request thread
async fn probe_image_size(
    state: &SharedState,
    building: &str,
    level: &str,
) -> Result<Option<(u32, u32)>, ApiError> {
    let Some(image) = state.campus.floor_plans().floor_plan(building, level).cloned() else {
        return Ok(None);
    };
    let root = state.floor_plan_root.clone();

    tokio::task::spawn_blocking(move || image.intrinsic_size(&root))
        .await
        .map_err(|e| {
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "IMAGE_PROBE_FAILED",
                format!("Failed to read floor plan size: {}", e),
            )
        })
}

/// Create the Axum app with all routes and middleware
pub fn create_app(state: SharedState, config: &ServerConfig) -> Router {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
    };

    Router::new()
        .route("/health", get(health_check))
        .route("/buildings", get(search_buildings_handler))
        .route("/resolve", get(resolve_handler))
        .route("/suggest", get(suggest_handler))
        .route("/pixel", post(pixel_handler))
        .route("/route", post(route_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
