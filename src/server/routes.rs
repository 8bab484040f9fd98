use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tracing::debug;

use crate::data::JoinKeyReport;
use crate::projector::{MapConfig, ProjectionResult};
use crate::server::api::{self, ApiError, CountriesResponse, HealthResponse, MapQuery, ProjectionQuery};
use crate::server::{page, static_files, AppState};

type SharedState = State<Arc<AppState>>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
        (status, Json(self.body())).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/countries", get(countries))
        .route("/map", get(map))
        .route("/projection", get(projection))
        .route("/validate", get(validate))
        .fallback(not_found);

    let app = Router::new().route("/", get(index)).nest("/api", api);
    let app = match static_files::static_service() {
        Some(service) => app.fallback_service(service),
        None => app.fallback(not_found),
    };
    app.with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(page::INDEX_HTML)
}

async fn health() -> Json<HealthResponse> {
    Json(api::health_payload())
}

async fn countries(State(state): SharedState) -> Json<CountriesResponse> {
    Json(api::countries_payload(&state))
}

async fn map(
    State(state): SharedState,
    Query(query): Query<MapQuery>,
) -> Result<Json<MapConfig>, ApiError> {
    api::map_payload(&state, &query).map(Json)
}

async fn projection(
    State(state): SharedState,
    Query(query): Query<ProjectionQuery>,
) -> Result<Json<ProjectionResult>, ApiError> {
    debug!(country = ?query.country, region = ?query.region, "projection requested");
    api::projection_payload(&state, &query).map(Json)
}

async fn validate(State(state): SharedState) -> Json<JoinKeyReport> {
    Json(api::validate_payload(&state))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(api::ErrorResponse {
            status: "error",
            message: "Route not found".to_string(),
        }),
    )
}
