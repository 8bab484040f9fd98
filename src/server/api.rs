use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::JoinKeyReport;
use crate::projector::selection::UnknownRegion;
use crate::projector::{recompute, MapConfig, ProjectionResult, Region, Selection};
use crate::server::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CountriesResponse {
    pub default_country: String,
    pub regions: Vec<Region>,
    pub countries: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapQuery {
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectionQuery {
    pub country: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    InvalidRegion(#[from] UnknownRegion),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidRegion(_) => 400,
        }
    }

    pub fn body(&self) -> ErrorResponse {
        ErrorResponse {
            status: "error",
            message: self.to_string(),
        }
    }
}

pub fn health_payload() -> HealthResponse {
    HealthResponse {
        status: "ok",
        service: "travel-buddy",
        version: env!("CARGO_PKG_VERSION"),
    }
}

pub fn countries_payload(state: &AppState) -> CountriesResponse {
    CountriesResponse {
        default_country: state.initial_selection.country.clone(),
        regions: Region::ALL.to_vec(),
        countries: state.store.countries().into_iter().map(str::to_string).collect(),
    }
}

fn region_or(raw: Option<&str>, fallback: Region) -> Result<Region, ApiError> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        Some(raw) => Ok(raw.parse()?),
        None => Ok(fallback),
    }
}

/// The choropleth alone; `region` only matters under the region map-scope policy.
pub fn map_payload(state: &AppState, query: &MapQuery) -> Result<MapConfig, ApiError> {
    let region = region_or(query.region.as_deref(), state.initial_selection.region)?;
    Ok(crate::projector::map::build_map(
        &state.store,
        &state.projector,
        region,
    ))
}

/// Missing parameters fall back to the initial selection. The country text is passed
/// through untouched; an unknown country is an empty projection, not an error.
pub fn projection_payload(
    state: &AppState,
    query: &ProjectionQuery,
) -> Result<ProjectionResult, ApiError> {
    let region = region_or(query.region.as_deref(), state.initial_selection.region)?;
    let country = query
        .country
        .clone()
        .unwrap_or_else(|| state.initial_selection.country.clone());
    let selection = Selection::new(country, region);
    Ok(recompute(&state.store, &state.projector, &selection))
}

pub fn validate_payload(state: &AppState) -> JoinKeyReport {
    state.store.join_report()
}
