//! Dashboard variant switches. One projector, configured per deployment.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::projector::map::MapScopePolicy;

pub const DEFAULT_COLOR_SCALE: &str = "RdYlGn";
pub const DEFAULT_COLORBAR_TITLE: &str = "Covid cases in the last 7 days per 100000";

/// Colour-scale range for the choropleth metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for MetricBounds {
    fn default() -> Self {
        MetricBounds {
            min: 0.0,
            max: 600.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectorConfigError {
    #[error("metric bounds must be finite with min < max, got ({min}, {max})")]
    InvalidBounds { min: f64, max: f64 },
    #[error("color_scale must not be empty")]
    EmptyColorScale,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectorConfig {
    pub map_scope: MapScopePolicy,
    pub show_advisories: bool,
    pub show_vaccinations: bool,
    pub color_scale: String,
    /// Low values green, high values red with RdYlGn.
    pub reverse_scale: bool,
    pub metric_bounds: MetricBounds,
    pub colorbar_title: String,
    /// Build the independent outputs of one projection on the rayon pool.
    pub parallel: bool,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self::travel_buddy()
    }
}

impl ProjectorConfig {
    /// Global map with advisory and vaccination panels.
    pub fn travel_buddy() -> Self {
        ProjectorConfig {
            map_scope: MapScopePolicy::World,
            show_advisories: true,
            show_vaccinations: true,
            color_scale: DEFAULT_COLOR_SCALE.to_string(),
            reverse_scale: true,
            metric_bounds: MetricBounds::default(),
            colorbar_title: DEFAULT_COLORBAR_TITLE.to_string(),
            parallel: false,
        }
    }

    /// Continent-scoped map driven by the region selector.
    pub fn regional() -> Self {
        ProjectorConfig {
            map_scope: MapScopePolicy::Region,
            ..Self::travel_buddy()
        }
    }

    pub fn validate(&self) -> Result<(), ProjectorConfigError> {
        let MetricBounds { min, max } = self.metric_bounds;
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(ProjectorConfigError::InvalidBounds { min, max });
        }
        if self.color_scale.trim().is_empty() {
            return Err(ProjectorConfigError::EmptyColorScale);
        }
        Ok(())
    }
}
