//! Choropleth configuration handed to the renderer.

use serde::{Deserialize, Serialize};

use crate::data::DatasetStore;
use crate::projector::config::{MetricBounds, ProjectorConfig};
use crate::projector::selection::Region;

/// Whether the region selector moves the map viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapScopePolicy {
    /// The map always shows the whole world.
    #[default]
    World,
    /// The map is scoped to the selected continent.
    Region,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapConfig {
    pub locations: Vec<String>,
    /// Parallel to `locations`; `None` for countries without a reported value.
    pub values: Vec<Option<f64>>,
    pub location_mode: &'static str,
    pub scope: Region,
    pub color_scale: String,
    pub reverse_scale: bool,
    pub bounds: MetricBounds,
    pub colorbar_title: String,
}

impl MapScopePolicy {
    pub fn scope_for(&self, selected: Region) -> Region {
        match self {
            Self::World => Region::World,
            Self::Region => selected,
        }
    }
}

/// Recent cases per 100k for every summary row, in file order.
pub fn build_map(store: &DatasetStore, config: &ProjectorConfig, selected: Region) -> MapConfig {
    let rows = store.summary_rows();
    let mut locations = Vec::with_capacity(rows.len());
    let mut values = Vec::with_capacity(rows.len());
    for row in rows {
        locations.push(row.name.clone());
        values.push(row.recent_cases_per_100k);
    }

    MapConfig {
        locations,
        values,
        location_mode: "country names",
        scope: config.map_scope.scope_for(selected),
        color_scale: config.color_scale.clone(),
        reverse_scale: config.reverse_scale,
        bounds: config.metric_bounds,
        colorbar_title: config.colorbar_title.clone(),
    }
}
