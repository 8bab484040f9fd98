//! Selection-driven projector: (store, config, selection) -> chart data, advisory text
//! and choropleth configuration. Holds no state; every call builds fresh outputs.

pub mod chart;
pub mod config;
pub mod map;
pub mod selection;

use serde::Serialize;
use tracing::debug;

use crate::data::DatasetStore;

pub use chart::{ChartDataset, ChartPanel, ChartPoint};
pub use config::{MetricBounds, ProjectorConfig, ProjectorConfigError};
pub use map::{MapConfig, MapScopePolicy};
pub use selection::{Region, Selection, DEFAULT_COUNTRY};

use chart::{
    build_panel, CUMULATIVE_CASES, CUMULATIVE_DEATHS, DAILY_VACCINATIONS, NEW_CASES, NEW_DEATHS,
    TOTAL_VACCINATIONS,
};
use map::build_map;

/// Everything the renderer needs for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionResult {
    pub selection: Selection,
    pub case_death_series: ChartPanel,
    pub cumulative_series: ChartPanel,
    /// `None` when the vaccination panel is switched off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vaccination_series: Option<ChartPanel>,
    /// `None` when the advisory panel is switched off, empty when nothing matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory_text: Option<String>,
    pub map_scope: Region,
    pub map: MapConfig,
}

impl ProjectionResult {
    /// No panel found anything for the selected country.
    pub fn is_empty(&self) -> bool {
        self.case_death_series.is_empty()
            && self.cumulative_series.is_empty()
            && self.vaccination_series.as_ref().map_or(true, ChartPanel::is_empty)
            && self.advisory_text.as_deref().map_or(true, str::is_empty)
    }
}

pub fn case_death_panel(store: &DatasetStore, country: &str) -> ChartPanel {
    build_panel(
        format!("New Covid Cases and Deaths in {country}"),
        store.series_for(country),
        &[&NEW_CASES, &NEW_DEATHS],
    )
}

pub fn cumulative_panel(store: &DatasetStore, country: &str) -> ChartPanel {
    build_panel(
        format!("Cumulative Covid Cases and Deaths in {country}"),
        store.series_for(country),
        &[&CUMULATIVE_CASES, &CUMULATIVE_DEATHS],
    )
}

pub fn vaccination_panel(store: &DatasetStore, country: &str) -> ChartPanel {
    build_panel(
        format!("Vaccinations in {country}"),
        store.vaccinations_for(country),
        &[&TOTAL_VACCINATIONS, &DAILY_VACCINATIONS],
    )
}

/// `info` of the first advisory row for `country`, or an empty string.
pub fn advisory_text(store: &DatasetStore, country: &str) -> String {
    store
        .advisory_for(country)
        .map(|record| record.info.clone())
        .unwrap_or_default()
}

/// Sequential projection. Unknown countries yield empty panels, never an error.
pub fn project(
    store: &DatasetStore,
    config: &ProjectorConfig,
    selection: &Selection,
) -> ProjectionResult {
    let country = selection.country.as_str();
    let result = ProjectionResult {
        selection: selection.clone(),
        case_death_series: case_death_panel(store, country),
        cumulative_series: cumulative_panel(store, country),
        vaccination_series: config
            .show_vaccinations
            .then(|| vaccination_panel(store, country)),
        advisory_text: config.show_advisories.then(|| advisory_text(store, country)),
        map_scope: selection.region,
        map: build_map(store, config, selection.region),
    };
    trace_result(&result);
    result
}

/// Same output as [`project`], with the independent parts built on the rayon pool.
/// The result is assembled before it is returned.
pub fn project_parallel(
    store: &DatasetStore,
    config: &ProjectorConfig,
    selection: &Selection,
) -> ProjectionResult {
    let country = selection.country.as_str();
    let ((case_death_series, cumulative_series), ((vaccination_series, advisory_text), map)) =
        rayon::join(
            || {
                rayon::join(
                    || case_death_panel(store, country),
                    || cumulative_panel(store, country),
                )
            },
            || {
                rayon::join(
                    || {
                        rayon::join(
                            || {
                                config
                                    .show_vaccinations
                                    .then(|| vaccination_panel(store, country))
                            },
                            || config.show_advisories.then(|| advisory_text(store, country)),
                        )
                    },
                    || build_map(store, config, selection.region),
                )
            },
        );

    let result = ProjectionResult {
        selection: selection.clone(),
        case_death_series,
        cumulative_series,
        vaccination_series,
        advisory_text,
        map_scope: selection.region,
        map,
    };
    trace_result(&result);
    result
}

/// Runs [`project`] or [`project_parallel`] as `config.parallel` asks.
pub fn recompute(
    store: &DatasetStore,
    config: &ProjectorConfig,
    selection: &Selection,
) -> ProjectionResult {
    if config.parallel {
        project_parallel(store, config, selection)
    } else {
        project(store, config, selection)
    }
}

fn trace_result(result: &ProjectionResult) {
    debug!(
        country = %result.selection.country,
        region = %result.selection.region,
        points = result
            .case_death_series
            .datasets
            .first()
            .map_or(0, |dataset| dataset.points.len()),
        empty = result.is_empty(),
        "projection built"
    );
}
