//! Chart output types and the row -> point projection.

use chrono::NaiveDate;
use serde::Serialize;

use crate::data::records::{CaseDeathRow, DatedRow, VaccinationRow};

/// One plotted point. `y` is `None` where the source cell was blank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: NaiveDate,
    pub y: Option<f64>,
}

/// One line of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataset {
    pub label: String,
    pub color: String,
    pub points: Vec<ChartPoint>,
}

impl ChartDataset {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A titled chart with its lines in legend order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPanel {
    pub title: String,
    pub datasets: Vec<ChartDataset>,
}

impl ChartPanel {
    /// True when no line has any point, i.e. the country matched nothing.
    pub fn is_empty(&self) -> bool {
        self.datasets.iter().all(ChartDataset::is_empty)
    }
}

/// Which metric of a row becomes a line, and how it is labelled.
pub struct SeriesDef<R> {
    pub label: &'static str,
    pub color: &'static str,
    pub metric: fn(&R) -> Option<f64>,
}

pub const NEW_CASES: SeriesDef<CaseDeathRow> = SeriesDef {
    label: "New Cases",
    color: "salmon",
    metric: |row| row.new_cases,
};

pub const NEW_DEATHS: SeriesDef<CaseDeathRow> = SeriesDef {
    label: "New Deaths",
    color: "#ccccff",
    metric: |row| row.new_deaths,
};

pub const CUMULATIVE_CASES: SeriesDef<CaseDeathRow> = SeriesDef {
    label: "Cumulative Cases",
    color: "#8cf5b4",
    metric: |row| row.cumulative_cases,
};

pub const CUMULATIVE_DEATHS: SeriesDef<CaseDeathRow> = SeriesDef {
    label: "Cumulative Deaths",
    color: "#e2ff68",
    metric: |row| row.cumulative_deaths,
};

pub const TOTAL_VACCINATIONS: SeriesDef<VaccinationRow> = SeriesDef {
    label: "Total Vaccinations",
    color: "#8cf5b4",
    metric: |row| row.total_vaccinations,
};

pub const DAILY_VACCINATIONS: SeriesDef<VaccinationRow> = SeriesDef {
    label: "Daily Vaccinations",
    color: "#e2ff68",
    metric: |row| row.daily_vaccinations,
};

/// Single pass over `rows`, one point per row, order preserved.
pub fn build_dataset<R: DatedRow>(rows: &[R], def: &SeriesDef<R>) -> ChartDataset {
    ChartDataset {
        label: def.label.to_string(),
        color: def.color.to_string(),
        points: rows
            .iter()
            .map(|row| ChartPoint {
                x: row.date(),
                y: (def.metric)(row),
            })
            .collect(),
    }
}

pub fn build_panel<R: DatedRow>(
    title: String,
    rows: &[R],
    series: &[&SeriesDef<R>],
) -> ChartPanel {
    ChartPanel {
        title,
        datasets: series.iter().map(|def| build_dataset(rows, def)).collect(),
    }
}
