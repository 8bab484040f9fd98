//! Row types for the four dashboard tables. One struct per table; metric cells
//! are optional because the public exports leave blanks for unreported days.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Summary table (WHO global "at a glance" export). Drives the choropleth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    /// Join key shared with every other table.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub who_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso_code: Option<String>,
    /// Cases newly reported in the last 7 days per 100000 population.
    pub recent_cases_per_100k: Option<f64>,
    pub cumulative_cases: Option<f64>,
}

/// One day of the WHO case/death series for a country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseDeathRow {
    pub date: NaiveDate,
    pub country: String,
    pub new_cases: Option<f64>,
    pub new_deaths: Option<f64>,
    pub cumulative_cases: Option<f64>,
    pub cumulative_deaths: Option<f64>,
}

/// One day of the vaccination series. Keyed by `location`, not `Country`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaccinationRow {
    pub date: NaiveDate,
    pub location: String,
    pub total_vaccinations: Option<f64>,
    pub daily_vaccinations: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryRecord {
    pub country: String,
    pub info: String,
}

/// Anything keyed by country and ordered by date within it.
pub trait DatedRow {
    fn join_key(&self) -> &str;
    fn date(&self) -> NaiveDate;
}

impl DatedRow for CaseDeathRow {
    fn join_key(&self) -> &str {
        &self.country
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl DatedRow for VaccinationRow {
    fn join_key(&self) -> &str {
        &self.location
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}
