//! Startup-loaded dataset store.
//! Load once, then share read-only (by reference or `Arc`) with the projector, the
//! dispatcher and every HTTP handler. Nothing in here mutates after construction.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::data::loader::{
    load_advisories, load_case_deaths, load_summary, load_vaccinations, DataSources, LoadError,
};
use crate::data::records::{AdvisoryRecord, CaseDeathRow, CountryRecord, DatedRow, VaccinationRow};

/// How a typed country name is compared with the join keys of the tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// Verbatim, case-sensitive comparison. "japan" does not find "Japan".
    #[default]
    Exact,
    /// Trim surrounding whitespace and lowercase both sides before comparing.
    Normalized,
}

impl MatchPolicy {
    pub fn key<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        match self {
            Self::Exact => Cow::Borrowed(raw),
            Self::Normalized => Cow::Owned(raw.trim().to_lowercase()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Normalized => "normalized",
        }
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "normalized" | "normalised" => Ok(Self::Normalized),
            other => Err(format!("unknown match policy '{other}' (expected exact|normalized)")),
        }
    }
}

/// Join-key consistency across tables, measured against the case/death table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JoinKeyReport {
    pub policy: MatchPolicy,
    pub case_countries: usize,
    pub missing_from_summary: Vec<String>,
    pub missing_from_vaccinations: Vec<String>,
    pub missing_from_advisories: Vec<String>,
    /// Countries with more than one advisory row; the first row is served.
    pub duplicate_advisories: Vec<String>,
}

impl JoinKeyReport {
    pub fn is_clean(&self) -> bool {
        self.missing_from_summary.is_empty()
            && self.missing_from_vaccinations.is_empty()
            && self.missing_from_advisories.is_empty()
            && self.duplicate_advisories.is_empty()
    }
}

/// Read-only, country-indexed view of the four dashboard tables.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    policy: MatchPolicy,
    summary: Vec<CountryRecord>,
    /// Key -> first summary row with that key.
    summary_index: HashMap<String, usize>,
    /// Key -> rows sorted ascending by date.
    cases: HashMap<String, Vec<CaseDeathRow>>,
    vaccinations: HashMap<String, Vec<VaccinationRow>>,
    advisories: Vec<AdvisoryRecord>,
    /// Key -> position of every advisory row with that key, file order.
    advisory_index: HashMap<String, Vec<usize>>,
}

fn group_by_key<R: DatedRow>(rows: Vec<R>, policy: MatchPolicy) -> HashMap<String, Vec<R>> {
    let mut grouped: HashMap<String, Vec<R>> = HashMap::new();
    for row in rows {
        let key = policy.key(row.join_key()).into_owned();
        grouped.entry(key).or_default().push(row);
    }
    for series in grouped.values_mut() {
        // stable: rows reported for the same day keep file order
        series.sort_by_key(|row| row.date());
    }
    grouped
}

impl DatasetStore {
    /// Read every configured table. Any unreadable table or missing join column aborts.
    pub fn load(sources: &DataSources, policy: MatchPolicy) -> Result<Self, LoadError> {
        let summary = load_summary(&sources.summary)?;
        let cases = load_case_deaths(&sources.cases)?;
        let vaccinations = load_vaccinations(&sources.vaccinations)?;
        let advisories = load_advisories(&sources.advisories)?;

        info!(
            summary = summary.len(),
            cases = cases.len(),
            vaccinations = vaccinations.len(),
            advisories = advisories.len(),
            %policy,
            "datasets loaded"
        );

        let store = Self::from_tables(summary, cases, vaccinations, advisories, policy);
        let report = store.join_report();
        if !report.is_clean() {
            warn!(
                missing_from_summary = report.missing_from_summary.len(),
                missing_from_vaccinations = report.missing_from_vaccinations.len(),
                missing_from_advisories = report.missing_from_advisories.len(),
                duplicate_advisories = report.duplicate_advisories.len(),
                "join keys do not line up across tables; affected countries will show no data"
            );
        }
        Ok(store)
    }

    /// Build the indexes from rows already in memory.
    pub fn from_tables(
        summary: Vec<CountryRecord>,
        cases: Vec<CaseDeathRow>,
        vaccinations: Vec<VaccinationRow>,
        advisories: Vec<AdvisoryRecord>,
        policy: MatchPolicy,
    ) -> Self {
        let mut summary_index = HashMap::new();
        for (idx, record) in summary.iter().enumerate() {
            summary_index
                .entry(policy.key(&record.name).into_owned())
                .or_insert(idx);
        }

        let mut advisory_index: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, record) in advisories.iter().enumerate() {
            advisory_index
                .entry(policy.key(&record.country).into_owned())
                .or_default()
                .push(idx);
        }

        DatasetStore {
            policy,
            summary,
            summary_index,
            cases: group_by_key(cases, policy),
            vaccinations: group_by_key(vaccinations, policy),
            advisories,
            advisory_index,
        }
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Case/death rows for `country`, ascending by date. Empty when unknown.
    pub fn series_for(&self, country: &str) -> &[CaseDeathRow] {
        self.cases
            .get(&*self.policy.key(country))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Vaccination rows joined on `location`, ascending by date. Empty when unknown.
    pub fn vaccinations_for(&self, country: &str) -> &[VaccinationRow] {
        self.vaccinations
            .get(&*self.policy.key(country))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First advisory row for `country` in file order.
    pub fn advisory_for(&self, country: &str) -> Option<&AdvisoryRecord> {
        let positions = self.advisory_index.get(&*self.policy.key(country))?;
        positions.first().map(|&idx| &self.advisories[idx])
    }

    pub fn summary_row(&self, country: &str) -> Option<&CountryRecord> {
        self.summary_index
            .get(&*self.policy.key(country))
            .map(|&idx| &self.summary[idx])
    }

    /// Every summary row in file order, for the choropleth.
    pub fn summary_rows(&self) -> &[CountryRecord] {
        &self.summary
    }

    /// Country names offered by the selector: case/death countries, sorted.
    pub fn countries(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .cases
            .values()
            .filter_map(|rows| rows.first())
            .map(|row| row.country.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn join_report(&self) -> JoinKeyReport {
        // BTreeMap keeps the report stable between runs
        let case_countries: BTreeMap<&str, &str> = self
            .cases
            .iter()
            .filter_map(|(key, rows)| rows.first().map(|row| (row.country.as_str(), key.as_str())))
            .collect();

        let missing = |present: &dyn Fn(&str) -> bool| -> Vec<String> {
            case_countries
                .iter()
                .filter(|&(_, key)| !present(key))
                .map(|(name, _)| name.to_string())
                .collect()
        };

        let mut duplicate_advisories: Vec<String> = self
            .advisory_index
            .values()
            .filter(|positions| positions.len() > 1)
            .map(|positions| self.advisories[positions[0]].country.clone())
            .collect();
        duplicate_advisories.sort();

        JoinKeyReport {
            policy: self.policy,
            case_countries: case_countries.len(),
            missing_from_summary: missing(&|key| self.summary_index.contains_key(key)),
            missing_from_vaccinations: missing(&|key| self.vaccinations.contains_key(key)),
            missing_from_advisories: missing(&|key| self.advisory_index.contains_key(key)),
            duplicate_advisories,
        }
    }
}
