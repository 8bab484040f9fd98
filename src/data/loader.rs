//! CSV loading for the four dashboard tables.
//! Columns are resolved by header name; the join key and date columns are mandatory,
//! metric columns degrade to blanks with a warning when a table does not carry them.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::data::records::{AdvisoryRecord, CaseDeathRow, CountryRecord, VaccinationRow};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const SUMMARY_FILE: &str = "WHOcovidglobal.csv";
pub const CASES_FILE: &str = "covidcases.csv";
pub const VACCINATIONS_FILE: &str = "vaccinations.csv";
pub const ADVISORIES_FILE: &str = "covid19TravelRestrictionsCountry.csv";

pub const SUMMARY_NAME: &str = "Name";
pub const SUMMARY_REGION: &str = "WHO Region";
pub const SUMMARY_ISO: &[&str] = &["ISO", "iso_code", "ISO_code"];
pub const SUMMARY_RECENT: &str = "Cases - newly reported in last 7 days per 100000 population";
pub const SUMMARY_CUMULATIVE: &str = "Cases - cumulative total";

pub const CASES_COUNTRY: &str = "Country";
pub const CASES_DATE: &str = "Date_reported";
pub const CASES_NEW: &str = "New_cases";
pub const DEATHS_NEW: &str = "New_deaths";
pub const CASES_CUMULATIVE: &str = "Cumulative_cases";
pub const DEATHS_CUMULATIVE: &str = "Cumulative_deaths";

pub const VACCINATIONS_LOCATION: &str = "location";
pub const VACCINATIONS_DATE: &str = "date";
pub const VACCINATIONS_TOTAL: &str = "total_vaccinations";
pub const VACCINATIONS_DAILY: &str = "daily_vaccinations";

pub const ADVISORIES_COUNTRY: &str = "Country";
pub const ADVISORIES_INFO: &str = "info";

/// Where each table lives on disk. All four are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSources {
    pub summary: PathBuf,
    pub cases: PathBuf,
    pub vaccinations: PathBuf,
    pub advisories: PathBuf,
}

impl Default for DataSources {
    fn default() -> Self {
        Self::in_dir(DEFAULT_DATA_DIR)
    }
}

impl DataSources {
    /// The conventional file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            summary: dir.join(SUMMARY_FILE),
            cases: dir.join(CASES_FILE),
            vaccinations: dir.join(VACCINATIONS_FILE),
            advisories: dir.join(ADVISORIES_FILE),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unable to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed csv in '{}': {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("'{}' has no '{column}' column", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error("'{}' line {line}: invalid {column} value '{value}'", .path.display())]
    InvalidRow {
        path: PathBuf,
        line: u64,
        column: &'static str,
        value: String,
    },
}

/// Header name -> column position for one open table.
struct Columns<'p> {
    path: &'p Path,
    by_name: HashMap<String, usize>,
}

impl<'p> Columns<'p> {
    fn from_headers(path: &'p Path, headers: &csv::StringRecord) -> Self {
        let by_name = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.trim_start_matches('\u{feff}').trim().to_string(), idx))
            .collect();
        Columns { path, by_name }
    }

    fn require(&self, column: &'static str) -> Result<usize, LoadError> {
        self.by_name
            .get(column)
            .copied()
            .ok_or_else(|| LoadError::MissingColumn {
                path: self.path.to_path_buf(),
                column,
            })
    }

    fn optional(&self, column: &str) -> Option<usize> {
        let found = self.by_name.get(column).copied();
        if found.is_none() {
            warn!(path = %self.path.display(), column, "column absent, values left blank");
        }
        found
    }

    fn any_of(&self, candidates: &[&str]) -> Option<usize> {
        candidates
            .iter()
            .find_map(|name| self.by_name.get(*name).copied())
    }
}

/// A single data row plus what is needed to report a bad cell.
struct Row<'a> {
    path: &'a Path,
    line: u64,
    record: &'a csv::StringRecord,
}

impl Row<'_> {
    fn text(&self, idx: usize) -> &str {
        self.raw(idx).trim()
    }

    /// The cell as written. Join keys stay untouched; `MatchPolicy` owns any trimming.
    fn raw(&self, idx: usize) -> &str {
        self.record.get(idx).unwrap_or("")
    }

    fn invalid(&self, column: &'static str, value: &str) -> LoadError {
        LoadError::InvalidRow {
            path: self.path.to_path_buf(),
            line: self.line,
            column,
            value: value.to_string(),
        }
    }

    fn date(&self, idx: usize, column: &'static str) -> Result<NaiveDate, LoadError> {
        let raw = self.text(idx);
        parse_date(raw).ok_or_else(|| self.invalid(column, raw))
    }

    fn metric(&self, idx: Option<usize>, column: &'static str) -> Result<Option<f64>, LoadError> {
        let Some(idx) = idx else {
            return Ok(None);
        };
        let raw = self.text(idx);
        parse_metric(raw).map_err(|_| self.invalid(column, raw))
    }
}

/// `YYYY-MM-DD`, optionally followed by a time part (`2021-01-01T00:00:00Z`).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10).unwrap_or(raw);
    if raw.len() > 10 && !matches!(raw.as_bytes()[10], b'T' | b' ') {
        return None;
    }
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Blank and NaN cells are gaps, not zeros.
pub fn parse_metric(raw: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    if raw.is_empty() {
        return Ok(None);
    }
    let value: f64 = raw.parse()?;
    Ok(if value.is_nan() { None } else { Some(value) })
}

fn open_reader(path: &Path) -> Result<csv::Reader<File>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(csv::ReaderBuilder::new().flexible(true).from_reader(file))
}

/// Column positions of one table, resolved from its header row.
trait TableLayout: Sized {
    type Record;

    fn resolve(columns: &Columns<'_>) -> Result<Self, LoadError>;

    /// Position of the join key column.
    fn key(&self) -> usize;

    fn parse(&self, row: &Row<'_>) -> Result<Self::Record, LoadError>;
}

/// Reads every record of `path` in file order. Rows with a blank join key are skipped.
fn read_table<L: TableLayout>(path: &Path) -> Result<Vec<L::Record>, LoadError> {
    let mut reader = open_reader(path)?;
    let headers = reader
        .headers()
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    let columns = Columns::from_headers(path, &headers);
    let layout = L::resolve(&columns)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for result in reader.records() {
        let record = result.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let row = Row {
            path,
            line: record.position().map(|pos| pos.line()).unwrap_or(0),
            record: &record,
        };
        if row.text(layout.key()).is_empty() {
            skipped += 1;
            continue;
        }
        records.push(layout.parse(&row)?);
    }
    if skipped > 0 {
        warn!(path = %path.display(), skipped, "rows without a country skipped");
    }
    debug!(path = %path.display(), rows = records.len(), "table loaded");
    Ok(records)
}

struct SummaryLayout {
    name: usize,
    region: Option<usize>,
    iso: Option<usize>,
    recent: Option<usize>,
    cumulative: Option<usize>,
}

impl TableLayout for SummaryLayout {
    type Record = CountryRecord;

    fn resolve(columns: &Columns<'_>) -> Result<Self, LoadError> {
        Ok(Self {
            name: columns.require(SUMMARY_NAME)?,
            region: columns.any_of(&[SUMMARY_REGION]),
            iso: columns.any_of(SUMMARY_ISO),
            recent: columns.optional(SUMMARY_RECENT),
            cumulative: columns.optional(SUMMARY_CUMULATIVE),
        })
    }

    fn key(&self) -> usize {
        self.name
    }

    fn parse(&self, row: &Row<'_>) -> Result<CountryRecord, LoadError> {
        let optional_text = |idx: Option<usize>| {
            idx.map(|idx| row.text(idx))
                .filter(|text| !text.is_empty())
                .map(str::to_string)
        };
        Ok(CountryRecord {
            name: row.raw(self.name).to_string(),
            who_region: optional_text(self.region),
            iso_code: optional_text(self.iso),
            recent_cases_per_100k: row.metric(self.recent, "recent cases per 100k")?,
            cumulative_cases: row.metric(self.cumulative, "cumulative cases")?,
        })
    }
}

struct CaseDeathLayout {
    country: usize,
    date: usize,
    new_cases: Option<usize>,
    new_deaths: Option<usize>,
    cumulative_cases: Option<usize>,
    cumulative_deaths: Option<usize>,
}

impl TableLayout for CaseDeathLayout {
    type Record = CaseDeathRow;

    fn resolve(columns: &Columns<'_>) -> Result<Self, LoadError> {
        Ok(Self {
            country: columns.require(CASES_COUNTRY)?,
            date: columns.require(CASES_DATE)?,
            new_cases: columns.optional(CASES_NEW),
            new_deaths: columns.optional(DEATHS_NEW),
            cumulative_cases: columns.optional(CASES_CUMULATIVE),
            cumulative_deaths: columns.optional(DEATHS_CUMULATIVE),
        })
    }

    fn key(&self) -> usize {
        self.country
    }

    fn parse(&self, row: &Row<'_>) -> Result<CaseDeathRow, LoadError> {
        Ok(CaseDeathRow {
            date: row.date(self.date, CASES_DATE)?,
            country: row.raw(self.country).to_string(),
            new_cases: row.metric(self.new_cases, CASES_NEW)?,
            new_deaths: row.metric(self.new_deaths, DEATHS_NEW)?,
            cumulative_cases: row.metric(self.cumulative_cases, CASES_CUMULATIVE)?,
            cumulative_deaths: row.metric(self.cumulative_deaths, DEATHS_CUMULATIVE)?,
        })
    }
}

struct VaccinationLayout {
    location: usize,
    date: usize,
    total: Option<usize>,
    daily: Option<usize>,
}

impl TableLayout for VaccinationLayout {
    type Record = VaccinationRow;

    fn resolve(columns: &Columns<'_>) -> Result<Self, LoadError> {
        Ok(Self {
            location: columns.require(VACCINATIONS_LOCATION)?,
            date: columns.require(VACCINATIONS_DATE)?,
            total: columns.optional(VACCINATIONS_TOTAL),
            daily: columns.optional(VACCINATIONS_DAILY),
        })
    }

    fn key(&self) -> usize {
        self.location
    }

    fn parse(&self, row: &Row<'_>) -> Result<VaccinationRow, LoadError> {
        Ok(VaccinationRow {
            date: row.date(self.date, VACCINATIONS_DATE)?,
            location: row.raw(self.location).to_string(),
            total_vaccinations: row.metric(self.total, VACCINATIONS_TOTAL)?,
            daily_vaccinations: row.metric(self.daily, VACCINATIONS_DAILY)?,
        })
    }
}

struct AdvisoryLayout {
    country: usize,
    info: usize,
}

impl TableLayout for AdvisoryLayout {
    type Record = AdvisoryRecord;

    fn resolve(columns: &Columns<'_>) -> Result<Self, LoadError> {
        Ok(Self {
            country: columns.require(ADVISORIES_COUNTRY)?,
            info: columns.require(ADVISORIES_INFO)?,
        })
    }

    fn key(&self) -> usize {
        self.country
    }

    fn parse(&self, row: &Row<'_>) -> Result<AdvisoryRecord, LoadError> {
        Ok(AdvisoryRecord {
            country: row.raw(self.country).to_string(),
            info: row.text(self.info).to_string(),
        })
    }
}

pub fn load_summary(path: impl AsRef<Path>) -> Result<Vec<CountryRecord>, LoadError> {
    read_table::<SummaryLayout>(path.as_ref())
}

/// Case/death rows in file order; the store sorts them per country.
pub fn load_case_deaths(path: impl AsRef<Path>) -> Result<Vec<CaseDeathRow>, LoadError> {
    read_table::<CaseDeathLayout>(path.as_ref())
}

pub fn load_vaccinations(path: impl AsRef<Path>) -> Result<Vec<VaccinationRow>, LoadError> {
    read_table::<VaccinationLayout>(path.as_ref())
}

/// Advisory rows in file order, duplicates included.
pub fn load_advisories(path: impl AsRef<Path>) -> Result<Vec<AdvisoryRecord>, LoadError> {
    read_table::<AdvisoryLayout>(path.as_ref())
}
