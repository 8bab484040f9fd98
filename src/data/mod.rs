//! Dataset store: CSV tables loaded once at startup and indexed by country.

pub mod loader;
pub mod records;
pub mod store;

pub use loader::{DataSources, LoadError};
pub use records::{AdvisoryRecord, CaseDeathRow, CountryRecord, VaccinationRow};
pub use store::{DatasetStore, JoinKeyReport, MatchPolicy};
