//! Projection throughput on a synthetic store: a few hundred countries with two years
//! of daily rows each.
//!
//! Run with: `cargo bench`

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use travel_buddy::data::{
    AdvisoryRecord, CaseDeathRow, CountryRecord, DatasetStore, MatchPolicy, VaccinationRow,
};
use travel_buddy::projector::{project, project_parallel, ProjectorConfig, Selection};

const COUNTRIES: usize = 200;
const DAYS: i64 = 730;

fn synthetic_store(policy: MatchPolicy) -> DatasetStore {
    let start = NaiveDate::from_ymd_opt(2020, 1, 3).unwrap();
    let mut summary = Vec::new();
    let mut cases = Vec::new();
    let mut vaccinations = Vec::new();
    let mut advisories = Vec::new();

    for c in 0..COUNTRIES {
        let name = format!("Country {c}");
        summary.push(CountryRecord {
            name: name.clone(),
            who_region: None,
            iso_code: None,
            recent_cases_per_100k: Some((c * 3) as f64),
            cumulative_cases: Some((c * 1000) as f64),
        });
        advisories.push(AdvisoryRecord {
            country: name.clone(),
            info: format!("Advisory for {name}"),
        });
        for d in 0..DAYS {
            let date = start + Duration::days(d);
            cases.push(CaseDeathRow {
                date,
                country: name.clone(),
                new_cases: Some(d as f64),
                new_deaths: (d % 7 != 0).then_some((d / 10) as f64),
                cumulative_cases: Some((d * d) as f64),
                cumulative_deaths: Some(d as f64),
            });
            vaccinations.push(VaccinationRow {
                date,
                location: name.clone(),
                total_vaccinations: Some((d * 100) as f64),
                daily_vaccinations: Some(100.0),
            });
        }
    }

    DatasetStore::from_tables(summary, cases, vaccinations, advisories, policy)
}

fn bench_projector(c: &mut Criterion) {
    let exact = synthetic_store(MatchPolicy::Exact);
    let normalized = synthetic_store(MatchPolicy::Normalized);
    let config = ProjectorConfig::default();
    let hit = Selection::country("Country 150");
    let miss = Selection::country("Atlantis");

    let mut group = c.benchmark_group("projector");
    group.bench_function("project_hit", |b| {
        b.iter(|| project(black_box(&exact), &config, black_box(&hit)))
    });
    group.bench_function("project_miss", |b| {
        b.iter(|| project(black_box(&exact), &config, black_box(&miss)))
    });
    group.bench_function("project_parallel_hit", |b| {
        b.iter(|| project_parallel(black_box(&exact), &config, black_box(&hit)))
    });
    group.bench_function("project_normalized_hit", |b| {
        let typed = Selection::country(" country 150 ");
        b.iter(|| project(black_box(&normalized), &config, black_box(&typed)))
    });
    group.finish();
}

criterion_group!(benches, bench_projector);
criterion_main!(benches);
