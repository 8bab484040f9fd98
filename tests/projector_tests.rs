mod common;

use chrono::NaiveDate;
use travel_buddy::data::{CaseDeathRow, DatasetStore, MatchPolicy};
use travel_buddy::projector::{
    project, project_parallel, recompute, MapScopePolicy, ProjectorConfig, Region, Selection,
};

use common::fixture_store;

fn single_japan_row_store() -> DatasetStore {
    DatasetStore::from_tables(
        Vec::new(),
        vec![CaseDeathRow {
            date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            country: "Japan".to_string(),
            new_cases: Some(100.0),
            new_deaths: Some(5.0),
            cumulative_cases: Some(100.0),
            cumulative_deaths: Some(5.0),
        }],
        Vec::new(),
        Vec::new(),
        MatchPolicy::Exact,
    )
}

#[test]
fn single_row_projects_to_new_cases_and_new_deaths() {
    let store = single_japan_row_store();
    let result = project(&store, &ProjectorConfig::default(), &Selection::country("Japan"));

    let payload = serde_json::to_value(&result.case_death_series).unwrap();
    assert_eq!(
        payload["datasets"],
        serde_json::json!([
            {"label": "New Cases", "color": "salmon", "points": [{"x": "2021-01-01", "y": 100.0}]},
            {"label": "New Deaths", "color": "#ccccff", "points": [{"x": "2021-01-01", "y": 5.0}]},
        ])
    );
    assert_eq!(payload["title"], "New Covid Cases and Deaths in Japan");

    let cumulative = &result.cumulative_series.datasets;
    assert_eq!(cumulative[0].label, "Cumulative Cases");
    assert_eq!(cumulative[1].label, "Cumulative Deaths");
    assert_eq!(cumulative[1].points[0].y, Some(5.0));
}

#[test]
fn unknown_country_yields_empty_outputs() {
    let store = fixture_store(MatchPolicy::Exact);
    let result = project(&store, &ProjectorConfig::default(), &Selection::country("Atlantis"));

    assert!(result.is_empty());
    assert!(result.case_death_series.is_empty());
    assert_eq!(result.case_death_series.datasets.len(), 2);
    assert!(result.cumulative_series.is_empty());
    assert!(result.vaccination_series.as_ref().is_some_and(|panel| panel.is_empty()));
    assert_eq!(result.advisory_text.as_deref(), Some(""));
    // the map does not depend on the country
    assert_eq!(result.map.locations.len(), 5);
}

#[test]
fn series_length_and_dates_follow_the_store_for_every_country() {
    let store = fixture_store(MatchPolicy::Exact);
    let config = ProjectorConfig::default();
    for country in store.countries() {
        let rows = store.series_for(country);
        let result = project(&store, &config, &Selection::country(country));
        for panel in [&result.case_death_series, &result.cumulative_series] {
            for dataset in &panel.datasets {
                assert_eq!(dataset.points.len(), rows.len(), "{country}: {}", dataset.label);
                let xs: Vec<_> = dataset.points.iter().map(|p| p.x).collect();
                let dates: Vec<_> = rows.iter().map(|row| row.date).collect();
                assert_eq!(xs, dates, "{country}: {}", dataset.label);
            }
        }
    }
}

#[test]
fn gaps_propagate_as_missing_points() {
    let store = fixture_store(MatchPolicy::Exact);
    let result = project(&store, &ProjectorConfig::default(), &Selection::country("Japan"));
    let deaths: Vec<_> = result.case_death_series.datasets[1]
        .points
        .iter()
        .map(|p| p.y)
        .collect();
    assert_eq!(deaths, vec![Some(5.0), None, Some(9.0)]);

    let vaccinations = result.vaccination_series.expect("panel enabled");
    let totals: Vec<_> = vaccinations.datasets[0].points.iter().map(|p| p.y).collect();
    assert_eq!(totals, vec![None, Some(200.0)]);
    assert_eq!(vaccinations.title, "Vaccinations in Japan");
}

#[test]
fn projection_is_idempotent_and_parallel_matches_sequential() {
    let store = fixture_store(MatchPolicy::Exact);
    let config = ProjectorConfig::default();
    for selection in [
        Selection::country("France"),
        Selection::new("Japan", Region::Asia),
        Selection::country("Atlantis"),
    ] {
        let first = project(&store, &config, &selection);
        let second = project(&store, &config, &selection);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(project_parallel(&store, &config, &selection), first);
    }

    let parallel_config = ProjectorConfig {
        parallel: true,
        ..ProjectorConfig::default()
    };
    let selection = Selection::country("France");
    assert_eq!(
        recompute(&store, &parallel_config, &selection),
        project(&store, &config, &selection)
    );
}

#[test]
fn advisory_text_uses_first_match() {
    let store = fixture_store(MatchPolicy::Exact);
    let config = ProjectorConfig::default();
    for _ in 0..3 {
        let result = project(&store, &config, &Selection::country("France"));
        assert_eq!(
            result.advisory_text.as_deref(),
            Some("Entry allowed for vaccinated travellers, with a negative test.")
        );
    }
}

#[test]
fn lowercase_country_misses_under_exact_policy() {
    let store = fixture_store(MatchPolicy::Exact);
    let result = project(&store, &ProjectorConfig::default(), &Selection::country("japan"));
    assert!(result.is_empty());
}

#[test]
fn lowercase_country_hits_under_normalized_policy() {
    let store = fixture_store(MatchPolicy::Normalized);
    let config = ProjectorConfig::default();
    let typed = project(&store, &config, &Selection::country(" japan "));
    let canonical = project(&store, &config, &Selection::country("Japan"));
    assert!(!typed.is_empty());
    assert_eq!(typed.case_death_series.datasets, canonical.case_death_series.datasets);
    assert_eq!(typed.advisory_text, canonical.advisory_text);
    // the title echoes what was typed
    assert_eq!(typed.case_death_series.title, "New Covid Cases and Deaths in  japan ");
}

#[test]
fn map_scope_follows_policy() {
    let store = fixture_store(MatchPolicy::Exact);
    let selection = Selection::new("France", Region::Europe);

    let global = project(&store, &ProjectorConfig::travel_buddy(), &selection);
    assert_eq!(global.map_scope, Region::Europe);
    assert_eq!(global.map.scope, Region::World);

    let regional = project(&store, &ProjectorConfig::regional(), &selection);
    assert_eq!(regional.map_scope, Region::Europe);
    assert_eq!(regional.map.scope, Region::Europe);

    // line charts are the same under both policies
    assert_eq!(global.case_death_series, regional.case_death_series);
    assert_eq!(regional.map.locations, global.map.locations);
}

#[test]
fn map_carries_colour_settings_and_values_in_summary_order() {
    let store = fixture_store(MatchPolicy::Exact);
    let result = project(&store, &ProjectorConfig::default(), &Selection::default());
    let map = &result.map;
    assert_eq!(
        map.locations,
        vec!["Global", "Japan", "France", "Peru", "United States of America"]
    );
    assert_eq!(map.values, vec![None, Some(42.5), Some(310.2), None, Some(380.75)]);
    assert_eq!(map.color_scale, "RdYlGn");
    assert!(map.reverse_scale);
    assert_eq!((map.bounds.min, map.bounds.max), (0.0, 600.0));
    assert_eq!(map.location_mode, "country names");
    assert_eq!(map.colorbar_title, "Covid cases in the last 7 days per 100000");
}

#[test]
fn disabled_panels_are_omitted() {
    let store = fixture_store(MatchPolicy::Exact);
    let config = ProjectorConfig {
        show_advisories: false,
        show_vaccinations: false,
        map_scope: MapScopePolicy::World,
        ..ProjectorConfig::default()
    };
    let result = project(&store, &config, &Selection::country("France"));
    assert!(result.vaccination_series.is_none());
    assert!(result.advisory_text.is_none());
    assert!(!result.case_death_series.is_empty());

    let payload = serde_json::to_value(&result).unwrap();
    assert!(payload.get("vaccination_series").is_none());
    assert!(payload.get("advisory_text").is_none());
}
