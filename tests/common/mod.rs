#![allow(dead_code)]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use travel_buddy::data::{DataSources, DatasetStore, MatchPolicy};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn fixture_sources() -> DataSources {
    DataSources::in_dir(fixtures_dir())
}

pub fn fixture_store(policy: MatchPolicy) -> DatasetStore {
    DatasetStore::load(&fixture_sources(), policy).expect("fixtures should load")
}

pub fn unique_temp_dir(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("travel-buddy-{name}-{stamp}"));
    std::fs::create_dir_all(&dir).expect("temp dir should be created");
    dir
}
