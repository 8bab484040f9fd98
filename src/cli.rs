use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::error;

use crate::config::AppConfig;
use crate::data::DatasetStore;
use crate::dispatch::{Dispatcher, JsonLinesRenderer};
use crate::logging;
use crate::projector::{recompute, Region, Selection};
use crate::server::{self, AppState};

#[derive(Debug, Parser)]
#[command(name = "travel-buddy", version, about = "COVID-19 travel dashboard")]
pub struct Cli {
    /// YAML config file (default: travelbuddy.yaml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = logging::DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Serve the dashboard and JSON API.
    Serve {
        /// Overrides `bind` from the config.
        #[arg(long)]
        bind: Option<String>,
    },
    /// Print the projection for one country as JSON.
    Project {
        country: String,
        #[arg(long)]
        region: Option<Region>,
        #[arg(long)]
        compact: bool,
    },
    /// Read `country <name>` / `region <name>` lines on stdin, emit one JSON line each.
    Watch,
    /// Report join-key mismatches between the tables.
    Validate {
        /// Exit 1 when any mismatch is found.
        #[arg(long)]
        strict: bool,
    },
    /// List the countries of the case/death table.
    Countries,
}

/// Parses `args` (including the program name) and runs the command. Returns the exit code:
/// 0 success, 1 runtime or load failure, 2 usage error.
pub fn run_with_args(args: &[String]) -> i32 {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return err.exit_code();
        }
    };
    logging::init(&cli.log_level);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            eprintln!("error: {err:#}");
            1
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    let store = DatasetStore::load(&config.sources, config.match_policy)
        .context("failed to load datasets")?;

    match cli.command {
        Command::Serve { bind } => handle_serve(store, &config, bind),
        Command::Project {
            country,
            region,
            compact,
        } => handle_project(&store, &config, country, region, compact),
        Command::Watch => handle_watch(&store, &config),
        Command::Validate { strict } => handle_validate(&store, strict),
        Command::Countries => {
            for country in store.countries() {
                println!("{country}");
            }
            Ok(0)
        }
    }
}

fn handle_serve(store: DatasetStore, config: &AppConfig, bind: Option<String>) -> anyhow::Result<i32> {
    let bind_addr = bind.unwrap_or_else(|| config.bind.clone());
    let state = AppState::new(Arc::new(store), config);
    server::run_server(state, &bind_addr).with_context(|| format!("server on {bind_addr} failed"))?;
    Ok(0)
}

fn handle_project(
    store: &DatasetStore,
    config: &AppConfig,
    country: String,
    region: Option<Region>,
    compact: bool,
) -> anyhow::Result<i32> {
    let selection = Selection::new(country, region.unwrap_or(config.initial_selection.region));
    let result = recompute(store, &config.projector, &selection);
    let payload = if compact {
        serde_json::to_string(&result)
    } else {
        serde_json::to_string_pretty(&result)
    }
    .context("failed to serialize projection")?;
    println!("{payload}");
    Ok(0)
}

fn handle_watch(store: &DatasetStore, config: &AppConfig) -> anyhow::Result<i32> {
    let stdout = io::stdout();
    let renderer = JsonLinesRenderer::new(BufWriter::new(stdout.lock()));
    let mut dispatcher = Dispatcher::new(
        store,
        &config.projector,
        config.initial_selection.clone(),
        renderer,
    );
    let dispatched = dispatcher.run(io::stdin().lock())?;
    tracing::info!(dispatched, "input closed");
    Ok(0)
}

fn handle_validate(store: &DatasetStore, strict: bool) -> anyhow::Result<i32> {
    let report = store.join_report();
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("failed to serialize report")?
    );
    if report.is_clean() {
        eprintln!("join keys consistent across {} countries", report.case_countries);
        return Ok(0);
    }
    eprintln!(
        "join key mismatches: summary={}, vaccinations={}, advisories={}, duplicate advisories={}",
        report.missing_from_summary.len(),
        report.missing_from_vaccinations.len(),
        report.missing_from_advisories.len(),
        report.duplicate_advisories.len()
    );
    Ok(if strict { 1 } else { 0 })
}
