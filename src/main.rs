//! dc-sim entry point: configuration, logging, and headless or wall-clock runs.

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;

use dc_sim::config::SimulationConfig;
use dc_sim::io::export::export_history_csv;
use dc_sim::logging::init_tracing;
use dc_sim::runtime::{FeedHandle, Simulator};
use dc_sim::sim::dashboard::{DashboardFeed, RefreshProfile};
use dc_sim::sim::engine::{Engine, EngineSnapshot};
use dc_sim::sim::floor::{
    DEFAULT_RACK_COUNT, DEFAULT_ZONE_COUNT, RackStatus, ZoneStatus, rack_layout,
    temperature_zones,
};
use dc_sim::sim::kpi::HistorySummary;
use dc_sim::sim::scenario::Scenario;

use crate::cli::Cli;

/// Seed offsets keeping the feeds and floor plan off the engine's noise stream.
const LIVE_FEED_SEED_OFFSET: u64 = 101;
const LEGACY_FEED_SEED_OFFSET: u64 = 202;
const FLOOR_SEED_OFFSET: u64 = 303;

/// Loads the file (or defaults), applies CLI overrides, and validates.
fn load_config(cli: &Cli) -> Result<SimulationConfig> {
    let mut cfg = match &cli.config {
        Some(path) => SimulationConfig::from_toml_file(path)?,
        None => SimulationConfig::default(),
    };

    if let Some(ref scenario) = cli.scenario {
        cfg.engine.initial_scenario = scenario.clone();
    }
    if let Some(seed) = cli.seed {
        cfg.engine.seed = Some(seed);
    }
    if let Some(format) = cli.log_format {
        cfg.logging.format = format;
    }

    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        bail!("invalid configuration ({} error(s))", errors.len());
    }
    Ok(cfg)
}

fn print_alerts(scenario: &Scenario) {
    println!("\nScenario: {} ({})", scenario.name, scenario.description);
    for alert in scenario.advisory_alerts {
        println!("  ! {alert}");
    }
}

/// Steps the engine back-to-back and returns its final snapshot.
fn run_headless(cfg: &SimulationConfig, ticks: usize) -> Result<EngineSnapshot> {
    let mut engine = Engine::new(cfg.engine_settings()?, cfg.perturbation());
    engine.start();
    for _ in 0..ticks {
        if let Some(state) = engine.step() {
            println!("{state}");
        }
    }
    engine.pause();
    print_alerts(engine.active_scenario());
    Ok(engine.snapshot())
}

/// Drives the engine on the wall clock until it has processed `ticks` ticks.
fn run_realtime(cfg: &SimulationConfig, ticks: usize, with_feeds: bool) -> Result<EngineSnapshot> {
    let settings = cfg.engine_settings()?;
    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;

    let snapshot = rt.block_on(async {
        let feeds = with_feeds.then(|| {
            let live = FeedHandle::spawn(DashboardFeed::with_period(
                RefreshProfile::Live,
                cfg.live_period(),
                &cfg.baseline,
                cfg.perturbation_with_offset(LIVE_FEED_SEED_OFFSET),
            ));
            let legacy = FeedHandle::spawn(DashboardFeed::with_period(
                RefreshProfile::Legacy,
                cfg.legacy_period(),
                &cfg.baseline,
                cfg.perturbation_with_offset(LEGACY_FEED_SEED_OFFSET),
            ));
            (live, legacy)
        });

        let mut sim = Simulator::new(Engine::new(settings, cfg.perturbation()));
        let mut states = sim.subscribe();
        sim.start_until(ticks as u64);
        for _ in 0..ticks {
            match states.recv().await {
                Some(state) => println!("{state}"),
                None => break,
            }
        }

        if let Some((live, legacy)) = feeds {
            live.cancel();
            legacy.cancel();
            println!("\nLive feed   ({} refreshes): {}", live.refreshes(), live.latest());
            println!("Legacy feed ({} refreshes): {}", legacy.refreshes(), legacy.latest());
        }

        print_alerts(sim.scenario());
        sim.shutdown()
    });
    Ok(snapshot)
}

fn print_floor_plan(cfg: &SimulationConfig) {
    let mut perturbation = cfg.perturbation_with_offset(FLOOR_SEED_OFFSET);
    let zones = temperature_zones(DEFAULT_ZONE_COUNT, &mut perturbation);
    let racks = rack_layout(DEFAULT_RACK_COUNT, &mut perturbation);

    let zone_count = |s: ZoneStatus| zones.iter().filter(|z| z.status == s).count();
    let rack_count = |s: RackStatus| racks.iter().filter(|r| r.status == s).count();

    println!("\n--- Floor Plan ---");
    println!(
        "Zones ({}):  normal={} warm={} hot={} critical={}",
        zones.len(),
        zone_count(ZoneStatus::Normal),
        zone_count(ZoneStatus::Warm),
        zone_count(ZoneStatus::Hot),
        zone_count(ZoneStatus::Critical),
    );
    println!(
        "Racks ({}):  empty={} normal={} warning={} critical={}",
        racks.len(),
        rack_count(RackStatus::Empty),
        rack_count(RackStatus::Normal),
        rack_count(RackStatus::Warning),
        rack_count(RackStatus::Critical),
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config(&cli)?;
    init_tracing(&cfg.logging);
    info!(
        scenario = %cfg.engine.initial_scenario,
        ticks = cli.ticks,
        realtime = cli.realtime,
        "dc-sim starting"
    );

    let snapshot = if cli.realtime {
        run_realtime(&cfg, cli.ticks, cli.with_feeds)?
    } else {
        run_headless(&cfg, cli.ticks)?
    };

    println!("\n{}", HistorySummary::from_entries(&snapshot.history));

    if cli.floor_plan {
        print_floor_plan(&cfg);
    }

    if cli.snapshot_json {
        let json = serde_json::to_string_pretty(&snapshot).context("failed to encode snapshot")?;
        println!("{json}");
    }

    if let Some(ref path) = cli.history_out {
        export_history_csv(&snapshot.history, path)
            .with_context(|| format!("failed to write history to {}", path.display()))?;
        eprintln!("History written to {}", path.display());
    }

    Ok(())
}
