//! town_loop: end-to-end demo of the taxi route planner.
//!
//! Builds a 3 × 3 block synthetic town, then runs waves of taxi rides.
//! Each wave plans every ride in parallel against a snapshot of the delay
//! ledger, picks the candidate with the lowest predicted ETA, "drives" it
//! through simulated traffic, and records the observed segment times.  The
//! congested avenue looks attractive by distance alone; later waves learn
//! to avoid it as the ledger fills.
//!
//! ```text
//! RUST_LOG=info cargo run -p town_loop [-- config.json]
//! ```
//!
//! The ledger (`ledger.csv`) and ride log (`rides.csv`) are written to the
//! output directory and reused by the next run.

mod network;
mod traffic;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use tr_core::{KeyResolution, Position};
use tr_eta::{
    Environment, EvaluationLog, FeatureVector, FreeFlowEstimator, RideEvaluation, Weather,
    extract_features, select_best_route,
};
use tr_graph::{GraphBuilder, GraphConfig, WaypointGraph};
use tr_ledger::{DEFAULT_DELAY_SECS, DrivingDelayLedger};
use tr_route::{CostModel, PlanRequest, Planner, PlannerConfig, YenPlanner, plan_batch};

use network::{BLOCK_M, BLOCKS, build_town};
use traffic::Traffic;

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DemoConfig {
    seed: u64,
    waves: usize,
    rides_per_wave: usize,
    sample_spacing_m: f64,
    key_resolution_m: f64,
    /// Slowdown factor applied to every avenue road.
    avenue_congestion: f64,
    hour_of_day: u8,
    weather: WeatherConfig,
    planner: PlannerConfig,
    output_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct WeatherConfig {
    precipitation: f64,
    cloudiness: f64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            waves: 5,
            rides_per_wave: 8,
            sample_spacing_m: 10.0,
            key_resolution_m: 0.1,
            avenue_congestion: 3.0,
            hour_of_day: 8,
            weather: WeatherConfig::default(),
            planner: PlannerConfig {
                cost: CostModel { alpha: 1.0, beta: 4.0 },
                k: 3,
                timeout_ms: Some(500),
            },
            output_dir: PathBuf::from("output/town_loop"),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self { precipitation: 10.0, cloudiness: 70.0 }
    }
}

fn load_config() -> Result<DemoConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = fs::read_to_string(&path).with_context(|| format!("reading config {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing config {path}"))
        }
        None => Ok(DemoConfig::default()),
    }
}

/// Snap two random points in town onto distinct graph nodes.
fn random_request<R: Rng>(graph: &WaypointGraph, rng: &mut R, k: usize) -> Result<PlanRequest> {
    let extent = BLOCKS as f64 * BLOCK_M;
    let mut pick = || {
        let pos = Position::new(rng.gen_range(0.0..extent), rng.gen_range(0.0..extent));
        graph.closest_node(pos).ok_or_else(|| anyhow!("town graph has no nodes"))
    };
    let from = pick()?;
    loop {
        let to = pick()?;
        if to != from {
            return Ok(PlanRequest { from, to, k });
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();
    let config = load_config()?;

    println!("=== town_loop: taxi route planner ===");
    println!(
        "Waves: {}  |  Rides/wave: {}  |  k: {}  |  Seed: {}",
        config.waves, config.rides_per_wave, config.planner.k, config.seed
    );
    println!();

    // 1. Build the town graph.
    let t0 = Instant::now();
    let town = build_town(config.sample_spacing_m);
    let graph_config = GraphConfig::new(config.sample_spacing_m, KeyResolution::new(config.key_resolution_m)?)?;
    let graph = GraphBuilder::from_samples(graph_config, &town.samples, &town.links)?;
    let stats = graph.build_stats();
    println!(
        "Town graph: {} nodes, {} edges ({} lateral links skipped) in {:.3} s",
        stats.nodes,
        stats.edges,
        stats.skipped_lateral,
        t0.elapsed().as_secs_f64()
    );

    // 2. Ledger and ride log from previous runs.
    fs::create_dir_all(&config.output_dir)?;
    let ledger_path = config.output_dir.join("ledger.csv");
    let ledger = DrivingDelayLedger::load_or_default(&ledger_path, DEFAULT_DELAY_SECS)?;
    println!("Ledger: {} known segments", ledger.segment_count());
    let mut ride_log = EvaluationLog::open(&config.output_dir.join("rides.csv"))?;

    // 3. Planners, estimator, environment.
    let planner = YenPlanner::new(config.planner.clone())?;
    let baseline_planner = YenPlanner::default();
    let estimator = FreeFlowEstimator::default();
    let weather = Weather {
        precipitation: config.weather.precipitation,
        cloudiness: config.weather.cloudiness,
    };
    let env = Environment::new(config.hour_of_day, weather.code(), town.traffic_lights.clone())?;
    println!("Environment: {:02}:00, {}, {} traffic lights", env.hour_of_day(), env.weather(), env.traffic_lights().len());
    println!();

    let mut rng = SmallRng::seed_from_u64(config.seed);
    let traffic = Traffic::new(&town, config.avenue_congestion, &mut rng);

    // 4. Ride waves.
    println!("{:<6} {:<7} {:<11} {:<11} {:<11}", "Wave", "Rides", "Mean ETA err", "Mean saved", "Segments");
    println!("{}", "-".repeat(50));

    let mut driven = 0usize;
    let mut failed = 0usize;
    for wave in 0..config.waves {
        let requests = (0..config.rides_per_wave)
            .map(|_| random_request(&graph, &mut rng, config.planner.k))
            .collect::<Result<Vec<_>>>()?;

        let snapshot = ledger.snapshot();
        let planned = plan_batch(&planner, &graph, Some(&snapshot), &requests);

        let (mut wave_rides, mut err_sum, mut saved_sum) = (0usize, 0.0, 0.0);
        for (i, (req, result)) in requests.iter().zip(planned).enumerate() {
            let ride_id = (wave * config.rides_per_wave + i) as u64;
            let routes = match result {
                Ok(routes) if !routes.is_empty() => routes,
                Ok(_) => {
                    log::warn!("ride {ride_id}: {} -> {} is unreachable", req.from, req.to);
                    failed += 1;
                    continue;
                }
                Err(e) => {
                    log::warn!("ride {ride_id}: planning failed: {e}");
                    failed += 1;
                    continue;
                }
            };

            let features: Vec<FeatureVector> = routes
                .iter()
                .map(|r| extract_features(r, &graph, &snapshot, &env))
                .collect();
            let choice = select_best_route(&estimator, &features)?;
            let selected = &routes[choice.index];

            let segment_secs = traffic.drive(&graph, selected, &mut rng);
            let actual_secs: f64 = segment_secs.iter().sum();
            ledger.record_route(&selected.keys(&graph), &segment_secs)?;

            let baseline = baseline_planner.shortest_path(&graph, None, req.from, req.to)?;
            let best = routes.iter().map(|r| traffic.expected(&graph, r)).fold(f64::INFINITY, f64::min);
            let eval = RideEvaluation::new(
                ride_id,
                choice.eta(),
                actual_secs,
                traffic.expected(&graph, &baseline),
                Some(best),
                selected,
                &baseline,
            );
            log::info!("{eval}");
            ride_log.append(&eval)?;

            wave_rides += 1;
            err_sum += eval.eta_error_secs;
            saved_sum += eval.delta_vs_baseline_secs;
        }
        driven += wave_rides;

        let denom = wave_rides.max(1) as f64;
        println!(
            "{:<6} {:<7} {:<11.1} {:<11.1} {:<11}",
            wave,
            wave_rides,
            err_sum / denom,
            saved_sum / denom,
            ledger.segment_count()
        );
    }

    // 5. Persist.
    ride_log.flush()?;
    ledger.save(&ledger_path)?;

    println!();
    println!("Rides driven: {driven}  |  failed: {failed}");
    println!("  {} : {} segments", ledger_path.display(), ledger.segment_count());
    println!("  {} : +{} rows", config.output_dir.join("rides.csv").display(), ride_log.written());

    Ok(())
}
