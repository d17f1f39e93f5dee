//! Runs the search against an analytic stand-in for a patch antenna solver.
//!
//! ```text
//! cargo run --example patch_search -- [config.toml] [minutes]
//! RUST_LOG=info cargo run --example patch_search
//! ```
//!
//! State is written under the configured storage directory (default `SSO/`),
//! so running the demo twice continues the previous search.

use antennasearch::{
    AppConfig, ConsoleProgressCallback, Curve, ParameterSpace, SearchEngine, SimulationResult,
    StopCriterion,
};
use std::env;

const DEFAULT_MINUTES: f64 = 0.5;
const DEFAULT_GENERATIONS: usize = 40;

/// Single resonance whose frequency falls with the total patch length.
///
/// Expects the default `x1, x2, y1, T` geometry.
fn analytic_patch(parameters: &[f64]) -> anyhow::Result<SimulationResult> {
    let [x1, x2, y1, t] = match parameters {
        [x1, x2, y1, t] => [*x1, *x2, *y1, *t],
        other => anyhow::bail!("expected 4 parameters, got {}", other.len()),
    };

    let centre = 30.0 / (x1 + x2 + y1);
    let depth = -10.0 - 15.0 * t;
    let width = 0.02 * centre * (1.0 + y1 / 10.0);
    let peak_gain = 2.0 + t - 0.1 * (x1 - x2).abs();

    let frequencies: Vec<f64> = (0..=300).map(|i| 1.0 + i as f64 * 0.01).collect();
    let return_loss = frequencies
        .iter()
        .map(|f| depth * (-((f - centre) / width).powi(2)).exp())
        .collect();
    let gain = frequencies
        .iter()
        .map(|f| peak_gain - 3.0 * ((f - centre) / centre).abs())
        .collect();

    Ok(SimulationResult::new(
        Curve::new(frequencies.clone(), return_loss),
        Curve::new(frequencies, gain),
    ))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let mut config = match args.next() {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::default(),
    };
    let minutes = match args.next() {
        Some(value) => value.parse()?,
        None => DEFAULT_MINUTES,
    };
    if config.search.max_generations.is_none() {
        config.search.max_generations = Some(DEFAULT_GENERATIONS);
    }

    let geometry = ParameterSpace::from_config(&config);
    let mut engine = SearchEngine::new(&config, geometry, analytic_patch)?;
    let report = engine.search(StopCriterion::minutes(minutes), &mut ConsoleProgressCallback)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
