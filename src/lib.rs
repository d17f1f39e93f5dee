//! Steady-state genetic search for antenna geometries.
//!
//! A [`SearchEngine`] proposes parameter vectors inside a [`Geometry`],
//! hands them to an external [`Simulator`], scores the returned frequency
//! response against configured band objectives and keeps the population,
//! offspring and every simulated design on disk so an interrupted run can
//! resume without repeating simulations.

pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use data::{MemoizationStore, SnapshotFiles};
pub use engines::evaluation::{extract_bands, FitnessEvaluator, Simulator};
pub use engines::generation::{
    ConsoleProgressCallback, Geometry, ParameterSpace, ProgressCallback, SearchEngine,
    SearchReport, SilentProgressCallback, StopCriterion, StopReason,
};
pub use error::{BoundaryViolation, Result, SearchError};
pub use types::{Band, Curve, FitnessScore, Individual, ParameterVector, SimulationResult};
