pub mod evolution_engine;
pub mod geometry;
pub mod operators;
pub mod pareto;
pub mod progress;

pub use evolution_engine::{
    Cohort, EvaluationStats, GenerationSummary, ProgressCallback, SearchEngine, SearchReport,
    StopCriterion, StopReason,
};
pub use geometry::{Geometry, ParameterSpace};
pub use operators::MutationOperator;
pub use pareto::{dominates, SlotChoice};
pub use progress::{ConsoleProgressCallback, SilentProgressCallback};
