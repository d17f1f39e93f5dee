pub mod bands;
pub mod fitness;
pub mod simulator;

pub use bands::extract_bands;
pub use fitness::FitnessEvaluator;
pub use simulator::Simulator;
