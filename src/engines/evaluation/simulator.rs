use crate::types::SimulationResult;

/// Black-box evaluator that turns a parameter vector into a frequency response.
///
/// Calls may be slow and the implementation may hold external state (a
/// solver session, a license, a desktop application), hence `&mut self`.
/// Repeated calls with the same vector are assumed to give equivalent
/// results; the search engine caches on that assumption. Errors are passed
/// through to the caller of the search unchanged.
pub trait Simulator {
    fn simulate(&mut self, parameters: &[f64]) -> anyhow::Result<SimulationResult>;
}

impl<F> Simulator for F
where
    F: FnMut(&[f64]) -> anyhow::Result<SimulationResult>,
{
    fn simulate(&mut self, parameters: &[f64]) -> anyhow::Result<SimulationResult> {
        self(parameters)
    }
}
