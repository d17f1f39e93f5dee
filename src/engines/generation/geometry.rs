use crate::config::{AppConfig, GeometryConfig, LinearConstraint, ParameterRange};
use crate::error::BoundaryViolation;
use crate::types::{round_to, ParameterVector};
use rand::Rng;

/// Slack for comparing rounded genes against configured limits.
const BOUNDARY_EPSILON: f64 = 1e-9;

/// The explorable design space as seen by the genetic operators.
///
/// Implementors describe the per-gene ranges, the step grid and the
/// explore-space predicate; sampling, rounding and stepping are derived
/// from those.
pub trait Geometry {
    fn dimension(&self) -> usize;

    /// Inclusive `(min, max)` of gene `index`.
    fn gene_range(&self, index: usize) -> (f64, f64);

    fn step_size(&self) -> f64;

    /// Decimal places kept on every gene.
    fn rounding(&self) -> u32;

    fn check_boundary(&self, parameters: &[f64]) -> Result<(), BoundaryViolation>;

    fn round(&self, parameters: &mut [f64]) {
        let decimals = self.rounding();
        for x in parameters.iter_mut() {
            *x = round_to(*x, decimals);
        }
    }

    /// Draws gene `index` from its step grid `min, min + step, ... <= max`.
    fn random_gene<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> f64 {
        let (min, max) = self.gene_range(index);
        let step = self.step_size();
        let steps = ((max - min) / step + BOUNDARY_EPSILON).floor().max(0.0) as u64;
        let k = rng.gen_range(0..=steps);
        round_to(min + k as f64 * step, self.rounding()).clamp(min, max)
    }

    /// Independent grid sample of every gene. Not checked against the
    /// explore-space predicate.
    fn random_sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ParameterVector {
        (0..self.dimension())
            .map(|i| self.random_gene(i, rng))
            .collect()
    }

    /// Steps gene `index` up; reverted (returning `false`) if that leaves the space.
    fn increment(&self, parameters: &mut [f64], index: usize) -> bool {
        self.shift(parameters, index, self.step_size())
    }

    /// Steps gene `index` down; reverted (returning `false`) if that leaves the space.
    fn decrement(&self, parameters: &mut [f64], index: usize) -> bool {
        self.shift(parameters, index, -self.step_size())
    }

    fn shift(&self, parameters: &mut [f64], index: usize, delta: f64) -> bool {
        let previous = parameters[index];
        parameters[index] = round_to(previous + delta, self.rounding());
        match self.check_boundary(parameters) {
            Ok(()) => true,
            Err(violation) => {
                log::debug!("Reverting step on gene {}: {}", index, violation);
                parameters[index] = previous;
                false
            }
        }
    }
}

/// Box-bounded design space with optional linear explore-space constraints.
#[derive(Debug, Clone)]
pub struct ParameterSpace {
    ranges: Vec<ParameterRange>,
    constraints: Vec<LinearConstraint>,
    step_size: f64,
    rounding: u32,
}

impl ParameterSpace {
    pub fn new(geometry: &GeometryConfig, rounding: u32) -> Self {
        Self {
            ranges: geometry.parameters.clone(),
            constraints: geometry.constraints.clone(),
            step_size: geometry.step_size,
            rounding,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.geometry, config.search.rounding)
    }
}

impl Geometry for ParameterSpace {
    fn dimension(&self) -> usize {
        self.ranges.len()
    }

    fn gene_range(&self, index: usize) -> (f64, f64) {
        let range = &self.ranges[index];
        (range.min, range.max)
    }

    fn step_size(&self) -> f64 {
        self.step_size
    }

    fn rounding(&self) -> u32 {
        self.rounding
    }

    fn check_boundary(&self, parameters: &[f64]) -> Result<(), BoundaryViolation> {
        if parameters.len() != self.ranges.len() {
            return Err(BoundaryViolation::Dimension {
                expected: self.ranges.len(),
                actual: parameters.len(),
            });
        }

        for (index, (value, range)) in parameters.iter().zip(&self.ranges).enumerate() {
            if *value < range.min - BOUNDARY_EPSILON || *value > range.max + BOUNDARY_EPSILON {
                return Err(BoundaryViolation::GeneOutOfRange {
                    index,
                    value: *value,
                    min: range.min,
                    max: range.max,
                });
            }
        }

        for (index, constraint) in self.constraints.iter().enumerate() {
            let value = constraint.evaluate(parameters);
            let min = constraint.min.unwrap_or(f64::NEG_INFINITY);
            let max = constraint.max.unwrap_or(f64::INFINITY);
            if value < min - BOUNDARY_EPSILON || value > max + BOUNDARY_EPSILON {
                return Err(BoundaryViolation::Constraint {
                    index,
                    value,
                    min,
                    max,
                });
            }
        }

        Ok(())
    }
}
