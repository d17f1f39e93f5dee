use super::traits::{invalid, ConfigSection};
use crate::error::SearchError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    pub name: String,
    pub min: f64,
    pub max: f64,
}

impl ParameterRange {
    pub fn new(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
        }
    }
}

/// Explore-space rule `min <= offset + sum(coefficients[i] * x[i]) <= max`.
///
/// Missing bounds are open. Coefficients beyond the vector length are ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearConstraint {
    pub coefficients: Vec<f64>,
    pub offset: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl LinearConstraint {
    pub fn evaluate(&self, parameters: &[f64]) -> f64 {
        self.offset
            + self
                .coefficients
                .iter()
                .zip(parameters)
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub step_size: f64,
    pub parameters: Vec<ParameterRange>,
    pub constraints: Vec<LinearConstraint>,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            step_size: 0.5,
            parameters: vec![
                ParameterRange::new("x1", 1.0, 10.0),
                ParameterRange::new("x2", 1.0, 10.0),
                ParameterRange::new("y1", 1.0, 10.0),
                ParameterRange::new("T", 0.5, 2.0),
            ],
            constraints: Vec::new(),
        }
    }
}

impl ConfigSection for GeometryConfig {
    fn section_name() -> &'static str {
        "geometry"
    }

    fn validate(&self) -> Result<(), SearchError> {
        if !(self.step_size > 0.0) {
            return Err(invalid::<Self>("Step size must be positive"));
        }
        if self.parameters.is_empty() {
            return Err(invalid::<Self>("At least one parameter is required"));
        }
        for p in &self.parameters {
            if !(p.min <= p.max) {
                return Err(invalid::<Self>(format!(
                    "Parameter '{}' has min {} above max {}",
                    p.name, p.min, p.max
                )));
            }
        }
        for (i, c) in self.constraints.iter().enumerate() {
            if c.coefficients.len() > self.parameters.len() {
                return Err(invalid::<Self>(format!(
                    "Constraint {} has {} coefficients for {} parameters",
                    i,
                    c.coefficients.len(),
                    self.parameters.len()
                )));
            }
            if let (Some(lo), Some(hi)) = (c.min, c.max) {
                if lo > hi {
                    return Err(invalid::<Self>(format!("Constraint {} has min above max", i)));
                }
            }
        }
        Ok(())
    }
}
