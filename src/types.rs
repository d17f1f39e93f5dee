use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered gene values of one candidate design.
///
/// Vectors are rounded to the configured precision after every generation or
/// mutation step, so two vectors describe the same design exactly when they
/// compare equal element by element.
pub type ParameterVector = Vec<f64>;

/// Rounds to `decimals` places. Negative zero is folded into zero so rounded
/// vectors can be used as exact cache keys.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// A sampled frequency response: `values[i]` was measured at `frequencies[i]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "CurveRecord", into = "CurveRecord")]
pub struct Curve {
    pub frequencies: Vec<f64>,
    pub values: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
struct CurveRecord(Vec<f64>, Vec<f64>);

impl From<CurveRecord> for Curve {
    fn from(record: CurveRecord) -> Self {
        Self {
            frequencies: record.0,
            values: record.1,
        }
    }
}

impl From<Curve> for CurveRecord {
    fn from(curve: Curve) -> Self {
        CurveRecord(curve.frequencies, curve.values)
    }
}

impl Curve {
    pub fn new(frequencies: Vec<f64>, values: Vec<f64>) -> Self {
        Self { frequencies, values }
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Checks equal lengths and strictly ascending frequencies.
    pub fn validate(&self, label: &str) -> Result<()> {
        if self.frequencies.len() != self.values.len() {
            return Err(SearchError::InvalidSimulationResult(format!(
                "{} curve has {} frequencies but {} values",
                label,
                self.frequencies.len(),
                self.values.len()
            )));
        }
        if let Some(i) = self.frequencies.windows(2).position(|w| !(w[0] < w[1])) {
            return Err(SearchError::InvalidSimulationResult(format!(
                "{} frequencies are not strictly ascending at sample {}",
                label,
                i + 1
            )));
        }
        Ok(())
    }
}

/// Simulator output: return loss (S11, dB) and gain (dBi) against frequency (GHz).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "SimulationRecord", into = "SimulationRecord")]
pub struct SimulationResult {
    pub return_loss: Curve,
    pub gain: Curve,
}

#[derive(Serialize, Deserialize)]
struct SimulationRecord(Curve, Curve);

impl From<SimulationRecord> for SimulationResult {
    fn from(record: SimulationRecord) -> Self {
        Self {
            return_loss: record.0,
            gain: record.1,
        }
    }
}

impl From<SimulationResult> for SimulationRecord {
    fn from(result: SimulationResult) -> Self {
        SimulationRecord(result.return_loss, result.gain)
    }
}

impl SimulationResult {
    pub fn new(return_loss: Curve, gain: Curve) -> Self {
        Self { return_loss, gain }
    }

    pub fn validate(&self) -> Result<()> {
        self.return_loss.validate("return loss")?;
        self.gain.validate("gain")
    }
}

/// A parameter vector plus its simulation result once evaluated.
///
/// Persisted as `[[p0, p1, ...], []]` before evaluation and
/// `[[p0, p1, ...], [[[f...], [s11...]], [[f...], [gain...]]]]` after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IndividualRecord", into = "IndividualRecord")]
pub struct Individual {
    pub parameters: ParameterVector,
    pub result: Option<SimulationResult>,
}

#[derive(Serialize, Deserialize)]
struct IndividualRecord(ParameterVector, Vec<Curve>);

impl TryFrom<IndividualRecord> for Individual {
    type Error = String;

    fn try_from(record: IndividualRecord) -> std::result::Result<Self, Self::Error> {
        let IndividualRecord(parameters, mut curves) = record;
        let result = match curves.len() {
            0 => None,
            2 => {
                let gain = curves.pop().unwrap_or_default();
                let return_loss = curves.pop().unwrap_or_default();
                Some(SimulationResult { return_loss, gain })
            }
            n => return Err(format!("expected 0 or 2 curves, found {}", n)),
        };
        Ok(Self { parameters, result })
    }
}

impl From<Individual> for IndividualRecord {
    fn from(individual: Individual) -> Self {
        let curves = match individual.result {
            Some(result) => vec![result.return_loss, result.gain],
            None => Vec::new(),
        };
        IndividualRecord(individual.parameters, curves)
    }
}

impl Individual {
    pub fn new(parameters: ParameterVector) -> Self {
        Self {
            parameters,
            result: None,
        }
    }

    pub fn evaluated(parameters: ParameterVector, result: SimulationResult) -> Self {
        Self {
            parameters,
            result: Some(result),
        }
    }

    pub fn is_evaluated(&self) -> bool {
        self.result.is_some()
    }
}

/// Two-objective score. Lower is better in both components.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "FitnessRecord", into = "FitnessRecord")]
pub struct FitnessScore {
    pub s11: f64,
    pub gain: f64,
}

#[derive(Serialize, Deserialize)]
struct FitnessRecord(f64, f64);

impl From<FitnessRecord> for FitnessScore {
    fn from(record: FitnessRecord) -> Self {
        Self {
            s11: record.0,
            gain: record.1,
        }
    }
}

impl From<FitnessScore> for FitnessRecord {
    fn from(score: FitnessScore) -> Self {
        FitnessRecord(score.s11, score.gain)
    }
}

impl FitnessScore {
    pub fn new(s11: f64, gain: f64) -> Self {
        Self { s11, gain }
    }

    pub fn objectives(&self) -> [f64; 2] {
        [self.s11, self.gain]
    }

    /// Scalar sum, only used to weight parent selection.
    pub fn total(&self) -> f64 {
        self.s11 + self.gain
    }

    /// Component-wise `<=`, used for convergence checks.
    pub fn within(&self, threshold: &FitnessScore) -> bool {
        self.s11 <= threshold.s11 && self.gain <= threshold.gain
    }
}

impl fmt::Display for FitnessScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6e}, {:.6e})", self.s11, self.gain)
    }
}

/// A contiguous span of the return-loss curve at or below the band threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub f_min: f64,
    pub f_max: f64,
    /// `10^(min_dB / 20)` of the deepest sample in the span.
    pub s11_min_linear: f64,
    /// `1 / 10^(mean_gain_dB / 10)` over gain samples inside the span.
    pub gain_metric: f64,
}

impl Band {
    pub fn bandwidth(&self) -> f64 {
        self.f_max - self.f_min
    }
}
