use super::bands::{extract_bands, worst_gain_metric, RETURN_LOSS_THRESHOLD_DB};
use crate::config::BandObjective;
use crate::error::{Result, SearchError};
use crate::types::{Band, FitnessScore, Individual, SimulationResult};

/// Scale applied to the no-band penalty so it dwarfs any in-range score.
pub const NO_BAND_PENALTY_SCALE: f64 = 9e9;

/// GHz to MHz.
const MHZ_PER_GHZ: f64 = 1000.0;

/// Maps a simulated frequency response to a two-objective score.
///
/// The score is 0 when every objective band is found exactly once, sits
/// within tolerance, and has unbounded bandwidth and gain; everything else
/// raises one or both components.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    objectives: Vec<BandObjective>,
}

impl FitnessEvaluator {
    pub fn new(objectives: Vec<BandObjective>) -> Result<Self> {
        if objectives.is_empty() {
            return Err(SearchError::Configuration(
                "Fitness evaluation needs at least one band objective".to_string(),
            ));
        }
        Ok(Self { objectives })
    }

    pub fn objectives(&self) -> &[BandObjective] {
        &self.objectives
    }

    pub fn evaluate(&self, result: &SimulationResult) -> FitnessScore {
        self.score_bands(&extract_bands(result))
    }

    pub fn evaluate_individual(&self, index: usize, individual: &Individual) -> Result<FitnessScore> {
        individual
            .result
            .as_ref()
            .map(|result| self.evaluate(result))
            .ok_or(SearchError::NotEvaluated { index })
    }

    pub fn score_bands(&self, bands: &[Band]) -> FitnessScore {
        if bands.is_empty() {
            let s11 = self
                .objectives
                .iter()
                .map(|o| (o.low + o.high).abs() * NO_BAND_PENALTY_SCALE)
                .sum();
            return FitnessScore::new(s11, worst_gain_metric());
        }

        let bias = self.objectives.len().abs_diff(bands.len()) as f64;
        let mut score = FitnessScore::new(bias, bias);

        for band in bands {
            let mut best = f64::INFINITY;
            let mut objective_met = false;

            for objective in &self.objectives {
                let contribution = if objective.matches(band.f_min, band.f_max) {
                    objective_met = true;
                    bandwidth_reward(band)
                } else {
                    MHZ_PER_GHZ
                        * ((band.f_min - objective.low).abs() + (band.f_max - objective.high).abs())
                };
                best = best.min(contribution);
            }

            score.s11 += best;
            score.gain += if objective_met && bias == 0.0 {
                band.gain_metric
            } else {
                worst_gain_metric()
            };
        }

        score
    }
}

/// `1 / (1000 * bandwidth) * 10^(-10/20)`; wider matching bands score lower.
fn bandwidth_reward(band: &Band) -> f64 {
    let threshold_linear = 10f64.powf(RETURN_LOSS_THRESHOLD_DB / 20.0);
    let bandwidth = band.bandwidth();
    if bandwidth == 0.0 {
        threshold_linear / MHZ_PER_GHZ
    } else {
        threshold_linear / (MHZ_PER_GHZ * bandwidth)
    }
}
