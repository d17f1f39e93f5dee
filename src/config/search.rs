use super::traits::{invalid, ConfigSection};
use crate::error::SearchError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub population_size: usize,
    pub number_of_offspring: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    /// Decimal places kept on every gene.
    pub rounding: u32,
    /// Single-gene resamples tried on a crossover child before it is replaced.
    pub repair_attempts: usize,
    /// Random samples tried before accepting a fallback that skipped revalidation.
    pub sample_attempts: usize,
    pub max_generations: Option<usize>,
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population_size: 12,
            number_of_offspring: 6,
            crossover_rate: 0.5,
            mutation_rate: 0.05,
            rounding: 2,
            repair_attempts: 10,
            sample_attempts: 100,
            max_generations: None,
            seed: None,
        }
    }
}

impl ConfigSection for SearchConfig {
    fn section_name() -> &'static str {
        "search"
    }

    fn validate(&self) -> Result<(), SearchError> {
        if self.population_size < 1 {
            return Err(invalid::<Self>("Population size must be at least 1"));
        }
        if self.number_of_offspring < 1 {
            return Err(invalid::<Self>("Number of offspring must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(invalid::<Self>("Mutation rate must be between 0 and 1"));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(invalid::<Self>("Crossover rate must be between 0 and 1"));
        }
        if self.rounding > 12 {
            return Err(invalid::<Self>("Rounding must be at most 12 decimal places"));
        }
        if self.max_generations == Some(0) {
            return Err(invalid::<Self>("Max generations must be at least 1 when set"));
        }
        Ok(())
    }
}
