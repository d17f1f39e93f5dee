use super::traits::{invalid, ConfigSection};
use crate::error::SearchError;
use serde::{Deserialize, Serialize};

/// A target band in GHz. Band edges match when each lies within
/// `edge * (1 ± tolerance)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandObjective {
    pub low: f64,
    pub high: f64,
    pub tolerance: f64,
}

impl BandObjective {
    pub fn new(low: f64, high: f64, tolerance: f64) -> Self {
        Self { low, high, tolerance }
    }

    pub fn matches(&self, f_min: f64, f_max: f64) -> bool {
        let within = |edge: f64, f: f64| {
            edge * (1.0 - self.tolerance) <= f && f <= edge * (1.0 + self.tolerance)
        };
        within(self.low, f_min) && within(self.high, f_max)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectivesConfig {
    pub bands: Vec<BandObjective>,
}

impl Default for ObjectivesConfig {
    fn default() -> Self {
        Self {
            bands: vec![BandObjective::new(2.36, 2.44, 0.023)],
        }
    }
}

impl ConfigSection for ObjectivesConfig {
    fn section_name() -> &'static str {
        "objectives"
    }

    fn validate(&self) -> Result<(), SearchError> {
        if self.bands.is_empty() {
            return Err(invalid::<Self>("At least one band objective is required"));
        }
        for (i, band) in self.bands.iter().enumerate() {
            if !(band.low > 0.0 && band.low <= band.high) {
                return Err(invalid::<Self>(format!(
                    "Band {} must satisfy 0 < low <= high (got {} .. {})",
                    i, band.low, band.high
                )));
            }
            if band.tolerance < 0.0 {
                return Err(invalid::<Self>(format!(
                    "Band {} tolerance must not be negative",
                    i
                )));
            }
        }
        Ok(())
    }
}
