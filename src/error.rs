use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Boundary violation: {0}")]
    Boundary(#[from] BoundaryViolation),

    #[error("Invalid simulation result: {0}")]
    InvalidSimulationResult(String),

    #[error("Individual {index} has no simulation result")]
    NotEvaluated { index: usize },

    #[error("Simulator error: {0}")]
    Simulator(#[source] anyhow::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Reason a parameter vector falls outside the explorable design space.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundaryViolation {
    #[error("expected {expected} genes, got {actual}")]
    Dimension { expected: usize, actual: usize },

    #[error("gene {index} = {value} outside [{min}, {max}]")]
    GeneOutOfRange {
        index: usize,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("explore-space constraint {index} evaluates to {value}, outside [{min}, {max}]")]
    Constraint {
        index: usize,
        value: f64,
        min: f64,
        max: f64,
    },
}

pub type Result<T> = std::result::Result<T, SearchError>;
