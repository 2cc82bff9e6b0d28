//! Error type for population generation and bias analysis

use shared::algo::StatsError;
use thiserror::Error;

/// Errors that can occur while building or analysing a simulated sky.
#[derive(Error, Debug)]
pub enum MalmquistError {
    #[error("Invalid magnitude distribution (mean {mean}, sigma {sigma}): {reason}")]
    InvalidDistribution {
        mean: f64,
        sigma: f64,
        reason: String,
    },
    #[error("Invalid distance shell [{near}, {far}) pc: {reason}")]
    InvalidShell {
        near: f64,
        far: f64,
        reason: &'static str,
    },
    #[error("Metallicity class must be in 1..=6, got {0}")]
    InvalidMetallicityClass(u8),
    #[error("Unknown region '{0}'")]
    UnknownRegion(String),
    #[error("Region '{0}' is defined more than once")]
    DuplicateRegion(String),
    #[error("Configuration must define at least one region")]
    NoRegions,
    #[error("Limiting magnitude must be finite, got {0}")]
    InvalidLimitingMagnitude(f64),
    #[error("Region '{region}' would hold {count} stars, more than the limit of {max}")]
    TooManyStars {
        region: String,
        count: f64,
        max: usize,
    },
    #[error("Values per table line must be at least 1")]
    InvalidLineWidth,
    #[error("Cannot compute {what}: {source}")]
    EmptyPopulation {
        what: &'static str,
        #[source]
        source: StatsError,
    },
    #[error("Failed to read or write configuration: {0}")]
    ConfigIo(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl MalmquistError {
    /// Wrap a statistics failure with the name of the quantity being computed
    pub fn empty(what: &'static str) -> impl FnOnce(StatsError) -> Self {
        move |source| MalmquistError::EmptyPopulation { what, source }
    }
}

pub type Result<T> = std::result::Result<T, MalmquistError>;
