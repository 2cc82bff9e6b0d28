//! Malmquist bias simulation
//!
//! Generates synthetic stellar populations in distance shells, applies a
//! magnitude-limited detection cutoff, and compares the statistics of the
//! whole population with those of the observed sample.

pub mod bias;
pub mod config;
pub mod error;
pub mod metallicity;
pub mod region;
pub mod report;
pub mod shared_args;
pub mod simulation;
pub mod sky;
pub mod star_math;
pub mod table;

// Re-exports for easier access
pub use bias::{
    distance_bias, magnitude_bias, metallicity_bias, photometric_distance_estimate,
    DistanceBias, DistanceEstimate, MagnitudeBias, MetallicityBias,
};
pub use config::{RegionConfig, SimulationConfig};
pub use error::{MalmquistError, Result};
pub use metallicity::{metallicity, metallicity_dimming, MetallicityClass};
pub use region::{mean_distance, uniform_density, DistanceShell, Region, Star};
pub use report::{write_report, NoPause, Prompt, StdinPrompt};
pub use simulation::{
    run_simulation, BiasSummary, NormalityCheck, RegionSummary, SimulationOutcome,
};
pub use sky::Sky;
pub use star_math::{distance_modulus, gauss_mag, mag_v};
pub use table::{render_table, TableStyle};
