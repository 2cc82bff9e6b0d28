//! Numerical algorithms used by the simulation
//!
//! Currently only sample statistics (means, spread, normality checks).

pub mod stats;

pub use stats::{
    ks_normality, mean, normal_cdf, std_dev, weighted_mean, NormalityTest, Significance,
    StatsError,
};
