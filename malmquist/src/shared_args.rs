//! Command-line arguments for configuring a simulation run

use std::path::PathBuf;

use clap::Parser;

use crate::config::{RegionConfig, SimulationConfig};
use crate::error::Result;
use crate::table::TableStyle;

/// Parse a region in format "name:near:far" (bounds in parsecs)
fn parse_region(s: &str) -> std::result::Result<RegionConfig, String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 3 {
        return Err("Region must be in format 'name:near:far'".to_string());
    }

    let name = parts[0].trim();
    if name.is_empty() {
        return Err("Region name cannot be empty".to_string());
    }
    let near_pc = parts[1]
        .trim()
        .parse::<f64>()
        .map_err(|_| "Invalid near distance".to_string())?;
    let far_pc = parts[2]
        .trim()
        .parse::<f64>()
        .map_err(|_| "Invalid far distance".to_string())?;

    let region = RegionConfig::new(name, near_pc, far_pc);
    region.shell().map_err(|e| e.to_string())?;
    Ok(region)
}

/// Simulation parameters that can be given on the command line.
///
/// Anything left unset falls back to the configuration file, and then to the
/// built-in defaults.
#[derive(Parser, Debug, Clone, Default)]
pub struct SimulationArgs {
    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Random seed for reproducible runs (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Region as "name:near:far" in parsecs; repeat to replace the default regions
    #[arg(long = "region", value_parser = parse_region)]
    pub regions: Vec<RegionConfig>,

    /// Region whose star count sets the space density
    #[arg(long)]
    pub reference_region: Option<String>,

    /// Number of stars in the reference region
    #[arg(long)]
    pub reference_count: Option<u32>,

    /// Mean absolute V magnitude of the population
    #[arg(long, allow_negative_numbers = true)]
    pub mean_magnitude: Option<f64>,

    /// Standard deviation of absolute magnitudes
    #[arg(long)]
    pub sigma: Option<f64>,

    /// Faintest apparent magnitude the survey detects
    #[arg(long, allow_negative_numbers = true)]
    pub limiting_magnitude: Option<f64>,

    /// Region names whose observed stars form the metallicity sample
    #[arg(long, value_delimiter = ',')]
    pub metallicity_regions: Vec<String>,

    /// Magnitudes printed per table line
    #[arg(long)]
    pub per_line: Option<usize>,

    /// Disable bold highlighting of visible stars
    #[arg(long, default_value_t = false)]
    pub no_color: bool,
}

impl SimulationArgs {
    /// Build the effective configuration: file (or defaults) plus command-line overrides
    pub fn resolve_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::load_from_file(path)?,
            None => SimulationConfig::default(),
        };

        if !self.regions.is_empty() {
            config.regions = self.regions.clone();
        }
        if let Some(name) = &self.reference_region {
            config.reference_region = name.clone();
        }
        if let Some(count) = self.reference_count {
            config.reference_count = count;
        }
        if let Some(mean) = self.mean_magnitude {
            config.mean_absolute_magnitude = mean;
        }
        if let Some(sigma) = self.sigma {
            config.magnitude_sigma = sigma;
        }
        if let Some(limit) = self.limiting_magnitude {
            config.limiting_magnitude = limit;
        }
        if !self.metallicity_regions.is_empty() {
            config.metallicity_regions = self.metallicity_regions.clone();
        }
        if let Some(per_line) = self.per_line {
            config.values_per_line = per_line;
        }

        config.validate()?;
        Ok(config)
    }

    /// Table layout for a resolved configuration
    pub fn table_style(&self, config: &SimulationConfig) -> TableStyle {
        TableStyle {
            values_per_line: config.values_per_line,
            highlight: !self.no_color,
        }
    }
}
