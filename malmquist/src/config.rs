//! Simulation parameters
//!
//! The defaults reproduce the classic three-shell exercise: regions A, B and C
//! at 70–90, 90–110 and 110–130 pc, 50 stars in B, solar-like absolute
//! magnitudes with 0.3 mag scatter, and a survey limit of V = 10.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MalmquistError, Result};
use crate::region::{uniform_density, DistanceShell};
use crate::star_math::{magnitude_distribution, SOLAR_ABSOLUTE_MAGNITUDE};

/// Most stars a single region may hold
pub const MAX_STARS_PER_REGION: usize = 1_000_000;

/// Name and distance bounds of one sky region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    pub name: String,
    /// Inner bound in parsecs (inclusive)
    pub near_pc: f64,
    /// Outer bound in parsecs (exclusive)
    pub far_pc: f64,
}

impl RegionConfig {
    pub fn new(name: impl Into<String>, near_pc: f64, far_pc: f64) -> Self {
        Self {
            name: name.into(),
            near_pc,
            far_pc,
        }
    }

    pub fn shell(&self) -> Result<DistanceShell> {
        DistanceShell::from_parsecs(self.near_pc, self.far_pc)
    }
}

/// Full set of simulation parameters.
///
/// Missing fields in a configuration file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Regions in display order
    pub regions: Vec<RegionConfig>,
    /// Region whose star count sets the space density
    pub reference_region: String,
    /// Number of stars in the reference region
    pub reference_count: u32,
    /// Mean absolute V magnitude of the population
    pub mean_absolute_magnitude: f64,
    /// Standard deviation of absolute magnitudes
    pub magnitude_sigma: f64,
    /// Faintest apparent magnitude the survey detects
    pub limiting_magnitude: f64,
    /// Regions whose observed stars make up the metallicity sample
    pub metallicity_regions: Vec<String>,
    /// Magnitudes printed per table line
    pub values_per_line: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            regions: vec![
                RegionConfig::new("A", 70.0, 90.0),
                RegionConfig::new("B", 90.0, 110.0),
                RegionConfig::new("C", 110.0, 130.0),
            ],
            reference_region: "B".to_string(),
            reference_count: 50,
            mean_absolute_magnitude: SOLAR_ABSOLUTE_MAGNITUDE,
            magnitude_sigma: 3.0 / 10.0,
            limiting_magnitude: 10.0,
            metallicity_regions: vec!["B".to_string(), "C".to_string()],
            values_per_line: 6,
        }
    }
}

impl SimulationConfig {
    /// Load a configuration from a JSON file and validate it
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as pretty-printed JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Look up a region definition by name
    pub fn region(&self, name: &str) -> Result<&RegionConfig> {
        self.regions
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| MalmquistError::UnknownRegion(name.to_string()))
    }

    /// Star count of `region` at the reference region's space density.
    ///
    /// Halves round to the nearest even count.
    pub fn star_count(&self, region: &RegionConfig) -> Result<usize> {
        let reference = self.region(&self.reference_region)?.shell()?;
        let expected = uniform_density(
            &reference,
            f64::from(self.reference_count),
            &region.shell()?,
        )
        .round_ties_even();

        if expected > MAX_STARS_PER_REGION as f64 {
            return Err(MalmquistError::TooManyStars {
                region: region.name.clone(),
                count: expected,
                max: MAX_STARS_PER_REGION,
            });
        }
        Ok(expected as usize)
    }

    /// Check that every parameter describes a runnable simulation.
    ///
    /// # Errors
    /// - `NoRegions` if no regions are defined
    /// - `DuplicateRegion` if two regions share a name
    /// - `InvalidShell` for bad distance bounds
    /// - `UnknownRegion` if the reference or a metallicity region is missing
    /// - `InvalidDistribution` for a negative or non-finite sigma
    /// - `InvalidLimitingMagnitude` for a non-finite survey limit
    /// - `TooManyStars` if a region would exceed [`MAX_STARS_PER_REGION`]
    /// - `InvalidLineWidth` if `values_per_line` is zero
    pub fn validate(&self) -> Result<()> {
        if self.regions.is_empty() {
            return Err(MalmquistError::NoRegions);
        }

        let mut seen = HashSet::new();
        for region in &self.regions {
            if !seen.insert(region.name.as_str()) {
                return Err(MalmquistError::DuplicateRegion(region.name.clone()));
            }
            region.shell()?;
        }

        self.region(&self.reference_region)?;
        for name in &self.metallicity_regions {
            self.region(name)?;
        }

        magnitude_distribution(self.mean_absolute_magnitude, self.magnitude_sigma)?;
        if !self.limiting_magnitude.is_finite() {
            return Err(MalmquistError::InvalidLimitingMagnitude(
                self.limiting_magnitude,
            ));
        }
        for region in &self.regions {
            self.star_count(region)?;
        }

        if self.values_per_line == 0 {
            return Err(MalmquistError::InvalidLineWidth);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.regions.len(), 3);
        assert_eq!(config.reference_count, 50);
        assert_eq!(config.mean_absolute_magnitude, 4.8);
    }

    #[test]
    fn test_file_round_trip() {
        let mut config = SimulationConfig::default();
        config.reference_count = 80;
        config.regions.push(RegionConfig::new("D", 130.0, 150.0));

        let file = NamedTempFile::new().unwrap();
        config.save_to_file(file.path()).unwrap();
        let loaded = SimulationConfig::load_from_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{ "reference_count": 120, "limiting_magnitude": 9.5 }"#)
            .unwrap();

        let loaded = SimulationConfig::load_from_file(file.path()).unwrap();
        assert_eq!(loaded.reference_count, 120);
        assert_eq!(loaded.limiting_magnitude, 9.5);
        assert_eq!(loaded.regions, SimulationConfig::default().regions);
    }

    #[test]
    fn test_load_errors() {
        let missing = std::path::Path::new("/nonexistent/malmquist.json");
        assert!(matches!(
            SimulationConfig::load_from_file(missing),
            Err(MalmquistError::ConfigIo(_))
        ));

        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "{ not json").unwrap();
        assert!(matches!(
            SimulationConfig::load_from_file(file.path()),
            Err(MalmquistError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_validation_failures() {
        let mut config = SimulationConfig::default();
        config.reference_region = "Z".to_string();
        assert!(matches!(
            config.validate(),
            Err(MalmquistError::UnknownRegion(name)) if name == "Z"
        ));

        let mut config = SimulationConfig::default();
        config.regions.push(RegionConfig::new("A", 200.0, 210.0));
        assert!(matches!(
            config.validate(),
            Err(MalmquistError::DuplicateRegion(_))
        ));

        let mut config = SimulationConfig::default();
        config.regions[0].far_pc = 60.0;
        assert!(matches!(
            config.validate(),
            Err(MalmquistError::InvalidShell { .. })
        ));

        let mut config = SimulationConfig::default();
        config.magnitude_sigma = -1.0;
        assert!(matches!(
            config.validate(),
            Err(MalmquistError::InvalidDistribution { .. })
        ));

        let mut config = SimulationConfig::default();
        config.values_per_line = 0;
        assert!(matches!(
            config.validate(),
            Err(MalmquistError::InvalidLineWidth)
        ));

        let mut config = SimulationConfig::default();
        config.metallicity_regions = vec!["Q".to_string()];
        assert!(config.validate().is_err());

        let config = SimulationConfig {
            regions: vec![],
            ..SimulationConfig::default()
        };
        assert!(matches!(config.validate(), Err(MalmquistError::NoRegions)));
    }

    #[test]
    fn test_non_finite_limit_rejected() {
        for limit in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let config = SimulationConfig {
                limiting_magnitude: limit,
                ..SimulationConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(MalmquistError::InvalidLimitingMagnitude(_))
            ));
        }
    }

    #[test]
    fn test_star_count_is_capped() {
        let config = SimulationConfig {
            reference_count: 4_000_000_000,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MalmquistError::TooManyStars { ref region, max, .. })
                if region == "A" && max == MAX_STARS_PER_REGION
        ));

        let config = SimulationConfig {
            reference_count: MAX_STARS_PER_REGION as u32,
            regions: vec![RegionConfig::new("B", 90.0, 110.0)],
            metallicity_regions: vec!["B".to_string()],
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_star_count_rounds_half_to_even() {
        // (2³ − 1³) / (4³ − 2³) = 7 / 56, so 20 reference stars give 2.5
        let config = SimulationConfig {
            regions: vec![
                RegionConfig::new("a", 1.0, 2.0),
                RegionConfig::new("b", 2.0, 4.0),
            ],
            reference_region: "b".to_string(),
            reference_count: 20,
            metallicity_regions: vec!["b".to_string()],
            ..SimulationConfig::default()
        };
        assert_eq!(config.star_count(&config.regions[0]).unwrap(), 2);

        // 3.5 rounds up to 4
        let config = SimulationConfig {
            reference_count: 28,
            ..config
        };
        assert_eq!(config.star_count(&config.regions[0]).unwrap(), 4);
        assert_eq!(config.star_count(&config.regions[1]).unwrap(), 28);
    }
}
