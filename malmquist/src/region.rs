//! Distance shells and the stars observed in them
//!
//! A region is a spherical shell of the sky between two distances. All stars
//! in a region are placed at the shell's mean distance, so a single distance
//! modulus decides which of them make it into a magnitude-limited sample.

use std::fmt;

use log::debug;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use shared::units::{Length, LengthExt};

use crate::error::{MalmquistError, Result};
use crate::metallicity::MetallicityClass;
use crate::star_math::distance_modulus;

/// Half-open distance interval `[near, far)`, bounds in parsecs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceShell {
    near_pc: f64,
    far_pc: f64,
}

impl DistanceShell {
    /// Create a shell from bounds in parsecs.
    ///
    /// The near bound must be positive and the far bound strictly beyond it.
    pub fn from_parsecs(near_pc: f64, far_pc: f64) -> Result<Self> {
        let invalid = |reason| MalmquistError::InvalidShell {
            near: near_pc,
            far: far_pc,
            reason,
        };
        if !near_pc.is_finite() || !far_pc.is_finite() {
            return Err(invalid("bounds must be finite"));
        }
        if near_pc <= 0.0 {
            return Err(invalid("near bound must be positive"));
        }
        if far_pc <= near_pc {
            return Err(invalid("far bound must exceed near bound"));
        }
        Ok(Self { near_pc, far_pc })
    }

    pub fn near_pc(&self) -> f64 {
        self.near_pc
    }

    pub fn far_pc(&self) -> f64 {
        self.far_pc
    }

    /// Midpoint of the interval in parsecs
    pub fn mean_distance_pc(&self) -> f64 {
        self.near_pc + (self.far_pc - self.near_pc) / 2.0
    }

    /// Shell volume up to the constant 4π/3, in pc³: far³ − near³
    pub fn volume_factor(&self) -> f64 {
        self.far_pc.powi(3) - self.near_pc.powi(3)
    }
}

impl fmt::Display for DistanceShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}) pc", self.near_pc, self.far_pc)
    }
}

/// Mean distance of a shell
pub fn mean_distance(shell: &DistanceShell) -> Length {
    Length::from_parsecs(shell.mean_distance_pc())
}

/// Expected star count in `target` for the same space density as `reference`.
///
/// n_target = n_ref · V_target / V_ref, with V ∝ far³ − near³.
pub fn uniform_density(
    reference: &DistanceShell,
    reference_count: f64,
    target: &DistanceShell,
) -> f64 {
    reference_count * (target.volume_factor() / reference.volume_factor())
}

/// A single synthetic star
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    /// Absolute V magnitude
    pub absolute_magnitude: f64,
    /// Metallicity class, assigned only in the metallicity phase
    pub metallicity_class: Option<MetallicityClass>,
}

impl Star {
    pub fn new(absolute_magnitude: f64) -> Self {
        Self {
            absolute_magnitude,
            metallicity_class: None,
        }
    }

    /// Fractional metallicity, if a class has been assigned
    pub fn metallicity(&self) -> Option<f64> {
        self.metallicity_class.map(MetallicityClass::metallicity)
    }
}

/// One shell of the sky and its population.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    name: String,
    shell: DistanceShell,
    mean_distance_pc: f64,
    distance_modulus: f64,
    limiting_magnitude: f64,
    stars: Vec<Star>,
}

impl Region {
    /// Create a region from an explicit list of stars.
    ///
    /// # Arguments
    /// * `name` - Region label
    /// * `shell` - Distance interval of the region
    /// * `limiting_magnitude` - Faintest apparent magnitude the survey detects
    /// * `stars` - Population of the region
    pub fn new(
        name: impl Into<String>,
        shell: DistanceShell,
        limiting_magnitude: f64,
        stars: Vec<Star>,
    ) -> Self {
        let mean_distance_pc = shell.mean_distance_pc();
        Self {
            name: name.into(),
            shell,
            mean_distance_pc,
            distance_modulus: distance_modulus(mean_distance_pc),
            limiting_magnitude,
            stars,
        }
    }

    /// Create a region of `star_count` stars with magnitudes drawn from `distribution`
    pub fn populate<R: Rng + ?Sized>(
        name: impl Into<String>,
        shell: DistanceShell,
        star_count: usize,
        limiting_magnitude: f64,
        distribution: &Normal<f64>,
        rng: &mut R,
    ) -> Self {
        let stars = (0..star_count)
            .map(|_| Star::new(distribution.sample(rng)))
            .collect();
        let region = Self::new(name, shell, limiting_magnitude, stars);
        debug!(
            "Region {}: {} stars in {}, d = {:.1} pc, mu = {:.3}, {} visible",
            region.name,
            region.star_count(),
            region.shell,
            region.mean_distance_pc,
            region.distance_modulus,
            region.visible_count()
        );
        region
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shell(&self) -> &DistanceShell {
        &self.shell
    }

    /// Number of stars n
    pub fn star_count(&self) -> usize {
        self.stars.len()
    }

    /// Mean distance d in parsecs
    pub fn mean_distance_pc(&self) -> f64 {
        self.mean_distance_pc
    }

    /// Distance modulus μ at the mean distance
    pub fn distance_modulus(&self) -> f64 {
        self.distance_modulus
    }

    /// Apparent limiting magnitude of the survey
    pub fn limiting_magnitude(&self) -> f64 {
        self.limiting_magnitude
    }

    /// Faintest absolute magnitude still detected: limit − μ
    pub fn absolute_limit(&self) -> f64 {
        self.limiting_magnitude - self.distance_modulus
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Whether a star of this absolute magnitude is detected in this region
    pub fn is_visible(&self, absolute_magnitude: f64) -> bool {
        absolute_magnitude < self.absolute_limit()
    }

    /// Absolute magnitudes of every star, in generation order
    pub fn magnitudes(&self) -> impl Iterator<Item = f64> + '_ {
        self.stars.iter().map(|s| s.absolute_magnitude)
    }

    /// Stars that pass the detection cutoff
    pub fn visible_stars(&self) -> impl Iterator<Item = &Star> + '_ {
        self.stars
            .iter()
            .filter(|s| self.is_visible(s.absolute_magnitude))
    }

    /// Magnitudes of the observed sample
    pub fn sample(&self) -> Vec<f64> {
        self.visible_stars().map(|s| s.absolute_magnitude).collect()
    }

    pub fn visible_count(&self) -> usize {
        self.visible_stars().count()
    }

    /// New region with a random metallicity class per star and the matching dimming applied
    pub fn with_metallicity_dimming<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let stars = self
            .stars
            .iter()
            .map(|star| {
                let class = MetallicityClass::random(rng);
                Star {
                    absolute_magnitude: star.absolute_magnitude + class.dimming(),
                    metallicity_class: Some(class),
                }
            })
            .collect();
        Self {
            name: self.name.clone(),
            shell: self.shell,
            mean_distance_pc: self.mean_distance_pc,
            distance_modulus: self.distance_modulus,
            limiting_magnitude: self.limiting_magnitude,
            stars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn shell(near: f64, far: f64) -> DistanceShell {
        DistanceShell::from_parsecs(near, far).unwrap()
    }

    #[test]
    fn test_mean_distance_midpoint() {
        assert_eq!(shell(90.0, 110.0).mean_distance_pc(), 100.0);
        assert_eq!(shell(70.0, 90.0).mean_distance_pc(), 80.0);
        assert_eq!(shell(1.0, 2.0).mean_distance_pc(), 1.5);
        assert_relative_eq!(
            mean_distance(&shell(90.0, 110.0)).as_parsecs(),
            100.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_shell_validation() {
        assert!(DistanceShell::from_parsecs(0.0, 10.0).is_err());
        assert!(DistanceShell::from_parsecs(-5.0, 10.0).is_err());
        assert!(DistanceShell::from_parsecs(10.0, 10.0).is_err());
        assert!(DistanceShell::from_parsecs(20.0, 10.0).is_err());
        assert!(DistanceShell::from_parsecs(10.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_shell_display() {
        assert_eq!(shell(90.0, 110.0).to_string(), "[90, 110) pc");
        assert_eq!(shell(1.5, 2.0).to_string(), "[1.5, 2) pc");
    }

    #[test]
    fn test_uniform_density_default_regions() {
        let b = shell(90.0, 110.0);
        assert_relative_eq!(uniform_density(&b, 50.0, &b), 50.0, epsilon = 1e-9);
        assert_eq!(uniform_density(&b, 50.0, &shell(70.0, 90.0)).round(), 32.0);
        assert_eq!(uniform_density(&b, 50.0, &shell(110.0, 130.0)).round(), 72.0);
    }

    #[test]
    fn test_uniform_density_scales_with_volume() {
        let reference = shell(90.0, 110.0);
        let target = shell(10.0, 20.0);
        let doubled = shell(20.0, 40.0);

        // Doubling both bounds multiplies the volume by 2³
        let base = uniform_density(&reference, 50.0, &target);
        assert_relative_eq!(
            uniform_density(&reference, 50.0, &doubled),
            8.0 * base,
            max_relative = 1e-12
        );

        // Linear in the reference count
        assert_relative_eq!(
            uniform_density(&reference, 100.0, &target),
            2.0 * base,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_region_derived_quantities() {
        let region = Region::new("B", shell(90.0, 110.0), 10.0, vec![]);
        assert_relative_eq!(region.mean_distance_pc(), 100.0, epsilon = 1e-9);
        assert_relative_eq!(region.distance_modulus(), 5.0, epsilon = 1e-9);
        assert_relative_eq!(region.absolute_limit(), 5.0, epsilon = 1e-9);
        assert_eq!(region.star_count(), 0);
        assert!(region.sample().is_empty());
    }

    #[test]
    fn test_visibility_filter_is_strict() {
        let stars = [4.0, 4.999, 5.0, 5.2].into_iter().map(Star::new).collect();
        let region = Region::new("B", shell(90.0, 110.0), 10.0, stars);

        // 5.0 sits exactly on the limit and is not observed
        assert_eq!(region.sample(), vec![4.0, 4.999]);
        assert_eq!(region.visible_count(), 2);
    }

    #[test]
    fn test_sample_subset_of_population() {
        let mut rng = StdRng::seed_from_u64(11);
        let normal = Normal::new(4.8, 0.3).unwrap();
        for (near, far) in [(70.0, 90.0), (90.0, 110.0), (110.0, 130.0)] {
            let region = Region::populate("X", shell(near, far), 60, 10.0, &normal, &mut rng);
            let sample = region.sample();

            assert_eq!(region.star_count(), 60);
            assert!(sample.len() <= region.star_count());
            assert!(sample.iter().all(|&m| m < 10.0 - region.distance_modulus()));
        }
    }

    #[test]
    fn test_metallicity_dimming_returns_new_region() {
        let mut rng = StdRng::seed_from_u64(5);
        let normal = Normal::new(4.8, 0.3).unwrap();
        let original = Region::populate("C", shell(110.0, 130.0), 40, 10.0, &normal, &mut rng);
        let dimmed = original.with_metallicity_dimming(&mut rng);

        assert_eq!(dimmed.star_count(), original.star_count());
        assert!(original.stars().iter().all(|s| s.metallicity_class.is_none()));

        for (before, after) in original.stars().iter().zip(dimmed.stars()) {
            let class = after.metallicity_class.unwrap();
            assert_relative_eq!(
                after.absolute_magnitude,
                before.absolute_magnitude + class.dimming(),
                epsilon = 1e-12
            );
        }
        assert_eq!(dimmed.name(), "C");
        assert_relative_eq!(dimmed.distance_modulus(), original.distance_modulus());
    }
}
