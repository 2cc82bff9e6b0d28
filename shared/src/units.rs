//! Type-safe distance units for stellar populations
//!
//! Distances in the simulation are carried as `uom` lengths so that shell
//! bounds cannot be confused with magnitudes or bare ratios. Parsecs are the
//! working unit for everything photometric.

use uom::si::length::{light_year, parsec};

/// Type alias for length measurements with convenient methods
pub type Length = uom::si::f64::Length;

/// Extension trait for astronomical length conversions
pub trait LengthExt {
    /// Create length from parsecs
    fn from_parsecs(pc: f64) -> Self;

    /// Get length in parsecs
    fn as_parsecs(&self) -> f64;

    /// Get length in light years
    fn as_light_years(&self) -> f64;
}

impl LengthExt for Length {
    fn from_parsecs(pc: f64) -> Self {
        Length::new::<parsec>(pc)
    }

    fn as_parsecs(&self) -> f64 {
        self.get::<parsec>()
    }

    fn as_light_years(&self) -> f64 {
        self.get::<light_year>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parsec_conversions() {
        let ten_pc = Length::from_parsecs(10.0);
        assert_relative_eq!(ten_pc.as_parsecs(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(ten_pc.as_light_years(), 32.6156, epsilon = 1e-3);
    }

    #[test]
    fn test_length_ordering_and_math() {
        let near = Length::from_parsecs(90.0);
        let far = Length::from_parsecs(110.0);
        assert!(near < far);

        let width = far - near;
        assert_relative_eq!(width.as_parsecs(), 20.0, epsilon = 1e-9);

        let midpoint = near + width / 2.0;
        assert_relative_eq!(midpoint.as_parsecs(), 100.0, epsilon = 1e-9);
    }
}
