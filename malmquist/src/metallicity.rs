//! Discrete metallicity classes and the dimming they cause
//!
//! Each star in the metallicity phase carries a class code from 1 to 6. The
//! code maps linearly to a fractional metallicity Z = (2·N + 1)/12, and metal
//! poor stars (small Z) are dimmed by 0.87·log₁₀(1/Z) magnitudes.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::MalmquistError;

/// Coefficient of the log-metallicity dimming term, in magnitudes per dex
pub const DIMMING_COEFFICIENT: f64 = 0.87;

/// Validated metallicity class code in `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MetallicityClass(u8);

impl MetallicityClass {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    /// Create a class, rejecting codes outside `1..=6`
    pub fn new(code: u8) -> Result<Self, MalmquistError> {
        if (Self::MIN..=Self::MAX).contains(&code) {
            Ok(Self(code))
        } else {
            Err(MalmquistError::InvalidMetallicityClass(code))
        }
    }

    /// Draw a class uniformly from `1..=6`
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(Self::MIN..=Self::MAX))
    }

    /// Every class in ascending order
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }

    pub fn code(self) -> u8 {
        self.0
    }

    /// Fractional metallicity Z for this class
    pub fn metallicity(self) -> f64 {
        metallicity(self)
    }

    /// Magnitudes of dimming for a star of this class
    pub fn dimming(self) -> f64 {
        metallicity_dimming(self)
    }
}

impl TryFrom<u8> for MetallicityClass {
    type Error = MalmquistError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::new(code)
    }
}

impl From<MetallicityClass> for u8 {
    fn from(class: MetallicityClass) -> Self {
        class.0
    }
}

impl fmt::Display for MetallicityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fractional metallicity Z = (2·N + 1)/12 for class code N
pub fn metallicity(class: MetallicityClass) -> f64 {
    (2.0 * f64::from(class.0) + 1.0) / 12.0
}

/// Extra dimming in magnitudes: 0.87·log₁₀(1/Z).
///
/// Classes with Z < 1 are dimmed. The top class has Z = 13/12 and so comes
/// out slightly brightened.
pub fn metallicity_dimming(class: MetallicityClass) -> f64 {
    DIMMING_COEFFICIENT * (1.0 / metallicity(class)).log10()
}
