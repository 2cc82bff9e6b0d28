//! Shared components and utilities for the Malmquist bias simulation.
//!
//! This crate holds the pieces that are not specific to stellar populations:
//! basic sample statistics and strongly-typed distance units.

pub mod algo;
pub mod units;
