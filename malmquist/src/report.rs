//! Narrative write-up of a simulation run
//!
//! The report walks through five parts, (c) to (g), pausing between them.
//! Pausing is delegated to a [`Prompt`] so the same report can run
//! interactively or straight through.

use std::io::{self, BufRead, Write};

use crate::simulation::SimulationOutcome;
use crate::table::{format_general, render_table, TableStyle};

const SIGNIFICANT_DIGITS: usize = 4;

/// Something that pauses between report sections
pub trait Prompt {
    /// Called after each part except the last
    fn pause(&mut self, out: &mut dyn Write) -> io::Result<()>;
}

/// Waits for the user to press Enter on standard input
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn pause(&mut self, out: &mut dyn Write) -> io::Result<()> {
        write!(out, "\nPress Enter to continue...\n")?;
        out.flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(())
    }
}

/// Separates sections with a blank line and never blocks
#[derive(Debug, Default)]
pub struct NoPause;

impl Prompt for NoPause {
    fn pause(&mut self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out)
    }
}

fn g(value: f64) -> String {
    format_general(value, SIGNIFICANT_DIGITS)
}

/// "B and C", "A, B and C"
fn join_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

fn write_magnitude_part(
    out: &mut dyn Write,
    title: &str,
    table: &str,
    delta: f64,
) -> io::Result<()> {
    writeln!(out, "{title}")?;
    write!(out, "{table}")?;
    writeln!(out, "\tΔM̄ = M̄_all − M̄_sample = {} mag", g(delta))
}

/// Write all five parts of the report to `out`.
pub fn write_report<P: Prompt + ?Sized>(
    outcome: &SimulationOutcome,
    style: &TableStyle,
    out: &mut dyn Write,
    prompt: &mut P,
) -> io::Result<()> {
    let summary = &outcome.summary;

    write_magnitude_part(
        out,
        "Part (c)",
        &render_table(&outcome.sky, style),
        summary.magnitude.delta,
    )?;
    prompt.pause(out)?;

    writeln!(out, "Part (d)")?;
    writeln!(out, "d̄_all = {} pc", g(summary.distance.mean_all_pc))?;
    writeln!(out, "d̄_sample = {} pc", g(summary.distance.mean_sample_pc))?;
    prompt.pause(out)?;

    let estimate = &summary.distance_estimate;
    let direction = if estimate.is_overestimate() {
        "over"
    } else {
        "under"
    };
    writeln!(out, "Part (e)")?;
    writeln!(
        out,
        "If we assume our sample stars have the average luminosity for all stars and"
    )?;
    writeln!(
        out,
        "then calculate their distances from their apparent magnitudes, then"
    )?;
    writeln!(out, "d̂_sample = {} pc.", g(estimate.estimated_sample_pc))?;
    writeln!(
        out,
        "We would be {direction}estimating the average distance by {} parsecs",
        g(estimate.delta_pc.abs())
    )?;
    prompt.pause(out)?;

    write_magnitude_part(
        out,
        "Part (f) - Metallicity Dimming",
        &render_table(&outcome.dimmed_sky, style),
        summary.dimmed_magnitude.delta,
    )?;
    prompt.pause(out)?;

    let metallicity = &summary.metallicity;
    let richer = if metallicity.sample_is_richer() {
        "more"
    } else {
        "less"
    };
    writeln!(out, "Part (g)")?;
    writeln!(out, "\tZ_all: {}", g(metallicity.mean_all))?;
    writeln!(out, "\tZ_sample: {}", g(metallicity.mean_sample))?;
    writeln!(
        out,
        "The observed sample in regions {} is {richer}",
        join_names(&metallicity.sample_regions)
    )?;
    writeln!(out, "metal-rich than the overall population.")?;
    out.flush()
}
