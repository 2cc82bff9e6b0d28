//! Plain-text table of regions and their stars
//!
//! One block per region: the first line carries n, d, μ, the absolute
//! magnitude limit and the first run of magnitudes; continuation lines hold
//! the rest of the magnitudes aligned under the first; a final line gives
//! the visible count. Visible stars are set in bold with ANSI escapes.

use crate::region::Region;
use crate::sky::Sky;

pub const BOLD: &str = "\x1b[1m";
pub const RESET: &str = "\x1b[0m";

/// Width of one magnitude cell before any escape codes
const CELL_WIDTH: usize = 5;

/// Significant digits for every number in the table
const SIGNIFICANT_DIGITS: usize = 4;

/// Layout options for [`render_table`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStyle {
    /// Magnitudes per line before wrapping
    pub values_per_line: usize,
    /// Set visible stars in bold
    pub highlight: bool,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            values_per_line: 6,
            highlight: true,
        }
    }
}

/// Format a number with `precision` significant digits, C `%g` style.
///
/// Trailing zeros are dropped, and scientific notation is used when the
/// decimal exponent is below -4 or at least `precision`.
pub fn format_general(value: f64, precision: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }
    let precision = precision.max(1);

    // Round to the requested significant digits first; the exponent can change
    let sci = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return sci;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exponent.abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

fn magnitude_cell(region: &Region, magnitude: f64, highlight: bool) -> String {
    let cell = format!(
        "{:<width$}",
        format_general(magnitude, SIGNIFICANT_DIGITS),
        width = CELL_WIDTH
    );
    if highlight && region.is_visible(magnitude) {
        format!("{BOLD}{cell}{RESET}")
    } else {
        cell
    }
}

/// Column header and separator line for a given apparent magnitude limit
fn header(limiting_magnitude: f64) -> String {
    let limit_label = format!(
        "{}−μ",
        format_general(limiting_magnitude, SIGNIFICANT_DIGITS)
    );
    let title = format!(
        "{:<6} {:>3} {:>7} {:>7} {:>7}  M_V (bold = visible)",
        "Region", "n", "d(pc)", "μ", limit_label
    );
    let rule = "-".repeat(title.chars().count());
    format!("{title}\n{rule}\n")
}

/// Lines for one region: magnitude rows followed by the visible count
fn render_region(region: &Region, style: &TableStyle) -> Vec<String> {
    let cells: Vec<String> = region
        .magnitudes()
        .map(|m| magnitude_cell(region, m, style.highlight))
        .collect();

    let lead = format!(
        "{:<6} {:>3} {:>7} {:>7} {:>7}  ",
        region.name(),
        region.star_count(),
        region.mean_distance_pc().trunc() as i64,
        format_general(region.distance_modulus(), SIGNIFICANT_DIGITS),
        format_general(region.absolute_limit(), SIGNIFICANT_DIGITS),
    );
    let indent = " ".repeat(lead.chars().count());

    let mut lines: Vec<String> = cells
        .chunks(style.values_per_line.max(1))
        .enumerate()
        .map(|(i, chunk)| {
            let prefix = if i == 0 { &lead } else { &indent };
            format!("{prefix}{}", chunk.join(" "))
        })
        .collect();
    if lines.is_empty() {
        lines.push(lead);
    }

    lines.push(format!(
        "{:<6} {:>3} {:>7} {:>7} {:>7}  visible: {}/{}",
        "",
        "",
        "",
        "",
        "",
        region.visible_count(),
        region.star_count()
    ));
    lines
}

/// Render every region of the sky as a table
pub fn render_table(sky: &Sky, style: &TableStyle) -> String {
    let limiting_magnitude = sky
        .regions()
        .first()
        .map(Region::limiting_magnitude)
        .unwrap_or(10.0);

    let mut out = header(limiting_magnitude);
    for region in sky.regions() {
        for line in render_region(region, style) {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}
