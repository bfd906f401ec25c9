use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use tabdata::formats::Format;
use tabdata::transform;

use super::files::{read_file, resolve_format, write_output};
use super::Config;

/// Baseline region given by row indices, times, or both.
///
/// An index bound takes precedence over the time bound on the same side.
pub struct Baseline {
    pub low_index: Option<usize>,
    pub high_index: Option<usize>,
    pub low_time: Option<f64>,
    pub high_time: Option<f64>,
}

/// Normalize every column to its baseline mean
pub fn run(
    config: &Config,
    input: PathBuf,
    format: Option<Format>,
    baseline: Baseline,
    subtract: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let format = resolve_format(&input, format)?;
    let mut table = read_file(&input, format, config.read_options(None, b',', false)?)?;

    let by_time = if baseline.low_time.is_some() || baseline.high_time.is_some() {
        table
            .row_range_for_time(baseline.low_time, baseline.high_time)
            .context("Baseline times need a time column")?
    } else {
        0..table.npts()?
    };
    let rows = baseline.low_index.unwrap_or(by_time.start)..baseline.high_index.unwrap_or(by_time.end);
    info!(
        "Baseline rows {}..{}, subtract {}",
        rows.start, rows.end, subtract
    );

    transform::normalize(&mut table, rows, subtract).context("Normalization failed")?;
    write_output(
        output.as_deref(),
        format,
        &table,
        config.write_options(None, b',')?,
    )
}
