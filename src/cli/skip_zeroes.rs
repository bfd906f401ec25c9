use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use tabdata::formats::Format;
use tabdata::transform;

use super::files::{derived_path, read_file, resolve_format, write_output};
use super::Config;

/// Cut zero blocks out of a recording
pub fn run(
    config: &Config,
    input: PathBuf,
    output: Option<PathBuf>,
    format: Option<Format>,
    column: usize,
    min_run: Option<usize>,
    (t0, dt): (Option<f64>, Option<f64>),
) -> Result<()> {
    let format = resolve_format(&input, format)?;
    let output = output.unwrap_or_else(|| derived_path(&input, "_cut", format.extension()));

    let table = read_file(&input, format, config.read_options(None, b',', false)?)?;
    info!("Read {} rows from {}", table.npts().unwrap_or(0), input.display());

    let cut = transform::skip_zero_blocks(&table, column, min_run, t0, dt)
        .with_context(|| format!("Cannot cut zero blocks from column {}", column))?;
    write_output(
        Some(&output),
        format,
        &cut,
        config.write_options(None, b',')?,
    )?;

    info!("Wrote {} rows to {}", cut.npts().unwrap_or(0), output.display());
    Ok(())
}
