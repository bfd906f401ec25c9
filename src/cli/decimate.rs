use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use tabdata::formats::Format;
use tabdata::transform::{self, Direction};

use super::files::{derived_path, read_file, resolve_format, write_output};
use super::Config;

/// Decimate a recording, keeping peaks in the given direction
pub fn run(
    config: &Config,
    input: PathBuf,
    output: Option<PathBuf>,
    format: Option<Format>,
    factor: usize,
    direction: Direction,
    threshold: Option<f64>,
) -> Result<()> {
    let format = resolve_format(&input, format)?;
    let output = output.unwrap_or_else(|| derived_path(&input, "_dec", format.extension()));

    info!("Input:  {}", input.display());
    info!("Output: {}", output.display());
    info!("Factor {}, direction {:?}", factor, direction);

    let table = read_file(&input, format, config.read_options(None, b',', false)?)?;
    let decimated = transform::decimate(&table, factor, direction, threshold)
        .context("Decimation failed")?;
    write_output(
        Some(&output),
        format,
        &decimated,
        config.write_options(None, b',')?,
    )
}
