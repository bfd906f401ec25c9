use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use tabdata::formats::Format;
use tabdata::transform;

use super::files::{derived_path, read_file, resolve_format, write_output};
use super::Config;

/// Join recordings end to end
pub fn run(
    config: &Config,
    files: Vec<PathBuf>,
    output: Option<PathBuf>,
    format: Option<Format>,
    t0: Option<f64>,
    dt: Option<f64>,
) -> Result<()> {
    let Some(first) = files.first() else {
        anyhow::bail!("No input files given");
    };
    let format = resolve_format(first, format)?;
    let output = output.unwrap_or_else(|| derived_path(first, "_combined", format.extension()));

    let options = config.read_options(None, b',', false)?;
    let tables = files
        .iter()
        .map(|path| read_file(path, format, options))
        .collect::<Result<Vec<_>>>()?;

    let joined = transform::join(&tables, t0, dt).context("Failed to join inputs")?;
    write_output(
        Some(&output),
        format,
        &joined,
        config.write_options(None, b',')?,
    )?;

    info!("Joined {} files into {}", files.len(), output.display());
    Ok(())
}
