use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use tabdata::formats::Format;
use tabdata::transform;

use super::files::{read_file, write_output};
use super::Config;

/// Collate delimited files column-wise
pub fn run(
    config: &Config,
    files: Vec<PathBuf>,
    output: Option<PathBuf>,
    input_delimiter: Option<u8>,
    output_delimiter: Option<u8>,
    no_time: bool,
) -> Result<()> {
    let options = config.read_options(input_delimiter, b'\t', no_time)?;
    let tables = files
        .iter()
        .map(|path| read_file(path, Format::Csv, options))
        .collect::<Result<Vec<_>>>()?;

    let collated = transform::collate(&tables).context("Lengths of supplied files do not match")?;
    write_output(
        output.as_deref(),
        Format::Csv,
        &collated,
        config.write_options(output_delimiter, b',')?,
    )?;

    info!(
        "Collated {} files into {} columns",
        files.len(),
        collated.nvars()
    );
    Ok(())
}
