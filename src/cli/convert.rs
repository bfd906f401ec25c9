use anyhow::Result;
use log::info;
use std::path::PathBuf;

use tabdata::formats::Format;

use super::files::{derived_path, read_file, resolve_format, write_output};
use super::Config;

/// Convert a file from one format to another
pub fn run(
    config: &Config,
    input: PathBuf,
    output: Option<PathBuf>,
    from: Option<Format>,
    to: Option<Format>,
    (delimiter, output_delimiter): (Option<u8>, Option<u8>),
    no_time: bool,
) -> Result<()> {
    let from = resolve_format(&input, from)?;
    let to = match (to, &output) {
        (Some(format), _) => format,
        (None, Some(path)) => resolve_format(path, None)?,
        (None, None) => Format::Atf,
    };
    if !to.is_writable() {
        anyhow::bail!("{} files can be read but not written", to);
    }

    let output = output.unwrap_or_else(|| derived_path(&input, "", to.extension()));
    if output == input {
        anyhow::bail!(
            "Output would overwrite the input {}, pass an OUTPUT path",
            input.display()
        );
    }

    info!("Input:  {} ({})", input.display(), from);
    info!("Output: {} ({})", output.display(), to);

    let table = read_file(&input, from, config.read_options(delimiter, b',', no_time)?)?;
    write_output(
        Some(&output),
        to,
        &table,
        config.write_options(output_delimiter, b',')?,
    )?;

    info!(
        "Converted {} columns of {} rows",
        table.nvars(),
        table.npts().unwrap_or(0)
    );
    Ok(())
}
