use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use tabdata::formats::Format;
use tabdata::stats::{column_stats, combined_stats, write_report, StatKind};

use super::files::{entry_name, read_file, resolve_format};
use super::Config;

/// Everything the stats subcommand was asked for
pub struct StatsRequest {
    pub input: PathBuf,
    pub format: Option<Format>,
    pub low: Option<f64>,
    pub high: Option<f64>,
    pub combine: bool,
    pub select: String,
    pub entry: Option<String>,
    pub header: bool,
    pub output: Option<PathBuf>,
}

/// Report basic statistics of a file
pub fn run(config: &Config, request: StatsRequest) -> Result<()> {
    let kinds = StatKind::parse_selector(&request.select)?;
    let format = resolve_format(&request.input, request.format)?;
    let table = read_file(&request.input, format, config.read_options(None, b',', false)?)?;

    let rows = if request.low.is_some() || request.high.is_some() {
        table
            .row_range_for_time(request.low, request.high)
            .context("Time boundaries need a time column")?
    } else {
        0..table.npts()?
    };
    info!("Statistics over rows {}..{}", rows.start, rows.end);

    let name = entry_name(&request.input);
    let entries = if request.combine {
        let stats = combined_stats(&table, rows)?;
        vec![(request.entry.clone().unwrap_or(name), stats)]
    } else {
        column_stats(&table, rows)?
            .into_iter()
            .enumerate()
            .map(|(i, stats)| {
                let label = match &request.entry {
                    Some(entry) => format!("{}_{}", entry, i),
                    None => format!("{}-{}", name, i),
                };
                (label, stats)
            })
            .collect()
    };

    let mut writer: Box<dyn Write> = match &request.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    write_report(&mut writer, &entries, &kinds, request.header)?;
    writer.flush()?;
    Ok(())
}
