use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

use tabdata::formats::Format;
use tabdata::table::Table;

use super::files::{read_file, resolve_format};
use super::Config;

/// Value range of one column
#[derive(Debug, Serialize)]
struct ColumnSummary {
    name: Option<String>,
    min: f64,
    max: f64,
}

/// Shape and metadata of a table
#[derive(Debug, Serialize)]
struct TableSummary {
    file: String,
    format: String,
    columns: usize,
    rows: usize,
    strict: bool,
    time_range: Option<(f64, f64)>,
    time_name: Option<String>,
    comments: Vec<String>,
    headers: Vec<String>,
    column_summaries: Vec<ColumnSummary>,
}

impl TableSummary {
    fn new(file: &Path, format: Format, table: &Table) -> Result<Self> {
        let names = table.data_column_names();
        let column_summaries = (0..table.nvars())
            .map(|j| -> tabdata::Result<ColumnSummary> {
                Ok(ColumnSummary {
                    name: names.get(j).cloned(),
                    min: table.min_in_column(j)?,
                    max: table.max_in_column(j)?,
                })
            })
            .collect::<tabdata::Result<Vec<_>>>()?;
        let time_range = table
            .time()
            .and_then(|t| Some((*t.first()?, *t.last()?)));

        Ok(Self {
            file: file.display().to_string(),
            format: format.to_string(),
            columns: table.nvars(),
            rows: table.npts().unwrap_or(0),
            strict: table.is_strict(),
            time_range,
            time_name: table.time_name().map(str::to_string),
            comments: table.comments().to_vec(),
            headers: table.headers().to_vec(),
            column_summaries,
        })
    }
}

/// Display information about a data file
pub fn run(config: &Config, file: PathBuf, format: Option<Format>, json: bool) -> Result<()> {
    let format = resolve_format(&file, format)?;
    let table = read_file(&file, format, config.read_options(None, b',', false)?)?;
    let summary = TableSummary::new(&file, format, &table)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("File:    {}", summary.file);
    println!("Format:  {}", summary.format);
    println!("Columns: {}", summary.columns);
    println!("Rows:    {}", summary.rows);
    match (summary.time_range, &summary.time_name) {
        (Some((first, last)), Some(name)) => println!("Time:    {} .. {} ({})", first, last, name),
        (Some((first, last)), None) => println!("Time:    {} .. {}", first, last),
        (None, _) => println!("Time:    none"),
    }
    println!();

    if !summary.comments.is_empty() {
        println!("Comments:");
        for comment in &summary.comments {
            println!("  {}", comment);
        }
        println!();
    }
    if !summary.headers.is_empty() {
        println!("Headers:");
        for header in &summary.headers {
            println!("  {}", header);
        }
        println!();
    }

    println!("Columns:");
    for (i, column) in summary.column_summaries.iter().enumerate() {
        println!(
            "  {:3}. {} [{} .. {}]",
            i + 1,
            column.name.as_deref().unwrap_or("-"),
            column.min,
            column.max
        );
    }
    Ok(())
}
