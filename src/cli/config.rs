//! TOML configuration file support.
//!
//! Settings shared by many invocations can live in a config file instead of
//! being repeated as flags:
//!
//! ```toml
//! # tabdata.toml
//! [csv]
//! delimiter = "\t"
//! output_delimiter = ","
//! time_axis = true
//!
//! [table]
//! strict_rectangular = true
//! ```
//!
//! Command-line flags override the file; the file overrides built-in
//! defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tabdata::formats::CodecOptions;
use tabdata::table::TimeAxis;

/// Root configuration structure for tabdata.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Delimited text settings.
    #[serde(default)]
    pub csv: CsvConfig,

    /// Table construction settings.
    #[serde(default)]
    pub table: TableConfig,
}

/// Settings for generic delimited text.
#[derive(Debug, Default, Deserialize)]
pub struct CsvConfig {
    /// Field delimiter used when reading.
    pub delimiter: Option<String>,

    /// Field delimiter used when writing (the input delimiter when unset).
    pub output_delimiter: Option<String>,

    /// Whether the first field of every row is time.
    pub time_axis: Option<bool>,
}

/// Settings for the tables readers build.
#[derive(Debug, Default, Deserialize)]
pub struct TableConfig {
    /// Enforce equal column lengths.
    pub strict_rectangular: Option<bool>,
}

/// Parse a delimiter given as a single ASCII character, `\t` or `tab`.
pub fn parse_delimiter(value: &str) -> std::result::Result<u8, String> {
    match value {
        "\\t" | "tab" | "TAB" => Ok(b'\t'),
        _ => match value.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(format!(
                "'{}' is not a single-character delimiter",
                value
            )),
        },
    }
}

fn configured_delimiter(value: Option<&String>, key: &str) -> Result<Option<u8>> {
    value
        .map(|v| parse_delimiter(v).map_err(anyhow::Error::msg))
        .transpose()
        .with_context(|| format!("Invalid csv.{} in config", key))
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Options for reading, from a flag value, the file, then `fallback`.
    pub fn read_options(
        &self,
        delimiter: Option<u8>,
        fallback: u8,
        no_time: bool,
    ) -> Result<CodecOptions> {
        let delimiter = match delimiter {
            Some(d) => d,
            None => configured_delimiter(self.csv.delimiter.as_ref(), "delimiter")?
                .unwrap_or(fallback),
        };
        let has_time = !no_time && self.csv.time_axis.unwrap_or(true);
        let mut options = CodecOptions::default()
            .with_delimiter(delimiter)
            .with_time_axis(TimeAxis::from_flag(has_time));
        if !self.table.strict_rectangular.unwrap_or(true) {
            options = options.lax();
        }
        Ok(options)
    }

    /// Options for writing, from a flag value, the file, then `fallback`.
    pub fn write_options(&self, delimiter: Option<u8>, fallback: u8) -> Result<CodecOptions> {
        let delimiter = match delimiter {
            Some(d) => d,
            None => match configured_delimiter(self.csv.output_delimiter.as_ref(), "output_delimiter")? {
                Some(d) => d,
                None => configured_delimiter(self.csv.delimiter.as_ref(), "delimiter")?
                    .unwrap_or(fallback),
            },
        };
        Ok(CodecOptions::default().with_delimiter(delimiter))
    }
}
