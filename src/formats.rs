//! Text format codecs and format dispatch.
//!
//! Each supported format has a codec implementing [`TableCodec`]:
//!
//! - [`csv`] - generic delimited text with an optional header row
//! - [`atf`] - Axon Text File export (`.atf`)
//! - [`xvg`] - xmgrace plots as written by GROMACS analysis tools (`.xvg`)
//! - [`heka`] - HEKA PatchMaster CSV export (read only)
//!
//! Codecs work on already-open streams; opening and closing files is left to
//! the caller. [`codec`] maps a [`Format`] tag to its codec.

use std::fmt;
use std::io::{BufRead, Write};
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, TabDataError};
use crate::table::{Table, TimeAxis};

pub mod atf;
pub mod csv;
pub mod heka;
pub mod numeric;
pub mod xvg;

pub use self::atf::AtfCodec;
pub use self::csv::CsvCodec;
pub use self::heka::HekaCodec;
pub use self::xvg::XvgCodec;

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Generic delimited text
    Csv,
    /// Axon Text File
    Atf,
    /// xmgrace / GROMACS plot file
    Xvg,
    /// HEKA PatchMaster CSV export
    HekaCsv,
}

impl Format {
    /// All formats, in registry order
    pub const ALL: [Format; 4] = [Format::Csv, Format::Atf, Format::Xvg, Format::HekaCsv];

    /// Tag used on the command line and in configuration
    pub fn tag(self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Atf => "atf",
            Format::Xvg => "xvg",
            Format::HekaCsv => "heka_csv",
        }
    }

    /// Conventional file extension
    pub fn extension(self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Atf => "atf",
            Format::Xvg => "xvg",
            Format::HekaCsv => "dat",
        }
    }

    /// Whether a writer exists for this format
    pub fn is_writable(self) -> bool {
        !matches!(self, Format::HekaCsv)
    }

    /// Infer the format from a file extension
    pub fn from_extension(extension: &str) -> Result<Self> {
        let lower = extension.to_ascii_lowercase();
        Format::ALL
            .into_iter()
            .find(|f| f.extension() == lower)
            .ok_or_else(|| TabDataError::UnknownFormat(format!("extension '{}'", extension)))
    }

    /// Infer the format from the extension of a path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                TabDataError::UnknownFormat(format!("no extension on '{}'", path.display()))
            })?;
        Self::from_extension(extension)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Csv => "CSV",
            Format::Atf => "ATF",
            Format::Xvg => "XVG",
            Format::HekaCsv => "HEKA CSV",
        };
        f.write_str(name)
    }
}

impl FromStr for Format {
    type Err = TabDataError;

    fn from_str(s: &str) -> Result<Self> {
        Format::ALL
            .into_iter()
            .find(|f| f.tag().eq_ignore_ascii_case(s))
            .ok_or_else(|| TabDataError::UnknownFormat(s.to_string()))
    }
}

/// Options that shape the tables codecs produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// Field delimiter for generic delimited text
    pub delimiter: u8,
    /// Whether generic delimited rows start with a time value
    pub time_axis: TimeAxis,
    /// Strictness of the tables that readers construct
    pub strict_rectangular: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            time_axis: TimeAxis::Present,
            strict_rectangular: true,
        }
    }
}

impl CodecOptions {
    /// Use a different field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Choose whether delimited rows carry a time value
    pub fn with_time_axis(mut self, time_axis: TimeAxis) -> Self {
        self.time_axis = time_axis;
        self
    }

    /// Construct lax tables that tolerate mismatched column lengths
    pub fn lax(mut self) -> Self {
        self.strict_rectangular = false;
        self
    }
}

/// A reader/writer pair for one on-disk format
pub trait TableCodec {
    /// The format this codec handles
    fn format(&self) -> Format;

    /// Read a complete table from the stream
    fn read(&self, reader: &mut dyn BufRead) -> Result<Table>;

    /// Write the table to the stream
    fn write(&self, writer: &mut dyn Write, table: &Table) -> Result<()> {
        let _ = (writer, table);
        Err(TabDataError::WriteUnsupported(self.format()))
    }
}

/// Codec for a format tag
pub fn codec(format: Format, options: CodecOptions) -> Box<dyn TableCodec> {
    match format {
        Format::Csv => Box::new(CsvCodec::new(options)),
        Format::Atf => Box::new(AtfCodec::new(options.strict_rectangular)),
        Format::Xvg => Box::new(XvgCodec::new(options.strict_rectangular)),
        Format::HekaCsv => Box::new(HekaCodec::new(options.strict_rectangular)),
    }
}

/// Codec for a textual format tag such as `"atf"`
pub fn codec_for_tag(tag: &str, options: CodecOptions) -> Result<Box<dyn TableCodec>> {
    Ok(codec(tag.parse()?, options))
}

/// Read a table of the given format
pub fn read_table<R: BufRead>(format: Format, mut reader: R, options: CodecOptions) -> Result<Table> {
    codec(format, options).read(&mut reader)
}

/// Write a table in the given format
pub fn write_table<W: Write>(
    format: Format,
    mut writer: W,
    table: &Table,
    options: CodecOptions,
) -> Result<()> {
    codec(format, options).write(&mut writer, table)?;
    writer.flush()?;
    Ok(())
}

/// Line-by-line reader tracking the current line number.
pub(crate) struct LineCursor<'a> {
    reader: &'a mut dyn BufRead,
    buffer: String,
    line_no: usize,
}

impl<'a> LineCursor<'a> {
    pub(crate) fn new(reader: &'a mut dyn BufRead) -> Self {
        Self {
            reader,
            buffer: String::new(),
            line_no: 0,
        }
    }

    /// Next line without its terminator, or `None` at end of stream
    pub(crate) fn next_line(&mut self) -> Result<Option<String>> {
        self.buffer.clear();
        if self.reader.read_line(&mut self.buffer)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        Ok(Some(self.buffer.trim_end_matches(['\n', '\r']).to_string()))
    }

    /// 1-based number of the line last returned
    pub(crate) fn line_no(&self) -> usize {
        self.line_no
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tags_roundtrip() {
        for format in Format::ALL {
            assert_eq!(format.tag().parse::<Format>().unwrap(), format);
        }
        assert!(matches!(
            "parquet".parse::<Format>(),
            Err(TabDataError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path("run/trace.ATF").unwrap(), Format::Atf);
        assert_eq!(Format::from_path("rmsd.xvg").unwrap(), Format::Xvg);
        assert_eq!(Format::from_path("export.dat").unwrap(), Format::HekaCsv);
        assert!(Format::from_path("notes.txt").is_err());
        assert!(Format::from_path("README").is_err());
    }

    #[test]
    fn test_codec_registry() {
        let options = CodecOptions::default();
        for format in Format::ALL {
            assert_eq!(codec(format, options).format(), format);
        }
        assert!(codec_for_tag("heka_csv", options).is_ok());
        assert!(codec_for_tag("abf", options).is_err());
    }

    #[test]
    fn test_heka_write_unsupported() {
        let table = Table::default();
        let mut out = Vec::new();
        let err = write_table(Format::HekaCsv, &mut out, &table, CodecOptions::default()).unwrap_err();
        assert!(matches!(err, TabDataError::WriteUnsupported(Format::HekaCsv)));
        assert!(!Format::HekaCsv.is_writable());
    }

    #[test]
    fn test_line_cursor_strips_terminators() {
        let mut input = "first\r\nsecond\n\nlast".as_bytes();
        let mut cursor = LineCursor::new(&mut input);
        assert_eq!(cursor.next_line().unwrap().as_deref(), Some("first"));
        assert_eq!(cursor.next_line().unwrap().as_deref(), Some("second"));
        assert_eq!(cursor.next_line().unwrap().as_deref(), Some(""));
        assert_eq!(cursor.next_line().unwrap().as_deref(), Some("last"));
        assert_eq!(cursor.line_no(), 4);
        assert_eq!(cursor.next_line().unwrap(), None);
    }
}
