//! Axon Text File (ATF 1.0).
//!
//! ```text
//! ATF\t1.0
//! <header lines>\t<columns including time>
//! <header lines, verbatim>
//! "Time (ms)"\t"Trace #1"\t...
//! 0.0\t1.000000e+00\t...
//! ```
//!
//! Every data row starts with the time value. Column titles are quoted on
//! disk; the quotes are removed when reading and added back when writing.

use std::io::{BufRead, Write};

use super::numeric::{format_float, format_scientific, parse_float};
use super::{CodecOptions, Format, LineCursor, TableCodec};
use crate::error::{Result, TabDataError};
use crate::table::{Table, TimeAxis};

/// First line of every ATF file
pub const ATF_SIGNATURE: &str = "ATF\t1.0";

/// Title written for the time axis when the table has no names
const DEFAULT_TIME_TITLE: &str = "Time";

/// Codec for Axon Text Files
#[derive(Debug, Clone, Copy)]
pub struct AtfCodec {
    strict: bool,
}

impl Default for AtfCodec {
    fn default() -> Self {
        Self::new(CodecOptions::default().strict_rectangular)
    }
}

impl AtfCodec {
    /// Create a codec producing strict or lax tables
    pub fn new(strict_rectangular: bool) -> Self {
        Self {
            strict: strict_rectangular,
        }
    }
}

fn mismatch(line: usize, message: impl std::fmt::Display) -> TabDataError {
    TabDataError::format(Format::Atf, format!("line {}: {}", line, message))
}

fn required_line(lines: &mut LineCursor<'_>, what: &str) -> Result<String> {
    lines.next_line()?.ok_or_else(|| {
        TabDataError::format(
            Format::Atf,
            format!("unexpected end of file, expected {}", what),
        )
    })
}

fn unquote(title: &str) -> &str {
    match title.strip_prefix('"') {
        Some(inner) => inner.strip_suffix('"').unwrap_or(inner),
        None => title,
    }
}

impl TableCodec for AtfCodec {
    fn format(&self) -> Format {
        Format::Atf
    }

    fn read(&self, reader: &mut dyn BufRead) -> Result<Table> {
        let mut lines = LineCursor::new(reader);

        let signature = required_line(&mut lines, "signature")?;
        if signature != ATF_SIGNATURE {
            return Err(mismatch(1, format!("bad signature '{}'", signature)));
        }

        let counts = required_line(&mut lines, "header and column counts")?;
        let counts: Vec<usize> = counts
            .split_whitespace()
            .map(str::parse)
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| mismatch(2, format!("bad counts '{}'", counts)))?;
        let &[n_headers, n_columns] = counts.as_slice() else {
            return Err(mismatch(2, "expected header and column counts"));
        };
        if n_columns == 0 {
            return Err(mismatch(2, "no time column declared"));
        }

        let mut table = Table::new(TimeAxis::Present, self.strict);
        for _ in 0..n_headers {
            let header = required_line(&mut lines, "header line")?;
            table.headers.push(header.trim().to_string());
        }

        let titles = required_line(&mut lines, "column titles")?;
        table.column_names = titles
            .trim()
            .split('\t')
            .map(|t| unquote(t).to_string())
            .collect();
        if table.column_names.len() != n_columns {
            return Err(mismatch(
                lines.line_no(),
                format!(
                    "{} column titles for {} declared columns",
                    table.column_names.len(),
                    n_columns
                ),
            ));
        }

        let mut columns = vec![Vec::new(); n_columns - 1];
        let mut time = Vec::new();
        while let Some(line) = lines.next_line()? {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            let line_no = lines.line_no();
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != n_columns {
                return Err(mismatch(
                    line_no,
                    format!("{} fields, expected {}", fields.len(), n_columns),
                ));
            }
            time.push(parse_float(fields[0], Format::Atf, line_no)?);
            for (column, field) in columns.iter_mut().zip(&fields[1..]) {
                column.push(parse_float(field, Format::Atf, line_no)?);
            }
        }

        table.columns = columns;
        table.time = Some(time);
        Ok(table)
    }

    fn write(&self, writer: &mut dyn Write, table: &Table) -> Result<()> {
        let time = table.time().ok_or_else(|| {
            TabDataError::InvalidState("ATF files need a time axis".to_string())
        })?;
        let rows = table.writable_rows()?;

        writeln!(writer, "{}", ATF_SIGNATURE)?;
        writeln!(writer, "{}\t{}", table.headers().len(), table.nvars() + 1)?;
        for header in table.headers() {
            writeln!(writer, "{}", header)?;
        }

        let titles: Vec<String> = column_titles(table)
            .iter()
            .map(|t| format!("\"{}\"", t))
            .collect();
        writeln!(writer, "{}", titles.join("\t"))?;

        for row in 0..rows {
            write!(writer, "{}", format_float(time[row]))?;
            for column in table.columns() {
                write!(writer, "\t{}", format_scientific(column[row]))?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }
}

/// Titles for the time axis and every column, filling in missing names
fn column_titles(table: &Table) -> Vec<String> {
    let names = table.column_names();
    if table.time_name().is_some() {
        return names.to_vec();
    }
    let mut titles = Vec::with_capacity(table.nvars() + 1);
    titles.push(DEFAULT_TIME_TITLE.to_string());
    if names.len() == table.nvars() {
        titles.extend(names.iter().cloned());
    } else {
        titles.extend((1..=table.nvars()).map(|i| format!("Trace #{}", i)));
    }
    titles
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "ATF\t1.0\n1\t3\n\"comment1\"\n\"T\"\t\"A\"\t\"B\"\n0.0\t1.0\t2.0\n1.0\t3.0\t4.0\n";

    #[test]
    fn test_read_sample() {
        let table = AtfCodec::default().read(&mut SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.headers(), &["\"comment1\""]);
        assert_eq!(table.column_names(), &["T", "A", "B"]);
        assert_eq!(table.time().unwrap(), &[0.0, 1.0]);
        assert_eq!(table.column(0).unwrap(), &[1.0, 3.0]);
        assert_eq!(table.column(1).unwrap(), &[2.0, 4.0]);
    }

    #[test]
    fn test_write_sample() {
        let table = AtfCodec::default().read(&mut SAMPLE.as_bytes()).unwrap();
        let mut out = Vec::new();
        AtfCodec::default().write(&mut out, &table).unwrap();
        let text = String::from_utf8(out).unwrap();

        let expected = "ATF\t1.0\n1\t3\n\"comment1\"\n\"T\"\t\"A\"\t\"B\"\n\
                        0.0\t1.000000e+00\t2.000000e+00\n\
                        1.0\t3.000000e+00\t4.000000e+00\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_bad_signature() {
        let err = AtfCodec::default()
            .read(&mut "ATF\t2.0\n0\t1\n\"t\"\n".as_bytes())
            .unwrap_err();
        assert!(matches!(
            err,
            TabDataError::FormatMismatch { format: Format::Atf, .. }
        ));
    }

    #[test]
    fn test_title_count_mismatch() {
        let input = "ATF\t1.0\n0\t3\n\"T\"\t\"A\"\n0\t1\n";
        let err = AtfCodec::default().read(&mut input.as_bytes()).unwrap_err();
        assert!(err.is_format_mismatch());
    }

    #[test]
    fn test_truncated_preamble() {
        let input = "ATF\t1.0\n2\t2\n\"only one header\"\n";
        let err = AtfCodec::default().read(&mut input.as_bytes()).unwrap_err();
        assert!(err.is_format_mismatch());
    }

    #[test]
    fn test_short_data_row() {
        let input = "ATF\t1.0\n0\t3\n\"T\"\t\"A\"\t\"B\"\n0\t1\n";
        let err = AtfCodec::default().read(&mut input.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 4"));
    }

    #[test]
    fn test_write_synthesizes_titles() {
        let mut table = Table::new(TimeAxis::Present, true);
        table.append_column(vec![1.0], None, false).unwrap();
        table.append_column(vec![2.0], None, false).unwrap();
        table.set_time(vec![0.5]).unwrap();

        let mut out = Vec::new();
        AtfCodec::default().write(&mut out, &table).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"Time\"\t\"Trace #1\"\t\"Trace #2\"\n"));
        assert!(text.starts_with("ATF\t1.0\n0\t3\n"));
    }

    #[test]
    fn test_write_requires_time() {
        let mut table = Table::new(TimeAxis::Absent, true);
        table.append_column(vec![1.0], None, false).unwrap();
        let mut out = Vec::new();
        assert!(matches!(
            AtfCodec::default().write(&mut out, &table),
            Err(TabDataError::InvalidState(_))
        ));
    }
}
