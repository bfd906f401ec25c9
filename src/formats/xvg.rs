//! xmgrace plot files as produced by GROMACS analysis tools.
//!
//! ```text
//! # comment lines
//! @    title "RMSD"
//! @    xaxis  label "Time (ps)"
//! @    yaxis  label "RMSD (nm)"
//! @TYPE xy
//!     0.0000    0.0005
//! ```
//!
//! Only the subset GROMACS writes is understood: `#` comments, then `@`
//! directives (title first, optionally the axis labels), then whitespace
//! separated rows of time followed by one value per column. The axis label
//! lines are kept as headers so that writing reproduces them.

use std::io::{BufRead, Write};

use super::numeric::{format_float, parse_float};
use super::{CodecOptions, Format, LineCursor, TableCodec};
use crate::error::{Result, TabDataError};
use crate::table::{Table, TimeAxis};

const COMMENT_MARKER: char = '#';
const DIRECTIVE_MARKER: char = '@';
const XAXIS_LABEL_PREFIX: &str = "@    xaxis  label ";

/// Codec for GROMACS-style xvg files
#[derive(Debug, Clone, Copy)]
pub struct XvgCodec {
    strict: bool,
}

impl Default for XvgCodec {
    fn default() -> Self {
        Self::new(CodecOptions::default().strict_rectangular)
    }
}

impl XvgCodec {
    /// Create a codec producing strict or lax tables
    pub fn new(strict_rectangular: bool) -> Self {
        Self {
            strict: strict_rectangular,
        }
    }
}

fn mismatch(line: usize, message: impl std::fmt::Display) -> TabDataError {
    TabDataError::format(Format::Xvg, format!("line {}: {}", line, message))
}

/// Text inside the last pair of double quotes on a directive line
fn quoted_label(line: &str) -> Option<&str> {
    let parts: Vec<&str> = line.split('"').collect();
    (parts.len() >= 3).then(|| parts[parts.len() - 2])
}

fn next_stripped(lines: &mut LineCursor<'_>, what: &str) -> Result<String> {
    match lines.next_line()? {
        Some(line) => Ok(line.trim().to_string()),
        None => Err(TabDataError::format(
            Format::Xvg,
            format!("unexpected end of file, expected {}", what),
        )),
    }
}

/// Record an axis label directive as a header and return its quoted label
fn axis_label(table: &mut Table, line: &str, line_no: usize, axis: &str) -> Result<String> {
    let directive = line
        .strip_prefix(DIRECTIVE_MARKER)
        .ok_or_else(|| mismatch(line_no, format!("expected an @ {} axis label directive", axis)))?;
    let label = quoted_label(directive)
        .ok_or_else(|| mismatch(line_no, format!("unquoted {} axis label", axis)))?
        .to_string();
    table.headers.push(directive.to_string());
    Ok(label)
}

impl TableCodec for XvgCodec {
    fn format(&self) -> Format {
        Format::Xvg
    }

    fn read(&self, reader: &mut dyn BufRead) -> Result<Table> {
        let mut lines = LineCursor::new(reader);
        let mut table = Table::new(TimeAxis::Present, self.strict);

        let mut line = next_stripped(&mut lines, "comments or directives")?;
        while let Some(comment) = line.strip_prefix(COMMENT_MARKER) {
            table.comments.push(comment.to_string());
            line = next_stripped(&mut lines, "directives")?;
        }

        let Some(title) = line.strip_prefix(DIRECTIVE_MARKER) else {
            return Err(mismatch(lines.line_no(), "expected an @ directive after comments"));
        };
        table.headers.push(title.to_string());

        line = next_stripped(&mut lines, "directives or data")?;
        let (x_label, y_label) = if line.starts_with(XAXIS_LABEL_PREFIX) {
            let x_label = axis_label(&mut table, &line, lines.line_no(), "x")?;
            line = next_stripped(&mut lines, "y axis label")?;
            let y_label = axis_label(&mut table, &line, lines.line_no(), "y")?;
            line = next_stripped(&mut lines, "directives or data")?;
            (x_label, y_label)
        } else {
            (String::new(), String::new())
        };

        while let Some(directive) = line.strip_prefix(DIRECTIVE_MARKER) {
            table.headers.push(directive.to_string());
            line = next_stripped(&mut lines, "data")?;
        }

        // The first data row fixes the number of columns
        let line_no = lines.line_no();
        let fields: Vec<&str> = line.split_whitespace().collect();
        let Some((first, values)) = fields.split_first() else {
            return Err(mismatch(line_no, "empty first data row"));
        };
        let mut time = vec![parse_float(first, Format::Xvg, line_no)?];
        let mut columns = values
            .iter()
            .map(|v| parse_float(v, Format::Xvg, line_no).map(|v| vec![v]))
            .collect::<Result<Vec<_>>>()?;

        let mut names = Vec::with_capacity(columns.len() + 1);
        names.push(x_label);
        names.extend(std::iter::repeat(y_label).take(columns.len().max(1)));

        while let Some(line) = lines.next_line()? {
            let line_no = lines.line_no();
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            if fields.len() != columns.len() + 1 {
                return Err(mismatch(
                    line_no,
                    format!("{} fields, expected {}", fields.len(), columns.len() + 1),
                ));
            }
            time.push(parse_float(fields[0], Format::Xvg, line_no)?);
            for (column, field) in columns.iter_mut().zip(&fields[1..]) {
                column.push(parse_float(field, Format::Xvg, line_no)?);
            }
        }

        table.columns = columns;
        table.time = Some(time);
        if names.len() == table.columns.len() + 1 {
            table.column_names = names;
        }
        Ok(table)
    }

    fn write(&self, writer: &mut dyn Write, table: &Table) -> Result<()> {
        let rows = table.writable_rows()?;
        for comment in table.comments() {
            writeln!(writer, "{}{}", COMMENT_MARKER, comment)?;
        }
        for header in table.headers() {
            writeln!(writer, "{}{}", DIRECTIVE_MARKER, header)?;
        }
        for row in 0..rows {
            if let Some(time) = table.time() {
                write!(writer, "  {}", format_float(time[row]))?;
            }
            for column in table.columns() {
                write!(writer, "  {}", format_float(column[row]))?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }
}
