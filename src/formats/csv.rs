//! Generic delimited text.
//!
//! An optional header row of column names followed by one row per data point.
//! When the table has a time axis, the first field of each row is time. Whether
//! the first row is a header is decided by its first field: a number means the
//! file has no header.

use std::io::{BufRead, Write};

use super::numeric::{format_float, is_numeric, parse_float};
use super::{CodecOptions, Format, TableCodec};
use crate::error::{Result, TabDataError};
use crate::table::{Table, TimeAxis};

/// Codec for delimited text with a configurable delimiter
#[derive(Debug, Clone, Copy)]
pub struct CsvCodec {
    delimiter: u8,
    time_axis: TimeAxis,
    strict: bool,
}

impl Default for CsvCodec {
    fn default() -> Self {
        Self::new(CodecOptions::default())
    }
}

impl CsvCodec {
    /// Create a codec from shared options
    pub fn new(options: CodecOptions) -> Self {
        Self {
            delimiter: options.delimiter,
            time_axis: options.time_axis,
            strict: options.strict_rectangular,
        }
    }

    /// Field delimiter in use
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }
}

impl TableCodec for CsvCodec {
    fn format(&self) -> Format {
        Format::Csv
    }

    fn read(&self, reader: &mut dyn BufRead) -> Result<Table> {
        let mut csv_reader = ::csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut records = csv_reader.records();

        let first = records
            .next()
            .transpose()?
            .ok_or_else(|| TabDataError::format(Format::Csv, "no header or data rows"))?;

        let mut table = Table::new(self.time_axis, self.strict);
        let has_time = table.has_time();
        let width = first.len();
        let nvars = if has_time { width.saturating_sub(1) } else { width };

        let mut columns = vec![Vec::new(); nvars];
        let mut time = Vec::new();
        let mut push_row = |record: &::csv::StringRecord| -> Result<()> {
            let line = record.position().map_or(0, |p| p.line() as usize);
            if record.len() != width {
                return Err(TabDataError::format(
                    Format::Csv,
                    format!("line {}: {} fields, expected {}", line, record.len(), width),
                ));
            }
            let mut fields = record.iter();
            if has_time {
                if let Some(field) = fields.next() {
                    time.push(parse_float(field, Format::Csv, line)?);
                }
            }
            for (column, field) in columns.iter_mut().zip(fields) {
                column.push(parse_float(field, Format::Csv, line)?);
            }
            Ok(())
        };

        let mut names = Vec::new();
        if first.get(0).is_some_and(is_numeric) {
            push_row(&first)?;
        } else {
            names = first.iter().map(str::to_string).collect();
        }
        for record in records {
            push_row(&record?)?;
        }

        table.columns = columns;
        if let Some(axis) = table.time.as_mut() {
            *axis = time;
        }
        table.column_names = names;
        Ok(table)
    }

    fn write(&self, writer: &mut dyn Write, table: &Table) -> Result<()> {
        let rows = table.writable_rows()?;
        let mut csv_writer = ::csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .terminator(::csv::Terminator::Any(b'\n'))
            .from_writer(writer);

        if !table.column_names().is_empty() {
            csv_writer.write_record(table.column_names())?;
        }
        let mut record = Vec::with_capacity(table.nvars() + 1);
        for row in 0..rows {
            record.clear();
            if let Some(time) = table.time() {
                record.push(format_float(time[row]));
            }
            record.extend(table.columns().iter().map(|c| format_float(c[row])));
            csv_writer.write_record(&record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
