//! HEKA PatchMaster CSV export (read only).
//!
//! A series export is a `Series...` line followed by sweeps. Each sweep is a
//! `Sweep...` line, an `Index,Time[s],I-mon[A]` title line and three-field data
//! rows; sweeps are separated by a blank line and two blank lines end the
//! file.
//!
//! Every sweep becomes one current column (A converted to pA). The time axis
//! comes from the first sweep only (s converted to ms), so every later sweep
//! must have the same number of rows.

use std::io::BufRead;

use ::csv::StringRecord;

use super::numeric::parse_float;
use super::{CodecOptions, Format, LineCursor, TableCodec};
use crate::error::{Result, TabDataError};
use crate::table::{Table, TimeAxis};

const SERIES_MARKER: &str = "Series";
const SWEEP_MARKER: &str = "Sweep";
const INDEX_TITLE: &str = "Index";
const SECONDS_TO_MS: f64 = 1e3;
const AMPERES_TO_PA: f64 = 1e12;

/// Header recorded on every table read from a HEKA export
pub const EPISODIC_HEADER: &str = "\"AcquisitionMode=Episodic Stimulation\"";
/// Title given to the time axis
pub const TIME_TITLE: &str = "Time (ms)";
/// Title given to every current column
pub const CURRENT_TITLE: &str = "pA";

/// Reader for HEKA CSV exports
#[derive(Debug, Clone, Copy)]
pub struct HekaCodec {
    strict: bool,
}

impl Default for HekaCodec {
    fn default() -> Self {
        Self::new(CodecOptions::default().strict_rectangular)
    }
}

impl HekaCodec {
    /// Create a reader producing strict or lax tables
    pub fn new(strict_rectangular: bool) -> Self {
        Self {
            strict: strict_rectangular,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// After the series line or a blank line, a sweep line must follow
    ExpectingSweep,
    /// Accumulating data rows of the current sweep
    InSweep,
}

fn mismatch(line: usize, message: impl std::fmt::Display) -> TabDataError {
    TabDataError::format(Format::HekaCsv, format!("line {}: {}", line, message))
}

/// Parse one non-blank line as a comma-separated record
fn parse_record(line: &str, line_no: usize) -> Result<StringRecord> {
    let mut csv_reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    csv_reader
        .records()
        .next()
        .transpose()?
        .ok_or_else(|| mismatch(line_no, "empty record"))
}

/// Column and time data collected sweep by sweep
#[derive(Default)]
struct Sweeps {
    time: Vec<f64>,
    currents: Vec<Vec<f64>>,
}

impl Sweeps {
    fn close(&self, line: usize) -> Result<()> {
        let Some(current) = self.currents.last() else {
            return Ok(());
        };
        if current.len() != self.time.len() {
            return Err(mismatch(
                line,
                format!(
                    "sweep {} has {} rows, the first sweep has {}",
                    self.currents.len(),
                    current.len(),
                    self.time.len()
                ),
            ));
        }
        Ok(())
    }
}

impl TableCodec for HekaCodec {
    fn format(&self) -> Format {
        Format::HekaCsv
    }

    fn read(&self, reader: &mut dyn BufRead) -> Result<Table> {
        let mut lines = LineCursor::new(reader);

        let series = lines
            .next_line()?
            .ok_or_else(|| mismatch(1, "empty file"))?;
        let series = parse_record(&series, 1)?;
        if series.len() != 1 || !series[0].starts_with(SERIES_MARKER) {
            return Err(mismatch(1, "expected a single Series field"));
        }

        let mut state = State::ExpectingSweep;
        let mut blank_run = 0;
        let mut sweeps = Sweeps::default();

        while let Some(line) = lines.next_line()? {
            let line_no = lines.line_no();
            if line.trim().is_empty() {
                blank_run += 1;
                if blank_run == 2 {
                    break;
                }
                if state == State::InSweep {
                    sweeps.close(line_no)?;
                    state = State::ExpectingSweep;
                }
                continue;
            }
            blank_run = 0;

            let fields = parse_record(&line, line_no)?;
            if fields.len() != 3 {
                return Err(mismatch(line_no, format!("{} fields, expected 3", fields.len())));
            }

            if state == State::ExpectingSweep {
                if !fields[0].trim().starts_with(SWEEP_MARKER) {
                    return Err(mismatch(line_no, "expected a Sweep line"));
                }
                let titles = lines
                    .next_line()?
                    .ok_or_else(|| mismatch(line_no + 1, "missing column titles"))?;
                let titles = parse_record(&titles, lines.line_no())?;
                if titles.get(0).map(str::trim) != Some(INDEX_TITLE) {
                    return Err(mismatch(lines.line_no(), "column titles must start with Index"));
                }
                sweeps.currents.push(Vec::new());
                state = State::InSweep;
                continue;
            }

            if sweeps.currents.len() == 1 {
                sweeps
                    .time
                    .push(parse_float(&fields[1], Format::HekaCsv, line_no)? * SECONDS_TO_MS);
            }
            let current = parse_float(&fields[2], Format::HekaCsv, line_no)? * AMPERES_TO_PA;
            if let Some(column) = sweeps.currents.last_mut() {
                column.push(current);
            }
        }
        if state == State::InSweep {
            sweeps.close(lines.line_no())?;
        }

        let mut table = Table::new(TimeAxis::Present, self.strict);
        table.headers.push(EPISODIC_HEADER.to_string());
        table.column_names.push(TIME_TITLE.to_string());
        table
            .column_names
            .extend(std::iter::repeat(CURRENT_TITLE.to_string()).take(sweeps.currents.len()));
        table.columns = sweeps.currents;
        table.time = Some(sweeps.time);
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
\"Series_1_1\"

\"Sweep #1\",,
\"Index\",\"Time[s]\",\"I-mon[A]\"
1,0.0,1.0e-12
2,0.001,2.0e-12
3,0.002,3.0e-12

\"Sweep #2\",,
\"Index\",\"Time[s]\",\"I-mon[A]\"
1,0.0,-1.0e-12
2,0.001,-2.0e-12
3,0.002,-3.0e-12


";

    #[test]
    fn test_read_sweeps() {
        let table = HekaCodec::default().read(&mut SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.nvars(), 2);
        assert_eq!(table.npts().unwrap(), 3);

        let time = table.time().unwrap();
        assert_eq!(time.len(), 3);
        assert!((time[1] - 1.0).abs() < 1e-9);
        assert!((time[2] - 2.0).abs() < 1e-9);
        assert!((table.column(0).unwrap()[2] - 3.0).abs() < 1e-9);
        assert!((table.column(1).unwrap()[0] + 1.0).abs() < 1e-9);

        assert_eq!(table.column_names(), &["Time (ms)", "pA", "pA"]);
        assert_eq!(table.headers(), &[EPISODIC_HEADER]);
    }

    #[test]
    fn test_sweep_length_mismatch() {
        let input = "\
Series_1
Sweep_1,,
Index,Time,I
1,0.0,1e-12
2,0.1,1e-12

Sweep_2,,
Index,Time,I
1,0.0,1e-12

";
        let err = HekaCodec::default().read(&mut input.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            TabDataError::FormatMismatch { format: Format::HekaCsv, .. }
        ));
    }

    #[test]
    fn test_mismatch_in_last_sweep_without_terminator() {
        let input = "Series_1\nSweep_1,,\nIndex,t,i\n1,0,1\n2,1,1\n\nSweep_2,,\nIndex,t,i\n1,0,1\n2,1,1\n3,2,1\n";
        let err = HekaCodec::default().read(&mut input.as_bytes()).unwrap_err();
        assert!(err.is_format_mismatch());
    }

    #[test]
    fn test_bad_series_line() {
        let err = HekaCodec::default()
            .read(&mut "Sweep,,\n".as_bytes())
            .unwrap_err();
        assert!(err.is_format_mismatch());
    }

    #[test]
    fn test_bad_title_line() {
        let input = "Series\nSweep_1,,\nNumber,Time,I\n";
        let err = HekaCodec::default().read(&mut input.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Index"));
    }

    #[test]
    fn test_wrong_field_count() {
        let input = "Series\nSweep_1,,\nIndex,Time,I\n1,0.0\n";
        let err = HekaCodec::default().read(&mut input.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("expected 3"));
    }

    #[test]
    fn test_double_blank_stops_reading() {
        let input = "Series\nSweep_1,,\nIndex,t,i\n1,0,1e-12\n2,0.001,1e-12\n\n\ngarbage that is never read\n";
        let table = HekaCodec::default().read(&mut input.as_bytes()).unwrap();
        assert_eq!(table.nvars(), 1);
        assert_eq!(table.npts().unwrap(), 2);
    }

    #[test]
    fn test_quoted_fields_with_commas() {
        let input = "\
\"Series, cell 3\"
\"Sweep #1, 20 mV\",,
\"Index\",\"Time[s]\",\"I-mon[A]\"
1,\"0.0\",\"1.0e-12\"
2,\"0.001\",\"2.5e-12\"
";
        let table = HekaCodec::default().read(&mut input.as_bytes()).unwrap();
        assert_eq!(table.nvars(), 1);
        assert!((table.column(0).unwrap()[1] - 2.5).abs() < 1e-9);
        assert!((table.time().unwrap()[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_record_keeps_empty_fields() {
        let record = parse_record("\"Sweep #1\",,", 3).unwrap();
        assert_eq!(record.len(), 3);
        assert_eq!(&record[0], "Sweep #1");
        assert_eq!(&record[2], "");
    }
}
