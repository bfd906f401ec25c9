//! Basic descriptive statistics over a row range.
//!
//! Statistics are computed per value column, or over all columns at once
//! treating them as segments of one continuous sample. Standard deviations
//! use the sample (n - 1) divisor.

use std::fmt;
use std::io::Write;
use std::ops::Range;

use crate::error::{Result, TabDataError};
use crate::formats::numeric::format_float;
use crate::table::Table;

/// Summary of one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation
    pub std_dev: f64,
    /// Standard error of the mean
    pub sem: f64,
    /// Number of rows the statistics cover
    pub count: usize,
}

impl ColumnStats {
    /// The value reported for one statistic
    pub fn value(&self, kind: StatKind) -> f64 {
        match kind {
            StatKind::Mean => self.mean,
            StatKind::StdDev => self.std_dev,
            StatKind::Sem => self.sem,
            StatKind::Count => self.count as f64,
        }
    }

    fn render(&self, kind: StatKind) -> String {
        match kind {
            StatKind::Count => self.count.to_string(),
            _ => format_float(self.value(kind)),
        }
    }
}

/// A statistic that can be requested in a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKind {
    /// Mean (`a`)
    Mean,
    /// Standard deviation (`d`)
    StdDev,
    /// Standard error of the mean (`e`)
    Sem,
    /// Number of entries (`n`)
    Count,
}

impl StatKind {
    /// Every statistic, in default report order
    pub const ALL: [StatKind; 4] = [StatKind::Mean, StatKind::StdDev, StatKind::Sem, StatKind::Count];

    /// Selector letter
    pub fn letter(self) -> char {
        match self {
            StatKind::Mean => 'a',
            StatKind::StdDev => 'd',
            StatKind::Sem => 'e',
            StatKind::Count => 'n',
        }
    }

    /// Column title in reports
    pub fn label(self) -> &'static str {
        match self {
            StatKind::Mean => "avg",
            StatKind::StdDev => "stddev",
            StatKind::Sem => "s.e.m.",
            StatKind::Count => "N-entries",
        }
    }

    /// Parse a selector such as `"aden"` or `"ea"`, keeping the given order.
    ///
    /// Letters that name no statistic are skipped. A selector naming none at
    /// all is an error.
    pub fn parse_selector(selector: &str) -> Result<Vec<StatKind>> {
        let kinds: Vec<StatKind> = selector
            .chars()
            .filter_map(|c| StatKind::ALL.into_iter().find(|k| k.letter() == c))
            .collect();
        if kinds.is_empty() {
            return Err(TabDataError::InvalidArgument(format!(
                "'{}' selects no statistics (use a, d, e, n)",
                selector
            )));
        }
        Ok(kinds)
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn checked_rows(table: &Table, rows: &Range<usize>) -> Result<usize> {
    if table.nvars() == 0 {
        return Err(TabDataError::EmptyTable);
    }
    let available = table.complete_rows();
    if rows.end > available || rows.start > rows.end {
        return Err(TabDataError::IndexOutOfRange {
            index: rows.end.max(rows.start),
            len: available,
        });
    }
    let n = rows.len();
    if n < 2 {
        return Err(TabDataError::InvalidArgument(format!(
            "a standard deviation needs at least 2 rows, {} selected",
            n
        )));
    }
    Ok(n)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn squared_deviation(values: &[f64], mean: f64) -> f64 {
    values.iter().map(|v| (v - mean).powi(2)).sum()
}

/// Statistics of every value column over `rows`
pub fn column_stats(table: &Table, rows: Range<usize>) -> Result<Vec<ColumnStats>> {
    let n = checked_rows(table, &rows)?;
    Ok(table
        .columns()
        .iter()
        .map(|column| {
            let values = &column[rows.clone()];
            let mean = mean(values);
            let std_dev = (squared_deviation(values, mean) / (n - 1) as f64).sqrt();
            ColumnStats {
                mean,
                std_dev,
                sem: std_dev / (n as f64).sqrt(),
                count: n,
            }
        })
        .collect())
}

/// Statistics of all value columns over `rows`, pooled into one sample.
///
/// The mean is the mean of the column means; the deviation is taken from
/// that common mean with `nvars * (n - 1)` degrees of freedom.
pub fn combined_stats(table: &Table, rows: Range<usize>) -> Result<ColumnStats> {
    let n = checked_rows(table, &rows)?;
    let columns = table.columns();
    let mean = columns.iter().map(|c| mean(&c[rows.clone()])).sum::<f64>() / columns.len() as f64;
    let total: f64 = columns
        .iter()
        .map(|c| squared_deviation(&c[rows.clone()], mean))
        .sum();
    let std_dev = (total / (columns.len() * (n - 1)) as f64).sqrt();
    Ok(ColumnStats {
        mean,
        std_dev,
        sem: std_dev / (n as f64).sqrt(),
        count: n,
    })
}

/// Write a plain-text report with one line per labelled entry.
///
/// With `header` set, a title line naming the selected statistics comes
/// first.
pub fn write_report<W: Write>(
    writer: &mut W,
    entries: &[(String, ColumnStats)],
    kinds: &[StatKind],
    header: bool,
) -> Result<()> {
    if header {
        write!(writer, "entry   ")?;
        for kind in kinds {
            write!(writer, "{}   ", kind.label())?;
        }
        writeln!(writer)?;
    }
    for (label, stats) in entries {
        write!(writer, "{}   ", label)?;
        for kind in kinds {
            write!(writer, "{}  ", stats.render(*kind))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TimeAxis;

    fn sample() -> Table {
        let mut table = Table::new(TimeAxis::Absent, true);
        table.append_column(vec![1.0, 2.0, 3.0, 4.0], None, false).unwrap();
        table.append_column(vec![2.0, 4.0, 6.0, 8.0], None, false).unwrap();
        table
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_column_stats() {
        let stats = column_stats(&sample(), 0..4).unwrap();
        assert_eq!(stats.len(), 2);
        assert!(close(stats[0].mean, 2.5));
        // variance of 1..4 with n-1 is 5/3
        assert!(close(stats[0].std_dev, (5.0f64 / 3.0).sqrt()));
        assert!(close(stats[0].sem, stats[0].std_dev / 2.0));
        assert_eq!(stats[0].count, 4);
        assert!(close(stats[1].mean, 5.0));
    }

    #[test]
    fn test_column_stats_subrange() {
        let stats = column_stats(&sample(), 1..3).unwrap();
        assert!(close(stats[0].mean, 2.5));
        assert!(close(stats[0].std_dev, 0.5f64.sqrt()));
        assert_eq!(stats[1].count, 2);
    }

    #[test]
    fn test_combined_stats() {
        let mut table = Table::new(TimeAxis::Absent, true);
        table.append_column(vec![1.0, 3.0], None, false).unwrap();
        table.append_column(vec![5.0, 7.0], None, false).unwrap();

        let stats = combined_stats(&table, 0..2).unwrap();
        assert!(close(stats.mean, 4.0));
        // squared deviations 9 + 1 + 1 + 9 over 2 * (2 - 1)
        assert!(close(stats.std_dev, 10.0f64.sqrt()));
        assert_eq!(stats.count, 2);
    }

    #[test]
    fn test_stats_errors() {
        let empty = Table::new(TimeAxis::Absent, true);
        assert!(matches!(column_stats(&empty, 0..2), Err(TabDataError::EmptyTable)));
        assert!(matches!(
            column_stats(&sample(), 2..9),
            Err(TabDataError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            combined_stats(&sample(), 1..2),
            Err(TabDataError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_parse_selector() {
        assert_eq!(StatKind::parse_selector("aden").unwrap(), StatKind::ALL.to_vec());
        assert_eq!(
            StatKind::parse_selector("nxa").unwrap(),
            vec![StatKind::Count, StatKind::Mean]
        );
        assert!(StatKind::parse_selector("xyz").is_err());
    }

    #[test]
    fn test_write_report() {
        let stats = ColumnStats {
            mean: 2.5,
            std_dev: 0.5,
            sem: 0.25,
            count: 4,
        };
        let mut out = Vec::new();
        write_report(
            &mut out,
            &[("trace-0".to_string(), stats)],
            &[StatKind::Mean, StatKind::Count],
            true,
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "entry   avg   N-entries   \ntrace-0   2.5  4  \n"
        );
    }
}
