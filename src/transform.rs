//! Processing steps built on the table operations.
//!
//! Each step takes finished tables and returns a new one (or edits one in
//! place), so the same steps back the command-line tool and library users.

use std::ops::Range;

use log::{debug, info};

use crate::error::{Result, TabDataError};
use crate::table::Table;

/// Zero run length that counts as a block when none is given
pub const DEFAULT_MIN_ZERO_RUN: usize = 3;

/// Fraction of the column range a window extreme must cross by default
pub const DEFAULT_DECIMATE_THRESHOLD: f64 = 0.5;

/// Direction of the activity a decimation should preserve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Keep upward peaks
    Positive,
    /// Keep downward peaks
    Negative,
}

/// Time origin and step for regeneration, falling back to the first two
/// time values of `source` for whatever is not given.
fn uniform_params(source: &Table, t0: Option<f64>, dt: Option<f64>) -> Result<(f64, f64)> {
    let time = source.time().unwrap_or_default();
    let t0 = match t0.filter(|v| *v != 0.0) {
        Some(t0) => t0,
        None => *time.first().ok_or_else(|| {
            TabDataError::InvalidState("cannot take t0 from an empty time axis".to_string())
        })?,
    };
    let dt = match dt.filter(|v| *v != 0.0) {
        Some(dt) => dt,
        None => match time {
            [first, second, ..] => second - first,
            _ => {
                return Err(TabDataError::InvalidState(
                    "cannot take dt from fewer than 2 time points".to_string(),
                ))
            }
        },
    };
    Ok((t0, dt))
}

/// Stack recordings end to end.
///
/// Every table must have the same number of columns. Metadata is taken from
/// the first table. When the tables have a time axis it is rebuilt as one
/// uniform axis starting at `t0` with step `dt`, each taken from the first
/// table when not given.
pub fn join(tables: &[Table], t0: Option<f64>, dt: Option<f64>) -> Result<Table> {
    let (first, rest) = tables
        .split_first()
        .ok_or_else(|| TabDataError::InvalidArgument("nothing to join".to_string()))?;

    let params = if first.has_time() {
        Some(uniform_params(first, t0, dt)?)
    } else {
        None
    };

    let mut joined = first.clone();
    for (i, table) in rest.iter().enumerate() {
        if table.nvars() != joined.nvars() {
            return Err(TabDataError::DimensionMismatch(format!(
                "table {} has {} columns, expected {}",
                i + 2,
                table.nvars(),
                joined.nvars()
            )));
        }
        let block = table.extract_rows(0, None, false)?;
        joined.append_rows(&block, 0, 0, None)?;
        debug!("Appended table {} ({} rows)", i + 2, block.npts()?);
    }

    if let Some((t0, dt)) = params {
        joined.regenerate_time_uniform(None, Some(t0), Some(dt))?;
    }
    info!(
        "Joined {} tables into {} rows of {} columns",
        tables.len(),
        joined.npts()?,
        joined.nvars()
    );
    Ok(joined)
}

/// Merge the columns of several tables side by side.
///
/// All tables must have the same number of rows. The time axis and
/// metadata come from the first table.
pub fn collate(tables: &[Table]) -> Result<Table> {
    let (first, rest) = tables
        .split_first()
        .ok_or_else(|| TabDataError::InvalidArgument("nothing to collate".to_string()))?;

    let npts = first.npts()?;
    let mut collated = first.clone();
    for (i, table) in rest.iter().enumerate() {
        if table.npts()? != npts {
            return Err(TabDataError::DimensionMismatch(format!(
                "table {} has {} rows, expected {}",
                i + 2,
                table.npts()?,
                npts
            )));
        }
        collated.append_columns(table, 0, None, false)?;
    }
    info!("Collated {} tables into {} columns", tables.len(), collated.nvars());
    Ok(collated)
}

/// Row ranges left after removing every zero run of at least `min_run`
/// values, and the number of runs removed
fn nonzero_segments(values: &[f64], min_run: usize) -> (Vec<Range<usize>>, usize) {
    let mut kept = Vec::new();
    let mut removed = 0;
    let mut start = 0;
    let mut i = 0;
    while i < values.len() {
        if values[i] != 0.0 {
            i += 1;
            continue;
        }
        let run_end = values[i..]
            .iter()
            .position(|v| *v != 0.0)
            .map_or(values.len(), |p| i + p);
        if run_end - i >= min_run {
            if start < i {
                kept.push(start..i);
            }
            debug!("Zero block at rows {}..{}", i, run_end);
            start = run_end;
            removed += 1;
        }
        i = run_end;
    }
    if start < values.len() {
        kept.push(start..values.len());
    }
    (kept, removed)
}

fn stitch(values: &[f64], segments: &[Range<usize>]) -> Vec<f64> {
    segments
        .iter()
        .flat_map(|s| values[s.clone()].iter().copied())
        .collect()
}

/// Cut out blocks of consecutive zeros.
///
/// Runs of at least `min_run` zeros (3 when `None` or zero) in `column` are
/// removed from every column and the remaining segments are stitched
/// together. Shorter runs are kept. The time axis, if any, is rebuilt as a
/// continuous axis from `t0`/`dt`, defaulting to the source's first value and
/// first step.
pub fn skip_zero_blocks(
    table: &Table,
    column: usize,
    min_run: Option<usize>,
    t0: Option<f64>,
    dt: Option<f64>,
) -> Result<Table> {
    let min_run = min_run.filter(|n| *n != 0).unwrap_or(DEFAULT_MIN_ZERO_RUN);
    let values = &table.column(column)?[..table.complete_rows()];

    let (segments, removed) = nonzero_segments(values, min_run);
    if removed == 0 {
        return Err(TabDataError::InvalidState(format!(
            "no block of {} zeros in column {}",
            min_run, column
        )));
    }
    if segments.is_empty() {
        return Err(TabDataError::InvalidState(format!(
            "column {} holds nothing but zeros",
            column
        )));
    }
    let params = if table.has_time() {
        Some(uniform_params(table, t0, dt)?)
    } else {
        None
    };

    let mut result = Table::new(table.time_axis(), table.is_strict());
    result.comments = table.comments().to_vec();
    result.headers = table.headers().to_vec();
    result.column_names = table.column_names().to_vec();
    result.columns = table
        .columns()
        .iter()
        .map(|c| stitch(c, &segments))
        .collect();
    result.time = table.time().map(|t| stitch(t, &segments));

    if let Some((t0, dt)) = params {
        result.regenerate_time_uniform(None, Some(t0), Some(dt))?;
    }
    info!(
        "Removed {} zero blocks, kept {} of {} rows",
        removed,
        result.npts()?,
        values.len()
    );
    Ok(result)
}

/// Divide every column by its mean over the baseline `rows`.
///
/// With `subtract` set, 1 is subtracted afterwards so the baseline sits at
/// zero. Fails before touching data if a baseline mean is zero.
pub fn normalize(table: &mut Table, rows: Range<usize>, subtract: bool) -> Result<()> {
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
    if rows.is_empty() {
        return Err(TabDataError::InvalidArgument(
            "baseline region is empty".to_string(),
        ));
    }

    let baselines: Vec<f64> = table
        .columns()
        .iter()
        .map(|c| c[rows.clone()].iter().sum::<f64>() / rows.len() as f64)
        .collect();
    if let Some(j) = baselines.iter().position(|b| *b == 0.0) {
        return Err(TabDataError::InvalidState(format!(
            "baseline mean of column {} is zero",
            j
        )));
    }
    debug!("Baseline rows {}..{}, means {:?}", rows.start, rows.end, baselines);

    let offset = if subtract { 1.0 } else { 0.0 };
    for (column, baseline) in table.columns.iter_mut().zip(&baselines) {
        for value in column.iter_mut() {
            *value = *value / baseline - offset;
        }
    }
    Ok(())
}

/// Keep one point per window of `factor` rows, preserving short events.
///
/// Each window normally contributes its first value. When the window's
/// extreme in `direction` crosses the cut-off at `threshold` (0.5 when
/// `None`) of the column's range, measured from the opposite end, the
/// extreme is kept instead. Time takes each window's first value.
pub fn decimate(
    table: &Table,
    factor: usize,
    direction: Direction,
    threshold: Option<f64>,
) -> Result<Table> {
    if factor == 0 {
        return Err(TabDataError::InvalidArgument(
            "decimation factor must be positive".to_string(),
        ));
    }
    let threshold = threshold.unwrap_or(DEFAULT_DECIMATE_THRESHOLD);
    if !(0.0..=1.0).contains(&threshold) {
        return Err(TabDataError::InvalidArgument(format!(
            "threshold {} is outside [0, 1]",
            threshold
        )));
    }
    if table.nvars() == 0 {
        return Err(TabDataError::EmptyTable);
    }
    let npts = table.complete_rows();

    let columns = table
        .columns()
        .iter()
        .map(|column| decimate_column(&column[..npts], factor, direction, threshold))
        .collect();
    let time = table
        .time()
        .map(|t| t[..npts].iter().step_by(factor).copied().collect());

    let decimated = Table {
        columns,
        time,
        column_names: table.column_names().to_vec(),
        comments: table.comments().to_vec(),
        headers: table.headers().to_vec(),
        strict: table.is_strict(),
    };
    info!(
        "Decimated {} rows by {} to {}",
        npts,
        factor,
        decimated.complete_rows()
    );
    Ok(decimated)
}

fn decimate_column(values: &[f64], factor: usize, direction: Direction, threshold: f64) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    values
        .chunks(factor)
        .map(|window| {
            let regular = window[0];
            match direction {
                Direction::Positive => {
                    let peak = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                    if peak > min + threshold * span {
                        peak
                    } else {
                        regular
                    }
                }
                Direction::Negative => {
                    let peak = window.iter().copied().fold(f64::INFINITY, f64::min);
                    if peak < max - threshold * span {
                        peak
                    } else {
                        regular
                    }
                }
            }
        })
        .collect()
}
