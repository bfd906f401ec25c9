//! In-memory columnar table with an optional time axis.
//!
//! A [`Table`] keeps N value columns of equal length ("perfect rectangle") plus
//! an optional time (x) axis. Whether a table has a time axis is decided once,
//! at construction, and never changes afterwards.
//!
//! ## Strict and lax tables
//!
//! Strict tables validate every structural mutation and refuse to combine data
//! of mismatched length unless asked to shorten. Lax tables accept mismatched
//! columns as-is, leaving the reconciliation to the caller.
//!
//! Every mutation validates its inputs before touching any data, so a failed
//! call leaves the table exactly as it was.
//!
//! ## Example
//!
//! ```rust
//! use tabdata::table::{Table, TimeAxis};
//!
//! let mut table = Table::new(TimeAxis::Present, true);
//! table.append_column(vec![1.0, 2.0, 3.0], None, false)?;
//! table.set_time(vec![0.0, 0.5, 1.0])?;
//! table.append_column(vec![4.0, 5.0], None, true)?;
//!
//! assert_eq!(table.npts()?, 2);
//! assert_eq!(table.time(), Some(&[0.0, 0.5][..]));
//! # Ok::<(), tabdata::TabDataError>(())
//! ```

use std::ops::Range;

use crate::error::{Result, TabDataError};


/// Presence of the time axis, fixed for the lifetime of a [`Table`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeAxis {
    /// The first field of every row is the time (x) value
    #[default]
    Present,
    /// All fields are value columns
    Absent,
}

impl TimeAxis {
    /// Map a "has time" flag to the enum
    pub fn from_flag(has_time: bool) -> Self {
        if has_time {
            Self::Present
        } else {
            Self::Absent
        }
    }
}

/// How incoming columns are reconciled with the existing ones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fit {
    AsIs,
    Truncate(usize),
}

/// How a merge changes the column names
enum NameUpdate {
    Keep,
    Extend(Vec<String>),
    Adopt(Vec<String>),
}

/// Time-indexed column table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub(crate) columns: Vec<Vec<f64>>,
    pub(crate) time: Option<Vec<f64>>,
    pub(crate) column_names: Vec<String>,
    pub(crate) comments: Vec<String>,
    pub(crate) headers: Vec<String>,
    pub(crate) strict: bool,
}

impl Default for Table {
    fn default() -> Self {
        Self::new(TimeAxis::Present, true)
    }
}

impl Table {
    /// Create an empty table
    pub fn new(time_axis: TimeAxis, strict_rectangular: bool) -> Self {
        Self {
            columns: Vec::new(),
            time: match time_axis {
                TimeAxis::Present => Some(Vec::new()),
                TimeAxis::Absent => None,
            },
            column_names: Vec::new(),
            comments: Vec::new(),
            headers: Vec::new(),
            strict: strict_rectangular,
        }
    }

    // ------------------------------------------------------------------
    // Shape queries
    // ------------------------------------------------------------------

    /// Number of rows, taken from the first column
    pub fn npts(&self) -> Result<usize> {
        self.row_count().ok_or(TabDataError::EmptyTable)
    }

    /// Number of value columns; the time axis is not counted
    pub fn nvars(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table was constructed with a time axis
    pub fn has_time(&self) -> bool {
        self.time.is_some()
    }

    /// Time axis presence as chosen at construction
    pub fn time_axis(&self) -> TimeAxis {
        TimeAxis::from_flag(self.has_time())
    }

    /// Whether mutations enforce equal column lengths
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub(crate) fn row_count(&self) -> Option<usize> {
        self.columns.first().map(Vec::len)
    }

    /// Rows present in every column and in the time axis
    pub(crate) fn complete_rows(&self) -> usize {
        self.columns
            .iter()
            .chain(self.time.iter())
            .map(Vec::len)
            .min()
            .unwrap_or(0)
    }

    /// Rows a writer emits; fails on a strict table whose time axis length
    /// differs from its row count
    pub(crate) fn writable_rows(&self) -> Result<usize> {
        if let (true, Some(npts), Some(time)) = (self.strict, self.row_count(), &self.time) {
            if time.len() != npts {
                return Err(TabDataError::InvalidState(format!(
                    "time axis has {} values for {} rows",
                    time.len(),
                    npts
                )));
            }
        }
        Ok(self.complete_rows())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// All value columns
    pub fn columns(&self) -> &[Vec<f64>] {
        &self.columns
    }

    /// A single value column
    pub fn column(&self, index: usize) -> Result<&[f64]> {
        self.columns
            .get(index)
            .map(Vec::as_slice)
            .ok_or(TabDataError::IndexOutOfRange {
                index,
                len: self.columns.len(),
            })
    }

    /// The time axis, if this table has one
    pub fn time(&self) -> Option<&[f64]> {
        self.time.as_deref()
    }

    /// Column names, possibly led by a title for the time axis
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Names of the value columns only, skipping a time title if present
    pub fn data_column_names(&self) -> &[String] {
        match self.time_name() {
            Some(_) => &self.column_names[1..],
            None => &self.column_names,
        }
    }

    /// Title of the time axis, when names track it
    pub fn time_name(&self) -> Option<&str> {
        if self.has_time() && self.column_names.len() == self.columns.len() + 1 {
            self.column_names.first().map(String::as_str)
        } else {
            None
        }
    }

    /// Free-text comment lines
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Format-specific directive lines
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    // ------------------------------------------------------------------
    // Reductions
    // ------------------------------------------------------------------

    /// Largest value in a column
    pub fn max_in_column(&self, index: usize) -> Result<f64> {
        self.column(index)?
            .iter()
            .copied()
            .reduce(f64::max)
            .ok_or(TabDataError::EmptyTable)
    }

    /// Smallest value in a column
    pub fn min_in_column(&self, index: usize) -> Result<f64> {
        self.column(index)?
            .iter()
            .copied()
            .reduce(f64::min)
            .ok_or(TabDataError::EmptyTable)
    }

    /// Largest value across all columns
    pub fn max_overall(&self) -> Result<f64> {
        self.columns
            .iter()
            .flatten()
            .copied()
            .reduce(f64::max)
            .ok_or(TabDataError::EmptyTable)
    }

    /// Smallest value across all columns
    pub fn min_overall(&self) -> Result<f64> {
        self.columns
            .iter()
            .flatten()
            .copied()
            .reduce(f64::min)
            .ok_or(TabDataError::EmptyTable)
    }

    // ------------------------------------------------------------------
    // Metadata edits
    // ------------------------------------------------------------------

    /// Append comment lines, or replace them all when `clear` is set
    pub fn change_comments<I, S>(&mut self, lines: I, clear: bool)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if clear {
            self.comments.clear();
        }
        self.comments.extend(lines.into_iter().map(Into::into));
    }

    /// Append header lines, or replace them all when `clear` is set
    pub fn change_headers<I, S>(&mut self, lines: I, clear: bool)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if clear {
            self.headers.clear();
        }
        self.headers.extend(lines.into_iter().map(Into::into));
    }

    /// Replace the column names.
    ///
    /// Accepts an empty list, one name per value column, or (with a time axis)
    /// one extra leading name for time.
    pub fn set_column_names(&mut self, names: Vec<String>) -> Result<()> {
        let nvars = self.columns.len();
        let fits = names.is_empty()
            || names.len() == nvars
            || (self.has_time() && names.len() == nvars + 1);
        if !fits {
            return Err(TabDataError::InvalidArgument(format!(
                "{} names given for {} columns",
                names.len(),
                nvars
            )));
        }
        self.column_names = names;
        Ok(())
    }

    /// Replace the time axis wholesale
    pub fn set_time(&mut self, values: Vec<f64>) -> Result<()> {
        if !self.has_time() {
            return Err(TabDataError::InvalidState(
                "table was constructed without a time axis".to_string(),
            ));
        }
        if let Some(npts) = self.row_count() {
            if self.strict && values.len() != npts {
                return Err(TabDataError::DimensionMismatch(format!(
                    "time axis of {} points for columns of {}",
                    values.len(),
                    npts
                )));
            }
        }
        self.time = Some(values);
        Ok(())
    }

    /// Row range selected by time bounds.
    ///
    /// Starts at the first row with `time >= low` and ends before the first
    /// row with `time >= high`. Missing bounds mean the start or end of data.
    pub fn row_range_for_time(&self, low: Option<f64>, high: Option<f64>) -> Result<Range<usize>> {
        let time = self.time.as_deref().ok_or_else(|| {
            TabDataError::InvalidState("time bounds need a time axis".to_string())
        })?;
        let start = match low {
            Some(low) => time.iter().position(|t| *t >= low).unwrap_or(time.len()),
            None => 0,
        };
        let end = match high {
            Some(high) => time[start..]
                .iter()
                .position(|t| *t >= high)
                .map_or(time.len(), |i| start + i),
            None => time.len(),
        };
        Ok(start..end)
    }

    // ------------------------------------------------------------------
    // Time regeneration
    // ------------------------------------------------------------------

    /// Rebuild the time axis as `t0, t0 + dt, t0 + 2dt, ...`.
    ///
    /// Unset parameters (`None` or zero) are derived from the current axis:
    /// with both `t0` and `dt` unset, `t0` is the first time value; an unset
    /// `dt` is the spacing of the first two values; an unset `n` is the
    /// current row count. When only `dt` is given, `t0` is `0.0`.
    pub fn regenerate_time_uniform(
        &mut self,
        n: Option<usize>,
        t0: Option<f64>,
        dt: Option<f64>,
    ) -> Result<()> {
        if self.time.is_none() {
            return Err(TabDataError::InvalidState(
                "table has no time axis to regenerate".to_string(),
            ));
        }
        let n = match n.filter(|n| *n != 0) {
            Some(n) => n,
            None => self.npts()?,
        };
        let time = self.uniform_time(n, t0, dt)?;
        self.time = Some(time);
        Ok(())
    }

    fn uniform_time(&self, n: usize, t0: Option<f64>, dt: Option<f64>) -> Result<Vec<f64>> {
        let current = self.time.as_deref().ok_or_else(|| {
            TabDataError::InvalidState("table has no time axis to regenerate".to_string())
        })?;
        let mut t0 = t0.filter(|v| *v != 0.0);
        let dt = dt.filter(|v| *v != 0.0);

        if t0.is_none() && dt.is_none() {
            let first = current.first().ok_or_else(|| {
                TabDataError::InvalidState("cannot infer t0 from an empty time axis".to_string())
            })?;
            t0 = Some(*first);
        }
        let dt = match dt {
            Some(dt) => dt,
            None => match current {
                [first, second, ..] => second - first,
                _ => {
                    return Err(TabDataError::InvalidState(
                        "cannot infer dt from fewer than 2 time points".to_string(),
                    ))
                }
            },
        };
        let t0 = t0.unwrap_or(0.0);

        Ok((0..n).map(|i| t0 + i as f64 * dt).collect())
    }

    // ------------------------------------------------------------------
    // Structural mutations
    // ------------------------------------------------------------------

    /// Append one value column.
    ///
    /// A `name` is required when the table tracks column names and ignored
    /// otherwise. In strict mode a column of different length is refused
    /// unless `shorten` is set; then the longer side is truncated, either the
    /// new column or all existing ones.
    pub fn append_column(&mut self, values: Vec<f64>, name: Option<&str>, shorten: bool) -> Result<()> {
        let name = name.filter(|n| !n.is_empty());
        if !self.column_names.is_empty() && name.is_none() {
            return Err(TabDataError::InvalidArgument(
                "table tracks column names, a name is required".to_string(),
            ));
        }
        let fit = self.plan_fit(values.len(), values.len(), shorten)?;

        if !self.column_names.is_empty() {
            if let Some(name) = name {
                self.column_names.push(name.to_string());
            }
        }
        let mut values = values;
        if let Fit::Truncate(len) = fit {
            self.truncate_rows(len);
            values.truncate(len);
        }
        self.columns.push(values);
        Ok(())
    }

    /// Append the columns `[first, first + count)` of `other` (all from
    /// `first` when `count` is `None` or zero).
    ///
    /// The time axis of `other` is never consulted. In strict mode the
    /// selection is accepted when either its shortest or its longest column
    /// matches this table's row count; otherwise `shorten` is required.
    pub fn append_columns(
        &mut self,
        other: &Table,
        first: usize,
        count: Option<usize>,
        shorten: bool,
    ) -> Result<()> {
        let range = other.column_slice(first, count)?;
        let selected = &other.columns[range.clone()];
        let (shortest, longest) = length_bounds(selected);

        let names = self.names_from(other, range)?;
        let fit = self.plan_fit(shortest, longest, shorten)?;

        match names {
            NameUpdate::Keep => {}
            NameUpdate::Extend(names) => self.column_names.extend(names),
            NameUpdate::Adopt(names) => self.column_names = names,
        }
        match fit {
            Fit::AsIs => self.columns.extend(selected.iter().cloned()),
            Fit::Truncate(len) => {
                self.truncate_rows(len);
                self.columns
                    .extend(selected.iter().map(|c| c[..len.min(c.len())].to_vec()));
            }
        }
        Ok(())
    }

    /// Extend existing columns with rows from `other`.
    ///
    /// Columns `[first, first + count)` of `other` (all from `first` when
    /// `count` is `None` or zero) are concatenated onto this table's columns
    /// starting at `at`. Comments and headers of `other` are appended.
    ///
    /// Strict tables only stack whole tables of equal-length columns, and
    /// regenerate their time axis from the current `t0`/`dt` afterwards.
    pub fn append_rows(
        &mut self,
        other: &Table,
        at: usize,
        first: usize,
        count: Option<usize>,
    ) -> Result<()> {
        let range = other.column_slice(first, count)?;
        let selected = &other.columns[range.clone()];

        if self.strict {
            let (shortest, longest) = length_bounds(selected);
            if shortest != longest {
                return Err(TabDataError::DimensionMismatch(format!(
                    "appended block has columns of {} to {} rows",
                    shortest, longest
                )));
            }
            if at != 0 || range.start != 0 || range.end != self.columns.len() {
                return Err(TabDataError::DimensionMismatch(format!(
                    "strict tables stack whole blocks only ({} columns at {}, table has {})",
                    range.len(),
                    at,
                    self.columns.len()
                )));
            }
        }
        if at + range.len() > self.columns.len() {
            return Err(TabDataError::IndexOutOfRange {
                index: at + range.len() - 1,
                len: self.columns.len(),
            });
        }

        let time = if self.strict && self.has_time() {
            let rows = self.row_count().unwrap_or(0) + selected.first().map_or(0, Vec::len);
            Some(self.uniform_time(rows, None, None)?)
        } else {
            None
        };

        self.comments.extend(other.comments.iter().cloned());
        self.headers.extend(other.headers.iter().cloned());
        for (target, source) in self.columns[at..].iter_mut().zip(selected) {
            target.extend_from_slice(source);
        }
        if time.is_some() {
            self.time = time;
        }
        Ok(())
    }

    /// Copy rows `[from, to)` into a new table (`to` of `None` or zero means
    /// the last row).
    ///
    /// The copy keeps the time axis presence, strictness and column names;
    /// comments and headers only when `include_metadata` is set.
    pub fn extract_rows(&self, from: usize, to: Option<usize>, include_metadata: bool) -> Result<Table> {
        let available = self.complete_rows();
        let to = to
            .filter(|t| *t != 0)
            .unwrap_or_else(|| self.row_count().unwrap_or(0));
        if to > available {
            return Err(TabDataError::IndexOutOfRange {
                index: to,
                len: available,
            });
        }
        if from > to {
            return Err(TabDataError::IndexOutOfRange { index: from, len: to });
        }

        let (comments, headers) = if include_metadata {
            (self.comments.clone(), self.headers.clone())
        } else {
            (Vec::new(), Vec::new())
        };
        Ok(Table {
            columns: self.columns.iter().map(|c| c[from..to].to_vec()).collect(),
            time: self.time.as_ref().map(|t| t[from..to].to_vec()),
            column_names: self.column_names.clone(),
            comments,
            headers,
            strict: self.strict,
        })
    }

    // ------------------------------------------------------------------
    // Shared helpers
    // ------------------------------------------------------------------

    fn column_slice(&self, first: usize, count: Option<usize>) -> Result<Range<usize>> {
        let nvars = self.columns.len();
        let end = match count.filter(|c| *c != 0) {
            Some(count) => first + count,
            None => nvars,
        };
        if end > nvars || first > end {
            return Err(TabDataError::IndexOutOfRange {
                index: end.max(first),
                len: nvars,
            });
        }
        if first == end {
            return Err(TabDataError::InvalidArgument(
                "no source columns selected".to_string(),
            ));
        }
        Ok(first..end)
    }

    /// Decide how incoming columns with lengths in `[shortest, longest]` fit.
    fn plan_fit(&self, shortest: usize, longest: usize, shorten: bool) -> Result<Fit> {
        let Some(npts) = self.row_count() else {
            return Ok(Fit::AsIs);
        };
        if !self.strict || (shortest == npts && longest == npts) {
            return Ok(Fit::AsIs);
        }
        if !shorten && shortest != npts && longest != npts {
            return Err(TabDataError::DimensionMismatch(format!(
                "columns of {} to {} rows for a table of {} rows",
                shortest, longest, npts
            )));
        }
        Ok(Fit::Truncate(shortest.min(npts)))
    }

    fn truncate_rows(&mut self, len: usize) {
        for column in &mut self.columns {
            column.truncate(len);
        }
        if let Some(time) = &mut self.time {
            time.truncate(len);
        }
    }

    fn names_from(&self, other: &Table, range: Range<usize>) -> Result<NameUpdate> {
        let source = other.data_column_names();
        if !source.is_empty() && source.len() < range.end {
            return Err(TabDataError::InvalidArgument(format!(
                "source table names {} of its {} columns",
                source.len(),
                other.columns.len()
            )));
        }

        if self.columns.is_empty() && self.column_names.is_empty() {
            if source.is_empty() {
                return Ok(NameUpdate::Keep);
            }
            let mut names = Vec::with_capacity(range.len() + 1);
            if self.has_time() {
                if let Some(time_name) = other.time_name() {
                    names.push(time_name.to_string());
                }
            }
            names.extend(source[range].iter().cloned());
            return Ok(NameUpdate::Adopt(names));
        }
        if self.column_names.is_empty() {
            return Ok(NameUpdate::Keep);
        }
        if source.is_empty() {
            return Err(TabDataError::InvalidArgument(
                "table tracks column names but the source has none".to_string(),
            ));
        }
        Ok(NameUpdate::Extend(source[range].to_vec()))
    }
}

fn length_bounds(columns: &[Vec<f64>]) -> (usize, usize) {
    let shortest = columns.iter().map(Vec::len).min().unwrap_or(0);
    let longest = columns.iter().map(Vec::len).max().unwrap_or(0);
    (shortest, longest)
}
