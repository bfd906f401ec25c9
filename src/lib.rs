//! # tabdata - columnar laboratory and simulation data
//!
//! `tabdata` holds tabulated numeric data (electrophysiology traces,
//! molecular dynamics analysis output, plain CSV exports) in a single
//! in-memory [`Table`](table::Table) and moves it between the text formats
//! these tools produce.
//!
//! ## Key Features
//!
//! - **One data model**: value columns plus an optional time axis, with
//!   free-text comments and format-specific header lines carried along.
//!
//! - **Strict or lax shape**: strict tables keep every column the same
//!   length and refuse (or explicitly shorten) mismatched data.
//!
//! - **Codecs**: generic delimited text, Axon Text File (ATF 1.0), xmgrace
//!   `.xvg` as written by GROMACS and the HEKA PatchMaster CSV export.
//!
//! - **Transforms**: stacking recordings, collating columns, cutting zero
//!   blocks, baseline normalization, peak-preserving decimation and basic
//!   statistics.
//!
//! ## Quick Start
//!
//! ```rust
//! use tabdata::formats::{read_table, write_table, CodecOptions, Format};
//!
//! let input = "ATF\t1.0\n0\t2\n\"Time (ms)\"\t\"I (pA)\"\n0.0\t1.5\n0.1\t2.5\n";
//! let table = read_table(Format::Atf, input.as_bytes(), CodecOptions::default())?;
//! assert_eq!(table.npts()?, 2);
//!
//! let mut csv = Vec::new();
//! write_table(Format::Csv, &mut csv, &table, CodecOptions::default())?;
//! assert_eq!(String::from_utf8_lossy(&csv), "Time (ms),I (pA)\n0.0,1.5\n0.1,2.5\n");
//! # Ok::<(), tabdata::TabDataError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`table`]: the columnar table and its structural operations
//! - [`formats`]: format tags, codecs and dispatch
//! - [`stats`]: mean, standard deviation and s.e.m. over row ranges
//! - [`transform`]: multi-table and whole-table processing steps
//! - [`error`]: the shared error type

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod formats;
pub mod stats;
pub mod table;
pub mod transform;

pub use error::{Result, TabDataError};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::error::{Result, TabDataError};
    pub use crate::formats::{
        codec, read_table, write_table, CodecOptions, Format, TableCodec,
    };
    pub use crate::stats::{column_stats, combined_stats, ColumnStats, StatKind};
    pub use crate::table::{Table, TimeAxis};
    pub use crate::transform::{
        collate, decimate, join, normalize, skip_zero_blocks, Direction,
    };
}
