//! # tabdata
//!
//! Command-line tool for converting and processing tabulated lab data.
//!
//! ## Usage
//!
//! ```bash
//! # HEKA export or GROMACS plot to ATF
//! tabdata convert series.dat --from heka-csv
//! tabdata convert rmsd.xvg rmsd.atf
//!
//! # Stack recordings, cut zero blocks, summarize
//! tabdata join run1.atf run2.atf -o all.atf
//! tabdata skip-zeroes all.atf --min-run 5
//! tabdata stats all_cut.atf --low 100 --high 200 --select ae
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
