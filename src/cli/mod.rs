use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tabdata::formats::Format;
use tabdata::transform::Direction;

mod collate;
mod convert;
mod decimate;
mod files;
mod info;
mod join;
mod normalize;
mod skip_zeroes;
mod stats;

mod config;

pub use config::{parse_delimiter, Config};

/// tabdata - convert and process tabulated lab data (CSV, ATF, XVG, HEKA)
#[derive(Parser)]
#[command(name = "tabdata")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Load delimiter and table settings from a TOML config file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// File format selector.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    /// Generic delimited text
    Csv,
    /// Axon Text File
    Atf,
    /// GROMACS xvg plot
    Xvg,
    /// HEKA PatchMaster CSV export (input only)
    HekaCsv,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => Format::Csv,
            FormatArg::Atf => Format::Atf,
            FormatArg::Xvg => Format::Xvg,
            FormatArg::HekaCsv => Format::HekaCsv,
        }
    }
}

/// Activity direction for decimation.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DirectionArg {
    /// Preserve upward peaks
    Pos,
    /// Preserve downward peaks
    Neg,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Pos => Direction::Positive,
            DirectionArg::Neg => Direction::Negative,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a file between formats (e.g. HEKA or XVG to ATF)
    Convert {
        /// Input file path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file path (defaults to the input with the target extension)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Input format (inferred from the extension when omitted)
        #[arg(long, value_enum)]
        from: Option<FormatArg>,

        /// Output format (inferred from OUTPUT, ATF when neither is given)
        #[arg(long, value_enum)]
        to: Option<FormatArg>,

        /// Input field delimiter for delimited text
        #[arg(short, long, value_parser = parse_delimiter)]
        delimiter: Option<u8>,

        /// Output field delimiter for delimited text
        #[arg(long, value_parser = parse_delimiter)]
        output_delimiter: Option<u8>,

        /// Delimited input has no time column
        #[arg(long)]
        no_time: bool,
    },

    /// Stack recordings end to end with a continuous time axis
    Join {
        /// Files to join, in order
        #[arg(value_name = "FILES", required = true, num_args = 1..)]
        files: Vec<PathBuf>,

        /// Output file (defaults to <first>_combined.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Input format (inferred from the first file's extension when omitted)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Initial time (first file's t0 when omitted)
        #[arg(long, allow_negative_numbers = true)]
        t0: Option<f64>,

        /// Time step (first file's dt when omitted)
        #[arg(long)]
        dt: Option<f64>,
    },

    /// Merge the columns of delimited files side by side
    Collate {
        /// Files to collate, in order
        #[arg(value_name = "FILES", required = true, num_args = 1..)]
        files: Vec<PathBuf>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Input field delimiter (TAB by default)
        #[arg(short = 's', long, value_parser = parse_delimiter)]
        input_delimiter: Option<u8>,

        /// Output field delimiter (comma by default)
        #[arg(short = 'p', long, value_parser = parse_delimiter)]
        output_delimiter: Option<u8>,

        /// Inputs have no time column
        #[arg(long)]
        no_time: bool,
    },

    /// Remove blocks of consecutive zeros and rebuild the time axis
    SkipZeroes {
        /// Input file path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file (defaults to <input>_cut.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Input format (inferred from the extension when omitted)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Column scanned for zeros (0-based)
        #[arg(short = 'n', long, default_value_t = 0)]
        column: usize,

        /// Consecutive zeros that count as a block
        #[arg(long)]
        min_run: Option<usize>,

        /// Initial time (input t0 when omitted)
        #[arg(long, allow_negative_numbers = true)]
        t0: Option<f64>,

        /// Time step (input dt when omitted)
        #[arg(long)]
        dt: Option<f64>,
    },

    /// Mean, standard deviation and s.e.m. per column
    Stats {
        /// Input file path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Input format (inferred from the extension when omitted)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Low time boundary
        #[arg(long, allow_negative_numbers = true)]
        low: Option<f64>,

        /// High time boundary
        #[arg(long, allow_negative_numbers = true)]
        high: Option<f64>,

        /// Treat all columns as one continuous sample
        #[arg(short, long)]
        combine: bool,

        /// Statistics to report, in order: a avg, d stddev, e s.e.m., n count
        #[arg(short, long, default_value = "aden")]
        select: String,

        /// Entry label (the input name when omitted)
        #[arg(short, long)]
        entry: Option<String>,

        /// Print numbers only
        #[arg(long)]
        no_header: bool,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Divide every column by its baseline mean
    Normalize {
        /// Input file path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Input format (inferred from the extension when omitted)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// First baseline row (takes precedence over --low-time)
        #[arg(long)]
        low_index: Option<usize>,

        /// End of the baseline rows, exclusive (takes precedence over --high-time)
        #[arg(long)]
        high_index: Option<usize>,

        /// Baseline start time
        #[arg(long, allow_negative_numbers = true)]
        low_time: Option<f64>,

        /// Baseline end time
        #[arg(long, allow_negative_numbers = true)]
        high_time: Option<f64>,

        /// Subtract 1 so the baseline sits at zero
        #[arg(short, long)]
        subtract: bool,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Reduce the sampling rate while keeping short events
    Decimate {
        /// Input file path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Decimation factor
        #[arg(value_name = "FACTOR")]
        factor: usize,

        /// Activity direction
        #[arg(value_name = "DIRECTION", value_enum)]
        direction: DirectionArg,

        /// Fraction of the column range a peak must cross (0.5 when omitted)
        #[arg(short = 'c', long)]
        threshold: Option<f64>,

        /// Input format (inferred from the extension when omitted)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Output file (defaults to <input>_dec.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Display the shape and metadata of a file
    Info {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Input format (inferred from the extension when omitted)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Print a JSON summary instead of text
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Convert {
            input,
            output,
            from,
            to,
            delimiter,
            output_delimiter,
            no_time,
        } => convert::run(
            &config,
            input,
            output,
            from.map(Format::from),
            to.map(Format::from),
            (delimiter, output_delimiter),
            no_time,
        ),
        Commands::Join {
            files,
            output,
            format,
            t0,
            dt,
        } => join::run(&config, files, output, format.map(Format::from), t0, dt),
        Commands::Collate {
            files,
            output,
            input_delimiter,
            output_delimiter,
            no_time,
        } => collate::run(
            &config,
            files,
            output,
            input_delimiter,
            output_delimiter,
            no_time,
        ),
        Commands::SkipZeroes {
            input,
            output,
            format,
            column,
            min_run,
            t0,
            dt,
        } => skip_zeroes::run(
            &config,
            input,
            output,
            format.map(Format::from),
            column,
            min_run,
            (t0, dt),
        ),
        Commands::Stats {
            input,
            format,
            low,
            high,
            combine,
            select,
            entry,
            no_header,
            output,
        } => stats::run(
            &config,
            stats::StatsRequest {
                input,
                format: format.map(Format::from),
                low,
                high,
                combine,
                select,
                entry,
                header: !no_header,
                output,
            },
        ),
        Commands::Normalize {
            input,
            format,
            low_index,
            high_index,
            low_time,
            high_time,
            subtract,
            output,
        } => normalize::run(
            &config,
            input,
            format.map(Format::from),
            normalize::Baseline {
                low_index,
                high_index,
                low_time,
                high_time,
            },
            subtract,
            output,
        ),
        Commands::Decimate {
            input,
            factor,
            direction,
            threshold,
            format,
            output,
        } => decimate::run(
            &config,
            input,
            output,
            format.map(Format::from),
            factor,
            Direction::from(direction),
            threshold,
        ),
        Commands::Info { file, format, json } => {
            info::run(&config, file, format.map(Format::from), json)
        }
    }
}
