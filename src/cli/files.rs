//! Opening and naming files for the subcommands.

use anyhow::{Context, Result};
use log::debug;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tabdata::formats::{read_table, write_table, CodecOptions, Format};
use tabdata::table::Table;

/// The explicit format, or the one implied by the file extension
pub fn resolve_format(path: &Path, explicit: Option<Format>) -> Result<Format> {
    match explicit {
        Some(format) => Ok(format),
        None => Format::from_path(path)
            .with_context(|| format!("Cannot infer the format of {}, pass --format", path.display())),
    }
}

/// Read a table from a file
pub fn read_file(path: &Path, format: Format, options: CodecOptions) -> Result<Table> {
    if !path.exists() {
        anyhow::bail!("Input file does not exist: {}", path.display());
    }
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let table = read_table(format, BufReader::new(file), options)
        .with_context(|| format!("Failed to read {} as {}", path.display(), format))?;
    debug!(
        "Read {}: {} columns, time axis {}",
        path.display(),
        table.nvars(),
        if table.has_time() { "present" } else { "absent" }
    );
    Ok(table)
}

/// Write a table to a file, or to stdout when no path is given
pub fn write_output(
    path: Option<&Path>,
    format: Format,
    table: &Table,
    options: CodecOptions,
) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_table(format, BufWriter::new(file), table, options)
                .with_context(|| format!("Failed to write {} as {}", path.display(), format))
        }
        None => write_table(format, io::stdout().lock(), table, options)
            .with_context(|| format!("Failed to write {} to stdout", format)),
    }
}

/// `dir/stem<suffix>.<extension>` next to `input`
pub fn derived_path(input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{}{}.{}", stem, suffix, extension))
}

/// The input path without its extension, used to label report rows
pub fn entry_name(input: &Path) -> String {
    input.with_extension("").display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_path() {
        assert_eq!(
            derived_path(Path::new("data/run1.atf"), "_cut", "atf"),
            PathBuf::from("data/run1_cut.atf")
        );
        assert_eq!(
            derived_path(Path::new("rmsd.xvg"), "", "atf"),
            PathBuf::from("rmsd.atf")
        );
        assert_eq!(entry_name(Path::new("data/run1.csv")), "data/run1");
    }

    #[test]
    fn test_resolve_format() {
        assert_eq!(resolve_format(Path::new("a.xvg"), None).unwrap(), Format::Xvg);
        assert_eq!(
            resolve_format(Path::new("a.txt"), Some(Format::Csv)).unwrap(),
            Format::Csv
        );
        assert!(resolve_format(Path::new("a.txt"), None).is_err());
    }

    #[test]
    fn test_read_and_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("trace.csv");
        std::fs::write(&input, "t,a\n0.0,1.0\n0.5,2.0\n").unwrap();

        let table = read_file(&input, Format::Csv, CodecOptions::default()).unwrap();
        assert_eq!(table.npts().unwrap(), 2);

        let output = derived_path(&input, "", "atf");
        write_output(Some(&output), Format::Atf, &table, CodecOptions::default()).unwrap();
        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.starts_with("ATF\t1.0\n0\t2\n\"t\"\t\"a\"\n"));

        assert!(read_file(&dir.path().join("missing.csv"), Format::Csv, CodecOptions::default()).is_err());
    }
}
