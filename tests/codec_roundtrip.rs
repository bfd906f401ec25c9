//! Integration tests for the format codecs
//!
//! These tests push fixture streams through the public read/write API and
//! check cross-format conversions.

use tabdata::formats::{read_table, write_table, CodecOptions, Format};
use tabdata::table::{Table, TimeAxis};
use tabdata::TabDataError;

const ATF_SAMPLE: &str = "ATF\t1.0\n\
2\t3\n\
\"AcquisitionMode=Gap-free\"\n\
\"Comment=\"\n\
\"Time (ms)\"\t\"IN 0 (pA)\"\t\"IN 1 (mV)\"\n\
0.0\t-1.250000e+01\t-7.000000e+01\n\
0.1\t-1.300000e+01\t-7.000000e+01\n\
0.2\t4.500000e+00\t-6.950000e+01\n";

const XVG_SAMPLE: &str = "\
# GROMACS reminds you: \"Sincerity is the key to success\"
@    title \"RMSD\"
@    xaxis  label \"Time (ps)\"
@    yaxis  label \"RMSD (nm)\"
@TYPE xy
  0.0  0.0005
  10.0  0.125
  20.0  0.25
";

const HEKA_SAMPLE: &str = "\
\"Series_2_1\"

\"Sweep_2_1_1\",,
\"Index\",\"Time[s]\",\"I-mon[A]\"
1,0.0,1.0e-12
2,0.001,1.5e-12

\"Sweep_2_1_2\",,
\"Index\",\"Time[s]\",\"I-mon[A]\"
1,0.0,-1.0e-12
2,0.001,-2.0e-12


";

fn to_text(format: Format, table: &Table, options: CodecOptions) -> String {
    let mut out = Vec::new();
    write_table(format, &mut out, table, options).unwrap();
    String::from_utf8(out).unwrap()
}

/// Writing an ATF file that was read reproduces it
#[test]
fn test_atf_rewrite_is_identical() {
    let table = read_table(Format::Atf, ATF_SAMPLE.as_bytes(), CodecOptions::default()).unwrap();
    assert_eq!(table.nvars(), 2);
    assert_eq!(table.npts().unwrap(), 3);
    assert_eq!(table.headers().len(), 2);

    assert_eq!(to_text(Format::Atf, &table, CodecOptions::default()), ATF_SAMPLE);
}

/// Delimited text with a header and no time axis, written with another delimiter
#[test]
fn test_csv_delimiter_change() {
    let read = CodecOptions::default().with_time_axis(TimeAxis::Absent);
    let table = read_table(Format::Csv, "a,b,c\n1,2,3\n4,5,6\n".as_bytes(), read).unwrap();

    assert_eq!(table.column_names(), &["a", "b", "c"]);
    assert_eq!(
        to_text(Format::Csv, &table, read.with_delimiter(b';')),
        "a;b;c\n1.0;2.0;3.0\n4.0;5.0;6.0\n"
    );
}

/// GROMACS plots convert to ATF with axis labels as column titles
#[test]
fn test_xvg_to_atf() {
    let table = read_table(Format::Xvg, XVG_SAMPLE.as_bytes(), CodecOptions::default()).unwrap();
    assert_eq!(table.time().unwrap(), &[0.0, 10.0, 20.0]);
    assert_eq!(table.column_names(), &["Time (ps)", "RMSD (nm)"]);

    let atf = to_text(Format::Atf, &table, CodecOptions::default());
    let lines: Vec<&str> = atf.lines().collect();
    assert_eq!(lines[0], "ATF\t1.0");
    assert_eq!(lines[1], "4\t2");
    assert_eq!(lines[6], "\"Time (ps)\"\t\"RMSD (nm)\"");
    assert_eq!(lines[7], "0.0\t5.000000e-04");
    assert_eq!(lines[9], "20.0\t2.500000e-01");

    let back = read_table(Format::Atf, atf.as_bytes(), CodecOptions::default()).unwrap();
    assert_eq!(back.column(0).unwrap(), table.column(0).unwrap());
    assert_eq!(back.time(), table.time());
}

/// XVG files survive a read/write cycle unchanged
#[test]
fn test_xvg_rewrite_is_identical() {
    let table = read_table(Format::Xvg, XVG_SAMPLE.as_bytes(), CodecOptions::default()).unwrap();
    assert_eq!(to_text(Format::Xvg, &table, CodecOptions::default()), XVG_SAMPLE);
}

/// HEKA exports convert to ATF with one current trace per sweep
#[test]
fn test_heka_to_atf() {
    let table = read_table(Format::HekaCsv, HEKA_SAMPLE.as_bytes(), CodecOptions::default()).unwrap();
    assert_eq!(table.nvars(), 2);
    assert_eq!(table.npts().unwrap(), 2);

    let atf = to_text(Format::Atf, &table, CodecOptions::default());
    let lines: Vec<&str> = atf.lines().collect();
    assert_eq!(lines[0], "ATF\t1.0");
    assert_eq!(lines[1], "1\t3");
    assert_eq!(lines[2], "\"AcquisitionMode=Episodic Stimulation\"");
    assert_eq!(lines[3], "\"Time (ms)\"\t\"pA\"\t\"pA\"");
    assert_eq!(lines[4], "0.0\t1.000000e+00\t-1.000000e+00");
    assert_eq!(lines.len(), 6);
}

/// HEKA exports are read only
#[test]
fn test_heka_has_no_writer() {
    let table = read_table(Format::HekaCsv, HEKA_SAMPLE.as_bytes(), CodecOptions::default()).unwrap();
    let mut out = Vec::new();
    let err = write_table(Format::HekaCsv, &mut out, &table, CodecOptions::default()).unwrap_err();
    assert!(matches!(err, TabDataError::WriteUnsupported(Format::HekaCsv)));
    assert!(out.is_empty());
}

/// Reading a file with the wrong codec reports that codec's format
#[test]
fn test_wrong_codec_reports_format() {
    for (format, input) in [
        (Format::Atf, XVG_SAMPLE),
        (Format::Xvg, ATF_SAMPLE),
        (Format::HekaCsv, ATF_SAMPLE),
    ] {
        match read_table(format, input.as_bytes(), CodecOptions::default()) {
            Err(TabDataError::FormatMismatch { format: reported, .. }) => assert_eq!(reported, format),
            other => panic!("expected a {} format mismatch, got {:?}", format, other),
        }
    }
}

/// Readers honour lax options
#[test]
fn test_lax_option_reaches_table() {
    let table = read_table(Format::Atf, ATF_SAMPLE.as_bytes(), CodecOptions::default().lax()).unwrap();
    assert!(!table.is_strict());
}

/// Columns appended without time values are refused by every writer
#[test]
fn test_writers_refuse_missing_time_values() {
    let mut table = Table::new(TimeAxis::Present, true);
    table.append_column(vec![1.0, 2.0, 3.0], None, false).unwrap();

    for format in [Format::Csv, Format::Atf, Format::Xvg] {
        let mut out = Vec::new();
        let err = write_table(format, &mut out, &table, CodecOptions::default()).unwrap_err();
        assert!(matches!(err, TabDataError::InvalidState(_)), "{}: {:?}", format, err);
        assert!(out.is_empty(), "{} wrote before failing", format);
    }
}
