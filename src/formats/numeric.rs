//! Number parsing and rendering shared by the codecs.
//!
//! Writers render floats the way the lab scripts that produced the existing
//! files did: shortest round-trip decimal (`1.0`, `0.25`, `1e-07`) for general
//! output, and six-digit scientific notation (`1.000000e+00`) for ATF data.

use super::Format;
use crate::error::{Result, TabDataError};

/// Shortest round-trip rendering, always with a decimal point or exponent
pub fn format_float(value: f64) -> String {
    if let Some(special) = non_finite(value) {
        return special.to_string();
    }
    let debug = format!("{:?}", value);
    match debug.split_once('e') {
        Some((mantissa, exponent)) => with_signed_exponent(mantissa, exponent),
        None => debug,
    }
}

/// Scientific notation with six fractional digits and a two-digit exponent
pub fn format_scientific(value: f64) -> String {
    if let Some(special) = non_finite(value) {
        return special.to_string();
    }
    let rendered = format!("{:.6e}", value);
    match rendered.split_once('e') {
        Some((mantissa, exponent)) => with_signed_exponent(mantissa, exponent),
        None => rendered,
    }
}

/// Parse one numeric field, reporting failures against `format` and `line`
pub fn parse_float(field: &str, format: Format, line: usize) -> Result<f64> {
    let trimmed = field.trim();
    trimmed.parse::<f64>().map_err(|_| {
        TabDataError::format(format, format!("line {}: '{}' is not a number", line, trimmed))
    })
}

/// Whether a field reads as a number
pub(crate) fn is_numeric(field: &str) -> bool {
    field.trim().parse::<f64>().is_ok()
}

fn non_finite(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("nan")
    } else if value.is_infinite() {
        Some(if value > 0.0 { "inf" } else { "-inf" })
    } else {
        None
    }
}

fn with_signed_exponent(mantissa: &str, exponent: &str) -> String {
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent.trim_start_matches('+')),
    };
    format!("{}e{}{:0>2}", mantissa, sign, digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(-0.25), "-0.25");
        assert_eq!(format_float(1234.5), "1234.5");
        assert_eq!(format_float(1e-7), "1e-07");
        assert_eq!(format_float(2.5e20), "2.5e+20");
        assert_eq!(format_float(f64::NAN), "nan");
        assert_eq!(format_float(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_format_scientific() {
        assert_eq!(format_scientific(1.0), "1.000000e+00");
        assert_eq!(format_scientific(-12.5), "-1.250000e+01");
        assert_eq!(format_scientific(0.00123), "1.230000e-03");
        assert_eq!(format_scientific(0.0), "0.000000e+00");
        assert_eq!(format_scientific(6.02e123), "6.020000e+123");
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float(" 3.5 ", Format::Csv, 1).unwrap(), 3.5);
        assert_eq!(parse_float("1e-3", Format::Csv, 1).unwrap(), 0.001);
        let err = parse_float("abc", Format::Xvg, 7).unwrap_err();
        assert!(err.to_string().contains("line 7"));
        assert!(is_numeric("-2"));
        assert!(!is_numeric("Time"));
    }
}
