//! Error types shared by the table model and the format codecs.

use crate::formats::Format;

/// Errors raised by table operations and format codecs
#[derive(Debug, thiserror::Error)]
pub enum TabDataError {
    /// Caller passed inconsistent parameters
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Data of incompatible lengths combined under strict-rectangular policy
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Input stream does not follow the grammar of the named format
    #[error("{format} format mismatch: {message}")]
    FormatMismatch {
        /// Format whose grammar was violated
        format: Format,
        /// What was found and where
        message: String,
    },

    /// Preconditions on the current table contents are unmet
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Dispatch requested for an unregistered format tag
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// Column or row index outside the table
    #[error("Index {index} out of range (length {len})")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of valid entries
        len: usize,
    },

    /// Query on a table that holds no data
    #[error("Table has no data")]
    EmptyTable,

    /// The format can be read but not written
    #[error("Writing {0} files is not supported")]
    WriteUnsupported(Format),

    /// I/O error on the underlying stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the delimited-text reader or writer
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl TabDataError {
    pub(crate) fn format(format: Format, message: impl Into<String>) -> Self {
        Self::FormatMismatch {
            format,
            message: message.into(),
        }
    }

    /// Whether this error reports malformed input, for any format
    pub fn is_format_mismatch(&self) -> bool {
        matches!(self, Self::FormatMismatch { .. })
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, TabDataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mismatch_message() {
        let err = TabDataError::format(Format::Atf, "bad magic on line 1");
        assert!(err.is_format_mismatch());
        assert_eq!(err.to_string(), "ATF format mismatch: bad magic on line 1");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err: TabDataError = io.into();
        assert!(matches!(err, TabDataError::Io(_)));
        assert!(!err.is_format_mismatch());
    }
}
