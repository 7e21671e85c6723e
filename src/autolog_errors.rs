use thiserror::Error;

/// Per-file metadata failures.
///
/// Variants
/// -----------------
/// * `UnreadableHeader` – The FITS header could not be opened or decoded; payload carries the reason.
/// * `MissingHeaderTime` – The header decoded but `DATE-LOC` is absent or unparseable.
/// * `FilenamePattern` – The filename does not follow the underscore-delimited pattern.
/// * `InvalidTimestamp` – The date/time fields of the filename are not a valid timestamp.
/// * `NoSource` – Neither the header nor the filename yielded a capture time; payload is the path.
#[derive(Error, Debug, PartialEq)]
pub enum ParseMetaError {
    #[error("Unreadable FITS header: {0}")]
    UnreadableHeader(String),
    #[error("FITS header has no usable DATE-LOC card")]
    MissingHeaderTime,
    #[error("Filename does not match the capture pattern: {0}")]
    FilenamePattern(String),
    #[error("Invalid capture timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("No capture time found in header or filename of {0}")]
    NoSource(String),
}

#[derive(Error, Debug)]
pub enum AutologError {
    #[error("Metadata error: {0}")]
    Metadata(ParseMetaError),

    #[error("Exposure group built with no members")]
    EmptyGroup,

    #[error("Unknown filter name: {0}")]
    UnknownFilter(String),

    #[error("Malformed binning (expected NxM): {0:?}")]
    MalformedBinning(String),

    #[error("Invalid date header row: {0:?}")]
    InvalidDateHeader(String),

    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Directory walk error: {0}")]
    WalkError(#[from] walkdir::Error),
}

impl From<ParseMetaError> for AutologError {
    fn from(err: ParseMetaError) -> Self {
        AutologError::Metadata(err)
    }
}

impl PartialEq for AutologError {
    fn eq(&self, other: &Self) -> bool {
        use AutologError::*;
        match (self, other) {
            (Metadata(a), Metadata(b)) => a == b,
            (UnknownFilter(a), UnknownFilter(b)) => a == b,
            (MalformedBinning(a), MalformedBinning(b)) => a == b,
            (InvalidDateHeader(a), InvalidDateHeader(b)) => a == b,
            (DirectoryNotFound(a), DirectoryNotFound(b)) => a == b,

            // Wrapped foreign errors: equal if same variant
            (Config(_), Config(_)) => true,
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,
            (WalkError(_), WalkError(_)) => true,

            (EmptyGroup, EmptyGroup) => true,

            _ => false,
        }
    }
}
