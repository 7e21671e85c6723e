//! Filename fallback for exposures without a readable header.
//!
//! N.I.N.A. names its frames with nine underscore-delimited fields:
//!
//! ```text
//! 2024-01-15_21-30-05_LIGHT_M42_Red_60.00s_-10.00C_2x2_0001.fits
//! date       time     type  tgt filt exp   temp    bin seq
//! ```
//!
//! The exposure and temperature fields carry a unit suffix (`s`, `C`) which is removed.
//! The gain is not part of the pattern and is left empty.
use camino::Utf8Path;
use chrono::NaiveDateTime;

use crate::{
    autolog_errors::ParseMetaError,
    constants::{FILENAME_PATTERN_SOFTWARE, FILENAME_TIME_FORMAT},
    exposures::ExposureMetadata,
};

/// Number of fields in the capture filename pattern.
const FIELD_COUNT: usize = 9;

/// Underscore-delimited fields of the file stem.
fn stem_fields(path: &Utf8Path) -> Vec<&str> {
    path.file_stem().unwrap_or_default().split('_').collect()
}

/// Sequence number of a frame (ninth filename field), if the name follows the pattern.
///
/// Headers do not record the sequence number, so it is taken from the filename for both
/// metadata sources.
pub fn sequence_number(path: &Utf8Path) -> Option<String> {
    stem_fields(path)
        .get(FIELD_COUNT - 1)
        .map(|s| s.to_string())
}

/// Build a metadata record from the filename alone.
///
/// Arguments
/// -----------------
/// * `path`: Path of the image file; only its file name is inspected.
///
/// Return
/// ----------
/// * The metadata record, or
///   - [`ParseMetaError::FilenamePattern`] if the stem has fewer than nine fields,
///   - [`ParseMetaError::InvalidTimestamp`] if the date/time fields do not parse.
pub fn parse_filename(path: &Utf8Path) -> Result<ExposureMetadata, ParseMetaError> {
    let fields = stem_fields(path);
    if fields.len() < FIELD_COUNT {
        return Err(ParseMetaError::FilenamePattern(
            path.file_name().unwrap_or_default().to_string(),
        ));
    }

    let stamp = format!("{}_{}", fields[0], fields[1]);
    let capture_time = NaiveDateTime::parse_from_str(&stamp, FILENAME_TIME_FORMAT)
        .map_err(|_| ParseMetaError::InvalidTimestamp(stamp.clone()))?;

    Ok(ExposureMetadata {
        source: path.to_path_buf(),
        capture_time,
        image_type: fields[2].to_string(),
        target: fields[3].to_string(),
        filter: fields[4].to_string(),
        binning: fields[7].to_string(),
        exposure_seconds: fields[5].trim_end_matches('s').to_string(),
        gain: String::new(),
        sensor_temp: fields[6].trim_end_matches('C').to_string(),
        capture_software: FILENAME_PATTERN_SOFTWARE.to_string(),
        sequence_number: fields[8].to_string(),
    })
}
