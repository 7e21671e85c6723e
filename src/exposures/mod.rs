//! # Exposures: per-frame metadata records
//!
//! An [`Exposure`] is the immutable value object the grouping pipeline works on. It wraps a
//! flat [`ExposureMetadata`] record (one per image file) and derives the two keys used
//! downstream:
//!
//! * [`SortKey`] – `(target, filter, binning, exposure, capture time)`, orders exposures
//!   inside a target run.
//! * [`GroupKey`] – `(target, filter, binning, exposure)`, identifies the frames that are
//!   counted together in one [`ExposureGroup`](crate::grouping::exposure_group::ExposureGroup).
//!
//! Records are produced by a [`MetadataExtractor`](extractor::MetadataExtractor): the FITS
//! header is read first ([`fits_header`]) and the N.I.N.A. filename pattern ([`filename`])
//! is used when the header is missing or has no capture time.
pub mod discovery;
pub mod extractor;
pub mod filename;
pub mod fits_header;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDateTime;

/// Flat metadata record of one captured frame.
///
/// Numeric values (`gain`, `exposure_seconds`, `sensor_temp`) are kept in string form;
/// an empty string means the value was not available from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExposureMetadata {
    /// Path of the image file the record was read from.
    pub source: Utf8PathBuf,
    /// Local capture time of the frame.
    pub capture_time: NaiveDateTime,
    /// Frame type as written by the capture software (`LIGHT`, `DARK`, `FLAT`, `BIAS`, ...).
    pub image_type: String,
    /// Target name; may be empty, see [`Exposure::new`].
    pub target: String,
    pub filter: String,
    /// Binning in `NxM` form.
    pub binning: String,
    pub exposure_seconds: String,
    pub gain: String,
    pub sensor_temp: String,
    pub capture_software: String,
    pub sequence_number: String,
}

/// Sort key of an exposure: `(target, filter, binning, exposure, capture time)`.
pub type SortKey<'a> = (&'a str, &'a str, &'a str, &'a str, NaiveDateTime);

/// Identity of a count-bearing group: exposures sharing all four fields are counted together.
///
/// Field order matters: the derived ordering compares target first, then filter, binning
/// and exposure.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub target: String,
    pub filter: String,
    pub binning: String,
    pub exposure_seconds: String,
}

/// One captured frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exposure {
    meta: ExposureMetadata,
}

impl Exposure {
    /// Wrap a metadata record.
    ///
    /// An empty target falls back to the image type, so calibration frames (darks,
    /// flats, bias) are grouped under their frame type.
    pub fn new(mut meta: ExposureMetadata) -> Self {
        if meta.target.is_empty() {
            meta.target = meta.image_type.clone();
        }
        Exposure { meta }
    }

    pub fn metadata(&self) -> &ExposureMetadata {
        &self.meta
    }

    pub fn source(&self) -> &Utf8Path {
        &self.meta.source
    }

    pub fn capture_time(&self) -> NaiveDateTime {
        self.meta.capture_time
    }

    pub fn image_type(&self) -> &str {
        &self.meta.image_type
    }

    pub fn target(&self) -> &str {
        &self.meta.target
    }

    pub fn filter(&self) -> &str {
        &self.meta.filter
    }

    pub fn binning(&self) -> &str {
        &self.meta.binning
    }

    pub fn exposure_seconds(&self) -> &str {
        &self.meta.exposure_seconds
    }

    pub fn gain(&self) -> &str {
        &self.meta.gain
    }

    pub fn sensor_temp(&self) -> &str {
        &self.meta.sensor_temp
    }

    pub fn capture_software(&self) -> &str {
        &self.meta.capture_software
    }

    pub fn sequence_number(&self) -> &str {
        &self.meta.sequence_number
    }

    pub fn sort_key(&self) -> SortKey<'_> {
        (
            &self.meta.target,
            &self.meta.filter,
            &self.meta.binning,
            &self.meta.exposure_seconds,
            self.meta.capture_time,
        )
    }

    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            target: self.meta.target.clone(),
            filter: self.meta.filter.clone(),
            binning: self.meta.binning.clone(),
            exposure_seconds: self.meta.exposure_seconds.clone(),
        }
    }

    /// Whether the exposure belongs to the group identified by `key`, without allocating.
    pub fn has_group_key(&self, key: &GroupKey) -> bool {
        self.meta.target == key.target
            && self.meta.filter == key.filter
            && self.meta.binning == key.binning
            && self.meta.exposure_seconds == key.exposure_seconds
    }
}
