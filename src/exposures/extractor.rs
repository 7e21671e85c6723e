//! # Metadata extraction
//!
//! Turns one image file into one [`Exposure`].
//!
//! ## Sources
//! -----------------
//! 1. **FITS header** (primary): `DATE-LOC`, `IMAGETYP`, `OBJECT`, `FILTER`, `GAIN`,
//!    `EXPOSURE` (or `EXPTIME`), `CCD-TEMP`, `XBINNING`/`YBINNING`, `SWCREATE`.
//! 2. **Filename** (fallback): used when the header cannot be read or carries no usable
//!    `DATE-LOC`, see [`parse_filename`].
//!
//! Extraction fails with [`AutologError::Metadata`] only when neither source yields a
//! capture time.
//!
//! ## Normalisation
//! -----------------
//! * A missing target falls back to the image type ([`Exposure::new`]).
//! * Numeric header values are rendered in string form; absent values are empty strings.
//! * The capture software is folded to a short code when it starts with a known vendor
//!   prefix ([`SoftwareAliases`]), e.g. `N.I.N.A. 3.0.0.9001` → `sftN`.
use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::{
    autolog_errors::{AutologError, ParseMetaError},
    constants::{
        DEFAULT_SOFTWARE_ALIASES, HEADER_TIME_FORMAT, KEY_CCD_TEMP, KEY_DATE_LOC, KEY_EXPOSURE,
        KEY_EXPTIME, KEY_FILTER, KEY_GAIN, KEY_IMAGE_TYPE, KEY_OBJECT, KEY_SOFTWARE,
        KEY_XBINNING, KEY_YBINNING,
    },
    exposures::{
        filename::{parse_filename, sequence_number},
        fits_header::FitsHeader,
        Exposure, ExposureMetadata,
    },
};

/// Vendor-prefix table used to shorten capture-software strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftwareAliases {
    entries: Vec<(String, String)>,
}

impl Default for SoftwareAliases {
    fn default() -> Self {
        SoftwareAliases {
            entries: DEFAULT_SOFTWARE_ALIASES
                .iter()
                .map(|(prefix, code)| (prefix.to_string(), code.to_string()))
                .collect(),
        }
    }
}

impl SoftwareAliases {
    /// Add an alias; it takes precedence over the ones already registered.
    pub fn with_alias(mut self, prefix: impl Into<String>, code: impl Into<String>) -> Self {
        self.entries.insert(0, (prefix.into(), code.into()));
        self
    }

    /// Short code of `software` if it starts with a registered prefix, else `software` itself.
    pub fn normalize(&self, software: &str) -> String {
        self.entries
            .iter()
            .find(|(prefix, _)| !prefix.is_empty() && software.starts_with(prefix.as_str()))
            .map(|(_, code)| code.clone())
            .unwrap_or_else(|| software.to_string())
    }
}

/// Reads one exposure's source and produces its metadata.
pub trait MetadataExtractor {
    fn extract(&self, source: &Utf8Path) -> Result<Exposure, AutologError>;
}

/// Header-first extractor for FITS frames, with the filename pattern as fallback.
#[derive(Debug, Clone, Default)]
pub struct FitsExtractor {
    aliases: SoftwareAliases,
}

impl FitsExtractor {
    pub fn new(aliases: SoftwareAliases) -> Self {
        FitsExtractor { aliases }
    }

    /// Build the metadata record from a decoded header.
    ///
    /// Fails with [`ParseMetaError::MissingHeaderTime`] if `DATE-LOC` is absent or
    /// does not parse, so that the caller can try the filename instead.
    fn from_header(
        header: &FitsHeader,
        source: &Utf8Path,
    ) -> Result<ExposureMetadata, ParseMetaError> {
        let capture_time = header
            .field(KEY_DATE_LOC)
            .and_then(|s| NaiveDateTime::parse_from_str(&s, HEADER_TIME_FORMAT).ok())
            .ok_or(ParseMetaError::MissingHeaderTime)?;

        let text = |key: &str| header.field(key).unwrap_or_default();

        let binning = match (header.get(KEY_XBINNING), header.get(KEY_YBINNING)) {
            (Some(x), Some(y)) => format!("{x}x{y}"),
            _ => String::new(),
        };

        Ok(ExposureMetadata {
            source: source.to_path_buf(),
            capture_time,
            image_type: text(KEY_IMAGE_TYPE),
            target: text(KEY_OBJECT),
            filter: text(KEY_FILTER),
            binning,
            exposure_seconds: header
                .field(KEY_EXPOSURE)
                .or_else(|| header.field(KEY_EXPTIME))
                .unwrap_or_default(),
            gain: text(KEY_GAIN),
            sensor_temp: text(KEY_CCD_TEMP),
            capture_software: text(KEY_SOFTWARE),
            sequence_number: sequence_number(source).unwrap_or_default(),
        })
    }
}

impl MetadataExtractor for FitsExtractor {
    fn extract(&self, source: &Utf8Path) -> Result<Exposure, AutologError> {
        let header_meta =
            FitsHeader::read(source).and_then(|header| Self::from_header(&header, source));

        let mut meta = match header_meta {
            Ok(meta) => meta,
            Err(header_err) => {
                debug!(%source, error = %header_err, "header unusable, falling back to filename");
                parse_filename(source).map_err(|name_err| {
                    debug!(%source, error = %name_err, "filename does not match the capture pattern");
                    ParseMetaError::NoSource(source.to_string())
                })?
            }
        };

        meta.capture_software = self.aliases.normalize(&meta.capture_software);
        debug!(%source, target = %meta.target, filter = %meta.filter, "exposure extracted");
        Ok(Exposure::new(meta))
    }
}

/// Outcome of a batch extraction: every source ends up in exactly one of the two lists.
#[derive(Debug, Default)]
pub struct ExtractionReport {
    pub exposures: Vec<Exposure>,
    pub failures: Vec<(Utf8PathBuf, AutologError)>,
}

impl ExtractionReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Extract every source, collecting failures per item instead of stopping at the first one.
pub fn extract_all<E>(extractor: &E, sources: &[Utf8PathBuf]) -> ExtractionReport
where
    E: MetadataExtractor + ?Sized,
{
    let mut report = ExtractionReport::default();
    for source in sources {
        match extractor.extract(source) {
            Ok(exposure) => report.exposures.push(exposure),
            Err(err) => {
                warn!(%source, error = %err, "unable to extract exposure metadata");
                report.failures.push((source.clone(), err));
            }
        }
    }
    report
}
