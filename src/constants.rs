//! # Constants and type definitions for Autolog
//!
//! This module centralizes the **lookup tables**, **file-format constants**, and **common type
//! definitions** used throughout the `autolog` library.
//!
//! ## Overview
//!
//! - Built-in filter-code table (filter wheel name → log abbreviation)
//! - Built-in capture-software aliases (vendor prefix → short code)
//! - FITS header geometry (card and block sizes) and the keywords read from it
//! - Timestamp layouts used by the header and the filename fallback
//! - Core type aliases shared by the grouping pipeline

use crate::exposures::Exposure;

// -------------------------------------------------------------------------------------------------
// Filter and software tables
// -------------------------------------------------------------------------------------------------

/// Built-in filter-code table, as `(filter wheel name, log code)`.
///
/// Names are matched exactly (case-sensitive). Extra entries can be supplied through
/// the `[filters]` table of the configuration file.
pub const DEFAULT_FILTER_CODES: &[(&str, &str)] = &[
    ("Luminance", "L"),
    ("Red", "R"),
    ("Green", "G"),
    ("Blue", "B"),
    ("Ha", "Ha"),
    ("OIII", "OIII"),
    ("SII", "SII"),
];

/// Built-in capture-software aliases, as `(vendor prefix, short code)`.
pub const DEFAULT_SOFTWARE_ALIASES: &[(&str, &str)] = &[("N.I.N.A.", "sftN")];

/// Capture software assumed for exposures whose metadata comes from the filename.
///
/// Only N.I.N.A. writes the underscore-delimited pattern parsed by the fallback reader.
pub const FILENAME_PATTERN_SOFTWARE: &str = "N.I.N.A.";

/// Image file extensions walked by default (compared case-insensitively).
pub const DEFAULT_EXTENSIONS: &[&str] = &["fit", "fits"];

/// Default directory of the CSV log sink.
pub const DEFAULT_LOG_DIR: &str = "observation_log";

// -------------------------------------------------------------------------------------------------
// FITS header layout
// -------------------------------------------------------------------------------------------------

/// Length of one header card, in bytes.
pub const FITS_CARD_LEN: usize = 80;

/// Length of one header block, in bytes (36 cards).
pub const FITS_BLOCK_LEN: usize = 2880;

/// Upper bound on the number of header blocks scanned before giving up on `END`.
pub const FITS_MAX_HEADER_BLOCKS: usize = 64;

pub const KEY_DATE_LOC: &str = "DATE-LOC";
pub const KEY_IMAGE_TYPE: &str = "IMAGETYP";
pub const KEY_OBJECT: &str = "OBJECT";
pub const KEY_FILTER: &str = "FILTER";
pub const KEY_GAIN: &str = "GAIN";
pub const KEY_EXPOSURE: &str = "EXPOSURE";
pub const KEY_EXPTIME: &str = "EXPTIME";
pub const KEY_CCD_TEMP: &str = "CCD-TEMP";
pub const KEY_XBINNING: &str = "XBINNING";
pub const KEY_YBINNING: &str = "YBINNING";
pub const KEY_SOFTWARE: &str = "SWCREATE";

// -------------------------------------------------------------------------------------------------
// Time layouts
// -------------------------------------------------------------------------------------------------

/// `DATE-LOC` layout (local civil time, fractional seconds optional).
pub const HEADER_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Date and time fields of the filename pattern, joined with an underscore.
pub const FILENAME_TIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// `Starting Time` cell layout.
pub const START_TIME_FORMAT: &str = "%H:%M:%S";

/// `Date` cell layout.
pub const ROW_DATE_FORMAT: &str = "%Y-%m-%d";

/// Date layout of a date header row (`YYYYMMDD, Observer: name`).
pub const HEADER_ROW_DATE_FORMAT: &str = "%Y%m%d";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// An ordered batch of exposures, as handed to the session grouper.
pub type Exposures = Vec<Exposure>;
