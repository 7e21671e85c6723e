//! # Autolog
//!
//! Builds the observation log of an imaging night from its image files.
//!
//! 1. [`exposures`] – discover image files and extract one [`Exposure`] per file.
//! 2. [`grouping`] – group the night's exposures into [`ObservationEntry`] values.
//! 3. [`log_row`] – project each entry onto a display-ready [`LogRow`].
//! 4. [`log_sink`] – write the rows below the right date header of the right sheet.
pub mod autolog_errors;
pub mod config;
pub mod constants;
pub mod display;
pub mod exposures;
pub mod grouping;
pub mod log_row;
pub mod log_sink;

pub use autolog_errors::AutologError;
pub use exposures::Exposure;
pub use grouping::{
    observation_entry::ObservationEntry,
    session::{log_rows, SessionGrouper},
};
pub use log_row::LogRow;
