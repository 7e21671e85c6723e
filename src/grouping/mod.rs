//! Two-level grouping of a night's exposures into log entries.
//!
//! * [`exposure_group`] – exposures sharing target, filter, binning and exposure time.
//! * [`observation_entry`] – consecutive groups sharing target and binning, one log line.
//! * [`session`] – the orchestration, see [`SessionGrouper`](session::SessionGrouper).
//! * [`filter_codes`] – filter name abbreviations used in the log.
pub mod exposure_group;
pub mod filter_codes;
pub mod observation_entry;
pub mod session;
