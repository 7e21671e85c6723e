//! # Session grouping
//!
//! Turns the unordered exposures of one night into the ordered list of
//! [`ObservationEntry`] that make up the night's log.
//!
//! ## Algorithm
//! -----------------
//! 1. **Time sort** – all exposures by capture time (ties broken by sort key, then
//!    source path, so the result never depends on the input order).
//! 2. **Target runs** – split the time-sorted list into maximal runs of *consecutive*
//!    exposures on the same target.
//! 3. **Exposure groups** – inside each run, sort by [`SortKey`](crate::exposures::SortKey)
//!    and split into consecutive runs of equal [`GroupKey`](crate::exposures::GroupKey);
//!    each becomes an [`ExposureGroup`] tagged with the observer.
//! 4. **Regroup by time** – all groups of all runs, sorted by capture time.
//! 5. **Log entries** – split the sorted groups into consecutive runs of equal
//!    `(target, binning)`; each becomes an [`ObservationEntry`].
//!
//! Every split is a *consecutive-run* split, never a global grouping: a target imaged,
//! left for another one, then revisited later produces two separate entries, matching
//! the chronology of the night.
use itertools::Itertools;
use tracing::{debug, info};

use crate::{
    autolog_errors::AutologError,
    constants::Exposures,
    exposures::Exposure,
    grouping::{
        exposure_group::ExposureGroup, filter_codes::FilterTable,
        observation_entry::ObservationEntry,
    },
    log_row::LogRow,
};

/// Step 1: time order with deterministic tie-breaks.
fn sort_by_time(exposures: &mut [Exposure]) {
    exposures.sort_by(|a, b| {
        a.capture_time()
            .cmp(&b.capture_time())
            .then_with(|| a.sort_key().cmp(&b.sort_key()))
            .then_with(|| a.source().cmp(b.source()))
    });
}

/// Step 2: maximal runs of consecutive exposures on the same target.
pub(crate) fn target_runs(time_sorted: Exposures) -> Vec<Exposures> {
    let mut runs = Vec::new();
    for (_, run) in &time_sorted.into_iter().chunk_by(|e| e.target().to_string()) {
        runs.push(run.collect());
    }
    runs
}

/// Step 3: count-bearing groups of one target run.
pub(crate) fn exposure_groups(
    mut run: Exposures,
    observer: &str,
) -> Result<Vec<ExposureGroup>, AutologError> {
    run.sort_by(|a, b| {
        a.sort_key()
            .cmp(&b.sort_key())
            .then_with(|| a.source().cmp(b.source()))
    });

    let mut groups = Vec::new();
    for (key, members) in &run.into_iter().chunk_by(Exposure::group_key) {
        groups.push(ExposureGroup::new(key, members.collect(), observer)?);
    }
    Ok(groups)
}

/// Steps 4 and 5: time-ordered groups merged into log entries.
pub(crate) fn observation_entries(
    mut groups: Vec<ExposureGroup>,
    filters: &FilterTable,
) -> Result<Vec<ObservationEntry>, AutologError> {
    groups.sort_by(|a, b| {
        a.capture_time()
            .cmp(&b.capture_time())
            .then_with(|| a.key().cmp(b.key()))
    });

    let mut entries = Vec::new();
    for (_, run) in &groups.into_iter().chunk_by(ExposureGroup::obs_group_key) {
        entries.push(ObservationEntry::new(run.collect(), filters)?);
    }
    Ok(entries)
}

/// Builds the log entries of an observing session.
#[derive(Debug, Clone, Default)]
pub struct SessionGrouper {
    filters: FilterTable,
}

impl SessionGrouper {
    pub fn new(filters: FilterTable) -> Self {
        SessionGrouper { filters }
    }

    pub fn filters(&self) -> &FilterTable {
        &self.filters
    }

    /// Group the exposures of a session into log entries.
    ///
    /// Arguments
    /// -----------------
    /// * `exposures`: The session's exposures, in any order.
    /// * `observer`: Observer name attached to every entry (may be empty).
    ///
    /// Return
    /// ----------
    /// * The entries in order of first appearance during the night, or the first
    ///   [`AutologError::UnknownFilter`] met. The result is a pure function of the input
    ///   set: permuting `exposures` does not change it.
    pub fn group(
        &self,
        mut exposures: Exposures,
        observer: &str,
    ) -> Result<Vec<ObservationEntry>, AutologError> {
        let total = exposures.len();
        sort_by_time(&mut exposures);

        let runs = target_runs(exposures);
        debug!(runs = runs.len(), "target runs split");

        let mut groups = Vec::new();
        for run in runs {
            groups.extend(exposure_groups(run, observer)?);
        }
        debug!(groups = groups.len(), "exposure groups built");

        let entries = observation_entries(groups, &self.filters)?;
        info!(exposures = total, entries = entries.len(), "session grouped");
        Ok(entries)
    }
}

/// Project every entry onto its log row.
///
/// Either every row is produced or the first failure is returned; no partial output.
pub fn log_rows(entries: &[ObservationEntry]) -> Result<Vec<LogRow>, AutologError> {
    entries.iter().map(ObservationEntry::to_log_row).collect()
}
