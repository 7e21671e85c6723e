//! # Observation entries
//!
//! An [`ObservationEntry`] is one line of the observation log: one or more
//! [`ExposureGroup`]s on the same target with the same binning, merged into display
//! strings.
//!
//! ## Aggregation rules
//! -----------------
//! * **Filter**: each child's filter mapped through the [`FilterTable`], joined with `", "`
//!   in child order (repeats allowed).
//! * **Exposure**: each child's exposure time, joined with `", "` in child order.
//! * **Count**:
//!   - one child → its count (`"7"`);
//!   - several children with the same count → `"<n> each"` (`"5 each"`);
//!   - several children with different counts → every count, ascending (`"3, 5, 5"`).
//! * **Gain / Camera Temp. / Capture Software**: sorted, deduplicated union of the
//!   non-empty values over *every* member exposure of *every* child. Frames read back
//!   from their filename carry no gain, so a night mixing header and filename frames
//!   shows `100` rather than `100, `, and a column left with no value at all is omitted
//!   from the row instead of holding an empty cell.
//!
//! ## Quoting
//! -----------------
//! When an entry merges several children, its Filter, Exposure and Count cells are wrapped
//! in double quotes so that the comma-separated list lands in a single spreadsheet cell.
//! Target and binning are never quoted.
use std::{collections::BTreeSet, sync::LazyLock};

use chrono::NaiveDateTime;
use itertools::Itertools;
use regex::Regex;

use crate::{
    autolog_errors::AutologError,
    constants::{ROW_DATE_FORMAT, START_TIME_FORMAT},
    exposures::Exposure,
    grouping::{exposure_group::ExposureGroup, filter_codes::FilterTable},
    log_row::{LogColumn, LogRow},
};

static BINNING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)x(\d+)$").expect("binning regex is valid"));

/// Leading factor of an `NxM` binning string (`"2x2"` → `"2"`).
pub fn binning_factor(binning: &str) -> Result<&str, AutologError> {
    BINNING_RE
        .captures(binning)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| AutologError::MalformedBinning(binning.to_string()))
}

/// Count cell text for the given child counts, see the module docs.
fn count_display(counts: &[usize]) -> String {
    match counts {
        [single] => single.to_string(),
        [first, rest @ ..] if rest.iter().all(|c| c == first) => format!("{first} each"),
        _ => counts.iter().sorted().join(", "),
    }
}

fn quote(cell: &str) -> String {
    format!("\"{cell}\"")
}

fn distinct<'a, F>(groups: &'a [ExposureGroup], field: F) -> BTreeSet<String>
where
    F: Fn(&'a Exposure) -> &'a str,
{
    groups
        .iter()
        .flat_map(ExposureGroup::members)
        .map(field)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// One observation-log line built from consecutive groups sharing `(target, binning)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationEntry {
    target: String,
    binning: String,
    capture_time: NaiveDateTime,
    observer: String,
    filters: Vec<String>,
    exposures: Vec<String>,
    count_display: String,
    total_count: usize,
    gains: BTreeSet<String>,
    sensor_temps: BTreeSet<String>,
    softwares: BTreeSet<String>,
    groups: Vec<ExposureGroup>,
}

impl ObservationEntry {
    /// Merge groups into one entry.
    ///
    /// Arguments
    /// -----------------
    /// * `groups`: The child groups, all sharing the same `(target, binning)`. They are
    ///   ordered by capture time (stable, so equal times keep the given order).
    /// * `filters`: Table used to abbreviate the filter names.
    ///
    /// Return
    /// ----------
    /// * The entry, or
    ///   - [`AutologError::EmptyGroup`] if `groups` is empty,
    ///   - [`AutologError::UnknownFilter`] if a child's filter is not in `filters`.
    pub fn new(
        mut groups: Vec<ExposureGroup>,
        filters: &FilterTable,
    ) -> Result<Self, AutologError> {
        groups.sort_by_key(ExposureGroup::capture_time);
        let first = groups.first().ok_or(AutologError::EmptyGroup)?;
        debug_assert!(groups
            .iter()
            .all(|g| g.obs_group_key() == first.obs_group_key()));

        let filter_codes = groups
            .iter()
            .map(|g| filters.code(g.filter()).map(str::to_string))
            .collect::<Result<Vec<_>, _>>()?;
        let counts: Vec<usize> = groups.iter().map(ExposureGroup::count).collect();

        Ok(ObservationEntry {
            target: first.target().to_string(),
            binning: first.binning().to_string(),
            capture_time: first.capture_time(),
            observer: first.observer().to_string(),
            filters: filter_codes,
            exposures: groups
                .iter()
                .map(|g| g.exposure_seconds().to_string())
                .collect(),
            count_display: count_display(&counts),
            total_count: counts.iter().sum(),
            gains: distinct(&groups, Exposure::gain),
            sensor_temps: distinct(&groups, Exposure::sensor_temp),
            softwares: distinct(&groups, Exposure::capture_software),
            groups,
        })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn binning(&self) -> &str {
        &self.binning
    }

    pub fn capture_time(&self) -> NaiveDateTime {
        self.capture_time
    }

    pub fn observer(&self) -> &str {
        &self.observer
    }

    pub fn groups(&self) -> &[ExposureGroup] {
        &self.groups
    }

    /// Number of exposures over all children.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn filter_codes(&self) -> &[String] {
        &self.filters
    }

    pub fn exposure_values(&self) -> &[String] {
        &self.exposures
    }

    pub fn filter_display(&self) -> String {
        self.filters.join(", ")
    }

    pub fn exposure_display(&self) -> String {
        self.exposures.join(", ")
    }

    pub fn count_display(&self) -> &str {
        &self.count_display
    }

    pub fn distinct_gains(&self) -> &BTreeSet<String> {
        &self.gains
    }

    pub fn distinct_sensor_temps(&self) -> &BTreeSet<String> {
        &self.sensor_temps
    }

    pub fn distinct_softwares(&self) -> &BTreeSet<String> {
        &self.softwares
    }

    /// Whether the entry merges more than one group (its list cells are quoted).
    pub fn is_merged(&self) -> bool {
        self.groups.len() > 1
    }

    fn list_cell(&self, text: String) -> String {
        if self.is_merged() {
            quote(&text)
        } else {
            text
        }
    }

    pub fn filter_cell(&self) -> String {
        self.list_cell(self.filter_display())
    }

    pub fn exposure_cell(&self) -> String {
        self.list_cell(self.exposure_display())
    }

    pub fn count_cell(&self) -> String {
        self.list_cell(self.count_display.clone())
    }

    /// Project the entry onto a log row.
    ///
    /// The row is built completely or not at all: a malformed binning fails with
    /// [`AutologError::MalformedBinning`] before any cell is produced. Gain, camera
    /// temperature and capture software are omitted when no exposure carries a value.
    pub fn to_log_row(&self) -> Result<LogRow, AutologError> {
        let binning = binning_factor(&self.binning)?;

        let mut row = LogRow::new()
            .with(
                LogColumn::Date,
                self.capture_time.format(ROW_DATE_FORMAT).to_string(),
            )
            .with(LogColumn::Observer, self.observer.as_str())
            .with(
                LogColumn::StartingTime,
                self.capture_time.format(START_TIME_FORMAT).to_string(),
            )
            .with(LogColumn::Target, self.target.as_str())
            .with(LogColumn::Filter, self.filter_cell())
            .with(LogColumn::Binning, binning)
            .with(LogColumn::ExposureTime, self.exposure_cell())
            .with(LogColumn::ExposureCount, self.count_cell());

        for (column, values) in [
            (LogColumn::Gain, &self.gains),
            (LogColumn::CameraTemp, &self.sensor_temps),
            (LogColumn::CaptureSoftware, &self.softwares),
        ] {
            if !values.is_empty() {
                row.insert(column, values.iter().join(", "));
            }
        }

        Ok(row)
    }
}
