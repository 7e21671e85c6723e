use chrono::NaiveDateTime;

use crate::{
    autolog_errors::AutologError,
    exposures::{Exposure, GroupKey},
};

/// Identity of a log row: groups sharing `(target, binning)` merge into one
/// [`ObservationEntry`](crate::grouping::observation_entry::ObservationEntry).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObsGroupKey {
    pub target: String,
    pub binning: String,
}

/// Exposures sharing one [`GroupKey`] (same target, filter, binning and exposure time),
/// counted as a unit.
///
/// Invariants
/// -----------------
/// * non-empty, every member carries `key`;
/// * `capture_time` is the earliest member time;
/// * `count() == members().len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExposureGroup {
    key: GroupKey,
    capture_time: NaiveDateTime,
    observer: String,
    members: Vec<Exposure>,
}

impl ExposureGroup {
    /// Build a group from its key and members.
    ///
    /// Arguments
    /// -----------------
    /// * `key`: The shared group key.
    /// * `members`: The exposures, normally already ordered by sort key.
    /// * `observer`: Observer name tagged on the group.
    ///
    /// Return
    /// ----------
    /// * The group, or [`AutologError::EmptyGroup`] when `members` is empty.
    pub fn new(
        key: GroupKey,
        members: Vec<Exposure>,
        observer: impl Into<String>,
    ) -> Result<Self, AutologError> {
        let capture_time = members
            .iter()
            .map(Exposure::capture_time)
            .min()
            .ok_or(AutologError::EmptyGroup)?;
        debug_assert!(members.iter().all(|m| m.has_group_key(&key)));

        Ok(ExposureGroup {
            key,
            capture_time,
            observer: observer.into(),
            members,
        })
    }

    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    pub fn target(&self) -> &str {
        &self.key.target
    }

    pub fn filter(&self) -> &str {
        &self.key.filter
    }

    pub fn binning(&self) -> &str {
        &self.key.binning
    }

    pub fn exposure_seconds(&self) -> &str {
        &self.key.exposure_seconds
    }

    pub fn capture_time(&self) -> NaiveDateTime {
        self.capture_time
    }

    pub fn observer(&self) -> &str {
        &self.observer
    }

    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn members(&self) -> &[Exposure] {
        &self.members
    }

    pub fn obs_group_key(&self) -> ObsGroupKey {
        ObsGroupKey {
            target: self.key.target.clone(),
            binning: self.key.binning.clone(),
        }
    }
}
