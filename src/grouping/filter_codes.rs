use std::collections::BTreeMap;

use crate::{autolog_errors::AutologError, constants::DEFAULT_FILTER_CODES};

/// Filter wheel name → abbreviation used in the log's `Filter` column.
///
/// Lookups are exact and any name missing from the table is an error rather than being
/// passed through, the empty name of frames taken without a filter included. Darks and
/// bias frames are accepted once `""` is mapped, e.g. `"" = ""` under `[filters]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterTable {
    codes: BTreeMap<String, String>,
}

impl Default for FilterTable {
    fn default() -> Self {
        FilterTable {
            codes: DEFAULT_FILTER_CODES
                .iter()
                .map(|(name, code)| (name.to_string(), code.to_string()))
                .collect(),
        }
    }
}

impl FilterTable {
    /// Extend the table, overriding existing names.
    pub fn extend<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.codes
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Code for `filter`, or [`AutologError::UnknownFilter`].
    pub fn code(&self, filter: &str) -> Result<&str, AutologError> {
        self.codes
            .get(filter)
            .map(String::as_str)
            .ok_or_else(|| AutologError::UnknownFilter(filter.to_string()))
    }
}
