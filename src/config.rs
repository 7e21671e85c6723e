//! Configuration file support.
//!
//! ```toml
//! observer = "Alice"
//! log_dir = "observation_log"
//! extensions = ["fit", "fits", "fts"]
//!
//! [filters]
//! "Ha 3nm" = "Ha"
//!
//! [[software_aliases]]
//! prefix = "SharpCap"
//! code = "sftS"
//! ```
//!
//! Every field is optional; a missing file is the same as an empty one.
use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::{
    autolog_errors::AutologError,
    constants::{DEFAULT_EXTENSIONS, DEFAULT_LOG_DIR},
    exposures::extractor::SoftwareAliases,
    grouping::filter_codes::FilterTable,
};

/// One `[[software_aliases]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftwareAlias {
    pub prefix: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutologConfig {
    pub observer: String,
    pub log_dir: Utf8PathBuf,
    pub extensions: Vec<String>,
    /// Extra filter codes; an entry overrides the built-in code of the same name.
    pub filters: BTreeMap<String, String>,
    pub software_aliases: Vec<SoftwareAlias>,
}

impl Default for AutologConfig {
    fn default() -> Self {
        AutologConfig {
            observer: String::new(),
            log_dir: Utf8PathBuf::from(DEFAULT_LOG_DIR),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            filters: BTreeMap::new(),
            software_aliases: Vec::new(),
        }
    }
}

impl AutologConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, AutologError> {
        Ok(toml::from_str(content)?)
    }

    /// Load the configuration from a TOML file.
    ///
    /// Arguments
    /// -----------------
    /// * `path`: Path to the configuration file.
    ///
    /// Return
    /// ----------
    /// * The parsed configuration, [`AutologError::IoError`] if the file cannot be read or
    ///   [`AutologError::Config`] if it is not valid.
    pub fn from_file(path: &Utf8Path) -> Result<Self, AutologError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Built-in filter codes extended with the `[filters]` table.
    pub fn filter_table(&self) -> FilterTable {
        FilterTable::default().extend(self.filters.clone())
    }

    /// Built-in aliases extended with the configured ones. Configured entries are tried
    /// first, in file order.
    pub fn software_aliases(&self) -> SoftwareAliases {
        self.software_aliases
            .iter()
            .rev()
            .fold(SoftwareAliases::default(), |aliases, alias| {
                aliases.with_alias(alias.prefix.as_str(), alias.code.as_str())
            })
    }
}
