//! Selector options
//!
//! Options can be built in code or loaded from JSON (and TOML with the
//! `toml-config` feature). Missing fields take their default.

use crate::reduction::Reduction;
use serde::{Deserialize, Serialize};

/// Behavior settings of a [`Selector`](crate::Selector)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorOptions {
    /// Reduction applied to every axis registered in the maps
    pub reduction: Reduction,
    /// Render decimal labels relative to a named label of the same axis,
    /// e.g. `A_2` instead of `5`; on by default
    pub use_number_labels: bool,
}

impl Default for SelectorOptions {
    fn default() -> Self {
        Self {
            reduction: Reduction::default(),
            use_number_labels: true,
        }
    }
}

impl SelectorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reduction(mut self, reduction: Reduction) -> Self {
        self.reduction = reduction;
        self
    }

    pub fn with_number_labels(mut self, enabled: bool) -> Self {
        self.use_number_labels = enabled;
        self
    }

    /// Load options from a TOML string
    #[cfg(feature = "toml-config")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Serialize options to TOML
    #[cfg(feature = "toml-config")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load options from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize options to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
