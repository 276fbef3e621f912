//! Error types for implore-index
//!
//! Two categories are kept apart:
//! - [`SelectError`]: the user asked for something the maps cannot provide
//! - [`MapError`]: the caller handed over inconsistent dimension maps

use implore_pick::{Group, Operation, ParseError};
use thiserror::Error;

/// Result type alias for resolving selections
pub type SelectResult<T> = Result<T, SelectError>;

/// Result type alias for the combined error
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors caused by a user selection
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectError {
    /// Label missing from every axis map
    #[error("Could not read {label}, please check the spelling and capitalization.")]
    UnknownLabel { label: String, valid: Vec<String> },

    /// Range whose members live on different axes
    #[error("The range {range} could not be read, because the components correspond to different dimensions.")]
    RangeAcrossDimensions { range: Group },

    /// Range over members that are not plain unit-step slices
    #[error("Cannot read range {range} because the data is not contiguous.")]
    NonContiguousRange { range: Group },

    /// Two atoms of one path address the same axis
    #[error("Conflicting keys '{first}' and '{second}' act on the same index.")]
    ConflictingKeys { first: String, second: String },

    /// Operations have to be split into terms first
    #[error("The operation {operation} cannot be read directly, split it into its terms first.")]
    UnresolvedOperation { operation: Operation },
}

impl SelectError {
    /// Every key the selector knows, for building suggestions
    pub fn valid_keys(&self) -> Option<&[String]> {
        match self {
            SelectError::UnknownLabel { valid, .. } => Some(valid),
            _ => None,
        }
    }
}

/// Errors in the dimension maps themselves
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("The maps may not have duplicate keys, but '{}' {} more than once.", quoted(.labels), occur(.labels))]
    DuplicateLabels { labels: Vec<String> },

    #[error("A map refers to axis {axis}, but the array only has {ndim} dimensions.")]
    AxisOutOfBounds { axis: usize, ndim: usize },

    #[error("The index of {label} does not fit axis {axis} of length {length}.")]
    InvalidIndex {
        label: String,
        axis: usize,
        length: usize,
    },

    #[error("The slice of {label} has a step of zero.")]
    ZeroStep { label: String },

    #[error("Integer label {label} maps to more than a single index.")]
    AmbiguousNumberLabel { label: String },
}

fn quoted(labels: &[String]) -> String {
    labels.join("', '")
}

fn occur(labels: &[String]) -> &'static str {
    if labels.len() == 1 {
        "occurs"
    } else {
        "occur"
    }
}

/// Any failure along the way from selection string to array
#[derive(Error, Debug)]
pub enum IndexError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Select(#[from] SelectError),

    #[error(transparent)]
    Map(#[from] MapError),
}
