//! Reductions over registered axes

use ndarray::{ArrayD, Axis};
use serde::{Deserialize, Serialize};

/// How an axis registered in the maps collapses after slicing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reduction {
    #[default]
    Sum,
    /// Arithmetic mean; NaN for an empty selection
    Mean,
    Product,
    /// Largest element; negative infinity for an empty selection
    Max,
    /// Smallest element; positive infinity for an empty selection
    Min,
}

impl Reduction {
    /// Collapse `axis` of `array`
    pub fn apply(self, array: &ArrayD<f64>, axis: Axis) -> ArrayD<f64> {
        match self {
            Reduction::Sum => array.sum_axis(axis),
            Reduction::Mean => {
                let count = array.len_of(axis) as f64;
                array.sum_axis(axis).mapv(|sum| sum / count)
            }
            Reduction::Product => array.fold_axis(axis, 1.0, |&product, &value| product * value),
            Reduction::Max => {
                array.fold_axis(axis, f64::NEG_INFINITY, |&max, &value| max.max(value))
            }
            Reduction::Min => array.fold_axis(axis, f64::INFINITY, |&min, &value| min.min(value)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Reduction::Sum => "sum",
            Reduction::Mean => "mean",
            Reduction::Product => "product",
            Reduction::Max => "max",
            Reduction::Min => "min",
        }
    }
}

impl std::fmt::Display for Reduction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
