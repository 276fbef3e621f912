//! implore-index - Label-based indexing of n-dimensional arrays
//!
//! A [`Selector`] combines caller-owned [`DimensionMap`]s with a borrowed
//! array. Selection paths produced by `implore-pick` are resolved to axis
//! indices, the array is sliced, and every axis registered in the maps is
//! reduced (summed by default).
//!
//! # Example
//!
//! ```ignore
//! use implore_index::{AxisMap, DimensionMap, Selector};
//! use implore_pick::SelectionPath;
//!
//! let maps = DimensionMap::new()
//!     .axis(0, AxisMap::new().label("x", 0).label("y", 1).label("z", 2))
//!     .axis(1, AxisMap::new().label("p", 0..2).label("q", 2..5));
//! let selector = Selector::new(&maps, data.view())?;
//! let xq = selector.get(&SelectionPath::from(["x", "q"]))?;
//! ```
//!
//! Paths containing arithmetic are evaluated with [`combine::evaluate`].

pub mod combine;
pub mod config;
pub mod dimension;
pub mod error;
mod label;
pub mod reduction;
pub mod selector;
pub mod terms;

pub use combine::{evaluate, evaluate_selection, Selected};
pub use config::SelectorOptions;
pub use dimension::{AxisMap, DimensionMap, Index};
pub use error::{IndexError, IndexResult, MapError, SelectError, SelectResult};
pub use reduction::Reduction;
pub use selector::Selector;
pub use terms::{expand, Sign, Term};
