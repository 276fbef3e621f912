//! Dimension maps
//!
//! A [`DimensionMap`] describes which labels address which part of an array
//! axis. Maps are owned by the caller and handed to a
//! [`Selector`](crate::Selector) for one query; the selector never changes
//! them.
//!
//! ```ignore
//! use implore_index::{AxisMap, DimensionMap};
//! use ndarray::Slice;
//!
//! let maps = DimensionMap::new()
//!     .axis(0, AxisMap::new().label("x", 0).label("y", 1).label("z", 2))
//!     .axis(1, AxisMap::new().label("p", 0..2).label("q", Slice::new(2, Some(5), 1)));
//! ```

use crate::error::MapError;
use ndarray::Slice;
use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo};

/// The part of one axis a label refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Index {
    /// A single position; negative values count from the end
    Position(isize),
    /// A slice with ndarray semantics
    Slice(Slice),
    /// Explicit positions; negative values count from the end
    List(Vec<isize>),
}

macro_rules! index_from_position {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Index {
                fn from(position: $t) -> Self {
                    Index::Position(position as isize)
                }
            }

            impl From<Vec<$t>> for Index {
                fn from(positions: Vec<$t>) -> Self {
                    Index::List(positions.into_iter().map(|position| position as isize).collect())
                }
            }
        )*
    };
}

index_from_position!(i32, isize, usize);

macro_rules! index_from_range {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Index {
                fn from(range: $t) -> Self {
                    Index::Slice(Slice::from(range))
                }
            }
        )*
    };
}

index_from_range!(
    Range<i32>,
    Range<isize>,
    Range<usize>,
    RangeFrom<i32>,
    RangeFrom<isize>,
    RangeFrom<usize>,
    RangeTo<i32>,
    RangeTo<isize>,
    RangeTo<usize>,
    RangeInclusive<i32>,
    RangeInclusive<isize>,
    RangeInclusive<usize>,
    RangeFull
);

impl From<Slice> for Index {
    fn from(slice: Slice) -> Self {
        Index::Slice(slice)
    }
}

/// Labels of a single axis, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AxisMap {
    entries: Vec<(String, Index)>,
    default: Option<Index>,
}

impl AxisMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a label; a label added twice keeps its first position but the
    /// latest index
    pub fn label(mut self, label: impl Into<String>, index: impl Into<Index>) -> Self {
        self.insert(label, index);
        self
    }

    /// Index used when a selection does not address this axis
    pub fn with_default(mut self, index: impl Into<Index>) -> Self {
        self.default = Some(index.into());
        self
    }

    pub fn insert(&mut self, label: impl Into<String>, index: impl Into<Index>) {
        let label = label.into();
        let index = index.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == label) {
            Some(entry) => entry.1 = index,
            None => self.entries.push((label, index)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&Index> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, index)| index)
    }

    pub fn default_index(&self) -> Option<&Index> {
        self.default.as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Index)> {
        self.entries.iter().map(|(label, index)| (label.as_str(), index))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<L: Into<String>, I: Into<Index>> FromIterator<(L, I)> for AxisMap {
    fn from_iter<T: IntoIterator<Item = (L, I)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (label, index) in iter {
            map.insert(label, index);
        }
        map
    }
}

/// Axis maps keyed by axis number
///
/// The order in which axes are added matters: labels of a term are joined
/// in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimensionMap {
    axes: Vec<(usize, AxisMap)>,
}

impl DimensionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder variant of [`insert`](Self::insert)
    pub fn axis(mut self, axis: usize, map: AxisMap) -> Self {
        self.insert(axis, map);
        self
    }

    /// Register the map of an axis, replacing an earlier map of that axis
    pub fn insert(&mut self, axis: usize, map: AxisMap) {
        match self.axes.iter_mut().find(|(existing, _)| *existing == axis) {
            Some(entry) => entry.1 = map,
            None => self.axes.push((axis, map)),
        }
    }

    pub fn get(&self, axis: usize) -> Option<&AxisMap> {
        self.axes
            .iter()
            .find(|(existing, _)| *existing == axis)
            .map(|(_, map)| map)
    }

    /// Axis numbers in registration order
    pub fn axes(&self) -> impl Iterator<Item = usize> + '_ {
        self.axes.iter().map(|(axis, _)| *axis)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &AxisMap)> {
        self.axes.iter().map(|(axis, map)| (*axis, map))
    }

    pub fn len(&self) -> usize {
        self.axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    /// Labels occurring on more than one axis, in order of first repetition
    pub(crate) fn duplicate_labels(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut duplicates = Vec::new();
        for (_, map) in &self.axes {
            for (label, _) in map.iter() {
                if !seen.insert(label) && !duplicates.iter().any(|known| known == label) {
                    duplicates.push(label.to_string());
                }
            }
        }
        duplicates
    }
}

impl FromIterator<(usize, AxisMap)> for DimensionMap {
    fn from_iter<T: IntoIterator<Item = (usize, AxisMap)>>(iter: T) -> Self {
        let mut maps = Self::new();
        for (axis, map) in iter {
            maps.insert(axis, map);
        }
        maps
    }
}

/// An [`Index`] checked against the length of its axis
///
/// Slices have non-negative bounds with `start <= end <= length`; list
/// entries are valid positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AxisIndex {
    Slice(Slice),
    List(Vec<usize>),
}

impl AxisIndex {
    pub(crate) fn full(length: usize) -> Self {
        AxisIndex::Slice(Slice::new(0, Some(length as isize), 1))
    }

    pub(crate) fn normalize(
        index: &Index,
        label: &str,
        axis: usize,
        length: usize,
    ) -> Result<Self, MapError> {
        let invalid = || MapError::InvalidIndex {
            label: label.to_string(),
            axis,
            length,
        };
        match index {
            Index::Position(position) => {
                let position = resolve_position(*position, length).ok_or_else(invalid)?;
                Ok(AxisIndex::Slice(Slice::new(
                    position as isize,
                    Some(position as isize + 1),
                    1,
                )))
            }
            Index::Slice(slice) => {
                if slice.step == 0 {
                    return Err(MapError::ZeroStep {
                        label: label.to_string(),
                    });
                }
                let start = clamp_bound(slice.start, length);
                let end = slice.end.map_or(length, |end| clamp_bound(end, length));
                Ok(AxisIndex::Slice(Slice::new(
                    start as isize,
                    Some(end.max(start) as isize),
                    slice.step,
                )))
            }
            Index::List(positions) => positions
                .iter()
                .map(|&position| resolve_position(position, length).ok_or_else(invalid))
                .collect::<Result<Vec<_>, _>>()
                .map(AxisIndex::List),
        }
    }

    /// Positions selected along the axis, in the order ndarray visits them
    pub(crate) fn positions(&self) -> Vec<usize> {
        match self {
            AxisIndex::Slice(slice) => {
                let start = slice.start.max(0) as usize;
                let end = slice.end.unwrap_or(slice.start).max(slice.start) as usize;
                let step = slice.step.unsigned_abs();
                if slice.step > 0 {
                    (start..end).step_by(step).collect()
                } else {
                    (start..end).rev().step_by(step).collect()
                }
            }
            AxisIndex::List(positions) => positions.clone(),
        }
    }

    /// The slice if it is contiguous with unit step
    pub(crate) fn contiguous(&self) -> Option<Slice> {
        match self {
            AxisIndex::Slice(slice) if slice.step == 1 => Some(*slice),
            _ => None,
        }
    }
}

fn resolve_position(position: isize, length: usize) -> Option<usize> {
    let resolved = if position < 0 {
        length as isize + position
    } else {
        position
    };
    (0..length as isize)
        .contains(&resolved)
        .then_some(resolved as usize)
}

fn clamp_bound(bound: isize, length: usize) -> usize {
    let resolved = if bound < 0 {
        length as isize + bound
    } else {
        bound
    };
    resolved.clamp(0, length as isize) as usize
}
