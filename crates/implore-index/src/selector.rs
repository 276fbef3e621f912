//! Resolve selection paths against an array
//!
//! The [`Selector`] flattens the dimension maps into one label table when it
//! is built. Every query resolves the atoms of a path to axis indices,
//! slices the array and reduces every axis registered in the maps. Axes a
//! path leaves alone use their default index or the whole axis.

use crate::config::SelectorOptions;
use crate::dimension::{AxisIndex, DimensionMap};
use crate::error::{MapError, SelectError, SelectResult};
use crate::label;
use implore_pick::{Atom, Group, SelectionPath};
use ndarray::{ArrayD, ArrayView, ArrayViewD, Axis, Dimension, Slice};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, trace};

/// One label of the flattened table
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub(crate) key: String,
    pub(crate) axis: usize,
    pub(crate) index: AxisIndex,
}

/// What a resolved atom was called in the selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Key {
    /// A label or the map key a pair was found under
    Label(String),
    /// A merged range, rendered as `left:right`
    Range(String),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Label(key) | Key::Range(key) => f.write_str(key),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Slot {
    pub(crate) key: Key,
    pub(crate) index: AxisIndex,
}

/// The axis indices requested by one operation-free path
#[derive(Debug, Clone)]
pub(crate) struct Resolved {
    slots: Vec<Option<Slot>>,
}

impl Resolved {
    pub(crate) fn key(&self, axis: usize) -> Option<&Key> {
        self.slots[axis].as_ref().map(|slot| &slot.key)
    }
}

/// Labeled access to an n-dimensional array
///
/// The selector borrows the array; it never copies or mutates it outside
/// of a query and can be shared between threads.
#[derive(Debug, Clone)]
pub struct Selector<'a> {
    data: ArrayViewD<'a, f64>,
    axes: Vec<usize>,
    entries: Vec<Entry>,
    lookup: HashMap<String, usize>,
    defaults: Vec<Option<AxisIndex>>,
    number_labels: HashMap<String, String>,
    options: SelectorOptions,
}

impl<'a> Selector<'a> {
    /// Create a selector summing over the registered axes
    pub fn new<D: Dimension>(
        maps: &DimensionMap,
        data: ArrayView<'a, f64, D>,
    ) -> Result<Self, MapError> {
        Self::with_options(maps, data, SelectorOptions::default())
    }

    pub fn with_options<D: Dimension>(
        maps: &DimensionMap,
        data: ArrayView<'a, f64, D>,
        options: SelectorOptions,
    ) -> Result<Self, MapError> {
        let duplicates = maps.duplicate_labels();
        if !duplicates.is_empty() {
            return Err(MapError::DuplicateLabels { labels: duplicates });
        }

        let data = data.into_dyn();
        let ndim = data.ndim();
        let mut entries = Vec::new();
        let mut defaults = vec![None; ndim];
        for (axis, map) in maps.iter() {
            if axis >= ndim {
                return Err(MapError::AxisOutOfBounds { axis, ndim });
            }
            let length = data.len_of(Axis(axis));
            for (key, index) in map.iter() {
                entries.push(Entry {
                    key: key.to_string(),
                    axis,
                    index: AxisIndex::normalize(index, key, axis, length)?,
                });
            }
            if let Some(default) = map.default_index() {
                defaults[axis] = Some(AxisIndex::normalize(default, "default", axis, length)?);
            }
        }

        let number_labels = if options.use_number_labels {
            label::number_labels(&entries)?
        } else {
            HashMap::new()
        };
        let lookup = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (entry.key.clone(), position))
            .collect();
        let axes: Vec<usize> = maps.axes().collect();
        debug!(
            axes = ?axes,
            labels = entries.len(),
            reduction = %options.reduction,
            "built selector"
        );

        Ok(Self {
            data,
            axes,
            entries,
            lookup,
            defaults,
            number_labels,
            options,
        })
    }

    /// Slice the array according to an operation-free path and reduce all
    /// registered axes
    ///
    /// Operation atoms are rejected; split them with
    /// [`terms::expand`](crate::terms::expand) or use
    /// [`combine::evaluate`](crate::combine::evaluate).
    pub fn get(&self, path: &SelectionPath) -> SelectResult<ArrayD<f64>> {
        let resolved = self.resolve(path)?;

        let mut view = self.data.view();
        let mut lists = Vec::new();
        for (axis, slot) in resolved.slots.iter().enumerate() {
            let index = slot
                .as_ref()
                .map(|slot| &slot.index)
                .or(self.defaults[axis].as_ref());
            match index {
                Some(AxisIndex::Slice(slice)) => view.slice_axis_inplace(Axis(axis), *slice),
                Some(AxisIndex::List(positions)) => lists.push((axis, positions)),
                None => {}
            }
        }
        let mut array = view.to_owned();
        for (axis, positions) in lists {
            array = array.select(Axis(axis), positions);
        }

        let mut reduced_axes = self.axes.clone();
        reduced_axes.sort_unstable_by(|a, b| b.cmp(a));
        for axis in reduced_axes {
            array = self.options.reduction.apply(&array, Axis(axis));
        }
        trace!(path = %path, shape = ?array.shape(), "selected");
        Ok(array)
    }

    /// Every label known to the selector, in registration order
    pub fn valid_keys(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.key.clone()).collect()
    }

    /// Axes registered in the maps, in registration order
    pub fn axes(&self) -> &[usize] {
        &self.axes
    }

    pub fn options(&self) -> &SelectorOptions {
        &self.options
    }

    /// Shape of every array returned by [`get`](Self::get)
    pub fn result_shape(&self) -> Vec<usize> {
        self.data
            .shape()
            .iter()
            .enumerate()
            .filter(|(axis, _)| !self.axes.contains(axis))
            .map(|(_, &length)| length)
            .collect()
    }

    pub(crate) fn resolve(&self, path: &SelectionPath) -> SelectResult<Resolved> {
        let mut slots: Vec<Option<Slot>> = vec![None; self.data.ndim()];
        for atom in path {
            let (axis, slot) = self.resolve_atom(atom)?;
            if let Some(existing) = &slots[axis] {
                return Err(SelectError::ConflictingKeys {
                    first: existing.key.to_string(),
                    second: slot.key.to_string(),
                });
            }
            slots[axis] = Some(slot);
        }
        Ok(Resolved { slots })
    }

    fn resolve_atom(&self, atom: &Atom) -> SelectResult<(usize, Slot)> {
        match atom {
            Atom::Label(label) => {
                let entry = self.entry(label).ok_or_else(|| self.unknown(label))?;
                Ok((entry.axis, self.slot(entry)))
            }
            Atom::Group(group) if group.is_range() => self.resolve_range(group),
            Atom::Group(group) => {
                let entry = self
                    .entry(&group.to_string())
                    .or_else(|| self.entry(&group.reversed().to_string()))
                    .ok_or_else(|| self.unknown(&group.to_string()))?;
                Ok((entry.axis, self.slot(entry)))
            }
            Atom::Operation(operation) => Err(SelectError::UnresolvedOperation {
                operation: operation.clone(),
            }),
        }
    }

    fn resolve_range(&self, range: &Group) -> SelectResult<(usize, Slot)> {
        let unknown = || self.unknown(&range.to_string());
        let left = self.entry(range.left()).ok_or_else(unknown)?;
        let right = self.entry(range.right()).ok_or_else(unknown)?;
        if left.axis != right.axis {
            return Err(SelectError::RangeAcrossDimensions {
                range: range.clone(),
            });
        }
        let (Some(first), Some(last)) = (left.index.contiguous(), right.index.contiguous()) else {
            return Err(SelectError::NonContiguousRange {
                range: range.clone(),
            });
        };
        let end = last.end.map_or(first.start, |end| end.max(first.start));
        let slot = Slot {
            key: Key::Range(range.to_string()),
            index: AxisIndex::Slice(Slice::new(first.start, Some(end), 1)),
        };
        Ok((left.axis, slot))
    }

    fn entry(&self, key: &str) -> Option<&Entry> {
        self.lookup.get(key).map(|&position| &self.entries[position])
    }

    fn slot(&self, entry: &Entry) -> Slot {
        Slot {
            key: Key::Label(entry.key.clone()),
            index: entry.index.clone(),
        }
    }

    fn unknown(&self, label: &str) -> SelectError {
        SelectError::UnknownLabel {
            label: label.to_string(),
            valid: self.valid_keys(),
        }
    }

    pub(crate) fn render_key(&self, key: &Key) -> String {
        match key {
            Key::Label(label) => self
                .number_labels
                .get(label)
                .cloned()
                .unwrap_or_else(|| label.clone()),
            Key::Range(range) => range.clone(),
        }
    }
}
