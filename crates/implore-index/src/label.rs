//! Human readable labels of selections

use crate::error::{MapError, SelectResult};
use crate::selector::{Entry, Selector};
use crate::terms::{expand, Sign};
use implore_pick::SelectionPath;
use std::collections::HashMap;

impl Selector<'_> {
    /// Describe a selection, one part per signed term
    ///
    /// Within a term the keys follow the order in which the axes were
    /// registered and are joined by `_`. Terms after the first are prefixed
    /// by `+ ` or `- `, so `"A - B(x + y)"` reads `A - B_x - B_y`.
    pub fn label(&self, path: &SelectionPath) -> SelectResult<String> {
        let mut parts = Vec::new();
        for (position, term) in expand(path).iter().enumerate() {
            let resolved = self.resolve(&term.path)?;
            let keys: Vec<String> = self
                .axes()
                .iter()
                .filter_map(|&axis| resolved.key(axis))
                .map(|key| self.render_key(key))
                .collect();
            let prefix = match (position, term.sign) {
                (0, Sign::Plus) => "",
                (0, Sign::Minus) => "-",
                (_, Sign::Plus) => "+ ",
                (_, Sign::Minus) => "- ",
            };
            parts.push(format!("{prefix}{}", keys.join("_")));
        }
        Ok(parts.join(" "))
    }
}

fn is_number(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|character| character.is_ascii_digit())
}

/// Labels of decimal keys relative to the named labels of their axis
///
/// A decimal key pointing at the third position of `A` becomes `A_3`; keys
/// outside every named label keep their text.
pub(crate) fn number_labels(entries: &[Entry]) -> Result<HashMap<String, String>, MapError> {
    let mut labels = HashMap::new();
    for entry in entries.iter().filter(|entry| is_number(&entry.key)) {
        let position = match entry.index.positions().as_slice() {
            &[position] => position,
            _ => {
                return Err(MapError::AmbiguousNumberLabel {
                    label: entry.key.clone(),
                })
            }
        };
        let named = entries
            .iter()
            .filter(|candidate| candidate.axis == entry.axis && !is_number(&candidate.key))
            .find_map(|candidate| {
                let offset = candidate
                    .index
                    .positions()
                    .iter()
                    .position(|&other| other == position)?;
                Some(format!("{}_{}", candidate.key, offset + 1))
            });
        labels.insert(entry.key.clone(), named.unwrap_or_else(|| entry.key.clone()));
    }
    Ok(labels)
}
