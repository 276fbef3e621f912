//! Arithmetic on selections
//!
//! The selector only reads operation-free paths. These helpers split a path
//! into its signed terms and add up the results.

use crate::error::{IndexResult, SelectResult};
use crate::selector::Selector;
use crate::terms::expand;
use implore_pick::{SelectionPath, Tree};
use ndarray::{ArrayD, IxDyn};

/// The result of one selection path
#[derive(Debug, Clone, PartialEq)]
pub struct Selected {
    pub path: SelectionPath,
    pub label: String,
    pub values: ArrayD<f64>,
}

/// Sum of `sign * selector.get(term)` over the terms of `path`
pub fn evaluate(selector: &Selector<'_>, path: &SelectionPath) -> SelectResult<ArrayD<f64>> {
    let mut total = ArrayD::zeros(IxDyn(&selector.result_shape()));
    for term in expand(path) {
        let values = selector.get(&term.path)?;
        total.scaled_add(term.sign.factor(), &values);
    }
    Ok(total)
}

/// Parse a selection string and evaluate every path it describes
pub fn evaluate_selection(selector: &Selector<'_>, selection: &str) -> IndexResult<Vec<Selected>> {
    let tree = Tree::from_selection(selection)?;
    tree.selections()
        .map(|path| {
            let label = selector.label(&path)?;
            let values = evaluate(selector, &path)?;
            Ok(Selected {
                path,
                label,
                values,
            })
        })
        .collect()
}
