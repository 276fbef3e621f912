//! Text rendering of selections

use crate::ast::SelectionPath;

/// Render selection paths as one line that parses back to the same paths
///
/// Paths are joined by `", "`; every path renders like `A(B(1:3))`.
pub fn selections_to_string<'a>(selections: impl IntoIterator<Item = &'a SelectionPath>) -> String {
    selections
        .into_iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
