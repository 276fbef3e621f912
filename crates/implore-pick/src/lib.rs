//! implore-pick - Selection mini-language for labeled arrays
//!
//! This crate turns a short user string into the list of concrete
//! selections it describes. The result is consumed by `implore-index`,
//! which resolves every selection against labeled array axes.
//!
//! # Selection Syntax
//!
//! - **Lists**: `"Sr O"` or `"Sr, O"` select two independent quantities
//! - **Nesting**: `"Sr(p, d)"` selects `p` and `d` of `Sr`
//! - **Ranges**: `"1:4"` groups a contiguous block of labels
//! - **Pairs**: `"up~down"` names a two-member quantity in either order
//! - **Arithmetic**: `"Sr(p) + O(s)"`, `"-x"` combine selections
//!
//! # Examples
//!
//! ```ignore
//! use implore_pick::Tree;
//!
//! let tree = Tree::from_selection("A(B(1:3), C~D(E F))")?;
//! for path in tree.selections() {
//!     println!("{path}");
//! }
//! ```

pub mod ast;
pub mod error;
pub mod format;
mod parser;
pub mod tree;

pub use ast::*;
pub use error::*;
pub use format::*;
pub use tree::*;
