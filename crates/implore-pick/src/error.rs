//! Error types for implore-pick
//!
//! Every parse error remembers the selection string and the column of the
//! offending character so that it renders as a caret diagnostic.

use crate::ast::{Operator, SelectionPath, Separator};
use std::fmt;
use thiserror::Error;

/// Result type alias for parsing
pub type ParseResult<T> = Result<T, ParseError>;

/// Which operand of a group is affected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// The reason a selection string was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A range or pair lacks one of its members
    #[error("The {side} argument of {} is missing.", group_name(.separator))]
    MissingGroupOperand { side: Side, separator: Separator },

    /// A separator was applied to something other than a label
    #[error("A {} can only be formed from a plain label.", group_name(.separator))]
    InvalidGroupOperand { separator: Separator },

    /// `(` without a preceding element
    #[error("Opening parenthesis '(' must relate to a previous argument.")]
    OrphanOpeningParenthesis,

    /// `)` without a matching `(`
    #[error("Closing parenthesis ')' must follow an opening one.")]
    UnmatchedClosingParenthesis,

    /// The text ended inside parentheses
    #[error("An opening parenthesis was not followed by a closing one.")]
    MissingClosingParenthesis,

    /// `+` or `-` without a right operand
    #[error("The operator {operator} is not followed by an element.")]
    MissingRightOperand { operator: Operator },
}

fn group_name(separator: &Separator) -> &'static str {
    separator.name()
}

fn caret(position: &usize) -> String {
    " ".repeat(*position)
}

/// A selection string that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error when parsing the selection string\n  {selection}\n  {}^\n{kind}", caret(.position))]
pub struct ParseError {
    selection: String,
    position: usize,
    kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(selection: impl Into<String>, position: usize, kind: ParseErrorKind) -> Self {
        Self {
            selection: selection.into(),
            position,
            kind,
        }
    }

    /// The complete selection string
    pub fn selection(&self) -> &str {
        &self.selection
    }

    /// Character column of the offending character
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }
}

/// A filtered operand that no longer matches the node it came from
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "The operand `{operand}` has a qualitatively different behavior than the content `{content}`. \
     This may occur when a filter would replace the last element."
)]
pub struct IncompatibleOperand {
    operand: SelectionPath,
    content: String,
}

impl IncompatibleOperand {
    pub fn new(operand: SelectionPath, content: impl Into<String>) -> Self {
        Self {
            operand,
            content: content.into(),
        }
    }

    pub fn operand(&self) -> &SelectionPath {
        &self.operand
    }

    /// Rendered content of the operand's node
    pub fn content(&self) -> &str {
        &self.content
    }
}
