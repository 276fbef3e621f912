//! Atoms of a parsed selection
//!
//! A [`SelectionPath`] is the sequence of atoms collected on the way from the
//! root of a [`Tree`](crate::Tree) to one of its leaves. Each atom is a plain
//! label, a two-member [`Group`], or an arithmetic [`Operation`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Separator of a range group (`1:3`)
pub const RANGE_SEPARATOR: char = ':';

/// Separator of a pair group (`A~B`)
pub const PAIR_SEPARATOR: char = '~';

/// How the two members of a group relate to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Separator {
    /// Contiguous block from the left to the right member (`:`)
    Range,
    /// Unordered combination of both members (`~`)
    Pair,
}

impl Separator {
    /// Map a character onto a separator
    pub fn from_char(character: char) -> Option<Self> {
        match character {
            RANGE_SEPARATOR => Some(Separator::Range),
            PAIR_SEPARATOR => Some(Separator::Pair),
            _ => None,
        }
    }

    /// Get the character representation
    pub fn as_char(self) -> char {
        match self {
            Separator::Range => RANGE_SEPARATOR,
            Separator::Pair => PAIR_SEPARATOR,
        }
    }

    /// Human readable name used in diagnostics
    pub fn name(self) -> &'static str {
        match self {
            Separator::Range => "range",
            Separator::Pair => "pair",
        }
    }
}

/// A user selection where two elements are treated together
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Group {
    /// The left and right member of the group
    pub members: [String; 2],
    /// The separator joining the members
    pub separator: Separator,
}

impl Group {
    /// Create a new group
    pub fn new(left: impl Into<String>, right: impl Into<String>, separator: Separator) -> Self {
        Self {
            members: [left.into(), right.into()],
            separator,
        }
    }

    /// Create a range `left:right`
    pub fn range(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::new(left, right, Separator::Range)
    }

    /// Create a pair `left~right`
    pub fn pair(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::new(left, right, Separator::Pair)
    }

    pub fn left(&self) -> &str {
        &self.members[0]
    }

    pub fn right(&self) -> &str {
        &self.members[1]
    }

    pub fn is_range(&self) -> bool {
        self.separator == Separator::Range
    }

    pub fn is_pair(&self) -> bool {
        self.separator == Separator::Pair
    }

    /// The same group with both members swapped
    pub fn reversed(&self) -> Self {
        Self::new(self.right(), self.left(), self.separator)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.left(), self.separator.as_char(), self.right())
    }
}

/// Binary arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Sub,
}

impl Operator {
    pub fn from_char(character: char) -> Option<Self> {
        match character {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A mathematical operation like addition or subtraction
///
/// The operands are complete selection paths. An operation with an empty
/// left operand is unary (`-x`); it only marks its right operand and leaves
/// any numeric effect to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operation {
    /// The selection on the left-hand side
    pub left: SelectionPath,
    /// The operator joining both sides
    pub operator: Operator,
    /// The selection on the right-hand side
    pub right: SelectionPath,
}

impl Operation {
    pub fn new(
        left: impl Into<SelectionPath>,
        operator: Operator,
        right: impl Into<SelectionPath>,
    ) -> Self {
        Self {
            left: left.into(),
            operator,
            right: right.into(),
        }
    }

    /// Create a unary operation like `-x`
    pub fn unary(operator: Operator, right: impl Into<SelectionPath>) -> Self {
        Self::new(SelectionPath::default(), operator, right)
    }

    /// Check whether the operation lacks a left operand
    pub fn is_unary(&self) -> bool {
        self.left.is_empty()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unary() {
            write!(f, "{}{}", self.operator, self.right)
        } else {
            write!(f, "{} {} {}", self.left, self.operator, self.right)
        }
    }
}

/// One indivisible unit of a selection path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Atom {
    /// A bare label
    Label(String),
    /// Two labels joined by a separator
    Group(Group),
    /// Arithmetic on two selections
    Operation(Operation),
}

impl Atom {
    pub fn as_label(&self) -> Option<&str> {
        match self {
            Atom::Label(label) => Some(label),
            _ => None,
        }
    }

    fn contains(&self, choice: &str, ignore_case: bool) -> bool {
        let matches = |candidate: &str| {
            if ignore_case {
                candidate.to_lowercase() == choice.to_lowercase()
            } else {
                candidate == choice
            }
        };
        match self {
            Atom::Label(label) => matches(label),
            Atom::Group(group) => group.members.iter().any(|member| matches(member)),
            Atom::Operation(operation) => {
                operation.left.contains(choice, ignore_case)
                    || operation.right.contains(choice, ignore_case)
            }
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Label(label) => f.write_str(label),
            Atom::Group(group) => group.fmt(f),
            Atom::Operation(operation) => operation.fmt(f),
        }
    }
}

impl From<&str> for Atom {
    fn from(label: &str) -> Self {
        Atom::Label(label.to_string())
    }
}

impl From<String> for Atom {
    fn from(label: String) -> Self {
        Atom::Label(label)
    }
}

impl From<Group> for Atom {
    fn from(group: Group) -> Self {
        Atom::Group(group)
    }
}

impl From<Operation> for Atom {
    fn from(operation: Operation) -> Self {
        Atom::Operation(operation)
    }
}

/// One concrete selection: the atoms from the root of the tree to a leaf
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionPath(Vec<Atom>);

impl SelectionPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, atom: impl Into<Atom>) {
        self.0.push(atom.into());
    }

    /// A copy of this path with `atom` appended
    pub fn with(&self, atom: impl Into<Atom>) -> Self {
        let mut path = self.clone();
        path.push(atom);
        path
    }

    /// Concatenate two paths
    pub fn join(&self, other: &SelectionPath) -> Self {
        self.0.iter().chain(other.0.iter()).cloned().collect()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.0
    }

    pub fn into_atoms(self) -> Vec<Atom> {
        self.0
    }

    /// Check whether any label, group member or operand equals `choice`
    pub fn contains(&self, choice: &str, ignore_case: bool) -> bool {
        self.0.iter().any(|atom| atom.contains(choice, ignore_case))
    }
}

impl Deref for SelectionPath {
    type Target = [Atom];

    fn deref(&self) -> &[Atom] {
        &self.0
    }
}

impl fmt::Display for SelectionPath {
    /// Render the path so that parsing the text yields the path again,
    /// e.g. `A(B(1:3))`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, atom) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("(")?;
            }
            write!(f, "{atom}")?;
        }
        for _ in 1..self.0.len() {
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl From<Vec<Atom>> for SelectionPath {
    fn from(atoms: Vec<Atom>) -> Self {
        Self(atoms)
    }
}

impl<A: Into<Atom>, const N: usize> From<[A; N]> for SelectionPath {
    fn from(atoms: [A; N]) -> Self {
        atoms.into_iter().collect()
    }
}

impl<A: Into<Atom>> FromIterator<A> for SelectionPath {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for SelectionPath {
    type Item = Atom;
    type IntoIter = std::vec::IntoIter<Atom>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a SelectionPath {
    type Item = &'a Atom;
    type IntoIter = std::slice::Iter<'a, Atom>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
