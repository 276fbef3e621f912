//! Signed terms of a selection path
//!
//! A path containing operations stands for a sum of operation-free paths.
//! [`expand`] produces these terms: the first atom of a path carries the
//! sign handed in from outside, later atoms are positive. The left operand
//! of an operation inherits the sign of the atom, the right operand takes
//! the sign of the operator. A unary operation only contributes its right
//! operand. Signs multiply when the terms of consecutive atoms combine.

use implore_pick::{Atom, Operator, SelectionPath};
use std::ops::Mul;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Sign {
    #[default]
    Plus,
    Minus,
}

impl Sign {
    pub fn factor(self) -> f64 {
        match self {
            Sign::Plus => 1.0,
            Sign::Minus => -1.0,
        }
    }

    pub fn is_negative(self) -> bool {
        self == Sign::Minus
    }
}

impl From<Operator> for Sign {
    fn from(operator: Operator) -> Self {
        match operator {
            Operator::Add => Sign::Plus,
            Operator::Sub => Sign::Minus,
        }
    }
}

impl Mul for Sign {
    type Output = Sign;

    fn mul(self, other: Sign) -> Sign {
        if self == other {
            Sign::Plus
        } else {
            Sign::Minus
        }
    }
}

/// An operation-free path with its sign
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub sign: Sign,
    pub path: SelectionPath,
}

impl Term {
    fn new(sign: Sign, path: SelectionPath) -> Self {
        Self { sign, path }
    }
}

/// Split a path into signed operation-free terms
///
/// Terms are ordered like nested loops over the atoms: the first atom varies
/// slowest. Sums over the terms do not depend on this order, but labels list
/// the terms in it.
pub fn expand(path: &SelectionPath) -> Vec<Term> {
    expand_with(path, Sign::Plus)
}

fn expand_with(path: &SelectionPath, sign: Sign) -> Vec<Term> {
    let mut terms = vec![Term::new(Sign::Plus, SelectionPath::new())];
    for (position, atom) in path.iter().enumerate() {
        let atom_sign = if position == 0 { sign } else { Sign::Plus };
        let atom_terms = expand_atom(atom, atom_sign);
        terms = terms
            .iter()
            .flat_map(|prefix| {
                atom_terms.iter().map(move |suffix| {
                    Term::new(prefix.sign * suffix.sign, prefix.path.join(&suffix.path))
                })
            })
            .collect();
    }
    if path.is_empty() {
        terms[0].sign = sign;
    }
    terms
}

fn expand_atom(atom: &Atom, sign: Sign) -> Vec<Term> {
    match atom {
        Atom::Operation(operation) => {
            let mut terms = Vec::new();
            if !operation.is_unary() {
                terms.extend(expand_with(&operation.left, sign));
            }
            terms.extend(expand_with(&operation.right, operation.operator.into()));
            terms
        }
        atom => vec![Term::new(sign, SelectionPath::from(vec![atom.clone()]))],
    }
}
