//! The selection tree
//!
//! Nodes live in one arena owned by the [`Tree`]; parents are referenced by
//! index and only used for upward traversal while scanning. Once the
//! scanner has consumed the end of the text the tree is immutable.

use crate::ast::{Group, Operation, Operator, SelectionPath};
use crate::error::{IncompatibleOperand, ParseResult};
use crate::parser::Scanner;
use std::collections::HashSet;
use std::fmt;

pub(crate) type NodeId = usize;

pub(crate) const ROOT: NodeId = 0;

/// Content slot of a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeContent {
    /// A label; empty for the root and for the missing operand of `-x`
    Label(String),
    /// A range or pair
    Group(Group),
    /// Placeholder of an operation node; `id` is unique within the tree
    Operator { operator: Operator, id: usize },
}

impl NodeContent {
    pub fn is_empty(&self) -> bool {
        matches!(self, NodeContent::Label(label) if label.is_empty())
    }
}

impl Default for NodeContent {
    fn default() -> Self {
        NodeContent::Label(String::new())
    }
}

impl fmt::Display for NodeContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeContent::Label(label) => f.write_str(label),
            NodeContent::Group(group) => group.fmt(f),
            NodeContent::Operator { operator, id } => write!(f, "_{id}_[{operator}]"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) content: NodeContent,
}

impl Node {
    pub(crate) fn child_of(parent: NodeId) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    pub(crate) fn is_operation(&self) -> bool {
        matches!(self.content, NodeContent::Operator { .. })
    }
}

/// A parsed selection string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Parse the user selection into a tree
    pub fn from_selection(selection: &str) -> ParseResult<Self> {
        let nodes = Scanner::scan(selection)?;
        tracing::debug!(selection, nodes = nodes.len(), "parsed selection");
        Ok(Self { nodes })
    }

    /// Parse an optional selection; `None` behaves like the empty string
    pub fn from_optional(selection: Option<&str>) -> ParseResult<Self> {
        Self::from_selection(selection.unwrap_or_default())
    }

    /// Direct children of the root
    pub fn nodes(&self) -> Vec<NodeRef<'_>> {
        self.node(ROOT).nodes()
    }

    /// Number of top-level selections
    pub fn len(&self) -> usize {
        self.nodes[ROOT].children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enumerate every selection path
    ///
    /// Each call starts a fresh enumeration, so the tree can be walked any
    /// number of times, also from several threads at once.
    pub fn selections(&self) -> Selections<'_> {
        Selections(Walk::new(self, ROOT, SelectionPath::default(), None))
    }

    /// Enumerate every selection path behind `selected`, dropping labels
    /// found in `filter`
    ///
    /// Operands of operations are expanded without the prefix. Filtering an
    /// operand down to nothing while its node has content (or the reverse)
    /// changes the meaning of the operation and yields an
    /// [`IncompatibleOperand`] error.
    pub fn selections_with<'a>(
        &'a self,
        selected: &SelectionPath,
        filter: &'a HashSet<String>,
    ) -> FilteredSelections<'a> {
        FilteredSelections(Walk::new(self, ROOT, selected.clone(), Some(filter)))
    }

    /// Helper routine to visualize the tree using Mermaid
    pub fn to_mermaid(&self) -> String {
        let mut lines = vec!["graph LR".to_string()];
        self.mermaid_lines(ROOT, &mut lines);
        lines.join("\n")
    }

    fn mermaid_lines(&self, id: NodeId, lines: &mut Vec<String>) {
        let node = &self.nodes[id];
        if !node.content.is_empty() {
            let parent = node.parent.map(|parent| &self.nodes[parent].content);
            match parent {
                Some(parent) if !parent.is_empty() => {
                    lines.push(format!("    {} --> {}", parent, node.content))
                }
                _ if node.children.is_empty() => lines.push(format!("    {}", node.content)),
                _ => {}
            }
        }
        for &child in &node.children {
            self.mermaid_lines(child, lines);
        }
    }

    fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }
}

/// Read-only handle on one node of a [`Tree`]
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn content(&self) -> &'a NodeContent {
        &self.tree.nodes[self.id].content
    }

    /// Direct children of this node
    pub fn nodes(&self) -> Vec<NodeRef<'a>> {
        self.tree.nodes[self.id]
            .children
            .iter()
            .map(|&id| self.tree.node(id))
            .collect()
    }

    pub fn is_operation(&self) -> bool {
        self.tree.nodes[self.id].is_operation()
    }

    /// Selection paths of the subtree rooted here
    pub fn selections(&self) -> Selections<'a> {
        Selections(Walk::new(self.tree, self.id, SelectionPath::default(), None))
    }
}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.content().fmt(f)
    }
}

#[derive(Debug, Clone)]
enum Frame {
    Visit(NodeId, SelectionPath),
    Ready(SelectionPath),
}

/// Depth-first walk shared by both enumerations
///
/// Ordinary children are expanded one after another with the content of
/// their parent as prefix. An operation node contributes a single
/// [`Operation`] atom for every combination of its operand paths.
#[derive(Debug, Clone)]
struct Walk<'a> {
    tree: &'a Tree,
    filter: Option<&'a HashSet<String>>,
    stack: Vec<Frame>,
}

impl<'a> Walk<'a> {
    fn new(
        tree: &'a Tree,
        id: NodeId,
        prefix: SelectionPath,
        filter: Option<&'a HashSet<String>>,
    ) -> Self {
        Self {
            tree,
            filter,
            stack: vec![Frame::Visit(id, prefix)],
        }
    }

    fn is_filtered(&self, label: &str) -> bool {
        self.filter.is_some_and(|filter| filter.contains(label))
    }

    fn visit(&mut self, id: NodeId, prefix: SelectionPath) -> Result<(), IncompatibleOperand> {
        let tree = self.tree;
        let node = &tree.nodes[id];
        match (&node.content, node.children.as_slice()) {
            (NodeContent::Operator { operator, .. }, &[left, right]) => {
                let left_paths = self.operands(left)?;
                let right_paths = self.operands(right)?;
                let mut operations = Vec::with_capacity(left_paths.len() * right_paths.len());
                for left in &left_paths {
                    for right in &right_paths {
                        let operation = Operation::new(left.clone(), *operator, right.clone());
                        operations.push(Frame::Ready(prefix.with(operation)));
                    }
                }
                self.stack.extend(operations.into_iter().rev());
            }
            (content, children) => {
                let prefix = match content {
                    NodeContent::Label(label) if !label.is_empty() && !self.is_filtered(label) => {
                        prefix.with(label.as_str())
                    }
                    NodeContent::Group(group) => prefix.with(group.clone()),
                    _ => prefix,
                };
                if children.is_empty() {
                    self.stack.push(Frame::Ready(prefix));
                } else {
                    let frames = children
                        .iter()
                        .rev()
                        .map(|&child| Frame::Visit(child, prefix.clone()));
                    self.stack.extend(frames);
                }
            }
        }
        Ok(())
    }

    /// All paths of one operand; an empty operand must come from an empty node
    fn operands(&self, id: NodeId) -> Result<Vec<SelectionPath>, IncompatibleOperand> {
        let content = &self.tree.nodes[id].content;
        Walk::new(self.tree, id, SelectionPath::default(), self.filter)
            .map(|operand| {
                let operand = operand?;
                if content.is_empty() != operand.is_empty() {
                    return Err(IncompatibleOperand::new(operand, content.to_string()));
                }
                Ok(operand)
            })
            .collect()
    }
}

impl Iterator for Walk<'_> {
    type Item = Result<SelectionPath, IncompatibleOperand>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Ready(path) => return Some(Ok(path)),
                Frame::Visit(id, prefix) => {
                    if let Err(error) = self.visit(id, prefix) {
                        self.stack.clear();
                        return Some(Err(error));
                    }
                }
            }
        }
        None
    }
}

/// Lazy enumeration of the selection paths of a tree
#[derive(Debug, Clone)]
pub struct Selections<'a>(Walk<'a>);

impl Iterator for Selections<'_> {
    type Item = SelectionPath;

    /// Without a filter every operand keeps its content, so the walk never fails
    fn next(&mut self) -> Option<SelectionPath> {
        self.0.find_map(Result::ok)
    }
}

/// Enumeration with a caller supplied prefix and label filter, see
/// [`Tree::selections_with`]
#[derive(Debug, Clone)]
pub struct FilteredSelections<'a>(Walk<'a>);

impl Iterator for FilteredSelections<'_> {
    type Item = Result<SelectionPath, IncompatibleOperand>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = SelectionPath;
    type IntoIter = Selections<'a>;

    fn into_iter(self) -> Selections<'a> {
        self.selections()
    }
}
