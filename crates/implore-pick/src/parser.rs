//! Character scanner for the selection grammar
//!
//! Grammar:
//! ```text
//! selection := alt (separator alt)*
//! alt       := term ('(' selection ')')?
//! term      := token | group | operation
//! group     := token (':'|'~') token
//! operation := term ('+'|'-') term
//! token     := chars excluding ",", " ", ":", "~", "(", ")", "+", "-"
//! separator := "," | " "
//! ```
//!
//! The scanner consumes one character at a time and keeps track of the
//! node that receives the next character. A space is a soft separator: it
//! only starts a new element if a regular character follows and neither an
//! operation nor an open group is waiting for its right operand.

use crate::ast::{Group, Operator, Separator};
use crate::error::{ParseError, ParseErrorKind, ParseResult, Side};
use crate::tree::{Node, NodeContent, NodeId, ROOT};

type ScanResult<T> = Result<T, ParseErrorKind>;

#[derive(Debug, Clone, Copy)]
struct Flags {
    /// The next regular character starts a new child
    new_selection: bool,
    /// A space was read since the last regular character
    space_parsed: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            new_selection: true,
            space_parsed: false,
        }
    }
}

/// Builds the node arena of a [`Tree`](crate::Tree)
pub(crate) struct Scanner {
    nodes: Vec<Node>,
    flags: Vec<Flags>,
    next_operator_id: usize,
}

impl Scanner {
    fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
            flags: vec![Flags::default()],
            next_operator_id: 0,
        }
    }

    /// Scan the whole selection and return the finished arena
    pub(crate) fn scan(selection: &str) -> ParseResult<Vec<Node>> {
        let mut scanner = Self::new();
        let mut active = ROOT;
        let mut position = 0;
        for (index, character) in selection.chars().enumerate() {
            position = index;
            active = scanner
                .step(active, character)
                .map_err(|kind| ParseError::new(selection, position, kind))?;
        }
        scanner
            .finish(active)
            .map_err(|kind| ParseError::new(selection, position, kind))?;
        Ok(scanner.nodes)
    }

    fn step(&mut self, node: NodeId, character: char) -> ScanResult<NodeId> {
        if let Some(separator) = Separator::from_char(character) {
            return self.parse_group(node, separator);
        }
        if let Some(operator) = Operator::from_char(character) {
            return self.parse_operator(node, operator);
        }
        match character {
            ',' => self.parse_new_selection(node),
            ' ' => {
                self.flags[node].space_parsed = true;
                Ok(node)
            }
            '(' => self.parse_open_parenthesis(node),
            ')' => self.parse_close_parenthesis(node),
            _ => self.store_character(node, character),
        }
    }

    fn parse_new_selection(&mut self, node: NodeId) -> ScanResult<NodeId> {
        self.flags[node].new_selection = true;
        self.check_group_complete(node)?;
        self.check_operation_complete(node)?;
        self.finalize_operation(node)
    }

    /// Leave a complete operation once the next element begins; a range or
    /// pair in the right operand still waiting for its member keeps it open
    fn finalize_operation(&mut self, node: NodeId) -> ScanResult<NodeId> {
        let complete = self.nodes[node].is_operation()
            && self.nodes[node].children.len() == 2
            && !self.child_is_open_group(node);
        let parent = self.nodes[node].parent;
        match parent {
            Some(parent) if complete && self.new_child_needed(node, false) => {
                self.parse_new_selection(parent)
            }
            _ => Ok(node),
        }
    }

    fn parse_group(&mut self, node: NodeId, separator: Separator) -> ScanResult<NodeId> {
        let missing_left = ParseErrorKind::MissingGroupOperand {
            side: Side::Left,
            separator,
        };
        if self.flags[node].new_selection {
            return Err(missing_left);
        }
        let last = *self.nodes[node].children.last().ok_or(missing_left.clone())?;
        let left = match &mut self.nodes[last].content {
            NodeContent::Label(label) if label.is_empty() => return Err(missing_left),
            NodeContent::Label(label) => std::mem::take(label),
            _ => return Err(ParseErrorKind::InvalidGroupOperand { separator }),
        };
        self.nodes[last].content = NodeContent::Group(Group::new(left, "", separator));
        Ok(node)
    }

    fn parse_open_parenthesis(&mut self, node: NodeId) -> ScanResult<NodeId> {
        if self.flags[node].new_selection {
            return Err(ParseErrorKind::OrphanOpeningParenthesis);
        }
        self.nodes[node]
            .children
            .last()
            .copied()
            .ok_or(ParseErrorKind::OrphanOpeningParenthesis)
    }

    /// Return to the parent and act as if a space followed
    fn parse_close_parenthesis(&mut self, node: NodeId) -> ScanResult<NodeId> {
        if self.nodes[node].parent.is_none() {
            return Err(ParseErrorKind::UnmatchedClosingParenthesis);
        }
        let closed = self.parse_new_selection(node)?;
        let parent = self.nodes[closed]
            .parent
            .ok_or(ParseErrorKind::UnmatchedClosingParenthesis)?;
        self.flags[parent].space_parsed = true;
        Ok(parent)
    }

    fn parse_operator(&mut self, node: NodeId, operator: Operator) -> ScanResult<NodeId> {
        self.check_group_complete(node)?;
        let child = self.current_child(node, true);
        self.transform_to_operation(child, operator);
        Ok(child)
    }

    /// Move content and children of `id` into a new left operand and turn
    /// `id` into the operation node
    fn transform_to_operation(&mut self, id: NodeId, operator: Operator) {
        let inner = self.nodes.len();
        let mut left = Node::child_of(id);
        left.content = std::mem::take(&mut self.nodes[id].content);
        left.children = std::mem::take(&mut self.nodes[id].children);
        for &child in &left.children {
            self.nodes[child].parent = Some(inner);
        }
        self.nodes.push(left);
        self.flags.push(Flags::default());

        let node = &mut self.nodes[id];
        node.content = NodeContent::Operator {
            operator,
            id: self.next_operator_id,
        };
        node.children = vec![inner];
        self.next_operator_id += 1;
    }

    fn store_character(&mut self, node: NodeId, character: char) -> ScanResult<NodeId> {
        let node = self.finalize_operation(node)?;
        let ignore_space = self.nodes[node].is_operation() || self.child_is_open_group(node);
        let child = self.current_child(node, ignore_space);
        self.flags[node].space_parsed = false;
        match &mut self.nodes[child].content {
            NodeContent::Label(label) => label.push(character),
            NodeContent::Group(group) => group.members[1].push(character),
            NodeContent::Operator { .. } => unreachable!("current_child never yields an operation"),
        }
        Ok(node)
    }

    /// The end-of-text sentinel; walks up through pending operations
    fn finish(&mut self, node: NodeId) -> ScanResult<()> {
        let mut current = node;
        loop {
            let parent = self.nodes[current].parent;
            if parent.is_some() && !self.nodes[current].is_operation() {
                return Err(ParseErrorKind::MissingClosingParenthesis);
            }
            self.check_group_complete(current)?;
            self.check_operation_complete(current)?;
            match parent {
                Some(parent) => current = parent,
                None => return Ok(()),
            }
        }
    }

    fn new_child_needed(&self, node: NodeId, ignore_space: bool) -> bool {
        let flags = self.flags[node];
        flags.new_selection || (flags.space_parsed && !ignore_space)
    }

    /// The child receiving the next character, created when needed
    fn current_child(&mut self, node: NodeId, ignore_space: bool) -> NodeId {
        let last = self.nodes[node].children.last().copied();
        match last {
            Some(last)
                if !self.new_child_needed(node, ignore_space) && !self.nodes[last].is_operation() =>
            {
                last
            }
            _ => self.add_child(node),
        }
    }

    fn add_child(&mut self, node: NodeId) -> NodeId {
        let child = self.nodes.len();
        self.nodes.push(Node::child_of(node));
        self.flags.push(Flags::default());
        self.nodes[node].children.push(child);
        self.flags[node].new_selection = false;
        child
    }

    fn child_is_open_group(&self, node: NodeId) -> bool {
        self.last_content(node)
            .is_some_and(|content| matches!(content, NodeContent::Group(group) if group.right().is_empty()))
    }

    fn last_content(&self, node: NodeId) -> Option<&NodeContent> {
        let last = *self.nodes[node].children.last()?;
        Some(&self.nodes[last].content)
    }

    fn check_group_complete(&self, node: NodeId) -> ScanResult<()> {
        match self.last_content(node) {
            Some(NodeContent::Group(group)) if group.right().is_empty() => {
                Err(ParseErrorKind::MissingGroupOperand {
                    side: Side::Right,
                    separator: group.separator,
                })
            }
            _ => Ok(()),
        }
    }

    fn check_operation_complete(&self, node: NodeId) -> ScanResult<()> {
        match self.nodes[node].content {
            NodeContent::Operator { operator, .. } if self.nodes[node].children.len() < 2 => {
                Err(ParseErrorKind::MissingRightOperand { operator })
            }
            _ => Ok(()),
        }
    }
}
