//! Depth-first traversal of syntax trees.
//!
//! [`DFSIter`] walks a syntax tree without recursion and emits a
//! [`DFSEvent::Enter`] for each node before visiting its children, and a
//! [`DFSEvent::Leave`] after all of them have been visited. Term and
//! disjunction chains are as deep as the pattern is long, so any code that
//! needs to visit the whole tree should use this iterator.
//!
//! # Example
//!
//! ```rust
//! use rex_parser::Parser;
//! use rex_parser::ast::Rule;
//! use rex_parser::ast::dfs::{DFSEvent, DFSIter};
//!
//! let root = Parser::new().parse(r"a\db").unwrap();
//!
//! let literals: Vec<_> = DFSIter::new(&root)
//!     .filter_map(|event| match event {
//!         DFSEvent::Enter(node) if node.as_rule() == Some(Rule::Literal) => {
//!             node.leaf_text()
//!         }
//!         _ => None,
//!     })
//!     .collect();
//!
//! assert_eq!(literals, vec!["a", "b"]);
//! ```
use crate::ast::Node;

/// Events yielded by [`DFSIter`].
#[derive(Debug)]
pub enum DFSEvent<T> {
    /// Emitted when the traversal enters a node.
    Enter(T),
    /// Emitted when the traversal leaves a node.
    Leave(T),
}

/// An iterator that performs a depth-first traversal of a syntax tree.
///
/// For leaf nodes, the `Enter` and `Leave` events are emitted
/// consecutively.
pub struct DFSIter<'a> {
    stack: Vec<DFSEvent<&'a Node>>,
}

impl<'a> DFSIter<'a> {
    /// Creates a new [`DFSIter`] that traverses the tree starting at
    /// `node`.
    pub fn new(node: &'a Node) -> Self {
        Self { stack: vec![DFSEvent::Enter(node)] }
    }

    /// Prevents the iterator from visiting the children of the node that
    /// was just entered. The `Leave` event for that node is still emitted.
    pub fn prune(&mut self) {
        while let Some(DFSEvent::Enter(_)) = self.stack.last() {
            self.stack.pop();
        }
    }
}

impl<'a> Iterator for DFSIter<'a> {
    type Item = DFSEvent<&'a Node>;

    fn next(&mut self) -> Option<Self::Item> {
        let event = self.stack.pop()?;
        if let DFSEvent::Enter(node) = event {
            self.stack.push(DFSEvent::Leave(node));
            self.stack.extend(
                node.children().iter().rev().map(DFSEvent::Enter),
            );
        }
        Some(event)
    }
}
