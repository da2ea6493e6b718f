/*! Functions that returns an ASCII representation of syntax trees. */

use ::ascii_tree::Tree;
use ::ascii_tree::Tree::{Leaf, Node as TreeNode};

use crate::ast::dfs::{DFSEvent, DFSIter};
use crate::ast::{Label, Node};

impl Node {
    /// Returns a representation of the syntax tree as an ASCII tree.
    ///
    /// Grammar rules appear as `<Rule>` and text leaves are quoted.
    pub fn ascii_tree(&self) -> Tree {
        node_ascii_tree(self)
    }

    /// Renders the syntax tree as a multi-line string using
    /// [`ascii_tree::write_tree`].
    ///
    /// The renderer recurses once per tree level and indents every line by
    /// its depth, so this is meant for debugging short patterns. Use
    /// [`Node::ascii_tree`] or the `Display` implementation for long ones.
    pub fn ascii_tree_string(&self) -> String {
        let mut output = String::new();
        // Writing into a String can't fail.
        let _ = ::ascii_tree::write_tree(&mut output, &self.ascii_tree());
        output
    }
}

fn node_ascii_tree(root: &Node) -> Tree {
    let mut tree_stack: Vec<Tree> = Vec::new();
    let mut len_stack: Vec<usize> = Vec::new();

    for event in DFSIter::new(root) {
        match event {
            DFSEvent::Enter(_) => {
                // Anything pushed into `tree_stack` after this point is a
                // child of the node being entered.
                len_stack.push(tree_stack.len());
            }
            DFSEvent::Leave(node) => {
                let children_start = len_stack.pop().unwrap_or_default();
                let children: Vec<Tree> =
                    tree_stack.drain(children_start..).collect();
                tree_stack.push(build_tree_for_node(node, children));
            }
        }
    }

    tree_stack.pop().unwrap_or_else(|| Leaf(Vec::new()))
}

fn build_tree_for_node(node: &Node, children: Vec<Tree>) -> Tree {
    match node.label() {
        Label::Text(text) => Leaf(vec![format!("{:?}", text)]),
        Label::Rule(rule) if children.is_empty() => {
            Leaf(vec![format!("<{}>", rule)])
        }
        Label::Rule(rule) => TreeNode(format!("<{}>", rule), children),
    }
}
