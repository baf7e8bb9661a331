use std::collections::VecDeque;

use log::{debug, log_enabled, trace, Level};

use crate::tools::freq_count::FreqEntry;
use crate::{HuffError, HuffResult};

#[derive(PartialEq, Debug, Clone)]
pub enum NodeData {
    /// Left child (0 bit), right child (1 bit).
    Kids(Box<Node>, Box<Node>),
    Leaf(u8),
}

#[derive(PartialEq, Debug, Clone)]
pub struct Node {
    pub weight: f64,
    pub node_data: NodeData,
}

impl Node {
    /// Create a new leaf node
    pub fn leaf(symbol: u8, weight: f64) -> Node {
        Node {
            weight,
            node_data: NodeData::Leaf(symbol),
        }
    }

    /// Join two nodes under a new internal node carrying their combined weight.
    pub fn merge(left: Node, right: Node) -> Node {
        Node {
            weight: left.weight + right.weight,
            node_data: NodeData::Kids(Box::new(left), Box::new(right)),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.node_data, NodeData::Leaf(_))
    }

    /// The node as a frequency entry: leaves carry their symbol, internal nodes none.
    pub fn entry(&self) -> FreqEntry {
        match self.node_data {
            NodeData::Leaf(sym) => FreqEntry::leaf(sym, self.weight),
            NodeData::Kids(..) => FreqEntry::internal(self.weight),
        }
    }

    /// Number of edges from this node to its deepest leaf.
    pub fn depth(&self) -> usize {
        match &self.node_data {
            NodeData::Kids(left, right) => 1 + left.depth().max(right.depth()),
            NodeData::Leaf(_) => 0,
        }
    }
}

/// A Huffman code tree. The root is always an internal node, so every symbol in the tree
/// has a code at least one bit long.
#[derive(PartialEq, Debug, Clone)]
pub struct HuffTree {
    root: Node,
}

impl HuffTree {
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Visit every leaf, left to right, with its depth.
    pub fn leaves(&self) -> Vec<(u8, usize)> {
        let mut leaves = vec![];
        return_leaves(&self.root, 0, &mut leaves);
        leaves
    }

    /// Dump the tree at trace level.
    pub fn log_structure(&self) {
        if log_enabled!(Level::Trace) {
            trace!("Huffman tree structure:");
            log_node(&self.root, 0, "root");
        }
    }
}

/// Recursively walk the tree and return in "leaves" how far (deep) from the root node each
/// leaf is.
fn return_leaves(node: &Node, depth: usize, leaves: &mut Vec<(u8, usize)>) {
    match &node.node_data {
        NodeData::Kids(left, right) => {
            return_leaves(left, depth + 1, leaves);
            return_leaves(right, depth + 1, leaves);
        }
        NodeData::Leaf(sym) => leaves.push((*sym, depth)),
    }
}

fn log_node(node: &Node, depth: usize, label: &str) {
    let indent = "  ".repeat(depth);
    match &node.node_data {
        NodeData::Leaf(sym) => {
            trace!("{}{} -> leaf {:?} ({}) p={}", indent, label, *sym as char, sym, node.weight)
        }
        NodeData::Kids(left, right) => {
            trace!("{}{} -> internal p={}", indent, label, node.weight);
            log_node(left, depth + 1, "L");
            log_node(right, depth + 1, "R");
        }
    }
}

/// Take the lighter of the two queue fronts. Ties go to the source queue.
fn pull_lightest(source: &mut VecDeque<Node>, merged: &mut VecDeque<Node>) -> Option<Node> {
    match (source.front(), merged.front()) {
        (Some(s), Some(m)) if s.weight <= m.weight => source.pop_front(),
        (Some(_), Some(_)) => merged.pop_front(),
        (Some(_), None) => source.pop_front(),
        (None, _) => merged.pop_front(),
    }
}

/// Build the Huffman tree from a frequency list sorted as `freq_table` returns it.
///
/// Two FIFO queues stand in for a priority queue: `source` holds the leaves in sorted
/// order and `merged` the internal nodes, which come out in non-decreasing weight. Each
/// step joins the two lightest fronts (first taken becomes the left child) until one node
/// is left.
pub fn build_tree(sorted: &[FreqEntry]) -> HuffResult<HuffTree> {
    if sorted.len() < 2 {
        return Err(HuffError::TooFewEntries(sorted.len()));
    }
    debug_assert!(sorted.windows(2).all(|w| w[0] <= w[1]));

    let mut source: VecDeque<Node> = sorted
        .iter()
        .enumerate()
        .map(|(i, e)| match e.symbol {
            Some(sym) => Ok(Node::leaf(sym, e.prob)),
            None => Err(HuffError::UnlabelledEntry(i)),
        })
        .collect::<HuffResult<_>>()?;
    let mut merged: VecDeque<Node> = VecDeque::with_capacity(sorted.len());

    while source.len() + merged.len() > 1 {
        let left = pull_lightest(&mut source, &mut merged);
        let right = pull_lightest(&mut source, &mut merged);
        if let (Some(left), Some(right)) = (left, right) {
            merged.push_back(Node::merge(left, right));
        }
    }

    let root = merged
        .pop_front()
        .ok_or(HuffError::TooFewEntries(sorted.len()))?;
    debug!(
        "Built tree over {} symbols, depth {}, weight {}",
        sorted.len(),
        root.depth(),
        root.weight
    );
    let tree = HuffTree { root };
    tree.log_structure();
    Ok(tree)
}
