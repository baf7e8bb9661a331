use log::{debug, trace};
use rustc_hash::FxHashMap;

use super::huffman::{HuffTree, Node, NodeData};
use crate::bitstream::bitstring::BitString;
use crate::{HuffError, HuffResult};

/// Symbol to code lookup, indexed by symbol value. Symbols missing from the tree have no
/// code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<BitString>>,
}

impl CodeTable {
    /// Walk the tree depth first, 0 for left and 1 for right, and record the path to each
    /// leaf as that leaf's code.
    pub fn from_tree(tree: &HuffTree) -> Self {
        let slots = tree
            .leaves()
            .iter()
            .map(|&(sym, _)| sym as usize + 1)
            .max()
            .unwrap_or(0);
        let mut table = CodeTable {
            codes: vec![None; slots],
        };
        let mut path = BitString::new();
        table.walk(tree.root(), &mut path);
        debug!("Code table holds {} codes", table.len());
        for (sym, code) in table.iter() {
            trace!("{:>3} {:?} -> {}", sym, sym as char, code);
        }
        table
    }

    fn walk(&mut self, node: &Node, path: &mut BitString) {
        match &node.node_data {
            NodeData::Kids(left, right) => {
                path.push(false);
                self.walk(left, path);
                path.pop();
                path.push(true);
                self.walk(right, path);
                path.pop();
            }
            NodeData::Leaf(sym) => self.codes[*sym as usize] = Some(path.clone()),
        }
    }

    /// The code for a symbol, if it has one.
    pub fn get(&self, symbol: u8) -> Option<&BitString> {
        self.codes.get(symbol as usize).and_then(|c| c.as_ref())
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All (symbol, code) pairs in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitString)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(sym, code)| code.as_ref().map(|c| (sym as u8, c)))
    }

    /// Encoded length in bits of a text with the given per-symbol counts.
    pub fn encoded_len(&self, counts: &[u64]) -> u64 {
        self.iter()
            .map(|(sym, code)| counts.get(sym as usize).copied().unwrap_or(0) * code.len() as u64)
            .sum()
    }

    /// Check that every code is non-empty and that no code is a prefix of another.
    pub fn validate(&self) -> HuffResult<()> {
        let mut owners: FxHashMap<&[bool], u8> = FxHashMap::default();
        for (sym, code) in self.iter() {
            if code.is_empty() {
                return Err(HuffError::PrefixClash(sym, sym));
            }
            if let Some(&other) = owners.get(code.as_slice()) {
                return Err(HuffError::PrefixClash(other, sym));
            }
            owners.insert(code.as_slice(), sym);
        }
        // No proper prefix of any code may itself be a code
        for (sym, code) in self.iter() {
            let bits = code.as_slice();
            if let Some(&other) = (1..bits.len()).find_map(|n| owners.get(&bits[..n])) {
                return Err(HuffError::PrefixClash(other, sym));
            }
        }
        Ok(())
    }
}
