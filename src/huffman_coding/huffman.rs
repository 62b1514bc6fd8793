use log::trace;

use crate::error::{HuffError, Result};
use crate::tools::freq_count::{distinct, freqs, FreqTable};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

/// Longest code a 256 leaf tree can produce, and the most the dictionary length byte holds.
pub const MAX_CODE_BITS: usize = 255;

/// A Huffman code of 1-255 bits, packed MSB-first exactly as it is stored in the dictionary.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Code {
    bits: [u8; 32],
    len: u8,
}

impl Code {
    /// Rebuild a code from its dictionary form. Returns None if `bytes` is not exactly
    /// `ceil(len / 8)` long or if any padding bit is set.
    pub fn from_packed(len: u8, bytes: &[u8]) -> Option<Code> {
        let used = (len as usize + 7) / 8;
        if bytes.len() != used {
            return None;
        }
        let mut code = Code {
            bits: [0; 32],
            len,
        };
        code.bits[..used].copy_from_slice(bytes);
        let spare = used * 8 - len as usize;
        if spare > 0 && bytes[used - 1] & (0xff >> (8 - spare)) != 0 {
            return None;
        }
        Some(code)
    }

    /// Append one bit, true for 1. Returns false, leaving the code as it was, if the code
    /// already holds `MAX_CODE_BITS` bits.
    #[must_use]
    pub fn push(&mut self, bit: bool) -> bool {
        if self.len() == MAX_CODE_BITS {
            return false;
        }
        if bit {
            self.bits[self.len as usize / 8] |= 0x80 >> (self.len % 8);
        }
        self.len += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bit i of the code (0 is the first bit sent).
    pub fn bit(&self, i: usize) -> bool {
        self.bits[i / 8] & (0x80 >> (i % 8)) != 0
    }

    /// The packed bytes, `ceil(len / 8)` of them, low bits of the last one zero.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits[..(self.len as usize + 7) / 8]
    }

    /// True if every bit of self starts `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && (0..self.len()).all(|i| self.bit(i) == other.bit(i))
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (0..self.len()).try_for_each(|i| write!(f, "{}", self.bit(i) as u8))
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code({})", self)
    }
}

/// Code dictionary, indexed by symbol. Only symbols present in the input have a code.
pub type CodeTable = [Option<Code>; 256];

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum NodeData {
    /// Left and right child, as indices into the tree's node arena.
    Kids(usize, usize),
    Leaf(u8),
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct Node {
    pub weight: u64,
    pub node_data: NodeData,
}

impl Node {
    /// Create a new node
    pub fn new(weight: u64, node_data: NodeData) -> Node {
        Node { weight, node_data }
    }
}

/// A Huffman tree. Nodes live in one arena and refer to their children by index, so every
/// node has exactly one owner (the arena) and exactly one parent.
#[derive(Debug, Clone)]
pub struct HuffTree {
    nodes: Vec<Node>,
    root: usize,
}

impl HuffTree {
    /// Build the tree for a frequency table, or None if every count is zero.
    ///
    /// Nodes leave the queue lowest weight first. Equal weights leave in the order they
    /// entered: leaves enter by ascending symbol, and each merged node enters after
    /// everything already queued. The first node out becomes the left child.
    pub fn from_freqs(freqs: &FreqTable) -> Option<HuffTree> {
        let mut nodes: Vec<Node> = Vec::with_capacity(511);
        // (weight, arena index). The index doubles as the insertion sequence.
        let mut heap: BinaryHeap<Reverse<(u64, usize)>> = BinaryHeap::with_capacity(256);

        for (sym, &f) in freqs.iter().enumerate().filter(|(_, f)| **f > 0) {
            heap.push(Reverse((f, nodes.len())));
            nodes.push(Node::new(f, NodeData::Leaf(sym as u8)));
        }

        // Pare it down to one single node with child nodes.
        while heap.len() > 1 {
            let Reverse((left_weight, left)) = heap.pop()?;
            let Reverse((right_weight, right)) = heap.pop()?;
            let weight = left_weight + right_weight;
            heap.push(Reverse((weight, nodes.len())));
            nodes.push(Node::new(weight, NodeData::Kids(left, right)));
        }

        let Reverse((_, root)) = heap.pop()?;
        Some(HuffTree { nodes, root })
    }

    pub fn root(&self) -> &Node {
        &self.nodes[self.root]
    }

    /// Number of leaves, i.e. distinct symbols.
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n.node_data, NodeData::Leaf(_)))
            .count()
    }

    /// Length of the longest root-to-leaf path. A lone leaf has height 0.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack = vec![(self.root, 0_usize)];
        while let Some((idx, depth)) = stack.pop() {
            match self.nodes[idx].node_data {
                NodeData::Kids(left, right) => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
                NodeData::Leaf(_) => height = height.max(depth),
            }
        }
        height
    }

    /// Walk the tree (left = 0, right = 1) and return the code of every leaf.
    /// A tree that is a single leaf gives that symbol the one bit code `0`.
    pub fn codes(&self) -> Result<CodeTable> {
        let mut table: CodeTable = [None; 256];

        if let NodeData::Leaf(sym) = self.root().node_data {
            let mut code = Code::default();
            let _ = code.push(false);
            table[sym as usize] = Some(code);
            return Ok(table);
        }

        // Explicit stack, right pushed first so the left subtree is visited first.
        let mut stack = vec![(self.root, Code::default())];
        while let Some((idx, code)) = stack.pop() {
            match self.nodes[idx].node_data {
                NodeData::Leaf(sym) => table[sym as usize] = Some(code),
                NodeData::Kids(left, right) => {
                    let (mut left_code, mut right_code) = (code, code);
                    if !(left_code.push(false) && right_code.push(true)) {
                        return Err(HuffError::UnrepresentableAlphabet {
                            symbols: self.leaf_count(),
                            longest_code: self.height(),
                        });
                    }
                    stack.push((right, right_code));
                    stack.push((left, left_code));
                }
            }
        }
        Ok(table)
    }
}

/// The static model for one input: its histogram, tree and code dictionary.
#[derive(Debug, Clone)]
pub struct HuffmanCodec {
    freqs: FreqTable,
    tree: Option<HuffTree>,
    codes: CodeTable,
}

impl HuffmanCodec {
    /// Count the input and derive its tree and codes. Empty input gives an empty model.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let freqs = freqs(data);
        let tree = HuffTree::from_freqs(&freqs);
        let codes = match &tree {
            Some(tree) => tree.codes()?,
            None => [None; 256],
        };

        trace_table(&freqs, &codes);

        Ok(Self { freqs, tree, codes })
    }

    pub fn freqs(&self) -> &FreqTable {
        &self.freqs
    }

    pub fn tree(&self) -> Option<&HuffTree> {
        self.tree.as_ref()
    }

    pub fn codes(&self) -> &CodeTable {
        &self.codes
    }

    /// Code for one symbol, None if the symbol never occurred.
    pub fn code(&self, sym: u8) -> Option<&Code> {
        self.codes[sym as usize].as_ref()
    }

    /// Distinct symbols in the dictionary.
    pub fn symbols(&self) -> usize {
        distinct(&self.freqs)
    }

    /// Payload length in bits: sum of freq * code length.
    pub fn encoded_bits(&self) -> u64 {
        self.freqs
            .iter()
            .zip(self.codes.iter())
            .filter_map(|(&f, code)| code.map(|c| f * c.len() as u64))
            .sum()
    }
}

/// Dump the frequency table and dictionary at trace level.
fn trace_table(freqs: &FreqTable, codes: &CodeTable) {
    if !log::log_enabled!(log::Level::Trace) {
        return;
    }
    for (sym, code) in codes.iter().enumerate() {
        if let Some(code) = code {
            trace!(
                "{:>3} {:?}: freq {:>8}, code {}",
                sym,
                sym as u8 as char,
                freqs[sym],
                code
            );
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn codes_for(data: &[u8]) -> CodeTable {
        HuffTree::from_freqs(&freqs(data)).unwrap().codes().unwrap()
    }

    fn assert_prefix_free(codes: &CodeTable) {
        let present: Vec<&Code> = codes.iter().flatten().collect();
        for (i, a) in present.iter().enumerate() {
            for (j, b) in present.iter().enumerate() {
                if i != j {
                    assert!(!a.is_prefix_of(b), "{} is a prefix of {}", a, b);
                }
            }
        }
    }

    #[test]
    fn empty_tree_test() {
        assert!(HuffTree::from_freqs(&[0; 256]).is_none());
    }

    #[test]
    fn single_symbol_test() {
        let tree = HuffTree::from_freqs(&freqs(b"aaaa")).unwrap();
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.root().node_data, NodeData::Leaf(b'a'));
        let codes = tree.codes().unwrap();
        assert_eq!(codes.iter().flatten().count(), 1);
        assert_eq!(codes[b'a' as usize].unwrap().to_string(), "0");
    }

    #[test]
    fn abracadabra_test() {
        let codes = codes_for(b"abracadabra");
        // Queue: c1 d1 b2 r2 a5 -> (c,d)2 -> (b,r)4 -> ((c,d),(b,r))6 -> (a,...)11
        assert_eq!(codes[b'a' as usize].unwrap().to_string(), "0");
        assert_eq!(codes[b'c' as usize].unwrap().to_string(), "100");
        assert_eq!(codes[b'd' as usize].unwrap().to_string(), "101");
        assert_eq!(codes[b'b' as usize].unwrap().to_string(), "110");
        assert_eq!(codes[b'r' as usize].unwrap().to_string(), "111");
        assert_prefix_free(&codes);
    }

    #[test]
    fn tie_break_test() {
        // All weights equal: leaves pair off in symbol order.
        let codes = codes_for(b"abcd");
        assert_eq!(codes[b'a' as usize].unwrap().to_string(), "00");
        assert_eq!(codes[b'b' as usize].unwrap().to_string(), "01");
        assert_eq!(codes[b'c' as usize].unwrap().to_string(), "10");
        assert_eq!(codes[b'd' as usize].unwrap().to_string(), "11");
    }

    #[test]
    fn leaf_count_test() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let tree = HuffTree::from_freqs(&freqs(data)).unwrap();
        assert_eq!(tree.leaf_count(), distinct(&freqs(data)));
        let codes = tree.codes().unwrap();
        assert_eq!(codes.iter().flatten().count(), tree.leaf_count());
        assert_prefix_free(&codes);
        let longest = codes.iter().flatten().map(|c| c.len()).max().unwrap();
        assert_eq!(longest, tree.height());
    }

    #[test]
    fn full_alphabet_test() {
        let data: Vec<u8> = (0..=255).collect();
        let codes = codes_for(&data);
        assert!(codes.iter().all(|c| c.map(|c| c.len()) == Some(8)));
        assert_prefix_free(&codes);
    }

    #[test]
    fn skewed_depth_test() {
        // Fibonacci weights make the deepest possible tree.
        let mut f = [0_u64; 256];
        let (mut a, mut b) = (1_u64, 1_u64);
        for slot in f.iter_mut().take(40) {
            *slot = a;
            let next = a + b;
            a = b;
            b = next;
        }
        let tree = HuffTree::from_freqs(&f).unwrap();
        assert_eq!(tree.height(), 39);
        assert_prefix_free(&tree.codes().unwrap());
    }

    #[test]
    fn encoded_bits_test() {
        let codec = HuffmanCodec::from_bytes(b"abracadabra").unwrap();
        // a:5*1 + b:2*3 + r:2*3 + c:1*3 + d:1*3
        assert_eq!(codec.encoded_bits(), 23);
        assert_eq!(codec.symbols(), 5);
        assert!(codec.code(b'z').is_none());
    }

    #[test]
    fn code_packing_test() {
        let mut code = Code::default();
        for bit in [true, false, true, false, true, false, true, false, true] {
            assert!(code.push(bit));
        }
        assert_eq!(code.len(), 9);
        assert_eq!(code.as_bytes(), &[0b1010_1010, 0b1000_0000]);
        assert_eq!(Code::from_packed(9, code.as_bytes()), Some(code));
        assert_eq!(Code::from_packed(9, &[0b1010_1010, 0b1100_0000]), None);
        assert_eq!(Code::from_packed(9, &[0b1010_1010]), None);
        assert_eq!(format!("{:?}", code), "Code(101010101)");
    }

    #[test]
    fn code_full_test() {
        let mut code = Code::default();
        for i in 0..MAX_CODE_BITS {
            assert!(code.push(i % 2 == 0));
        }
        let full = code;
        assert!(!code.push(true));
        assert_eq!(code.len(), MAX_CODE_BITS);
        assert_eq!(code, full);
    }
}
