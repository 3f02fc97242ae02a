/// Huffman coding: tree construction and codeword derivation.
///
/// The tree is always built over the full 256-symbol alphabet, zero-count
/// bytes included, so that a decoder holding only the frequency table
/// rebuilds exactly the tree the encoder used. Nothing about the tree's
/// shape is ever transmitted.
use crate::frequency::FrequencyTable;
use crate::pqueue::MinHeap;
use crate::ALPHABET_SIZE;

/// Width of the register a codeword is packed into.
pub const MAX_CODE_BITS: u8 = 64;

/// A node in the Huffman tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A single byte value.
    Leaf(u8),
    /// An internal node: left is reached with a 0 bit, right with a 1 bit.
    Branch(Box<Node>, Box<Node>),
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// The child selected by `bit`, or `None` at a leaf.
    pub fn child(&self, bit: bool) -> Option<&Node> {
        match self {
            Node::Leaf(_) => None,
            Node::Branch(left, right) => Some(if bit { right } else { left }),
        }
    }

    fn leaf_count(&self) -> u32 {
        match self {
            Node::Leaf(_) => 1,
            Node::Branch(left, right) => left.leaf_count() + right.leaf_count(),
        }
    }

    fn depth(&self) -> u32 {
        match self {
            Node::Leaf(_) => 0,
            Node::Branch(left, right) => 1 + left.depth().max(right.depth()),
        }
    }
}

/// A Huffman tree for encoding and decoding byte streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    /// Build the tree for a frequency table.
    ///
    /// Seeds a min-heap with one leaf per byte value (weights 0 included)
    /// and performs exactly 255 merges of the two lightest elements; the
    /// first one popped becomes the left child. Never fails: an all-zero
    /// table still yields a full tree, it just never gets walked.
    pub fn build(freq: &FrequencyTable) -> Self {
        let mut heap: MinHeap<u64, Node> = MinHeap::with_capacity(ALPHABET_SIZE);
        for (value, &count) in freq.byte.iter().enumerate() {
            heap.push(count as u64, Node::Leaf(value as u8));
        }

        let mut merges = 0usize;
        let root = loop {
            match (heap.pop_entry(), heap.pop_entry()) {
                (Some((wx, x)), Some((wy, y))) => {
                    heap.push(wx + wy, Node::Branch(Box::new(x), Box::new(y)));
                    merges += 1;
                }
                (Some((weight, root)), None) => {
                    log::trace!("huffman: {merges} merges, root weight {weight}");
                    break root;
                }
                (None, _) => unreachable!("heap is seeded with {} leaves", ALPHABET_SIZE),
            }
        };
        debug_assert_eq!(merges, ALPHABET_SIZE - 1);

        HuffmanTree { root }
    }

    /// Wrap an arbitrary root, e.g. a lone leaf whose code is empty.
    pub fn from_root(root: Node) -> Self {
        HuffmanTree { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Number of leaves (256 for any tree produced by [`HuffmanTree::build`]).
    pub fn leaf_count(&self) -> u32 {
        self.root.leaf_count()
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> u32 {
        self.root.depth()
    }

    /// Decode one symbol by walking from the root, pulling a bit per branch.
    ///
    /// A tree that is a single leaf returns its symbol without asking for
    /// any bits.
    pub fn walk<E, F>(&self, mut next_bit: F) -> Result<u8, E>
    where
        F: FnMut() -> Result<bool, E>,
    {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf(value) => return Ok(*value),
                Node::Branch(left, right) => {
                    node = if next_bit()? { right } else { left };
                }
            }
        }
    }
}

/// A codeword: the low `len` bits of `bits`, most significant first.
///
/// `len` is the true depth of the leaf. When it exceeds [`MAX_CODE_BITS`]
/// only the last 64 steps of the path survive in `bits`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Code {
    pub bits: u64,
    pub len: u8,
}

impl Code {
    /// Whether the whole path is held in `bits`.
    pub fn fits(&self) -> bool {
        self.len <= MAX_CODE_BITS
    }

    /// The codeword's bits, most significant first.
    pub fn iter_bits(self) -> impl Iterator<Item = bool> {
        (0..self.len.min(MAX_CODE_BITS))
            .rev()
            .map(move |shift| (self.bits >> shift) & 1 == 1)
    }
}

/// Lookup table from byte value to codeword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: [Option<Code>; ALPHABET_SIZE],
}

impl CodeTable {
    /// Derive every leaf's codeword by a depth-first walk of the tree.
    pub fn derive(tree: &HuffmanTree) -> Self {
        let mut codes = [None; ALPHABET_SIZE];
        Self::assign(&tree.root, 0, 0, &mut codes);
        CodeTable { codes }
    }

    fn assign(node: &Node, prefix: u64, depth: u8, codes: &mut [Option<Code>; ALPHABET_SIZE]) {
        match node {
            Node::Leaf(value) => {
                codes[*value as usize] = Some(Code {
                    bits: prefix,
                    len: depth,
                });
            }
            Node::Branch(left, right) => {
                Self::assign(left, prefix << 1, depth + 1, codes);
                Self::assign(right, (prefix << 1) | 1, depth + 1, codes);
            }
        }
    }

    /// The codeword for `byte`, or `None` if the tree has no leaf for it.
    pub fn get(&self, byte: u8) -> Option<Code> {
        self.codes[byte as usize]
    }

    /// Payload size in bits when encoding data with these frequencies.
    pub fn encoded_bits(&self, freq: &FrequencyTable) -> u64 {
        freq.byte
            .iter()
            .zip(self.codes.iter())
            .map(|(&count, code)| count as u64 * code.map_or(0, |c| c.len as u64))
            .sum()
    }
}
