//! Canonical prefix-free code assignments ("topologies").
//!
//! A topology maps a subset of the alphabet to codewords that form a complete
//! binary prefix code (or the empty codeword when the subset has a single
//! symbol). The [`TopologyTable`] enumerates them in a fixed order so that a
//! one-byte id identifies a code on both sides of a stream.

use core::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::alphabet::{Alphabet, Symbol, SymbolCounts, SymbolSet, MAX_SYMBOLS};

/// Index of a topology in its [`TopologyTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopologyId(pub u8);

impl TopologyId {
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TopologyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A binary codeword of at most 8 bits, stored MSB-first and right-aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Codeword {
    bits: u8,
    len: u8,
}

impl Codeword {
    /// The zero-length codeword used by single-symbol topologies.
    pub const EMPTY: Self = Self { bits: 0, len: 0 };

    pub const fn new(bits: u8, len: u8) -> Self {
        debug_assert!(len <= 8);
        Self { bits, len }
    }

    /// Parse a codeword from a string of `0`/`1` characters.
    ///
    /// Returns `None` for other characters or for more than 8 bits.
    pub fn parse(pattern: &str) -> Option<Self> {
        if pattern.len() > 8 {
            return None;
        }
        let mut bits = 0u8;
        for c in pattern.chars() {
            bits = match c {
                '0' => bits << 1,
                '1' => (bits << 1) | 1,
                _ => return None,
            };
        }
        Some(Self::new(bits, pattern.len() as u8))
    }

    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self.bits
    }

    #[inline(always)]
    pub const fn len(self) -> u8 {
        self.len
    }

    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    /// The bit at position `i`, counted from the first (most significant).
    #[inline]
    pub const fn bit(self, i: u8) -> bool {
        (self.bits >> (self.len - 1 - i)) & 1 == 1
    }

    /// True if `self` is a strict prefix of `other`.
    pub const fn is_strict_prefix_of(self, other: Self) -> bool {
        self.len < other.len
            && (self.len == 0 || (other.bits >> (other.len - self.len)) == self.bits)
    }
}

impl fmt::Display for Codeword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.len {
            f.write_str(if self.bit(i) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// A node of a [`DecodeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Leaf(Symbol),
    Branch { zero: Option<u16>, one: Option<u16> },
}

/// Arena-indexed binary decode tree. The root is node 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeTree {
    nodes: Vec<Node>,
}

impl DecodeTree {
    pub const ROOT: usize = 0;

    fn build<I>(assignments: I) -> Self
    where
        I: IntoIterator<Item = (Symbol, Codeword)>,
    {
        let mut nodes = vec![Node::Branch {
            zero: None,
            one: None,
        }];
        for (sym, code) in assignments {
            if code.is_empty() {
                nodes[Self::ROOT] = Node::Leaf(sym);
                continue;
            }
            let mut at = Self::ROOT;
            for i in 0..code.len() {
                let bit = code.bit(i);
                let existing = match nodes[at] {
                    Node::Branch { zero, one } => {
                        if bit {
                            one
                        } else {
                            zero
                        }
                    }
                    // Table codes are prefix-free; a leaf on the path cannot occur.
                    Node::Leaf(_) => break,
                };
                let child = match existing {
                    Some(child) => child,
                    None => {
                        let idx = nodes.len() as u16;
                        nodes.push(if i + 1 == code.len() {
                            Node::Leaf(sym)
                        } else {
                            Node::Branch {
                                zero: None,
                                one: None,
                            }
                        });
                        if let Node::Branch { zero, one } = &mut nodes[at] {
                            if bit {
                                *one = Some(idx);
                            } else {
                                *zero = Some(idx);
                            }
                        }
                        idx
                    }
                };
                at = child as usize;
            }
        }
        Self { nodes }
    }

    #[inline(always)]
    pub fn node(&self, index: usize) -> Node {
        self.nodes[index]
    }

    /// Follow one bit from `index`. `None` means the path does not exist.
    #[inline]
    pub fn step(&self, index: usize, bit: bool) -> Option<usize> {
        match self.nodes[index] {
            Node::Branch { zero, one } => (if bit { one } else { zero }).map(usize::from),
            Node::Leaf(_) => None,
        }
    }

    /// Decode a single codeword from the root.
    pub fn decode(&self, code: Codeword) -> Option<Symbol> {
        let mut at = Self::ROOT;
        for i in 0..code.len() {
            at = self.step(at, code.bit(i))?;
        }
        match self.nodes[at] {
            Node::Leaf(sym) => Some(sym),
            Node::Branch { .. } => None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// An immutable prefix-free code over a subset of the alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    codewords: [Option<Codeword>; MAX_SYMBOLS],
    domain: SymbolSet,
    tree: DecodeTree,
}

impl Topology {
    /// Build a topology from explicit `(symbol, codeword)` pairs.
    pub fn from_codewords<I>(assignments: I) -> Self
    where
        I: IntoIterator<Item = (Symbol, Codeword)>,
    {
        let mut codewords = [None; MAX_SYMBOLS];
        let mut domain = SymbolSet::EMPTY;
        for (sym, code) in assignments {
            codewords[sym as usize] = Some(code);
            domain.insert(sym);
        }
        let tree = DecodeTree::build(
            domain
                .iter()
                .filter_map(|s| codewords[s as usize].map(|c| (s, c))),
        );
        Self {
            codewords,
            domain,
            tree,
        }
    }

    /// Assign `patterns` to `symbols` position by position.
    fn from_patterns(symbols: &[Symbol], patterns: &[&str]) -> Self {
        debug_assert_eq!(symbols.len(), patterns.len());
        Self::from_codewords(
            symbols
                .iter()
                .zip(patterns)
                .filter_map(|(&s, p)| Codeword::parse(p).map(|c| (s, c))),
        )
    }

    #[inline(always)]
    pub fn codeword(&self, sym: Symbol) -> Option<Codeword> {
        self.codewords[sym as usize]
    }

    #[inline(always)]
    pub fn domain(&self) -> SymbolSet {
        self.domain
    }

    #[inline(always)]
    pub fn active_symbols(&self) -> usize {
        self.domain.len()
    }

    /// True when the topology encodes a single symbol with zero data bits.
    #[inline(always)]
    pub fn is_single(&self) -> bool {
        self.domain.len() == 1
    }

    pub fn single_symbol(&self) -> Option<Symbol> {
        if self.is_single() {
            self.domain.iter().next()
        } else {
            None
        }
    }

    pub fn decode_tree(&self) -> &DecodeTree {
        &self.tree
    }

    /// Data bits needed for `counts`, or `None` if a counted symbol is
    /// outside the domain.
    pub fn data_bits(&self, counts: &SymbolCounts) -> Option<u64> {
        let mut bits = 0u64;
        for (idx, &count) in counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            bits += count * u64::from(self.codewords[idx]?.len());
        }
        Some(bits)
    }

    /// Check that the codewords fill a complete binary tree (Kraft sum of 1).
    pub fn kraft_complete(&self) -> bool {
        if self.is_single() {
            return self.codewords.iter().flatten().all(|c| c.is_empty());
        }
        // All codewords are at most 8 bits, so scale by 2^8.
        let sum: u32 = self
            .codewords
            .iter()
            .flatten()
            .map(|c| if c.is_empty() { 0 } else { 1u32 << (8 - c.len()) })
            .sum();
        sum == 256 && self.codewords.iter().flatten().all(|c| !c.is_empty())
    }

    /// Per-symbol codeword lengths, `None` outside the domain.
    pub fn lengths(&self) -> [Option<u8>; MAX_SYMBOLS] {
        self.codewords.map(|c| c.map(Codeword::len))
    }
}

/// The enumeration of every topology id for one alphabet.
#[derive(Debug, Clone)]
pub struct TopologyTable {
    alphabet: Alphabet,
    topologies: Vec<Topology>,
}

static DNA4_TABLE: LazyLock<TopologyTable> =
    LazyLock::new(|| TopologyTable::generate(Alphabet::Dna4));
static DNA5_TABLE: LazyLock<TopologyTable> =
    LazyLock::new(|| TopologyTable::generate(Alphabet::Dna5));

impl TopologyTable {
    /// Build the full table for `alphabet`.
    ///
    /// Families are appended in a fixed order (singles, pairs, triples,
    /// balanced and caterpillar quadruples, then the three five-leaf shapes),
    /// which yields 35 ids for `Dna4` and 165 ids for `Dna5`.
    pub fn generate(alphabet: Alphabet) -> Self {
        let syms = alphabet.symbols();
        let mut topologies = Vec::new();

        for &s in syms {
            topologies.push(Topology::from_patterns(&[s], &[""]));
        }

        for pair in combinations(syms, 2) {
            topologies.push(Topology::from_patterns(&pair, &["1", "0"]));
        }

        for &x in syms {
            let rest = without(syms, &[x]);
            for pair in combinations(&rest, 2) {
                topologies.push(Topology::from_patterns(
                    &[x, pair[0], pair[1]],
                    &["1", "01", "00"],
                ));
            }
        }

        for quad in combinations(syms, 4) {
            topologies.push(Topology::from_patterns(&quad, &["11", "10", "01", "00"]));
        }

        // Caterpillar quadruples: the 001 leaf is always the lowest symbol not
        // already placed, so only the 000 leaf varies.
        for &x in syms {
            for &y in syms.iter().filter(|&&y| y != x) {
                let rest = without(syms, &[x, y]);
                let Some((&z, others)) = rest.split_first() else {
                    continue;
                };
                for &w in others {
                    topologies.push(Topology::from_patterns(
                        &[x, y, z, w],
                        &["1", "01", "001", "000"],
                    ));
                }
            }
        }

        if syms.len() == 5 {
            for &x in syms {
                for &y in syms.iter().filter(|&&y| y != x) {
                    for &z in syms.iter().filter(|&&z| z != x && z != y) {
                        let rest = without(syms, &[x, y, z]);
                        topologies.push(Topology::from_patterns(
                            &[x, y, z, rest[0], rest[1]],
                            &["1", "01", "001", "0001", "0000"],
                        ));
                    }
                }
            }

            let mut triples = combinations(syms, 3);
            triples.sort_by_key(|t| (t[2], t[1], t[0]));
            for tri in triples {
                let rest = without(syms, &tri);
                topologies.push(Topology::from_patterns(
                    &[tri[0], tri[1], tri[2], rest[0], rest[1]],
                    &["11", "10", "01", "001", "000"],
                ));
            }

            for &x in syms {
                let rest = without(syms, &[x]);
                topologies.push(Topology::from_patterns(
                    &[x, rest[0], rest[1], rest[2], rest[3]],
                    &["1", "011", "010", "001", "000"],
                ));
            }
        }

        debug_assert!(topologies.len() <= usize::from(u8::MAX) + 1);
        Self {
            alphabet,
            topologies,
        }
    }

    /// The process-wide table for `alphabet`, generated on first use.
    pub fn shared(alphabet: Alphabet) -> &'static TopologyTable {
        match alphabet {
            Alphabet::Dna4 => &DNA4_TABLE,
            Alphabet::Dna5 => &DNA5_TABLE,
        }
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    pub fn len(&self) -> usize {
        self.topologies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topologies.is_empty()
    }

    #[inline]
    pub fn topology(&self, id: TopologyId) -> Option<&Topology> {
        self.topologies.get(id.index())
    }

    #[inline]
    pub fn codeword(&self, id: TopologyId, sym: Symbol) -> Option<Codeword> {
        self.topology(id)?.codeword(sym)
    }

    pub fn domain(&self, id: TopologyId) -> SymbolSet {
        self.topology(id).map(Topology::domain).unwrap_or_default()
    }

    /// All `(id, topology)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (TopologyId, &Topology)> {
        self.topologies
            .iter()
            .enumerate()
            .map(|(i, t)| (TopologyId(i as u8), t))
    }

    pub fn ids(&self) -> impl Iterator<Item = TopologyId> {
        (0..self.topologies.len()).map(|i| TopologyId(i as u8))
    }

    /// The single-symbol topology for `sym`.
    pub fn single(&self, sym: Symbol) -> Option<TopologyId> {
        self.alphabet
            .contains(sym)
            .then_some(TopologyId(sym.to_index()))
    }

    /// The lowest id with the same domain and per-symbol codeword lengths as
    /// `topology`.
    pub fn find(&self, topology: &Topology) -> Option<TopologyId> {
        let lengths = topology.lengths();
        self.iter()
            .find(|(_, t)| t.lengths() == lengths)
            .map(|(id, _)| id)
    }
}

/// k-element combinations of `items` in lexicographic order.
fn combinations(items: &[Symbol], k: usize) -> Vec<Vec<Symbol>> {
    fn rec(items: &[Symbol], k: usize, acc: &mut Vec<Symbol>, out: &mut Vec<Vec<Symbol>>) {
        if acc.len() == k {
            out.push(acc.clone());
            return;
        }
        for (i, &item) in items.iter().enumerate() {
            acc.push(item);
            rec(&items[i + 1..], k, acc, out);
            acc.pop();
        }
    }
    let mut out = Vec::new();
    rec(items, k, &mut Vec::with_capacity(k), &mut out);
    out
}

fn without(items: &[Symbol], excluded: &[Symbol]) -> Vec<Symbol> {
    items
        .iter()
        .copied()
        .filter(|s| !excluded.contains(s))
        .collect()
}
