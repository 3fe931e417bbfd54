//! Single-tree Huffman code construction.
//!
//! Builds one prefix code for a whole input from its symbol counts. Every
//! four-symbol result has a counterpart of equal cost in the `Dna4` topology
//! table. The `Dna5` table lacks some four-leaf shapes, e.g. `1,01,001,000`
//! over `{A,G,T,N}`.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::alphabet::{Symbol, SymbolCounts, MAX_SYMBOLS};
use crate::topology::{Codeword, Topology};

/// Huffman tree node used during construction. Leaves occupy the first
/// slots of the arena, merged nodes follow.
#[derive(Debug, Clone, Copy)]
enum HuffNode {
    Leaf(Symbol),
    Merge(usize, usize),
}

/// Optimal code length per symbol; `None` for symbols with a zero count.
///
/// A lone symbol gets length 0. Ties in the heap are broken by the smallest
/// symbol in each subtree, which keeps the result deterministic.
pub fn code_lengths(counts: &SymbolCounts) -> [Option<u8>; MAX_SYMBOLS] {
    let mut lengths = [None; MAX_SYMBOLS];
    let mut arena = Vec::with_capacity(2 * MAX_SYMBOLS);
    let mut heap = BinaryHeap::new();

    for sym in Symbol::ALL {
        let count = counts[sym as usize];
        if count > 0 {
            heap.push(Reverse((count, sym, arena.len())));
            arena.push(HuffNode::Leaf(sym));
        }
    }

    match heap.len() {
        0 => return lengths,
        1 => {
            if let Some(HuffNode::Leaf(sym)) = arena.first() {
                lengths[*sym as usize] = Some(0);
            }
            return lengths;
        }
        _ => {}
    }

    while heap.len() > 1 {
        let (Some(Reverse((c1, s1, n1))), Some(Reverse((c2, s2, n2)))) = (heap.pop(), heap.pop())
        else {
            break;
        };
        heap.push(Reverse((c1 + c2, s1.min(s2), arena.len())));
        arena.push(HuffNode::Merge(n1, n2));
    }

    let Some(Reverse((_, _, root))) = heap.pop() else {
        return lengths;
    };
    let mut stack = vec![(root, 0u8)];
    while let Some((node, depth)) = stack.pop() {
        match arena[node] {
            HuffNode::Leaf(sym) => lengths[sym as usize] = Some(depth),
            HuffNode::Merge(a, b) => {
                stack.push((a, depth + 1));
                stack.push((b, depth + 1));
            }
        }
    }
    lengths
}

/// Symbols present in `counts`, most frequent first, ties in canonical order.
pub fn rank_symbols(counts: &SymbolCounts) -> Vec<Symbol> {
    let mut ranked: Vec<Symbol> = Symbol::ALL
        .into_iter()
        .filter(|&s| counts[s as usize] > 0)
        .collect();
    ranked.sort_by_key(|&s| (Reverse(counts[s as usize]), s));
    ranked
}

/// The balanced code used when all four nucleotides share length 2.
pub const BALANCED_DNA4: [(Symbol, &str); 4] = [
    (Symbol::A, "00"),
    (Symbol::C, "01"),
    (Symbol::G, "10"),
    (Symbol::T, "11"),
];

/// Build the single-tree topology for `counts`, or `None` if every count is
/// zero.
///
/// Symbols are ranked by count and take the Huffman lengths in ascending
/// order. Codewords are the bitwise complement of the canonical code, giving
/// `1, 01, 001, 000` for a skewed four-symbol tree. Four balanced nucleotides
/// use [`BALANCED_DNA4`].
pub fn build_topology(counts: &SymbolCounts) -> Option<Topology> {
    let ranked = rank_symbols(counts);
    let mut lens: Vec<u8> = code_lengths(counts).into_iter().flatten().collect();
    lens.sort_unstable();

    match ranked.len() {
        0 => None,
        1 => Some(Topology::from_codewords([(ranked[0], Codeword::EMPTY)])),
        4 if lens.iter().all(|&l| l == 2) && !ranked.contains(&Symbol::N) => {
            Some(Topology::from_codewords(BALANCED_DNA4.iter().filter_map(
                |&(s, p)| Codeword::parse(p).map(|c| (s, c)),
            )))
        }
        _ => {
            let mut assignments = Vec::with_capacity(ranked.len());
            let mut code = 0u8;
            let mut prev_len = lens[0];
            for (i, (&sym, &len)) in ranked.iter().zip(&lens).enumerate() {
                if i > 0 {
                    code = (code + 1) << (len - prev_len);
                }
                prev_len = len;
                let mask = (1u8 << len) - 1;
                assignments.push((sym, Codeword::new(!code & mask, len)));
            }
            Some(Topology::from_codewords(assignments))
        }
    }
}
