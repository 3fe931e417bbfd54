//! Bit costs of runs under a given header width.

use crate::alphabet::{Alphabet, Symbol, SymbolCounts, MAX_SYMBOLS};
use crate::topology::{TopologyId, TopologyTable};

/// Header of a segmented-stream record: 1-byte id + u32 run length.
pub const SEGMENTED_HEADER_BITS: u64 = 40;

/// Header of a split part file: info byte + u64 symbol count.
pub const SPLIT_HEADER_BITS: u64 = 72;

/// Marker for a symbol outside a topology's domain.
pub(crate) const INFEASIBLE: u8 = u8::MAX;

/// Round `bits` up to a whole number of bytes.
#[inline(always)]
pub const fn align8(bits: u64) -> u64 {
    bits.div_ceil(8) * 8
}

/// Prices runs for the planner.
///
/// The cost of a run is `header_bits + align8(data bits)`, so padding is part
/// of every estimate and planned totals match encoded sizes exactly.
#[derive(Debug, Clone)]
pub struct CostModel {
    table: &'static TopologyTable,
    header_bits: u64,
    /// Codeword length per symbol, then per topology id.
    by_symbol: [Vec<u8>; MAX_SYMBOLS],
}

impl CostModel {
    /// Build a model over `table`. A `header_bits` that is not a whole number
    /// of bytes is rounded up.
    pub fn new(table: &'static TopologyTable, header_bits: u64) -> Self {
        debug_assert_eq!(header_bits % 8, 0, "headers are byte aligned");
        let by_symbol = Symbol::ALL.map(|sym| {
            table
                .iter()
                .map(|(_, t)| t.codeword(sym).map_or(INFEASIBLE, |c| c.len()))
                .collect()
        });
        Self {
            table,
            header_bits: align8(header_bits),
            by_symbol,
        }
    }

    /// Model for the segmented stream format.
    pub fn segmented(alphabet: Alphabet) -> Self {
        Self::new(TopologyTable::shared(alphabet), SEGMENTED_HEADER_BITS)
    }

    /// Model for split part files (always four symbols).
    pub fn split() -> Self {
        Self::new(TopologyTable::shared(Alphabet::Dna4), SPLIT_HEADER_BITS)
    }

    pub fn table(&self) -> &'static TopologyTable {
        self.table
    }

    pub fn alphabet(&self) -> Alphabet {
        self.table.alphabet()
    }

    #[inline(always)]
    pub fn header_bits(&self) -> u64 {
        self.header_bits
    }

    #[inline(always)]
    pub fn num_topologies(&self) -> usize {
        self.table.len()
    }

    /// Codeword lengths of `sym` indexed by topology id, `INFEASIBLE` where
    /// the symbol is outside the domain.
    #[inline(always)]
    pub(crate) fn symbol_costs(&self, sym: Symbol) -> &[u8] {
        &self.by_symbol[sym as usize]
    }

    /// Bits `sym` costs under `id`, `None` if it cannot be encoded.
    #[inline]
    pub fn bit_cost(&self, id: TopologyId, sym: Symbol) -> Option<u32> {
        match self.by_symbol[sym as usize].get(id.index()) {
            Some(&len) if len != INFEASIBLE => Some(u32::from(len)),
            _ => None,
        }
    }

    /// Data bits of a run with `counts`, before padding.
    pub fn data_bits(&self, id: TopologyId, counts: &SymbolCounts) -> Option<u64> {
        self.table.topology(id)?.data_bits(counts)
    }

    /// Full cost of one run: header plus padded data.
    pub fn run_cost(&self, id: TopologyId, counts: &SymbolCounts) -> Option<u64> {
        self.data_bits(id, counts)
            .map(|bits| self.header_bits + align8(bits))
    }
}
