//! Segmentation planner.
//!
//! Finds the partition of a symbol sequence into runs, and one topology per
//! run, that minimizes the encoded size under a [`CostModel`]. Header and
//! padding costs are included, so `Plan::total_bits` is the exact size of the
//! stream the encoder will produce.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, trace};

use crate::alphabet::{count_symbols, Symbol, SymbolCounts, MAX_SYMBOLS};
use crate::cost::{align8, CostModel, INFEASIBLE};
use crate::error::{CodecError, Result};
use crate::topology::TopologyId;

const INF: u64 = u64::MAX;

/// Symbols per rayon task when building prefix counts.
const PREFIX_CHUNK: usize = 1 << 16;

/// A half-open range of the input encoded with one topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
    pub topology: TopologyId,
}

impl Segment {
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Ordered, contiguous segments covering the whole input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub segments: Vec<Segment>,
    /// Exact encoded size; always a multiple of 8.
    pub total_bits: u64,
}

impl Plan {
    pub fn num_runs(&self) -> usize {
        self.segments.len()
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bits / 8
    }

    /// Number of symbols covered.
    pub fn len(&self) -> usize {
        self.segments.last().map_or(0, |s| s.end)
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Fixed-size bitset over (position, topology) pairs.
struct SwitchFlags {
    words: Vec<u64>,
    stride: usize,
}

impl SwitchFlags {
    fn new(len: usize, stride: usize) -> Self {
        Self {
            words: vec![0; (len * stride).div_ceil(64)],
            stride,
        }
    }

    #[inline(always)]
    fn set(&mut self, pos: usize, t: usize) {
        let bit = pos * self.stride + t;
        self.words[bit / 64] |= 1 << (bit % 64);
    }

    #[inline(always)]
    fn get(&self, pos: usize, t: usize) -> bool {
        let bit = pos * self.stride + t;
        self.words[bit / 64] & (1 << (bit % 64)) != 0
    }
}

/// Runs the planning algorithms against a cost model.
#[derive(Debug, Clone, Copy)]
pub struct Planner<'m> {
    model: &'m CostModel,
}

impl<'m> Planner<'m> {
    pub fn new(model: &'m CostModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &'m CostModel {
        self.model
    }

    /// Optimal plan in O(L·T) time.
    ///
    /// Keeps one rolling cost row plus a switched bit per (position,
    /// topology) and the best topology per position for backtracking.
    pub fn plan(&self, symbols: &[Symbol]) -> Result<Plan> {
        if symbols.is_empty() {
            return Err(CodecError::EmptyInput);
        }
        let n_topo = self.model.num_topologies();
        let header = self.model.header_bits();

        let mut prev = vec![INF; n_topo];
        let mut cur = vec![INF; n_topo];
        let mut switched = SwitchFlags::new(symbols.len(), n_topo);
        let mut best_at = Vec::with_capacity(symbols.len());
        let mut best_prev = 0u64;

        for (i, &sym) in symbols.iter().enumerate() {
            let switch = if i == 0 {
                header
            } else {
                align8(best_prev) + header
            };
            let bits = self.model.symbol_costs(sym);
            let mut best = INF;
            let mut best_t = 0usize;
            for t in 0..n_topo {
                let bit = bits[t];
                if bit == INFEASIBLE {
                    cur[t] = INF;
                    continue;
                }
                let base = if prev[t] <= switch {
                    prev[t]
                } else {
                    switched.set(i, t);
                    switch
                };
                let c = base + u64::from(bit);
                cur[t] = c;
                if c < best {
                    best = c;
                    best_t = t;
                }
            }
            if best == INF {
                return Err(invalid(sym, i));
            }
            best_at.push(best_t as u8);
            best_prev = best;
            std::mem::swap(&mut prev, &mut cur);
        }

        let mut starts = Vec::new();
        let mut t = usize::from(best_at[symbols.len() - 1]);
        for i in (0..symbols.len()).rev() {
            if switched.get(i, t) {
                starts.push((i, t));
                if i > 0 {
                    t = usize::from(best_at[i - 1]);
                }
            }
        }
        starts.reverse();

        let plan = Plan {
            segments: segments_from_starts(&starts, symbols.len()),
            total_bits: align8(best_prev),
        };
        log_plan("streaming", &plan);
        Ok(plan)
    }

    /// Optimal plan in O(L·T²) time.
    ///
    /// The DP itself is per symbol: each cell takes an explicit minimum over
    /// every predecessor topology and records the chosen one. Prefix counts
    /// are only used afterwards, pricing each backtracked run in O(1) per
    /// topology to produce `total_bits` independently of the DP rows.
    pub fn plan_batch(&self, symbols: &[Symbol]) -> Result<Plan> {
        if symbols.is_empty() {
            return Err(CodecError::EmptyInput);
        }
        let n_topo = self.model.num_topologies();
        let header = self.model.header_bits();
        let prefix = prefix_counts(symbols);

        let mut prev = vec![INF; n_topo];
        let mut cur = vec![INF; n_topo];
        // Predecessor topology per cell; a cell equal to its own topology
        // continues the run, anything else starts one.
        const START: u8 = u8::MAX;
        let mut from = vec![START; symbols.len() * n_topo];

        for (i, &sym) in symbols.iter().enumerate() {
            let bits = self.model.symbol_costs(sym);
            for t in 0..n_topo {
                let bit = bits[t];
                if bit == INFEASIBLE {
                    cur[t] = INF;
                    continue;
                }
                let mut pred = START;
                let mut base = if i == 0 { header } else { INF };
                if i > 0 {
                    for (p, &c) in prev.iter().enumerate() {
                        if c == INF {
                            continue;
                        }
                        let cand = if p == t { c } else { align8(c) + header };
                        // Ties keep the continuing run, then the smallest id.
                        if cand < base || (cand == base && p == t) {
                            base = cand;
                            pred = p as u8;
                        }
                    }
                }
                cur[t] = base + u64::from(bit);
                from[i * n_topo + t] = pred;
            }
            if cur.iter().all(|&c| c == INF) {
                return Err(invalid(sym, i));
            }
            std::mem::swap(&mut prev, &mut cur);
        }

        let mut t = argmin(&prev);
        let mut starts = Vec::new();
        for i in (0..symbols.len()).rev() {
            let pred = from[i * n_topo + t];
            if usize::from(pred) != t {
                starts.push((i, t));
                if i > 0 {
                    t = usize::from(pred);
                }
            }
        }
        starts.reverse();

        let segments = segments_from_starts(&starts, symbols.len());
        let mut total_bits = 0u64;
        for seg in &segments {
            let counts = range_counts(&prefix, seg.start, seg.end);
            total_bits += self
                .model
                .run_cost(seg.topology, &counts)
                .ok_or_else(|| invalid(symbols[seg.start], seg.start))?;
        }
        debug_assert_eq!(total_bits, align8(prev[argmin(&prev)]));

        let plan = Plan {
            segments,
            total_bits,
        };
        log_plan("batch", &plan);
        Ok(plan)
    }

    /// Best plan with exactly one run.
    pub fn plan_single(&self, symbols: &[Symbol]) -> Result<Plan> {
        if symbols.is_empty() {
            return Err(CodecError::EmptyInput);
        }
        let counts = count_symbols(symbols);
        let best = self
            .model
            .table()
            .ids()
            .filter_map(|id| self.model.run_cost(id, &counts).map(|c| (c, id)))
            .min();
        let Some((total_bits, topology)) = best else {
            let position = symbols
                .iter()
                .position(|&s| !self.model.alphabet().contains(s))
                .unwrap_or(0);
            return Err(invalid(symbols[position], position));
        };
        let plan = Plan {
            segments: vec![Segment {
                start: 0,
                end: symbols.len(),
                topology,
            }],
            total_bits,
        };
        log_plan("single", &plan);
        Ok(plan)
    }
}

fn invalid(sym: Symbol, position: usize) -> CodecError {
    CodecError::InvalidSymbol {
        byte: sym.to_ascii(),
        position,
    }
}

/// Smallest id among the minimal entries of `row`.
fn argmin(row: &[u64]) -> usize {
    let mut best = 0;
    for (t, &c) in row.iter().enumerate() {
        if c < row[best] {
            best = t;
        }
    }
    best
}

fn segments_from_starts(starts: &[(usize, usize)], len: usize) -> Vec<Segment> {
    starts
        .iter()
        .enumerate()
        .map(|(k, &(start, t))| Segment {
            start,
            end: starts.get(k + 1).map_or(len, |&(next, _)| next),
            topology: TopologyId(t as u8),
        })
        .collect()
}

fn log_plan(kind: &str, plan: &Plan) {
    debug!(
        planner = kind,
        runs = plan.num_runs(),
        total_bits = plan.total_bits,
        "plan complete"
    );
    for seg in &plan.segments {
        trace!(start = seg.start, end = seg.end, topology = %seg.topology, "run");
    }
}

/// Inclusive prefix counts: entry `i` covers `symbols[..i]`.
pub fn prefix_counts(symbols: &[Symbol]) -> Vec<SymbolCounts> {
    let chunk_totals: Vec<SymbolCounts> = symbols
        .par_chunks(PREFIX_CHUNK)
        .map(count_symbols)
        .collect();

    let mut offsets = Vec::with_capacity(chunk_totals.len());
    let mut running = [0u64; MAX_SYMBOLS];
    for total in &chunk_totals {
        offsets.push(running);
        for (r, t) in running.iter_mut().zip(total) {
            *r += t;
        }
    }

    let mut prefix = vec![[0u64; MAX_SYMBOLS]; symbols.len() + 1];
    prefix[1..]
        .par_chunks_mut(PREFIX_CHUNK)
        .zip(symbols.par_chunks(PREFIX_CHUNK))
        .zip(offsets.par_iter())
        .for_each(|((out, chunk), offset)| {
            let mut acc = *offset;
            for (slot, &sym) in out.iter_mut().zip(chunk) {
                acc[sym as usize] += 1;
                *slot = acc;
            }
        });
    prefix
}

/// Counts of `symbols[start..end]` from a prefix table.
#[inline]
pub fn range_counts(prefix: &[SymbolCounts], start: usize, end: usize) -> SymbolCounts {
    let mut out = [0u64; MAX_SYMBOLS];
    for (k, slot) in out.iter_mut().enumerate() {
        *slot = prefix[end][k] - prefix[start][k];
    }
    out
}
