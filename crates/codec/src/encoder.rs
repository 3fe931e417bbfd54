//! Bitstream encoder for segmented streams.

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::alphabet::Symbol;
use crate::bits::BitWriter;
use crate::error::{CodecError, Result};
use crate::planner::{Plan, Segment};
use crate::topology::{Topology, TopologyId, TopologyTable};

/// Bytes in a segmented run header: id + big-endian u32 length.
pub const RUN_HEADER_BYTES: usize = 5;

/// Longest run a single record can describe.
pub const MAX_RECORD_LEN: usize = u32::MAX as usize;

/// Pack `symbols` with `topology`'s codewords, padded to a byte boundary.
///
/// `offset` is the position of `symbols[0]` in the full input and is only
/// used for error reporting. Single-symbol topologies produce no bytes.
pub fn pack(topology: &Topology, symbols: &[Symbol], offset: usize) -> Result<Vec<u8>> {
    let mut writer = BitWriter::with_capacity(symbols.len() / 2);
    for (i, &sym) in symbols.iter().enumerate() {
        let code = topology
            .codeword(sym)
            .ok_or(CodecError::InvalidSymbol {
                byte: sym.to_ascii(),
                position: offset + i,
            })?;
        writer.write_codeword(code);
    }
    Ok(writer.finish())
}

fn encode_segment(table: &TopologyTable, symbols: &[Symbol], seg: &Segment) -> Result<Vec<u8>> {
    let topology = table.topology(seg.topology).ok_or_else(|| {
        CodecError::CorruptHeader(format!("unknown topology id {}", seg.topology))
    })?;
    let mut out = Vec::new();
    let mut start = seg.start;
    for chunk in symbols[seg.start..seg.end].chunks(MAX_RECORD_LEN) {
        out.push(seg.topology.0);
        out.extend_from_slice(&(chunk.len() as u32).to_be_bytes());
        out.extend(pack(topology, chunk, start)?);
        start += chunk.len();
    }
    trace!(
        topology = %seg.topology,
        symbols = seg.len(),
        bytes = out.len(),
        "encoded run"
    );
    Ok(out)
}

/// Encode `symbols` following `plan`.
///
/// Segments are encoded independently on the rayon pool and concatenated in
/// plan order.
pub fn encode_plan(table: &TopologyTable, symbols: &[Symbol], plan: &Plan) -> Result<Vec<u8>> {
    if symbols.is_empty() {
        return Err(CodecError::EmptyInput);
    }
    if plan.len() != symbols.len() {
        return Err(CodecError::CorruptHeader(format!(
            "plan covers {} symbols, input has {}",
            plan.len(),
            symbols.len()
        )));
    }
    let parts: Vec<Vec<u8>> = plan
        .segments
        .par_iter()
        .map(|seg| encode_segment(table, symbols, seg))
        .collect::<Result<_>>()?;

    let mut out = Vec::with_capacity(parts.iter().map(Vec::len).sum());
    for part in parts {
        out.extend(part);
    }
    debug!(
        runs = plan.num_runs(),
        symbols = symbols.len(),
        bytes = out.len(),
        "encoded segmented stream"
    );
    Ok(out)
}

/// Encode the whole input as one run under `id`.
pub fn encode_single(table: &TopologyTable, symbols: &[Symbol], id: TopologyId) -> Result<Vec<u8>> {
    let seg = Segment {
        start: 0,
        end: symbols.len(),
        topology: id,
    };
    encode_segment(table, symbols, &seg)
}
