//! Bitstream decoder for segmented streams.

use serde::Serialize;
use tracing::{debug, trace};

use crate::alphabet::Symbol;
use crate::bits::BitReader;
use crate::encoder::RUN_HEADER_BYTES;
use crate::error::{CodecError, Result};
use crate::topology::{DecodeTree, Node, Topology, TopologyId, TopologyTable};

/// One record of a segmented stream, as found by [`inspect_stream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunRecord {
    /// Byte offset of the record header.
    pub offset: usize,
    pub topology: TopologyId,
    pub length: u32,
    pub data_bytes: usize,
}

/// Decode `count` symbols of `topology` from `data`, appending to `out`.
///
/// Returns the number of bytes consumed, including pad bits. `base` is the
/// absolute offset of `data` and only feeds error messages.
pub fn unpack(
    topology: &Topology,
    data: &[u8],
    count: u64,
    base: usize,
    out: &mut Vec<Symbol>,
) -> Result<usize> {
    if let Some(sym) = topology.single_symbol() {
        out.extend(std::iter::repeat(sym).take(count as usize));
        return Ok(0);
    }

    let tree = topology.decode_tree();
    let mut reader = BitReader::new(data);
    let mut remaining = count;
    let mut at = DecodeTree::ROOT;
    while remaining > 0 {
        let bit = reader.read_bit().ok_or_else(|| {
            CodecError::truncated(
                base + data.len(),
                format!("run ended with {remaining} of {count} symbols undecoded"),
            )
        })?;
        at = tree.step(at, bit).ok_or_else(|| {
            CodecError::CorruptHeader(format!(
                "bit pattern near byte {} has no codeword",
                base + reader.bytes_consumed()
            ))
        })?;
        if let Node::Leaf(sym) = tree.node(at) {
            out.push(sym);
            remaining -= 1;
            at = DecodeTree::ROOT;
        }
    }
    reader.align();
    Ok(reader.bytes_consumed())
}

/// Walk every record, handing each to `visit` after its symbols are decoded.
fn walk<F>(table: &TopologyTable, bytes: &[u8], mut visit: F) -> Result<Vec<Symbol>>
where
    F: FnMut(RunRecord),
{
    let mut out = Vec::with_capacity(bytes.len() * 3);
    let mut pos = 0;
    while pos < bytes.len() {
        let Some(header) = bytes.get(pos..pos + RUN_HEADER_BYTES) else {
            return Err(CodecError::truncated(
                pos,
                format!("partial run header ({} bytes)", bytes.len() - pos),
            ));
        };
        let id = TopologyId(header[0]);
        let length = u32::from_be_bytes([header[1], header[2], header[3], header[4]]);
        let topology = table.topology(id).ok_or_else(|| {
            CodecError::CorruptHeader(format!(
                "topology id {id} at byte {pos} is outside the {}-entry {} table",
                table.len(),
                table.alphabet()
            ))
        })?;
        if length == 0 {
            return Err(CodecError::CorruptHeader(format!(
                "zero-length run at byte {pos}"
            )));
        }

        let data_start = pos + RUN_HEADER_BYTES;
        let data_bytes = unpack(
            topology,
            &bytes[data_start..],
            u64::from(length),
            data_start,
            &mut out,
        )?;
        trace!(offset = pos, topology = %id, length, data_bytes, "decoded run");
        visit(RunRecord {
            offset: pos,
            topology: id,
            length,
            data_bytes,
        });
        pos = data_start + data_bytes;
    }
    Ok(out)
}

/// Decode a complete segmented stream.
pub fn decode_stream(table: &TopologyTable, bytes: &[u8]) -> Result<Vec<Symbol>> {
    if bytes.is_empty() {
        return Err(CodecError::EmptyInput);
    }
    let mut runs = 0usize;
    let out = walk(table, bytes, |_| runs += 1)?;
    debug!(runs, symbols = out.len(), bytes = bytes.len(), "decoded segmented stream");
    Ok(out)
}

/// List the records of a segmented stream. The stream is fully decoded, so
/// any corruption is reported the same way as by [`decode_stream`].
pub fn inspect_stream(table: &TopologyTable, bytes: &[u8]) -> Result<Vec<RunRecord>> {
    if bytes.is_empty() {
        return Err(CodecError::EmptyInput);
    }
    let mut records = Vec::new();
    walk(table, bytes, |r| records.push(r))?;
    Ok(records)
}
