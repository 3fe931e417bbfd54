use rayon::prelude::*;
use tracing::debug;

use crate::alphabet::Symbol;
use crate::cost::CostModel;
use crate::error::{CodecError, Result};
use crate::planner::{Plan, Planner};
use crate::strategies::single_tree::{decode_symbols_at, encode_with, InfoByte};

/// Output of [`split_symbols`]: the plan and one single-tree file per segment.
#[derive(Debug, Clone)]
pub struct SplitOutput {
    pub plan: Plan,
    pub parts: Vec<Vec<u8>>,
}

impl SplitOutput {
    pub fn total_bytes(&self) -> usize {
        self.parts.iter().map(Vec::len).sum()
    }
}

/// Plan `symbols` with the part-file cost model and encode every segment as
/// its own single-tree file.
pub fn split_symbols(symbols: &[Symbol]) -> Result<SplitOutput> {
    let model = CostModel::split();
    let plan = Planner::new(&model).plan(symbols)?;
    let table = model.table();

    let parts = plan
        .segments
        .par_iter()
        .map(|seg| {
            let info = table
                .topology(seg.topology)
                .and_then(InfoByte::from_topology)
                .ok_or_else(|| {
                    CodecError::CorruptHeader(format!(
                        "topology {} has no single-tree form",
                        seg.topology
                    ))
                })?;
            encode_with(&info, &symbols[seg.start..seg.end], seg.start)
        })
        .collect::<Result<Vec<_>>>()?;

    let out = SplitOutput { plan, parts };
    debug!(
        parts = out.parts.len(),
        bytes = out.total_bytes(),
        planned_bits = out.plan.total_bits,
        "split encode"
    );
    Ok(out)
}

/// Decode part files in order and concatenate their symbols.
pub fn merge_parts<P: AsRef<[u8]> + Sync>(parts: &[P]) -> Result<Vec<Symbol>> {
    if parts.is_empty() {
        return Err(CodecError::EmptyInput);
    }
    let decoded = parts
        .par_iter()
        .map(|part| decode_symbols_at(part.as_ref(), 0))
        .collect::<Result<Vec<_>>>()?;

    let mut out = Vec::with_capacity(decoded.iter().map(Vec::len).sum());
    for chunk in decoded {
        out.extend(chunk);
    }
    debug!(parts = parts.len(), symbols = out.len(), "merged parts");
    Ok(out)
}
