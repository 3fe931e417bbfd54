//! Segmented prefix-code compression for nucleotide sequences.
//!
//! Inputs over `ACGT` or `ACGTN` are split into runs, each coded with the
//! cheapest entry of a fixed table of prefix-free codes ("topologies").
//! A dynamic-programming planner picks the runs so the switch cost of every
//! new header is paid only when it saves space.

pub mod alphabet;
pub mod bits;
pub mod cost;
pub mod decoder;
pub mod encoder;
mod error;
pub mod files;
pub mod huffman;
pub mod planner;
pub mod strategies;
pub mod topology;
mod traits;

pub use alphabet::{Alphabet, Symbol, SymbolSet};
pub use cost::CostModel;
pub use error::CodecError as Error;
pub use error::{CodecError, Result};
pub use planner::{Plan, Planner, Segment};
pub use strategies::{InfoByte, Segmented, SingleTree};
pub use topology::{Codeword, Topology, TopologyId, TopologyTable};
pub use traits::Codec;

use serde::{Deserialize, Serialize};

/// On-disk formats for a single compressed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    /// Run records `[id][u32 length][data]` chosen by the planner.
    Segmented,
    /// One Huffman tree for the whole (four-symbol) file.
    SingleTree,
}

impl Default for Format {
    fn default() -> Self {
        Self::Segmented
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Segmented => write!(f, "segmented"),
            Self::SingleTree => write!(f, "single-tree"),
        }
    }
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "segmented" => Ok(Self::Segmented),
            "single-tree" | "huffman" => Ok(Self::SingleTree),
            _ => Err(format!(
                "Unknown format: {s}. Available: segmented, single-tree"
            )),
        }
    }
}

/// A fully specified codec: format, alphabet and planning mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CodecOptions {
    pub format: Format,
    pub alphabet: Alphabet,
    /// Force one run per file (segmented format only).
    pub single_run: bool,
}

impl CodecOptions {
    pub fn new(format: Format, alphabet: Alphabet) -> Self {
        Self {
            format,
            alphabet,
            single_run: false,
        }
    }

    fn segmented(&self) -> Segmented {
        Segmented {
            alphabet: self.alphabet,
            single_run: self.single_run,
        }
    }

    /// Encode using the selected format.
    pub fn encode(&self, seq: &[u8]) -> Result<Vec<u8>> {
        match self.format {
            Format::Segmented => self.segmented().encode(seq),
            Format::SingleTree => SingleTree.encode(seq),
        }
    }

    /// Decode using the selected format.
    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self.format {
            Format::Segmented => self.segmented().decode(data),
            Format::SingleTree => SingleTree.decode(data),
        }
    }
}

impl Codec for CodecOptions {
    fn encode(&self, seq: &[u8]) -> Result<Vec<u8>> {
        CodecOptions::encode(self, seq)
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        CodecOptions::decode(self, data)
    }
}
