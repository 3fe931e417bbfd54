//! Whole-file single-tree format: `[info u8][count u64 BE][data]`.
//!
//! The info byte stores the number of distinct symbols in bits 7-6
//! (`01`=1, `10`=2, `11`=3, `00`=4) followed by up to three ranked 2-bit
//! symbol ids. Rank `k` gets codeword `0^k 1`, the last rank all zeros; a
//! fourth symbol is implied by the other three. The byte `0x00` is reserved
//! for the balanced code `A=00 C=01 G=10 T=11`.

use tracing::debug;

use crate::alphabet::{count_symbols, to_ascii, Alphabet, Symbol, SymbolCounts};
use crate::decoder::unpack;
use crate::encoder::pack;
use crate::error::{CodecError, Result};
use crate::huffman::{code_lengths, rank_symbols, BALANCED_DNA4};
use crate::topology::{Codeword, Topology};
use crate::traits::Codec;

/// Bytes before the packed data: info byte + u64 count.
pub const INFO_HEADER_BYTES: usize = 9;

const RANK_CODES: [&[&str]; 4] = [
    &[""],
    &["1", "0"],
    &["1", "01", "00"],
    &["1", "01", "001", "000"],
];

/// Decoded form of the info byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoByte {
    /// Four symbols with two-bit codes in canonical order.
    Balanced,
    /// One to four symbols, most frequent first.
    Ranked(Vec<Symbol>),
}

impl InfoByte {
    /// Info byte for the Huffman code of `counts`. `None` if the counts are
    /// empty or include `N`.
    pub fn from_counts(counts: &SymbolCounts) -> Option<Self> {
        if counts[Symbol::N as usize] > 0 {
            return None;
        }
        let ranked = rank_symbols(counts);
        if ranked.is_empty() {
            return None;
        }
        let balanced = ranked.len() == 4
            && code_lengths(counts).iter().flatten().all(|&len| len == 2);
        Some(if balanced {
            Self::Balanced
        } else {
            Self::Ranked(ranked)
        })
    }

    /// Info byte whose code has the same per-symbol lengths as `topology`.
    ///
    /// Works for every four-symbol table entry; `None` for codes that use
    /// `N` or have no rank-code equivalent.
    pub fn from_topology(topology: &Topology) -> Option<Self> {
        let domain = topology.domain();
        if domain.is_empty() || domain.contains(Symbol::N) {
            return None;
        }
        let lengths = topology.lengths();
        let mut ranked: Vec<Symbol> = domain.iter().collect();
        ranked.sort_by_key(|&s| (lengths[s as usize], s));

        let info = if ranked.len() == 4 && ranked.iter().all(|&s| lengths[s as usize] == Some(2)) {
            Self::Balanced
        } else {
            Self::Ranked(ranked)
        };
        (info.to_topology().lengths() == lengths).then_some(info)
    }

    /// Parse an info byte.
    pub fn from_byte(byte: u8) -> Result<Self> {
        if byte == 0 {
            return Ok(Self::Balanced);
        }
        let unique = match byte >> 6 {
            0 => 4,
            n => usize::from(n),
        };
        let stored = unique.min(3);
        let mut ranked = Vec::with_capacity(unique);
        for k in 0..3 {
            let field = (byte >> (4 - 2 * k)) & 0b11;
            if k < stored {
                let sym = Symbol::from_index(field).ok_or_else(|| corrupt(byte))?;
                if ranked.contains(&sym) {
                    return Err(corrupt(byte));
                }
                ranked.push(sym);
            } else if field != 0 {
                return Err(corrupt(byte));
            }
        }
        if unique == 4 {
            let missing = Alphabet::Dna4
                .symbols()
                .iter()
                .copied()
                .find(|s| !ranked.contains(s))
                .ok_or_else(|| corrupt(byte))?;
            ranked.push(missing);
        }
        Ok(Self::Ranked(ranked))
    }

    pub fn to_byte(&self) -> u8 {
        match self {
            Self::Balanced => 0,
            Self::Ranked(ranked) => {
                let unique = (ranked.len() & 0b11) as u8;
                let mut byte = unique << 6;
                for (k, sym) in ranked.iter().take(3).enumerate() {
                    byte |= sym.to_index() << (4 - 2 * k);
                }
                byte
            }
        }
    }

    pub fn to_topology(&self) -> Topology {
        match self {
            Self::Balanced => Topology::from_codewords(
                BALANCED_DNA4
                    .iter()
                    .filter_map(|&(s, p)| Codeword::parse(p).map(|c| (s, c))),
            ),
            Self::Ranked(ranked) => {
                let codes = RANK_CODES[ranked.len().clamp(1, 4) - 1];
                Topology::from_codewords(
                    ranked
                        .iter()
                        .zip(codes.iter())
                        .filter_map(|(&s, p)| Codeword::parse(p).map(|c| (s, c))),
                )
            }
        }
    }
}

fn corrupt(byte: u8) -> CodecError {
    CodecError::CorruptHeader(format!("invalid info byte {byte:#04x}"))
}

/// Write one single-tree file for `symbols` using `info`'s code.
///
/// `offset` locates `symbols[0]` in the full input for error reporting.
pub fn encode_with(info: &InfoByte, symbols: &[Symbol], offset: usize) -> Result<Vec<u8>> {
    if symbols.is_empty() {
        return Err(CodecError::EmptyInput);
    }
    let topology = info.to_topology();
    let data = pack(&topology, symbols, offset)?;
    let mut out = Vec::with_capacity(INFO_HEADER_BYTES + data.len());
    out.push(info.to_byte());
    out.extend_from_slice(&(symbols.len() as u64).to_be_bytes());
    out.extend(data);
    Ok(out)
}

/// Encode `symbols` with their own Huffman code.
pub fn encode_symbols(symbols: &[Symbol]) -> Result<Vec<u8>> {
    if let Some(position) = symbols.iter().position(|&s| !Alphabet::Dna4.contains(s)) {
        return Err(CodecError::InvalidSymbol {
            byte: symbols[position].to_ascii(),
            position,
        });
    }
    let info = InfoByte::from_counts(&count_symbols(symbols)).ok_or(CodecError::EmptyInput)?;
    encode_with(&info, symbols, 0)
}

/// Decode one single-tree file. `base` is its offset for error messages.
pub fn decode_symbols_at(bytes: &[u8], base: usize) -> Result<Vec<Symbol>> {
    let Some(header) = bytes.get(..INFO_HEADER_BYTES) else {
        return Err(CodecError::truncated(
            base,
            format!("single-tree header needs {INFO_HEADER_BYTES} bytes, found {}", bytes.len()),
        ));
    };
    let info = InfoByte::from_byte(header[0])?;
    let mut count_bytes = [0u8; 8];
    count_bytes.copy_from_slice(&header[1..]);
    let count = u64::from_be_bytes(count_bytes);
    if count == 0 {
        return Err(CodecError::CorruptHeader("symbol count is zero".into()));
    }

    let topology = info.to_topology();
    let data = &bytes[INFO_HEADER_BYTES..];
    let mut out = Vec::with_capacity(usize::try_from(count).unwrap_or(0).min(data.len() * 8 + 1));
    let used = unpack(&topology, data, count, base + INFO_HEADER_BYTES, &mut out)?;
    if used != data.len() {
        return Err(CodecError::CorruptHeader(format!(
            "{} trailing bytes after {count} symbols",
            data.len() - used
        )));
    }
    Ok(out)
}

pub fn decode_symbols(bytes: &[u8]) -> Result<Vec<Symbol>> {
    decode_symbols_at(bytes, 0)
}

/// Strategy: one Huffman tree over the whole four-symbol input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SingleTree;

impl Codec for SingleTree {
    fn encode(&self, seq: &[u8]) -> Result<Vec<u8>> {
        let symbols = Alphabet::Dna4.parse(seq)?;
        let out = encode_symbols(&symbols)?;
        debug!(input = seq.len(), output = out.len(), info = out[0], "single-tree encode");
        Ok(out)
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        if data.is_empty() {
            return Err(CodecError::EmptyInput);
        }
        Ok(to_ascii(&decode_symbols(data)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::TopologyTable;
    use proptest::prelude::*;
    use Symbol::*;

    #[test]
    fn test_balanced_acgt_file() {
        let encoded = SingleTree.encode(b"AAAACCCCGGGGTTTT").unwrap();
        assert_eq!(encoded[0], 0x00);
        assert_eq!(&encoded[1..9], &16u64.to_be_bytes());
        assert_eq!(&encoded[9..], &[0x00, 0x55, 0xAA, 0xFF]);
        assert_eq!(SingleTree.decode(&encoded).unwrap(), b"AAAACCCCGGGGTTTT");
    }

    #[test]
    fn test_single_symbol_file_has_no_data() {
        let encoded = SingleTree.encode(b"TTTTTTT").unwrap();
        assert_eq!(encoded.len(), INFO_HEADER_BYTES);
        assert_eq!(encoded[0], 0b01_11_00_00);
        assert_eq!(SingleTree.decode(&encoded).unwrap(), b"TTTTTTT");
    }

    #[test]
    fn test_info_byte_layout() {
        let info = InfoByte::Ranked(vec![G, T, C, A]);
        assert_eq!(info.to_byte(), 0b00_10_11_01);
        assert_eq!(InfoByte::from_byte(0b00_10_11_01).unwrap(), info);

        let info = InfoByte::Ranked(vec![C, A]);
        assert_eq!(info.to_byte(), 0b10_01_00_00);
        assert_eq!(InfoByte::from_byte(info.to_byte()).unwrap(), info);

        assert_eq!(InfoByte::from_byte(0).unwrap(), InfoByte::Balanced);
    }

    #[test]
    fn test_info_byte_rejects_repeats() {
        assert!(matches!(
            InfoByte::from_byte(0b11_01_01_00),
            Err(CodecError::CorruptHeader(_))
        ));
        assert!(matches!(
            InfoByte::from_byte(0b00_10_10_01),
            Err(CodecError::CorruptHeader(_))
        ));
        // Unused fields must be zero.
        assert!(matches!(
            InfoByte::from_byte(0b01_00_00_11),
            Err(CodecError::CorruptHeader(_))
        ));
    }

    #[test]
    fn test_ranked_codes() {
        let topo = InfoByte::Ranked(vec![G, T, C, A]).to_topology();
        assert_eq!(topo.codeword(G).unwrap().to_string(), "1");
        assert_eq!(topo.codeword(T).unwrap().to_string(), "01");
        assert_eq!(topo.codeword(C).unwrap().to_string(), "001");
        assert_eq!(topo.codeword(A).unwrap().to_string(), "000");
    }

    #[test]
    fn test_skewed_file() {
        let text = b"GGGGGGGGGGTTTTTCCA";
        let encoded = SingleTree.encode(text).unwrap();
        assert_eq!(InfoByte::from_byte(encoded[0]).unwrap(), InfoByte::Ranked(vec![G, T, C, A]));
        // 10*1 + 5*2 + 2*3 + 1*3 = 29 bits -> 4 bytes
        assert_eq!(encoded.len(), INFO_HEADER_BYTES + 4);
        assert_eq!(SingleTree.decode(&encoded).unwrap(), text);
    }

    #[test]
    fn test_from_topology_covers_dna4_table() {
        let table = TopologyTable::shared(Alphabet::Dna4);
        for (id, topo) in table.iter() {
            let info = InfoByte::from_topology(topo)
                .unwrap_or_else(|| panic!("no info byte for topology {id}"));
            assert_eq!(info.to_topology().lengths(), topo.lengths(), "topology {id}");
            assert_eq!(InfoByte::from_byte(info.to_byte()).unwrap(), info);
        }
        let dna5 = TopologyTable::shared(Alphabet::Dna5);
        assert!(InfoByte::from_topology(dna5.topology(crate::TopologyId(164)).unwrap()).is_none());
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            decode_symbols(&[0, 0, 0]),
            Err(CodecError::TruncatedStream { offset: 0, .. })
        ));
        let mut zero = vec![0u8];
        zero.extend_from_slice(&0u64.to_be_bytes());
        assert!(matches!(decode_symbols(&zero), Err(CodecError::CorruptHeader(_))));

        let mut encoded = SingleTree.encode(b"ACGTTGCAACGT").unwrap();
        encoded.pop();
        assert!(matches!(
            decode_symbols(&encoded),
            Err(CodecError::TruncatedStream { .. })
        ));
    }

    #[test]
    fn test_rejects_n() {
        assert!(matches!(
            SingleTree.encode(b"ACGN"),
            Err(CodecError::InvalidSymbol { byte: b'N', position: 3 })
        ));
    }

    proptest! {
        #[test]
        fn prop_round_trip(input in prop::collection::vec(prop::sample::select(b"ACGT".to_vec()), 1..400)) {
            let encoded = SingleTree.encode(&input).unwrap();
            prop_assert_eq!(SingleTree.decode(&encoded).unwrap(), input);
        }

        #[test]
        fn prop_size_matches_huffman(input in prop::collection::vec(prop::sample::select(b"AACGT".to_vec()), 1..400)) {
            let symbols = Alphabet::Dna4.parse(&input).unwrap();
            let counts = count_symbols(&symbols);
            let bits = crate::huffman::build_topology(&counts).unwrap().data_bits(&counts).unwrap();
            let encoded = SingleTree.encode(&input).unwrap();
            prop_assert_eq!(encoded.len() as u64, INFO_HEADER_BYTES as u64 + bits.div_ceil(8));
        }
    }
}
