use tracing::debug;

use crate::alphabet::{to_ascii, Alphabet, Symbol};
use crate::cost::CostModel;
use crate::decoder::decode_stream;
use crate::encoder::encode_plan;
use crate::error::CodecError;
use crate::planner::{Plan, Planner};
use crate::topology::TopologyTable;
use crate::traits::Codec;

/// Strategy: segmented stream of `[id][u32 length][data]` records.
///
/// The planner picks the runs and topologies; with `single_run` set the
/// whole input is forced into one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segmented {
    pub alphabet: Alphabet,
    pub single_run: bool,
}

impl Segmented {
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            single_run: false,
        }
    }

    pub fn single_run(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            single_run: true,
        }
    }

    pub fn table(&self) -> &'static TopologyTable {
        TopologyTable::shared(self.alphabet)
    }

    pub fn plan(&self, symbols: &[Symbol]) -> Result<Plan, CodecError> {
        let model = CostModel::segmented(self.alphabet);
        let planner = Planner::new(&model);
        if self.single_run {
            planner.plan_single(symbols)
        } else {
            planner.plan(symbols)
        }
    }

    /// Plan and encode already-parsed symbols.
    pub fn encode_symbols(&self, symbols: &[Symbol]) -> Result<(Plan, Vec<u8>), CodecError> {
        let plan = self.plan(symbols)?;
        let bytes = encode_plan(self.table(), symbols, &plan)?;
        debug_assert_eq!(plan.total_bits, 8 * bytes.len() as u64);
        Ok((plan, bytes))
    }

    pub fn decode_symbols(&self, data: &[u8]) -> Result<Vec<Symbol>, CodecError> {
        decode_stream(self.table(), data)
    }
}

impl Default for Segmented {
    fn default() -> Self {
        Self::new(Alphabet::default())
    }
}

impl Codec for Segmented {
    fn encode(&self, seq: &[u8]) -> Result<Vec<u8>, CodecError> {
        let symbols = self.alphabet.parse(seq)?;
        let (plan, bytes) = self.encode_symbols(&symbols)?;
        debug!(
            alphabet = %self.alphabet,
            runs = plan.num_runs(),
            input = seq.len(),
            output = bytes.len(),
            "segmented encode"
        );
        Ok(bytes)
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(to_ascii(&self.decode_symbols(data)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::Rng;

    #[test]
    fn test_encode_single_base() {
        let codec = Segmented::default();
        let encoded = codec.encode(b"G").expect("Encoding failed");
        assert_eq!(encoded, vec![2, 0, 0, 0, 1]);
        assert_eq!(codec.decode(&encoded).expect("Decoding failed"), b"G");
    }

    #[test]
    fn test_encode_empty() {
        let codec = Segmented::default();
        assert!(matches!(codec.encode(b""), Err(CodecError::EmptyInput)));
    }

    #[test]
    fn test_lowercase_decodes_to_uppercase() {
        let codec = Segmented::default();
        let encoded = codec.encode(b"acgtnnnnacgt").expect("Encoding failed");
        assert_eq!(codec.decode(&encoded).expect("Decoding failed"), b"ACGTNNNNACGT");
    }

    #[test]
    fn test_invalid_symbol_rejected() {
        let err = Segmented::new(Alphabet::Dna4).encode(b"ACGTN").unwrap_err();
        assert!(matches!(err, CodecError::InvalidSymbol { byte: b'N', position: 4 }));
    }

    #[test]
    fn test_dna4_stream_uses_dna4_ids() {
        let codec = Segmented::new(Alphabet::Dna4);
        let encoded = codec.encode(b"ACGTACGTACGT").unwrap();
        // One balanced run: id 22, 12 symbols, 3 data bytes.
        assert_eq!(&encoded[..5], &[22, 0, 0, 0, 12]);
        assert_eq!(encoded.len(), 8);
    }

    #[test]
    fn test_single_run_mode() {
        let text = format!("{}{}", "A".repeat(400), "CG".repeat(200));
        let multi = Segmented::default().encode(text.as_bytes()).unwrap();
        let single = Segmented::single_run(Alphabet::Dna5)
            .encode(text.as_bytes())
            .unwrap();
        assert!(multi.len() < single.len());
        assert_eq!(
            Segmented::single_run(Alphabet::Dna5).decode(&single).unwrap(),
            text.as_bytes()
        );
    }

    #[test]
    fn test_round_trip_random() {
        let mut rng = rand::thread_rng();
        for alphabet in [Alphabet::Dna4, Alphabet::Dna5] {
            let codec = Segmented::new(alphabet);
            let letters = &b"ACGTN"[..alphabet.size()];
            for _ in 0..10 {
                let len = rng.gen_range(1..2000);
                let input: Vec<u8> = (0..len)
                    .map(|_| letters[rng.gen_range(0..letters.len())])
                    .collect();
                let (plan, encoded) = codec
                    .encode_symbols(&alphabet.parse(&input).unwrap())
                    .expect("Encoding failed");
                assert_eq!(plan.total_bits, 8 * encoded.len() as u64);
                assert_eq!(codec.decode(&encoded).expect("Decoding failed"), input);
            }
        }
    }

    fn blocky_input() -> impl Strategy<Value = Vec<u8>> {
        prop::collection::vec(
            (prop::sample::select(b"ACGTN".to_vec()), 1usize..60),
            1..20,
        )
        .prop_map(|blocks| {
            blocks
                .into_iter()
                .flat_map(|(b, n)| std::iter::repeat(b).take(n))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_round_trip(input in prop::collection::vec(prop::sample::select(b"ACGTN".to_vec()), 1..500)) {
            let codec = Segmented::default();
            let encoded = codec.encode(&input).unwrap();
            prop_assert_eq!(codec.decode(&encoded).unwrap(), input);
        }

        #[test]
        fn prop_round_trip_blocks(input in blocky_input()) {
            for codec in [Segmented::default(), Segmented::single_run(Alphabet::Dna5)] {
                let symbols = Alphabet::Dna5.parse(&input).unwrap();
                let (plan, encoded) = codec.encode_symbols(&symbols).unwrap();
                prop_assert_eq!(plan.total_bits, 8 * encoded.len() as u64);
                prop_assert_eq!(codec.decode(&encoded).unwrap(), input.clone());
            }
        }
    }
}
