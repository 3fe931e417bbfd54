use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, Result};

/// Number of distinct symbols in the largest supported alphabet.
pub const MAX_SYMBOLS: usize = 5;

/// A nucleotide symbol.
///
/// `Symbol` is a compact, Copyable representation backed by a single byte.
/// The mapping of variants to integers is stable and doubles as the
/// canonical order used for every deterministic tie-break in the crate
/// (A=0, C=1, G=2, T=3, N=4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Symbol {
    A = 0,
    C = 1,
    G = 2,
    T = 3,
    N = 4,
}

impl Symbol {
    /// All symbols in canonical order.
    pub const ALL: [Symbol; MAX_SYMBOLS] = [Self::A, Self::C, Self::G, Self::T, Self::N];

    /// Convert from u8 index (0-4)
    #[inline(always)]
    pub const fn from_index(idx: u8) -> Option<Self> {
        match idx {
            0 => Some(Self::A),
            1 => Some(Self::C),
            2 => Some(Self::G),
            3 => Some(Self::T),
            4 => Some(Self::N),
            _ => None,
        }
    }

    /// Convert to the compact u8 index (0-4).
    #[inline(always)]
    pub const fn to_index(self) -> u8 {
        self as u8
    }

    /// Convert from an ASCII byte. Lowercase bytes are accepted.
    #[inline]
    pub const fn from_ascii(byte: u8) -> Option<Self> {
        match byte {
            b'A' | b'a' => Some(Self::A),
            b'C' | b'c' => Some(Self::C),
            b'G' | b'g' => Some(Self::G),
            b'T' | b't' => Some(Self::T),
            b'N' | b'n' => Some(Self::N),
            _ => None,
        }
    }

    /// Convert to an uppercase ASCII byte.
    #[inline(always)]
    pub const fn to_ascii(self) -> u8 {
        match self {
            Self::A => b'A',
            Self::C => b'C',
            Self::G => b'G',
            Self::T => b'T',
            Self::N => b'N',
        }
    }

    #[inline(always)]
    pub const fn to_char(self) -> char {
        self.to_ascii() as char
    }
}

impl From<Symbol> for u8 {
    #[inline(always)]
    fn from(sym: Symbol) -> u8 {
        sym.to_index()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A set of symbols stored as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SymbolSet(u8);

impl SymbolSet {
    pub const EMPTY: Self = Self(0);

    #[inline]
    pub fn insert(&mut self, sym: Symbol) {
        self.0 |= 1 << sym.to_index();
    }

    #[inline]
    pub const fn contains(self, sym: Symbol) -> bool {
        self.0 & (1 << sym as u8) != 0
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate members in canonical order.
    pub fn iter(self) -> impl Iterator<Item = Symbol> {
        Symbol::ALL.into_iter().filter(move |&s| self.contains(s))
    }
}

impl FromIterator<Symbol> for SymbolSet {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for sym in iter {
            set.insert(sym);
        }
        set
    }
}

/// Per-symbol occurrence counts, indexed by `Symbol::to_index`.
pub type SymbolCounts = [u64; MAX_SYMBOLS];

/// Count symbol occurrences.
pub fn count_symbols(symbols: &[Symbol]) -> SymbolCounts {
    let mut counts = [0u64; MAX_SYMBOLS];
    for &sym in symbols {
        counts[sym as usize] += 1;
    }
    counts
}

/// The alphabet variant a stream is written over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alphabet {
    /// `A C G T`
    Dna4,
    /// `A C G T N`
    Dna5,
}

impl Alphabet {
    /// Number of symbols in this alphabet.
    pub const fn size(self) -> usize {
        match self {
            Self::Dna4 => 4,
            Self::Dna5 => 5,
        }
    }

    /// Symbols of this alphabet in canonical order.
    pub fn symbols(self) -> &'static [Symbol] {
        &Symbol::ALL[..self.size()]
    }

    #[inline]
    pub const fn contains(self, sym: Symbol) -> bool {
        (sym as usize) < self.size()
    }

    /// Parse ASCII input into symbols.
    ///
    /// The whole input is validated before anything is returned: the first
    /// byte outside the alphabet aborts with `InvalidSymbol`.
    pub fn parse(self, bytes: &[u8]) -> Result<Vec<Symbol>> {
        if bytes.is_empty() {
            return Err(CodecError::EmptyInput);
        }
        bytes
            .iter()
            .enumerate()
            .map(|(position, &byte)| {
                Symbol::from_ascii(byte)
                    .filter(|&s| self.contains(s))
                    .ok_or(CodecError::InvalidSymbol { byte, position })
            })
            .collect()
    }
}

/// Render symbols back to uppercase ASCII.
pub fn to_ascii(symbols: &[Symbol]) -> Vec<u8> {
    symbols.iter().map(|s| s.to_ascii()).collect()
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::Dna5
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dna4 => write!(f, "dna4"),
            Self::Dna5 => write!(f, "dna5"),
        }
    }
}

impl std::str::FromStr for Alphabet {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dna4" | "acgt" => Ok(Self::Dna4),
            "dna5" | "acgtn" => Ok(Self::Dna5),
            _ => Err(format!("Unknown alphabet: {s}. Available: dna4, dna5")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_from_index() {
        for (i, sym) in Symbol::ALL.iter().enumerate() {
            assert_eq!(Symbol::from_index(i as u8), Some(*sym));
        }
        assert_eq!(Symbol::from_index(5), None);
        assert_eq!(Symbol::from_index(255), None);
    }

    #[test]
    fn test_symbol_from_ascii() {
        assert_eq!(Symbol::from_ascii(b'A'), Some(Symbol::A));
        assert_eq!(Symbol::from_ascii(b'n'), Some(Symbol::N));
        assert_eq!(Symbol::from_ascii(b't'), Some(Symbol::T));
        assert_eq!(Symbol::from_ascii(b'X'), None);
        assert_eq!(Symbol::from_ascii(b'\n'), None);
    }

    #[test]
    fn test_canonical_order_puts_n_last() {
        assert!(Symbol::T < Symbol::N);
        assert_eq!(Symbol::ALL.last(), Some(&Symbol::N));
    }

    #[test]
    fn test_symbol_set() {
        let set: SymbolSet = [Symbol::T, Symbol::A, Symbol::T].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(Symbol::A));
        assert!(!set.contains(Symbol::C));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Symbol::A, Symbol::T]);
        assert!(SymbolSet::EMPTY.is_empty());
    }

    #[test]
    fn test_parse_dna4_rejects_n() {
        let err = Alphabet::Dna4.parse(b"ACGN").unwrap_err();
        match err {
            CodecError::InvalidSymbol { byte, position } => {
                assert_eq!(byte, b'N');
                assert_eq!(position, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(
            Alphabet::Dna5.parse(b"acgn").unwrap(),
            vec![Symbol::A, Symbol::C, Symbol::G, Symbol::N]
        );
    }

    #[test]
    fn test_parse_rejects_newline_and_empty() {
        assert!(matches!(
            Alphabet::Dna5.parse(b"ACGT\n"),
            Err(CodecError::InvalidSymbol { byte: b'\n', position: 4 })
        ));
        assert!(matches!(Alphabet::Dna5.parse(b""), Err(CodecError::EmptyInput)));
    }

    #[test]
    fn test_alphabet_from_str_and_display() {
        assert_eq!("dna4".parse::<Alphabet>(), Ok(Alphabet::Dna4));
        assert_eq!("ACGTN".parse::<Alphabet>(), Ok(Alphabet::Dna5));
        assert!("rna".parse::<Alphabet>().is_err());
        assert_eq!(Alphabet::Dna4.to_string(), "dna4");
    }

    #[test]
    fn test_count_symbols() {
        let syms = Alphabet::Dna5.parse(b"AACNT").unwrap();
        assert_eq!(count_symbols(&syms), [2, 1, 0, 1, 1]);
    }

    #[test]
    fn test_symbol_size() {
        assert_eq!(std::mem::size_of::<Symbol>(), 1);
    }
}
