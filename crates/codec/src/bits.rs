//! MSB-first bit packing.

use crate::topology::Codeword;

/// Packs bits MSB-first into a byte vector through a `u64` accumulator.
#[derive(Debug, Default)]
pub struct BitWriter {
    out: Vec<u8>,
    acc: u64,
    fill: u32,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            out: Vec::with_capacity(bytes),
            acc: 0,
            fill: 0,
        }
    }

    /// Append the low `n` bits of `value`, most significant first.
    #[inline]
    pub fn write_bits(&mut self, value: u32, n: u32) {
        debug_assert!(n <= 32);
        if n == 0 {
            return;
        }
        let mask = (1u64 << n) - 1;
        self.acc = (self.acc << n) | (u64::from(value) & mask);
        self.fill += n;
        if self.fill >= 32 {
            self.drain();
        }
    }

    #[inline(always)]
    pub fn write_codeword(&mut self, code: Codeword) {
        self.write_bits(u32::from(code.bits()), u32::from(code.len()));
    }

    fn drain(&mut self) {
        while self.fill >= 8 {
            self.fill -= 8;
            self.out.push((self.acc >> self.fill) as u8);
        }
        self.acc &= (1u64 << self.fill) - 1;
    }

    /// Pad with zero bits up to the next byte boundary.
    pub fn align(&mut self) {
        let rem = self.fill % 8;
        if rem != 0 {
            self.write_bits(0, 8 - rem);
        }
        self.drain();
    }

    /// Number of bits written so far.
    pub fn bit_len(&self) -> u64 {
        self.out.len() as u64 * 8 + u64::from(self.fill)
    }

    /// Align and return the packed bytes.
    pub fn finish(mut self) -> Vec<u8> {
        self.align();
        self.out
    }
}

/// Reads bits MSB-first from a byte slice.
#[derive(Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],
    next: usize,
    /// Unread bits, left-aligned.
    acc: u64,
    fill: u32,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            next: 0,
            acc: 0,
            fill: 0,
        }
    }

    fn refill(&mut self) {
        while self.fill <= 56 {
            let Some(&byte) = self.data.get(self.next) else {
                break;
            };
            self.acc |= u64::from(byte) << (56 - self.fill);
            self.fill += 8;
            self.next += 1;
        }
    }

    /// Next bit, or `None` once the slice is exhausted.
    #[inline]
    pub fn read_bit(&mut self) -> Option<bool> {
        if self.fill == 0 {
            self.refill();
            if self.fill == 0 {
                return None;
            }
        }
        let bit = self.acc >> 63 == 1;
        self.acc <<= 1;
        self.fill -= 1;
        Some(bit)
    }

    /// Skip to the next byte boundary.
    pub fn align(&mut self) {
        let rem = self.fill % 8;
        self.acc <<= rem;
        self.fill -= rem;
    }

    /// Bytes touched so far, counting a partially read byte as consumed.
    pub fn bytes_consumed(&self) -> usize {
        let bits = self.next * 8 - self.fill as usize;
        bits.div_ceil(8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_msb_first() {
        let mut w = BitWriter::new();
        w.write_bits(0b1, 1);
        w.write_bits(0b01, 2);
        w.write_bits(0b001, 3);
        assert_eq!(w.bit_len(), 6);
        assert_eq!(w.finish(), vec![0b1010_0100]);
    }

    #[test]
    fn test_writer_spans_many_bytes() {
        let mut w = BitWriter::with_capacity(16);
        for _ in 0..40 {
            w.write_bits(0b11, 2);
        }
        w.write_bits(0b1, 1);
        let out = w.finish();
        assert_eq!(out.len(), 11);
        assert!(out[..10].iter().all(|&b| b == 0xFF));
        assert_eq!(out[10], 0b1000_0000);
    }

    #[test]
    fn test_align_on_boundary_is_noop() {
        let mut w = BitWriter::new();
        w.write_bits(0xAB, 8);
        w.align();
        assert_eq!(w.bit_len(), 8);
        assert_eq!(w.finish(), vec![0xAB]);
    }

    #[test]
    fn test_codeword_write() {
        let mut w = BitWriter::new();
        w.write_codeword(Codeword::parse("0001").unwrap());
        w.write_codeword(Codeword::EMPTY);
        w.write_codeword(Codeword::parse("1").unwrap());
        assert_eq!(w.finish(), vec![0b0001_1000]);
    }

    #[test]
    fn test_reader_round_trip() {
        let bytes = [0b1010_0100, 0xFF, 0x01];
        let mut r = BitReader::new(&bytes);
        let first: Vec<bool> = (0..6).map(|_| r.read_bit().unwrap()).collect();
        assert_eq!(first, vec![true, false, true, false, false, true]);
        assert_eq!(r.bytes_consumed(), 1);
        r.align();
        assert_eq!(r.bytes_consumed(), 1);
        assert_eq!(r.read_bit(), Some(true));
        assert_eq!(r.bytes_consumed(), 2);
        r.align();
        for _ in 0..7 {
            assert_eq!(r.read_bit(), Some(false));
        }
        assert_eq!(r.read_bit(), Some(true));
        assert_eq!(r.read_bit(), None);
        assert_eq!(r.bytes_consumed(), 3);
    }

    #[test]
    fn test_reader_long_input() {
        let bytes: Vec<u8> = (0..=255u8).collect();
        let mut r = BitReader::new(&bytes);
        for &expected in &bytes {
            let mut byte = 0u8;
            for _ in 0..8 {
                byte = (byte << 1) | u8::from(r.read_bit().unwrap());
            }
            assert_eq!(byte, expected);
        }
        assert_eq!(r.read_bit(), None);
    }
}
