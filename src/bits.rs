use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use crate::error::{Error, Result};

/// Widest value a single read can produce.
pub const MAX_BITS: usize = 64;

/// Read cursor over a byte slice owned by someone else.
///
/// Bits are consumed starting from the least significant bit of each
/// byte, and a multi-bit value is assembled with its first bit in the
/// least significant position.
#[derive(Debug, Clone)]
pub struct BitReader {
    /// Index of the next byte not yet pulled into `carry`.
    byte_ix: usize,
    /// Bits pulled from storage but not handed out yet, oldest bit lowest.
    carry: u128,
    /// Number of valid bits in `carry`.
    carry_bits: usize,
}

impl BitReader {
    pub fn new() -> Self {
        BitReader {
            byte_ix: 0,
            carry: 0,
            carry_bits: 0,
        }
    }

    pub fn remaining_bytes(&self, data: &[u8]) -> usize {
        data.len() - self.byte_ix
    }

    /// Unread bits: the carry followed by every byte after the cursor.
    pub fn remaining_bits(&self, data: &[u8]) -> usize {
        8 * self.remaining_bytes(data) + self.carry_bits
    }

    pub fn rewind(&mut self) {
        self.byte_ix = 0;
        self.carry = 0;
        self.carry_bits = 0;
    }

    /// Reads `n` whole bytes as a little-endian value.
    ///
    /// When the cursor sits mid-byte this is the same as reading `8 * n`
    /// bits.
    ///
    /// # Panics
    /// Panics if `n > 8`.
    pub fn read_bytes(&mut self, n: usize, data: &[u8]) -> Result<u64> {
        assert!(n <= MAX_BITS / 8, "read_bytes: {} bytes do not fit in a u64", n);

        if self.remaining_bytes(data) < n {
            return Err(self.insufficient(8 * n, data));
        }

        if self.carry_bits != 0 {
            debug!(
                "read_bytes: {} bits carried, reading {} bytes bitwise",
                self.carry_bits, n
            );
            return self.read_bits(8 * n, data);
        }

        if n == 0 {
            return Ok(0);
        }

        let value = LittleEndian::read_uint(&data[self.byte_ix..self.byte_ix + n], n);
        self.byte_ix += n;
        Ok(value)
    }

    /// Reads the next `n` bits.
    ///
    /// # Panics
    /// Panics if `n > 64`.
    pub fn read_bits(&mut self, n: usize, data: &[u8]) -> Result<u64> {
        assert!(n <= MAX_BITS, "read_bits: {} bits do not fit in a u64", n);

        if self.remaining_bits(data) < n {
            return Err(self.insufficient(n, data));
        }

        while self.carry_bits < n {
            self.carry |= u128::from(data[self.byte_ix]) << self.carry_bits;
            self.carry_bits += 8;
            self.byte_ix += 1;
        }

        let value = self.carry & ((1u128 << n) - 1);
        self.carry >>= n;
        self.carry_bits -= n;

        Ok(value as u64)
    }

    fn insufficient(&self, requested: usize, data: &[u8]) -> Error {
        let available = self.remaining_bits(data);
        debug!(
            "insufficient bytes: requested {} bits, {} available",
            requested, available
        );
        Error::InsufficientBytes {
            requested,
            available,
        }
    }
}

/// Appends bits to the end of a byte vector owned by someone else.
///
/// Each output byte is filled from its least significant bit up. Bits of
/// the trailing byte stay in `pending` until the byte is complete.
#[derive(Debug, Clone)]
pub struct BitWriter {
    pending: u8,
    /// Valid low bits in `pending`, always below 8.
    pending_bits: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        BitWriter {
            pending: 0,
            pending_bits: 0,
        }
    }

    pub fn pending_bits(&self) -> usize {
        self.pending_bits
    }

    /// Writes the first `n` bytes of `src`.
    pub fn write_bytes(&mut self, n: usize, src: &[u8], out: &mut Vec<u8>) {
        if self.pending_bits != 0 {
            debug!(
                "write_bytes: {} bits pending, writing {} bytes bitwise",
                self.pending_bits, n
            );
            self.write_bits(8 * n, src, out);
            return;
        }

        out.extend_from_slice(&src[..n]);
    }

    /// Writes the low `n` bits of the little-endian value in `src`.
    ///
    /// # Panics
    /// Panics if `src` is shorter than `ceil(n / 8)` bytes.
    pub fn write_bits(&mut self, n: usize, src: &[u8], out: &mut Vec<u8>) {
        let src_len = (n + 7) / 8;
        assert!(
            src.len() >= src_len,
            "write_bits: {} bits need {} source bytes, got {}",
            n,
            src_len,
            src.len()
        );

        let mut bits_left = n;
        for &byte in &src[..src_len] {
            let take = bits_left.min(8);
            let chunk = u16::from(byte) & ((1 << take) - 1);
            let merged = u16::from(self.pending) | (chunk << self.pending_bits);
            let filled = self.pending_bits + take;

            if filled >= 8 {
                out.push(merged as u8);
                // Whatever did not fit starts the next byte.
                self.pending = (merged >> 8) as u8;
                self.pending_bits = filled - 8;
            } else {
                self.pending = merged as u8;
                self.pending_bits = filled;
            }

            bits_left -= take;
        }
    }

    /// Pushes the pending byte, zero padded, if it holds any bits.
    pub fn flush(&mut self, out: &mut Vec<u8>) {
        if self.pending_bits == 0 {
            return;
        }

        debug!("flush: padding {} pending bits", self.pending_bits);
        out.push(self.pending);
        self.pending = 0;
        self.pending_bits = 0;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn low_bits(value: u64, n: usize) -> u64 {
        if n == 64 {
            value
        } else {
            value & ((1 << n) - 1)
        }
    }

    #[test]
    fn test_read_bits_lsb_first() {
        let data = [0b1011_0001, 0xff];
        let mut reader = BitReader::new();

        assert_eq!(reader.read_bits(1, &data), Ok(1));
        assert_eq!(reader.read_bits(3, &data), Ok(0));
        assert_eq!(reader.read_bits(2, &data), Ok(3));
        assert_eq!(reader.read_bits(2, &data), Ok(2));
        assert_eq!(reader.remaining_bits(&data), 8);
        assert_eq!(reader.read_bytes(1, &data), Ok(0xff));
        assert_eq!(reader.remaining_bits(&data), 0);
    }

    #[test]
    fn test_read_bits_across_bytes() {
        let data = [0xab, 0xcd, 0xef];
        let mut reader = BitReader::new();

        assert_eq!(reader.read_bits(4, &data), Ok(0xb));
        assert_eq!(reader.read_bits(8, &data), Ok(0xda));
        assert_eq!(reader.read_bits(12, &data), Ok(0xefc));
    }

    #[test]
    fn test_read_zero_bits() {
        let data = [0x01];
        let mut reader = BitReader::new();

        assert_eq!(reader.read_bits(0, &data), Ok(0));
        assert_eq!(reader.read_bytes(0, &data), Ok(0));
        assert_eq!(reader.remaining_bits(&data), 8);
    }

    #[test]
    fn test_read_bytes_falls_back_when_mid_byte() {
        let data = [0xf1, 0x23, 0x45];
        let mut reader = BitReader::new();

        assert_eq!(reader.read_bits(4, &data), Ok(0x1));
        assert_eq!(reader.read_bytes(2, &data), Ok(0x5_23f));
        assert_eq!(reader.read_bits(4, &data), Ok(0x4));
    }

    #[test]
    fn test_full_width_read_with_carry() {
        let data = [0xff, 1, 2, 3, 4, 5, 6, 7, 8];
        let mut reader = BitReader::new();

        assert_eq!(reader.read_bits(4, &data), Ok(0xf));
        assert_eq!(reader.read_bits(64, &data), Ok(0x8070_6050_4030_201f));
        assert_eq!(reader.read_bits(4, &data), Ok(0x0));
    }

    #[test]
    fn test_failed_read_keeps_cursor() {
        let data = [0x12, 0x34];
        let mut reader = BitReader::new();

        assert_eq!(reader.read_bits(3, &data), Ok(0x2));
        assert_eq!(
            reader.read_bits(14, &data),
            Err(Error::InsufficientBytes {
                requested: 14,
                available: 13
            })
        );
        assert!(reader.read_bytes(2, &data).is_err());
        assert_eq!(reader.remaining_bits(&data), 13);
        assert_eq!(reader.read_bits(13, &data), Ok(0x3412 >> 3));
    }

    #[test]
    #[should_panic]
    fn test_read_over_64_bits_panics() {
        let data = [0; 16];
        let _ = BitReader::new().read_bits(65, &data);
    }

    #[test]
    fn test_write_splices_bits() {
        let mut out = vec![];
        let mut writer = BitWriter::new();

        writer.write_bits(3, &[0b101], &mut out);
        assert!(out.is_empty());
        assert_eq!(writer.pending_bits(), 3);

        writer.write_bits(8, &[0xff], &mut out);
        assert_eq!(out, vec![0b1111_1101]);
        assert_eq!(writer.pending_bits(), 3);

        writer.write_bits(5, &[0b1_0000], &mut out);
        assert_eq!(out, vec![0b1111_1101, 0b1000_0111]);
        assert_eq!(writer.pending_bits(), 0);
    }

    #[test]
    fn test_write_bits_masks_source() {
        let mut out = vec![];
        let mut writer = BitWriter::new();

        writer.write_bits(4, &[0xf5], &mut out);
        writer.write_bits(4, &[0xfa], &mut out);
        assert_eq!(out, vec![0xa5]);
    }

    #[test]
    fn test_write_bytes_aligned_and_misaligned() {
        let mut out = vec![];
        let mut writer = BitWriter::new();

        writer.write_bytes(2, &[0x12, 0x34, 0x56], &mut out);
        assert_eq!(out, vec![0x12, 0x34]);

        writer.write_bits(4, &[0xf], &mut out);
        writer.write_bytes(1, &[0xab], &mut out);
        assert_eq!(out, vec![0x12, 0x34, 0xbf]);
        assert_eq!(writer.pending_bits(), 4);

        writer.flush(&mut out);
        assert_eq!(out, vec![0x12, 0x34, 0xbf, 0x0a]);
        assert_eq!(writer.pending_bits(), 0);

        writer.flush(&mut out);
        assert_eq!(out.len(), 4);
    }

    #[test]
    #[should_panic]
    fn test_write_short_source_panics() {
        let mut out = vec![];
        BitWriter::new().write_bits(9, &[0xff], &mut out);
    }

    #[quickcheck]
    fn test_written_fields_read_back(fields: Vec<(u64, u8)>) -> bool {
        let fields: Vec<(u64, usize)> = fields
            .into_iter()
            .map(|(value, n)| (value, n as usize % (MAX_BITS + 1)))
            .collect();

        let mut out = vec![];
        let mut writer = BitWriter::new();
        for &(value, n) in &fields {
            writer.write_bits(n, &value.to_le_bytes(), &mut out);
        }
        writer.flush(&mut out);

        let total: usize = fields.iter().map(|&(_, n)| n).sum();
        if out.len() != (total + 7) / 8 {
            return false;
        }

        let mut reader = BitReader::new();
        fields
            .iter()
            .all(|&(value, n)| reader.read_bits(n, &out) == Ok(low_bits(value, n)))
    }
}
