use log::debug;

use crate::bits::{BitReader, BitWriter};
use crate::error::{Error, Result};
use crate::scalar::Scalar;

/// Growable byte storage with independent, bit-granular read and write
/// cursors.
///
/// Writes append to the end of the storage and reads consume from the
/// front, so a value can be read back as soon as its bytes are committed.
/// Bits are packed least significant first within each byte, and
/// multi-byte values are little-endian.
///
/// A write that ends mid-byte leaves its last bits in the writer until
/// more bits complete the byte or `flush` pads it. Those bits are not
/// part of `data` and cannot be read yet.
#[derive(Debug, Clone)]
pub struct ByteBuffer {
    data: Vec<u8>,
    reader: BitReader,
    writer: BitWriter,
}

fn check_width<T: Scalar>(bits: usize) {
    assert!(
        bits <= 8 * T::WIDTH,
        "{} bits do not fit in a {}-byte value",
        bits,
        T::WIDTH
    );
}

impl ByteBuffer {
    pub fn new() -> Self {
        Self::from_bytes(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_bytes(Vec::with_capacity(capacity))
    }

    /// Wraps existing bytes; reading starts at the first of them.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        let data = data.into();
        debug!("ByteBuffer: loaded {} bytes", data.len());
        ByteBuffer {
            data,
            reader: BitReader::new(),
            writer: BitWriter::new(),
        }
    }

    /// Committed bytes, ready to be sent or stored.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of bits left to read.
    pub fn remaining(&self) -> usize {
        self.reader.remaining_bits(&self.data)
    }

    /// Number of written bits held back in an incomplete trailing byte.
    pub fn pending_bits(&self) -> usize {
        self.writer.pending_bits()
    }

    /// Moves the read cursor back to the start. Storage and the write
    /// cursor are left alone.
    pub fn rewind(&mut self) {
        debug!("rewind: {} bytes readable", self.data.len());
        self.reader.rewind();
    }

    /// Commits any pending bits, padding the last byte with zero bits.
    pub fn flush(&mut self) {
        self.writer.flush(&mut self.data);
    }

    // Reading

    /// Reads a value at its natural width.
    pub fn read<T: Scalar>(&mut self) -> Result<T> {
        let raw = self.reader.read_bytes(T::WIDTH, &self.data)?;
        Ok(T::from_raw(raw))
    }

    /// Reads a value stored in exactly `bits` bits.
    ///
    /// # Panics
    /// Panics if `bits` exceeds the natural width of `T`.
    pub fn read_bits<T: Scalar>(&mut self, bits: usize) -> Result<T> {
        check_width::<T>(bits);
        let raw = self.reader.read_bits(bits, &self.data)?;
        Ok(T::from_raw(raw))
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        self.read()
    }

    pub fn read_bool_bits(&mut self, bits: usize) -> Result<bool> {
        self.read_bits(bits)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.read()
    }

    pub fn read_u8_bits(&mut self, bits: usize) -> Result<u8> {
        self.read_bits(bits)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.read()
    }

    pub fn read_u16_bits(&mut self, bits: usize) -> Result<u16> {
        self.read_bits(bits)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.read()
    }

    pub fn read_u32_bits(&mut self, bits: usize) -> Result<u32> {
        self.read_bits(bits)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.read()
    }

    pub fn read_u64_bits(&mut self, bits: usize) -> Result<u64> {
        self.read_bits(bits)
    }

    /// Reads `count` bytes. Nothing is consumed if fewer than `count`
    /// bytes' worth of bits remain.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        let requested = 8 * count;
        let available = self.remaining();
        if available < requested {
            debug!(
                "read_bytes: requested {} bits, {} available",
                requested, available
            );
            return Err(Error::InsufficientBytes {
                requested,
                available,
            });
        }

        (0..count).map(|_| self.read_u8()).collect()
    }

    // Writing

    /// Writes a value at its natural width.
    pub fn write<T: Scalar>(&mut self, value: T) {
        self.writer
            .write_bytes(T::WIDTH, &value.to_le_array(), &mut self.data);
    }

    /// Writes the low `bits` bits of a value.
    ///
    /// # Panics
    /// Panics if `bits` exceeds the natural width of `T`.
    pub fn write_bits<T: Scalar>(&mut self, value: T, bits: usize) {
        check_width::<T>(bits);
        self.writer
            .write_bits(bits, &value.to_le_array(), &mut self.data);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write(value)
    }

    pub fn write_bool_bits(&mut self, value: bool, bits: usize) {
        self.write_bits(value, bits)
    }

    pub fn write_u8(&mut self, value: u8) {
        self.write(value)
    }

    pub fn write_u8_bits(&mut self, value: u8, bits: usize) {
        self.write_bits(value, bits)
    }

    pub fn write_u16(&mut self, value: u16) {
        self.write(value)
    }

    pub fn write_u16_bits(&mut self, value: u16, bits: usize) {
        self.write_bits(value, bits)
    }

    pub fn write_u32(&mut self, value: u32) {
        self.write(value)
    }

    pub fn write_u32_bits(&mut self, value: u32, bits: usize) {
        self.write_bits(value, bits)
    }

    pub fn write_u64(&mut self, value: u64) {
        self.write(value)
    }

    pub fn write_u64_bits(&mut self, value: u64, bits: usize) {
        self.write_bits(value, bits)
    }

    /// Writes whole bytes through the bit writer, so they line up after any
    /// pending bits.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.writer.write_bytes(bytes.len(), bytes, &mut self.data);
    }

    /// Appends bytes straight to storage, ahead of any pending bits.
    pub fn write_raw(&mut self, bytes: &[u8]) {
        if self.writer.pending_bits() != 0 {
            debug!(
                "write_raw: appending {} bytes ahead of {} pending bits",
                bytes.len(),
                self.writer.pending_bits()
            );
        }
        self.data.extend_from_slice(bytes);
    }
}

impl Default for ByteBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self::from_bytes(data)
    }
}

impl From<&[u8]> for ByteBuffer {
    fn from(data: &[u8]) -> Self {
        Self::from_bytes(data)
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}
