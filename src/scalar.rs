use byteorder::{ByteOrder, LittleEndian};

/// Fixed-width values a `ByteBuffer` can read and write.
///
/// Multi-byte values are always laid out little-endian, whatever the host
/// byte order is.
pub trait Scalar: Copy {
    /// Natural width in bytes.
    const WIDTH: usize;

    /// Little-endian bytes of the value. Only the first `WIDTH` bytes are
    /// meaningful, the rest are zero.
    fn to_le_array(self) -> [u8; 8];

    /// Narrows a value assembled by the bit reader.
    fn from_raw(raw: u64) -> Self;
}

impl Scalar for bool {
    const WIDTH: usize = 1;

    fn to_le_array(self) -> [u8; 8] {
        let mut bytes = [0; 8];
        bytes[0] = if self { 1 } else { 0 };
        bytes
    }

    /// Any non-zero value reads as `true`.
    fn from_raw(raw: u64) -> Self {
        raw != 0
    }
}

impl Scalar for u8 {
    const WIDTH: usize = 1;

    fn to_le_array(self) -> [u8; 8] {
        let mut bytes = [0; 8];
        bytes[0] = self;
        bytes
    }

    fn from_raw(raw: u64) -> Self {
        raw as u8
    }
}

impl Scalar for u16 {
    const WIDTH: usize = 2;

    fn to_le_array(self) -> [u8; 8] {
        let mut bytes = [0; 8];
        LittleEndian::write_u16(&mut bytes[..2], self);
        bytes
    }

    fn from_raw(raw: u64) -> Self {
        raw as u16
    }
}

impl Scalar for u32 {
    const WIDTH: usize = 4;

    fn to_le_array(self) -> [u8; 8] {
        let mut bytes = [0; 8];
        LittleEndian::write_u32(&mut bytes[..4], self);
        bytes
    }

    fn from_raw(raw: u64) -> Self {
        raw as u32
    }
}

impl Scalar for u64 {
    const WIDTH: usize = 8;

    fn to_le_array(self) -> [u8; 8] {
        let mut bytes = [0; 8];
        LittleEndian::write_u64(&mut bytes, self);
        bytes
    }

    fn from_raw(raw: u64) -> Self {
        raw
    }
}

/// Little-endian bytes of `value` at its natural width.
pub fn to_byte_array<T: Scalar>(value: T) -> Vec<u8> {
    value.to_le_array()[..T::WIDTH].to_vec()
}
