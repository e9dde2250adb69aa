//! A growable byte buffer that reads and writes values at arbitrary bit
//! widths, for packing compact wire formats whose fields are not byte
//! aligned.
//!
//! ```
//! use bitbuffer::ByteBuffer;
//!
//! let mut buffer = ByteBuffer::new();
//! buffer.write_bool_bits(true, 1);
//! buffer.write_u8_bits(5, 3);
//! buffer.write_u16_bits(0x3ff, 12);
//! assert_eq!(buffer.data(), &[0xfb, 0x3f]);
//!
//! assert_eq!(buffer.read_bool_bits(1), Ok(true));
//! assert_eq!(buffer.read_u8_bits(3), Ok(5));
//! assert_eq!(buffer.read_u16_bits(12), Ok(0x3ff));
//! assert_eq!(buffer.remaining(), 0);
//! ```

mod bits;
mod buffer;
pub mod error;
mod scalar;

pub use buffer::ByteBuffer;
pub use error::{Error, Result};
pub use scalar::{to_byte_array, Scalar};

#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;
