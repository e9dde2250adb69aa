use derive_more::derive::{Display, Error};

/// Errors returned by reads from a `ByteBuffer`.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The read asked for more bits than are left between the read
    /// cursor and the end of the committed storage.
    #[display("insufficient bytes: requested {requested} bits, {available} available")]
    InsufficientBytes { requested: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
