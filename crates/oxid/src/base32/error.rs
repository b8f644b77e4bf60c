use thiserror::Error;

/// Errors produced while decoding the 20-character text form of an
/// [`Xid`](crate::id::Xid).
#[derive(Clone, Debug, Error, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum Base32Error {
    /// The input is not exactly [`ENCODED_LEN`](crate::id::ENCODED_LEN)
    /// bytes long.
    #[error("invalid length: expected {expected} characters, got {len}", expected = crate::id::ENCODED_LEN)]
    InvalidLength {
        /// Byte length of the rejected input.
        len: usize,
    },

    /// The input contains a byte outside the encoding alphabet.
    ///
    /// A final character that sets any of the 4 padding bits is reported here
    /// as well, since no identifier encodes to it.
    #[error("invalid character {byte:#04x} at index {index}")]
    InvalidCharacter {
        /// The offending byte.
        byte: u8,
        /// Position of the offending byte in the input.
        index: usize,
    },
}
