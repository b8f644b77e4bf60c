use core::{fmt, str::FromStr};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::{
    Error, Result,
    base32::{Base32Error, decode_base32, decode_base32_bytes, encode_base32},
    counter::COUNTER_MAX,
    id::Field,
};

/// Size of an identifier in bytes.
pub const RAW_LEN: usize = 12;

/// Size of the text form in characters.
pub const ENCODED_LEN: usize = 20;

/// Raw identifier bytes.
pub type XidBytes = [u8; RAW_LEN];

/// Stack buffer holding the text form.
pub type XidBuf = [u8; ENCODED_LEN];

/// A 12-byte, globally unique, time-ordered identifier.
///
/// The layout follows Mongo's ObjectID and the xid family:
///
/// - 4 bytes: unix seconds, big-endian
/// - 3 bytes: machine fingerprint
/// - 2 bytes: process ID (low 16 bits), big-endian
/// - 3 bytes: counter, big-endian
///
/// Ordering (`Ord`) is unsigned lexicographic over the bytes, which sorts by
/// time first. The text form produced by [`Xid::encode`] sorts the same way.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Xid {
    bytes: XidBytes,
}

impl Xid {
    /// The all-zero identifier.
    pub const NIL: Self = Self::from_bytes([0; RAW_LEN]);

    #[must_use]
    pub const fn from_bytes(bytes: XidBytes) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &XidBytes {
        &self.bytes
    }

    #[must_use]
    pub const fn to_bytes(self) -> XidBytes {
        self.bytes
    }

    /// Builds an identifier from its components.
    ///
    /// Only the low 24 bits of `counter` are stored.
    #[must_use]
    pub const fn from_components(timestamp: u32, machine: [u8; 3], pid: u16, counter: u32) -> Self {
        let ts = timestamp.to_be_bytes();
        let pid = pid.to_be_bytes();
        let ctr = (counter & COUNTER_MAX).to_be_bytes();
        Self::from_bytes([
            ts[0], ts[1], ts[2], ts[3], machine[0], machine[1], machine[2], pid[0], pid[1],
            ctr[1], ctr[2], ctr[3],
        ])
    }

    /// Returns the raw bytes of one field.
    #[must_use]
    pub fn field(&self, field: Field) -> &[u8] {
        &self.bytes[field.range()]
    }

    /// Embedded unix seconds.
    #[must_use]
    pub const fn timestamp(&self) -> u32 {
        let b = &self.bytes;
        u32::from_be_bytes([b[0], b[1], b[2], b[3]])
    }

    /// Embedded timestamp as an instant, at second resolution.
    ///
    /// This is whatever was embedded at generation time, not the current
    /// time.
    #[must_use]
    pub fn time(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(u64::from(self.timestamp()))
    }

    #[must_use]
    pub const fn machine(&self) -> [u8; 3] {
        let b = &self.bytes;
        [b[4], b[5], b[6]]
    }

    #[must_use]
    pub const fn pid(&self) -> u16 {
        let b = &self.bytes;
        u16::from_be_bytes([b[7], b[8]])
    }

    #[must_use]
    pub const fn counter(&self) -> u32 {
        let b = &self.bytes;
        u32::from_be_bytes([0, b[9], b[10], b[11]])
    }

    #[must_use]
    pub const fn is_nil(&self) -> bool {
        let mut i = 0;
        while i < RAW_LEN {
            if self.bytes[i] != 0 {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Encodes into a [`String`] of [`ENCODED_LEN`] characters.
    ///
    /// # Example
    ///
    /// ```
    /// use oxid::id::Xid;
    ///
    /// let id = Xid::from_bytes([
    ///     0x4d, 0x88, 0xe1, 0x5b, 0x60, 0xf4, 0x86, 0xe4, 0x28, 0x41, 0x2d, 0xc9,
    /// ]);
    /// assert_eq!(id.encode(), "9m4e2mr0ui3e8a215n4g");
    /// ```
    #[must_use]
    pub fn encode(&self) -> String {
        let mut buf = XidBuf::default();
        self.encode_to_buf(&mut buf);
        // The alphabet is pure ASCII.
        buf.iter().map(|&b| char::from(b)).collect()
    }

    /// Zero-allocation alternative to [`Xid::encode`].
    ///
    /// Returns the written buffer as a `&str`.
    pub fn encode_to_buf<'a>(&self, buf: &'a mut XidBuf) -> &'a str {
        encode_base32(&self.bytes, buf);
        // Every byte written is drawn from the ASCII alphabet.
        core::str::from_utf8(buf).unwrap_or_default()
    }

    /// Decodes the 20-character text form.
    ///
    /// # Errors
    ///
    /// [`Error::Decode`] wrapping [`Base32Error::InvalidLength`] or
    /// [`Base32Error::InvalidCharacter`].
    pub fn decode(s: &str) -> Result<Self> {
        Ok(Self::from_bytes(decode_base32(s)?))
    }

    /// Like [`Xid::decode`] but over raw bytes.
    ///
    /// # Errors
    ///
    /// Same as [`Xid::decode`].
    pub fn decode_bytes(s: &[u8]) -> Result<Self> {
        Ok(Self::from_bytes(decode_base32_bytes(s)?))
    }
}

impl From<XidBytes> for Xid {
    fn from(bytes: XidBytes) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<Xid> for XidBytes {
    fn from(id: Xid) -> Self {
        id.to_bytes()
    }
}

impl AsRef<[u8]> for Xid {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for Xid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = XidBuf::default();
        f.write_str(self.encode_to_buf(&mut buf))
    }
}

impl fmt::Debug for Xid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = XidBuf::default();
        f.debug_tuple("Xid").field(&self.encode_to_buf(&mut buf)).finish()
    }
}

impl FromStr for Xid {
    type Err = Base32Error;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        decode_base32(s).map(Self::from_bytes)
    }
}

impl TryFrom<&str> for Xid {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: XidBytes = [
        0x4d, 0x88, 0xe1, 0x5b, 0x60, 0xf4, 0x86, 0xe4, 0x28, 0x41, 0x2d, 0xc9,
    ];

    #[test]
    fn components_read_back_from_fixed_offsets() {
        let id = Xid::from_bytes(SAMPLE);
        assert_eq!(id.timestamp(), 0x4d88_e15b);
        assert_eq!(id.machine(), [0x60, 0xf4, 0x86]);
        assert_eq!(id.pid(), 0xe428);
        assert_eq!(id.counter(), 0x41_2dc9);

        assert_eq!(id.field(Field::Timestamp), &SAMPLE[0..4]);
        assert_eq!(id.field(Field::Machine), &SAMPLE[4..7]);
        assert_eq!(id.field(Field::Pid), &SAMPLE[7..9]);
        assert_eq!(id.field(Field::Counter), &SAMPLE[9..12]);
    }

    #[test]
    fn from_components_matches_layout() {
        let id = Xid::from_components(0x4d88_e15b, [0x60, 0xf4, 0x86], 0xe428, 0x41_2dc9);
        assert_eq!(id.to_bytes(), SAMPLE);
    }

    #[test]
    fn from_components_masks_counter_to_24_bits() {
        let id = Xid::from_components(0, [0; 3], 0, 0xAB12_3456);
        assert_eq!(id.counter(), 0x12_3456);
    }

    #[test]
    fn time_is_embedded_seconds() {
        let id = Xid::from_bytes(SAMPLE);
        assert_eq!(
            id.time(),
            UNIX_EPOCH + Duration::from_secs(0x4d88_e15b)
        );
    }

    #[test]
    fn display_and_parse_use_text_form() {
        let id = Xid::from_bytes(SAMPLE);
        assert_eq!(id.to_string(), "9m4e2mr0ui3e8a215n4g");
        assert_eq!("9m4e2mr0ui3e8a215n4g".parse::<Xid>().unwrap(), id);
        assert_eq!(format!("{id:?}"), r#"Xid("9m4e2mr0ui3e8a215n4g")"#);
    }

    #[test]
    fn decode_wraps_codec_errors() {
        assert_eq!(
            Xid::decode("short"),
            Err(Error::Decode(Base32Error::InvalidLength { len: 5 }))
        );
        assert_eq!(
            Xid::decode_bytes(b"9m4e2mr0ui3e8a215n4z"),
            Err(Error::Decode(Base32Error::InvalidCharacter { byte: b'z', index: 19 }))
        );
    }

    #[test]
    fn nil_is_all_zero() {
        assert!(Xid::NIL.is_nil());
        assert!(!Xid::from_bytes(SAMPLE).is_nil());
        assert_eq!(Xid::NIL.encode(), "00000000000000000000");
        assert_eq!(Xid::default(), Xid::NIL);
    }

    #[test]
    fn ordering_is_time_first() {
        let early = Xid::from_components(1, [0xFF; 3], u16::MAX, COUNTER_MAX);
        let late = Xid::from_components(2, [0; 3], 0, 0);
        assert!(early < late);
        assert!(early.encode() < late.encode());
    }
}
