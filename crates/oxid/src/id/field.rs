use core::ops::Range;

/// One of the four fixed-position fields of an [`Xid`](crate::id::Xid).
///
/// Every field is stored big-endian at a fixed byte offset:
///
/// ```text
/// offset  0        4          7      9          12
///         | time:4 | machine:3 | pid:2 | counter:3 |
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// Unsigned seconds since the unix epoch.
    Timestamp,
    /// Opaque host fingerprint.
    Machine,
    /// Low 16 bits of the generating process ID.
    Pid,
    /// 24-bit wraparound counter.
    Counter,
}

impl Field {
    /// All fields in storage order.
    pub const ALL: [Self; 4] = [Self::Timestamp, Self::Machine, Self::Pid, Self::Counter];

    /// Byte offset of the field.
    #[must_use]
    pub const fn offset(self) -> usize {
        match self {
            Self::Timestamp => 0,
            Self::Machine => 4,
            Self::Pid => 7,
            Self::Counter => 9,
        }
    }

    /// Width of the field in bytes.
    #[must_use]
    pub const fn len(self) -> usize {
        match self {
            Self::Timestamp => 4,
            Self::Machine => 3,
            Self::Pid => 2,
            Self::Counter => 3,
        }
    }

    /// Byte range of the field inside the 12-byte identifier.
    #[must_use]
    pub const fn range(self) -> Range<usize> {
        self.offset()..self.offset() + self.len()
    }
}
