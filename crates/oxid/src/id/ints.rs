//! Conversions between identifiers and arrays of small integers.
//!
//! Query layers without a native byte-array type (SQL `int[]`, JSON arrays)
//! pass raw bytes as integers in `0..=255`.

use crate::{
    Error, Result,
    id::{RAW_LEN, Xid, XidBytes},
};

impl Xid {
    /// Builds an identifier from exactly 12 integers in `0..=255`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidByteArray`] if `ints` does not have 12 elements.
    /// - [`Error::ByteOutOfRange`] for the first element outside `0..=255`.
    ///
    /// # Example
    ///
    /// ```
    /// use oxid::id::Xid;
    ///
    /// let id = Xid::try_from_ints(&[77, 136, 225, 91, 96, 244, 134, 228, 40, 65, 45, 201]).unwrap();
    /// assert_eq!(id.encode(), "9m4e2mr0ui3e8a215n4g");
    /// ```
    pub fn try_from_ints<I>(ints: &[I]) -> Result<Self>
    where
        I: Copy + Into<i64>,
    {
        if ints.len() != RAW_LEN {
            return Err(Error::InvalidByteArray { len: ints.len() });
        }
        let mut bytes = XidBytes::default();
        for (index, (slot, &value)) in bytes.iter_mut().zip(ints).enumerate() {
            let value: i64 = value.into();
            *slot = u8::try_from(value).map_err(|_| Error::ByteOutOfRange { index, value })?;
        }
        Ok(Self::from_bytes(bytes))
    }

    /// Returns the bytes widened to `i32`, the SQL `int` element type.
    #[must_use]
    pub fn to_ints(&self) -> [i32; RAW_LEN] {
        self.as_bytes().map(i32::from)
    }
}

/// Widens a machine fingerprint the same way as [`Xid::to_ints`].
#[must_use]
pub fn machine_ints(machine: [u8; 3]) -> [i32; 3] {
    machine.map(i32::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ints_round_trip() {
        let id = Xid::from_components(1_700_000_000, [1, 2, 3], 4242, 99);
        let ints = id.to_ints();
        assert_eq!(Xid::try_from_ints(&ints).unwrap(), id);
    }

    #[test]
    fn accepts_any_integer_width() {
        let wide: [i64; RAW_LEN] = [255; RAW_LEN];
        let narrow: [u8; RAW_LEN] = [255; RAW_LEN];
        assert_eq!(Xid::try_from_ints(&wide).unwrap(), Xid::try_from_ints(&narrow).unwrap());
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            Xid::try_from_ints(&[0_i32; 11]),
            Err(Error::InvalidByteArray { len: 11 })
        );
        assert_eq!(
            Xid::try_from_ints(&[0_i32; 13]),
            Err(Error::InvalidByteArray { len: 13 })
        );
    }

    #[test]
    fn rejects_out_of_range_elements() {
        let mut ints = [0_i32; RAW_LEN];
        ints[3] = 256;
        assert_eq!(
            Xid::try_from_ints(&ints),
            Err(Error::ByteOutOfRange { index: 3, value: 256 })
        );
        ints[3] = 0;
        ints[7] = -1;
        assert_eq!(
            Xid::try_from_ints(&ints),
            Err(Error::ByteOutOfRange { index: 7, value: -1 })
        );
    }

    #[test]
    fn machine_widens_each_byte() {
        assert_eq!(machine_ints([0, 128, 255]), [0, 128, 255]);
    }
}
