use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::id::{Xid, XidBuf, XidBytes};

/// Serializes as the 20-character text form.
impl Serialize for Xid {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let mut buf = XidBuf::default();
        s.serialize_str(self.encode_to_buf(&mut buf))
    }
}

/// Deserializes from the 20-character text form.
impl<'de> Deserialize<'de> for Xid {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct XidVisitor;

        impl serde::de::Visitor<'_> for XidVisitor {
            type Value = Xid;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a 20 character base32hex xid string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(serde::de::Error::custom)
            }
        }

        d.deserialize_str(XidVisitor)
    }
}

/// Serializes an [`Xid`] as its 12 raw bytes instead of text.
///
/// ```
/// # #[cfg(feature = "serde")] {
/// #[derive(serde::Serialize, serde::Deserialize)]
/// struct Row {
///     #[serde(with = "oxid::serde::as_bytes")]
///     id: oxid::id::Xid,
/// }
/// # }
/// ```
pub mod as_bytes {
    use super::{Deserialize, Deserializer, Serialize, Serializer, Xid, XidBytes};

    pub fn serialize<S: Serializer>(id: &Xid, s: S) -> Result<S::Ok, S::Error> {
        id.as_bytes().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Xid, D::Error> {
        XidBytes::deserialize(d).map(Xid::from_bytes)
    }
}
