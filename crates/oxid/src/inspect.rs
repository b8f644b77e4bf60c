//! Reads the components back out of an encoded identifier.
//!
//! Every function decodes its input first; a string that does not decode is
//! reported as [`Error::MalformedIdentifier`] carrying the underlying codec
//! error.

use std::time::SystemTime;

use crate::{Error, Result, base32::decode_base32, id::Xid};

fn parse(s: &str) -> Result<Xid> {
    decode_base32(s)
        .map(Xid::from_bytes)
        .map_err(Error::MalformedIdentifier)
}

/// The instant embedded at generation time, at second resolution.
///
/// # Errors
///
/// [`Error::MalformedIdentifier`] if `s` is not a valid encoded identifier.
pub fn time_of(s: &str) -> Result<SystemTime> {
    parse(s).map(|id| id.time())
}

/// The embedded 24-bit counter.
///
/// # Errors
///
/// [`Error::MalformedIdentifier`] if `s` is not a valid encoded identifier.
pub fn counter_of(s: &str) -> Result<u32> {
    parse(s).map(|id| id.counter())
}

/// The embedded process ID.
///
/// # Errors
///
/// [`Error::MalformedIdentifier`] if `s` is not a valid encoded identifier.
pub fn pid_of(s: &str) -> Result<u16> {
    parse(s).map(|id| id.pid())
}

/// The embedded 3-byte machine fingerprint.
///
/// # Errors
///
/// [`Error::MalformedIdentifier`] if `s` is not a valid encoded identifier.
pub fn machine_of(s: &str) -> Result<[u8; 3]> {
    parse(s).map(|id| id.machine())
}

/// Whether `s` decodes to an identifier.
#[must_use]
pub fn is_valid(s: &str) -> bool {
    decode_base32(s).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base32::Base32Error;
    use std::time::{Duration, UNIX_EPOCH};

    const SAMPLE: &str = "9m4e2mr0ui3e8a215n4g";

    #[test]
    fn extracts_each_component() {
        assert_eq!(
            time_of(SAMPLE).unwrap(),
            UNIX_EPOCH + Duration::from_secs(1_300_816_219)
        );
        assert_eq!(counter_of(SAMPLE).unwrap(), 4_271_561);
        assert_eq!(pid_of(SAMPLE).unwrap(), 58_408);
        assert_eq!(machine_of(SAMPLE).unwrap(), [0x60, 0xf4, 0x86]);
    }

    #[test]
    fn time_is_embedded_not_current() {
        assert_eq!(time_of("00000000000000000000").unwrap(), UNIX_EPOCH);
    }

    #[test]
    fn wraps_length_errors() {
        assert_eq!(
            counter_of("9m4e2mr0"),
            Err(Error::MalformedIdentifier(Base32Error::InvalidLength { len: 8 }))
        );
    }

    #[test]
    fn wraps_character_errors() {
        assert_eq!(
            machine_of("9m4e2mr0ui3e8a215n4#"),
            Err(Error::MalformedIdentifier(Base32Error::InvalidCharacter {
                byte: b'#',
                index: 19
            }))
        );
        assert!(matches!(pid_of("XXXXXXXXXXXXXXXXXXXX"), Err(Error::MalformedIdentifier(_))));
        assert!(matches!(time_of(""), Err(Error::MalformedIdentifier(_))));
    }

    #[test]
    fn validity_matches_decode() {
        assert!(is_valid(SAMPLE));
        assert!(!is_valid("9m4e2mr0ui3e8a215n4h"));
        assert!(!is_valid("9M4E2MR0UI3E8A215N4G"));
        assert!(!is_valid(""));
    }
}
