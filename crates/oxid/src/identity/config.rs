use std::env;

use crate::{Error, Result};

/// Environment variable overriding the machine fingerprint: 6 hex digits.
pub const MACHINE_ID_ENV: &str = "OXID_MACHINE_ID";

/// Environment variable overriding the process ID: a decimal `u16`.
pub const PID_ENV: &str = "OXID_PID";

/// Optional overrides applied on top of detected identity.
///
/// Hosts that share an image (containers, cloned VMs) may also share a
/// machine ID file; pinning the fingerprint per deployment avoids collisions
/// between them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IdentityConfig {
    /// Fixed machine fingerprint instead of the detected one.
    pub machine: Option<[u8; 3]>,
    /// Fixed process ID instead of the detected one.
    pub pid: Option<u16>,
}

impl IdentityConfig {
    /// Reads [`MACHINE_ID_ENV`] and [`PID_ENV`] from the process environment.
    ///
    /// Unset or empty variables leave the corresponding field as `None`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`Self::from_env`] but reads values through `lookup`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] if a value is present but unparseable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let machine = non_empty(MACHINE_ID_ENV)
            .map(|raw| parse_machine_id(&raw))
            .transpose()?;
        let pid = non_empty(PID_ENV).map(|raw| parse_pid(&raw)).transpose()?;

        Ok(Self { machine, pid })
    }
}

/// Parses a machine fingerprint written as 6 hex digits, e.g. `"0a1b2c"`.
///
/// # Errors
///
/// [`Error::InvalidConfig`] for anything other than exactly 3 hex-encoded
/// bytes.
pub fn parse_machine_id(raw: &str) -> Result<[u8; 3]> {
    let mut machine = [0_u8; 3];
    hex::decode_to_slice(raw.trim(), &mut machine).map_err(|e| Error::InvalidConfig {
        key: MACHINE_ID_ENV,
        reason: e.to_string(),
    })?;
    Ok(machine)
}

/// Parses a decimal process ID in `0..=65535`.
///
/// # Errors
///
/// [`Error::InvalidConfig`] if `raw` is not a decimal `u16`.
pub fn parse_pid(raw: &str) -> Result<u16> {
    raw.trim().parse().map_err(|e: core::num::ParseIntError| Error::InvalidConfig {
        key: PID_ENV,
        reason: e.to_string(),
    })
}
