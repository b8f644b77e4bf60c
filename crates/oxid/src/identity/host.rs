use std::{env, fs};

/// Files consulted, in order, for a stable host identifier.
const HOST_ID_FILES: [&str; 4] = [
    "/etc/machine-id",
    "/var/lib/dbus/machine-id",
    "/proc/sys/kernel/hostname",
    "/etc/hostname",
];

/// Environment variables consulted after [`HOST_ID_FILES`].
const HOST_ID_VARS: [&str; 2] = ["HOSTNAME", "COMPUTERNAME"];

/// Returns the first non-empty stable host identifier, if any.
///
/// The machine ID files are preferred over host names since they survive
/// renames and are unique per installation.
#[must_use]
pub fn host_id() -> Option<String> {
    HOST_ID_FILES
        .iter()
        .filter_map(|path| fs::read_to_string(path).ok())
        .chain(HOST_ID_VARS.iter().filter_map(|key| env::var(key).ok()))
        .map(|raw| raw.trim().to_owned())
        .find(|id| !id.is_empty())
}

/// Folds an arbitrary host identifier into a 3-byte machine fingerprint.
///
/// The same input always yields the same fingerprint.
#[must_use]
pub fn machine_fingerprint(host_id: &str) -> [u8; 3] {
    let hash = blake3::hash(host_id.as_bytes());
    let bytes = hash.as_bytes();
    [bytes[0], bytes[1], bytes[2]]
}

/// Fingerprint of this host, or 3 random bytes when no identifier can be
/// read.
#[must_use]
pub fn detect_machine() -> [u8; 3] {
    match host_id() {
        Some(id) => machine_fingerprint(&id),
        None => {
            #[cfg(feature = "tracing")]
            tracing::warn!("no stable host identifier found, using a random machine id");
            rand::random()
        }
    }
}

/// Low 16 bits of the operating system process ID.
#[must_use]
pub fn detect_pid() -> u16 {
    (std::process::id() & 0xFFFF) as u16
}
