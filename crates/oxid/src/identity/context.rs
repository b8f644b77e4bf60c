use crate::{
    Result,
    identity::{IdentityConfig, detect_machine, detect_pid},
};

/// Process-wide identity embedded in every generated identifier.
///
/// Build it once at startup and hand it to each
/// [`XidGenerator`](crate::generator::XidGenerator); it is never re-read on
/// the generation path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IdentityContext {
    machine: [u8; 3],
    pid: u16,
}

impl IdentityContext {
    /// Uses the given machine fingerprint and process ID verbatim.
    #[must_use]
    pub const fn new(machine: [u8; 3], pid: u16) -> Self {
        Self { machine, pid }
    }

    /// Derives the identity of the running process.
    ///
    /// The machine fingerprint is a hash of the host's machine ID or host
    /// name (random if neither can be read). The pid is the low 16 bits of
    /// the OS process ID.
    #[must_use]
    pub fn detect() -> Self {
        Self::new(detect_machine(), detect_pid())
    }

    /// Detects the identity, then applies any overrides in `config`.
    ///
    /// Detection is skipped for fields that are overridden.
    #[must_use]
    pub fn with_config(config: &IdentityConfig) -> Self {
        Self::new(
            config.machine.unwrap_or_else(detect_machine),
            config.pid.unwrap_or_else(detect_pid),
        )
    }

    /// Detects the identity with overrides read from the environment.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`](crate::Error::InvalidConfig) if an override
    /// variable is malformed.
    pub fn from_env() -> Result<Self> {
        let identity = Self::with_config(&IdentityConfig::from_env()?);
        #[cfg(feature = "tracing")]
        tracing::debug!(machine = ?identity.machine, pid = identity.pid, "identity resolved");
        Ok(identity)
    }

    #[must_use]
    pub const fn machine(&self) -> [u8; 3] {
        self.machine
    }

    #[must_use]
    pub const fn pid(&self) -> u16 {
        self.pid
    }
}
