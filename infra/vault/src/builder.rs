use crate::engine::Vault;
use crate::error::VaultError;
use crate::kdf::PBKDF2_ITERATIONS;
use std::num::NonZeroU32;

/// A builder for a configured [`Vault`].
///
/// The work factor defaults to [`PBKDF2_ITERATIONS`]. Lowering it weakens the
/// protection of every envelope the vault seals and is meant for tests and
/// benchmarks; opening existing envelopes always requires the count they were sealed with.
#[derive(Debug, Clone, Copy)]
pub struct VaultBuilder {
    iterations: u32,
}

impl Default for VaultBuilder {
    fn default() -> Self {
        Self { iterations: PBKDF2_ITERATIONS }
    }
}

impl VaultBuilder {
    #[must_use = "Builder must be finished with `build` before use"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the PBKDF2 iteration count.
    #[must_use]
    pub const fn iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Finalizes the builder and returns a [`Vault`].
    ///
    /// # Errors
    /// Returns [`VaultError::InvalidConfiguration`] if the iteration count is zero.
    pub fn build(self) -> Result<Vault, VaultError> {
        let iterations =
            NonZeroU32::new(self.iterations).ok_or_else(|| VaultError::InvalidConfiguration {
                message: "PBKDF2 iteration count must be at least 1".into(),
                context: None,
            })?;

        Ok(Vault { iterations })
    }
}
