// SPDX-FileCopyrightText: 2026 Aegis Unvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scrypt derivation of the 32-byte slot key from a password.
//!
//! Cost parameters come from the vault file, so they are checked against
//! configurable limits before any memory is committed to the KDF.

use std::time::Instant;

use aegis_config::model::DecryptConfig;
use aegis_core::UnvaultError;
use tracing::debug;
use zeroize::Zeroizing;

use crate::crypto::KEY_LEN;

/// Scrypt cost parameters exactly as stored in a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScryptCost {
    /// CPU/memory cost. Must be a power of two.
    pub n: u32,
    /// Block size.
    pub r: u32,
    /// Parallelism.
    pub p: u32,
}

impl ScryptCost {
    /// `log2(n)`, or a structural error when `n` is not a power of two ≥ 2.
    pub fn log_n(&self) -> Result<u8, UnvaultError> {
        if self.n < 2 || !self.n.is_power_of_two() {
            return Err(UnvaultError::Structural(format!(
                "scrypt n must be a power of two greater than 1, got {}",
                self.n
            )));
        }
        Ok(self.n.trailing_zeros() as u8)
    }

    /// Memory the KDF will allocate, in bytes: the `128 * r * n` ROMix table
    /// plus the `128 * r * p` lane buffer. Lanes run one after another, so the
    /// table is allocated once.
    pub fn memory_bytes(&self) -> u64 {
        128 * u64::from(self.r) * (u64::from(self.n) + u64::from(self.p))
    }
}

/// scrypt requires `r * p < 2^30`.
const MAX_RP: u64 = 1 << 30;

/// Upper bounds on the cost a vault file may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfLimits {
    pub max_log_n: u8,
    pub max_r: u32,
    pub max_p: u32,
    /// Cap on [`ScryptCost::memory_bytes`]. Checked on top of the per-field
    /// limits, which multiply out to far more.
    pub max_memory_bytes: u64,
}

impl Default for KdfLimits {
    fn default() -> Self {
        Self::from(&DecryptConfig::default())
    }
}

impl From<&DecryptConfig> for KdfLimits {
    fn from(config: &DecryptConfig) -> Self {
        Self {
            max_log_n: config.max_log_n,
            max_r: config.max_r,
            max_p: config.max_p,
            max_memory_bytes: u64::from(config.max_memory_mib) * 1024 * 1024,
        }
    }
}

impl KdfLimits {
    /// Reject costs above the configured limits. Returns `log2(n)` on success.
    pub fn check(&self, cost: &ScryptCost) -> Result<u8, UnvaultError> {
        let log_n = cost.log_n()?;
        if log_n > self.max_log_n {
            return Err(UnvaultError::Structural(format!(
                "scrypt n = 2^{log_n} exceeds the configured limit 2^{}",
                self.max_log_n
            )));
        }
        if cost.r == 0 || cost.r > self.max_r {
            return Err(UnvaultError::Structural(format!(
                "scrypt r = {} outside the accepted range 1..={}",
                cost.r, self.max_r
            )));
        }
        if cost.p == 0 || cost.p > self.max_p {
            return Err(UnvaultError::Structural(format!(
                "scrypt p = {} outside the accepted range 1..={}",
                cost.p, self.max_p
            )));
        }
        if u64::from(cost.r) * u64::from(cost.p) >= MAX_RP {
            return Err(UnvaultError::Structural(format!(
                "scrypt r * p = {} * {} must be below 2^30",
                cost.r, cost.p
            )));
        }
        let memory = cost.memory_bytes();
        if memory > self.max_memory_bytes {
            return Err(UnvaultError::Structural(format!(
                "scrypt needs {} MiB, above the configured limit of {} MiB",
                memory.div_ceil(1024 * 1024),
                self.max_memory_bytes / (1024 * 1024)
            )));
        }
        Ok(log_n)
    }
}

/// Derive the slot key from `password` and `salt` with scrypt.
///
/// The returned key is wrapped in [`Zeroizing`] for automatic memory zeroing
/// on drop.
pub fn derive_slot_key(
    password: &[u8],
    salt: &[u8],
    cost: &ScryptCost,
    limits: &KdfLimits,
) -> Result<Zeroizing<[u8; KEY_LEN]>, UnvaultError> {
    let log_n = limits.check(cost)?;
    let params = scrypt::Params::new(log_n, cost.r, cost.p, KEY_LEN)
        .map_err(|e| UnvaultError::Structural(format!("invalid scrypt parameters: {e}")))?;

    debug!(
        log_n,
        r = cost.r,
        p = cost.p,
        memory_bytes = cost.memory_bytes(),
        "deriving slot key"
    );
    let started = Instant::now();

    let mut output = Zeroizing::new([0u8; KEY_LEN]);
    scrypt::scrypt(password, salt, &params, output.as_mut())
        .map_err(|e| UnvaultError::Internal(format!("scrypt key derivation failed: {e}")))?;

    debug!(elapsed = ?started.elapsed(), "slot key derived");
    Ok(output)
}
