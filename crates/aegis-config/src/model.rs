// SPDX-FileCopyrightText: 2026 Aegis Unvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of being silently ignored.

use aegis_core::SlotPolicy;
use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Every section is optional and defaults to the values the reference
/// decryptor behaves with.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UnvaultConfig {
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// Slot selection and KDF cost limits.
    #[serde(default)]
    pub decrypt: DecryptConfig,

    /// Rendering of the decrypted document.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Decryption settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DecryptConfig {
    /// Which key slot unwraps the master key (default: `first`).
    #[serde(default)]
    pub slot_policy: SlotPolicy,

    /// Largest accepted scrypt `log2(n)`. Aegis writes 15.
    #[serde(default = "default_max_log_n")]
    pub max_log_n: u8,

    /// Largest accepted scrypt block size `r`. Aegis writes 8.
    #[serde(default = "default_max_r")]
    pub max_r: u32,

    /// Largest accepted scrypt parallelism `p`. Aegis writes 1.
    #[serde(default = "default_max_p")]
    pub max_p: u32,

    /// Largest scrypt working set (`128 * n * r` bytes) in MiB.
    /// Aegis vaults need 32.
    #[serde(default = "default_max_memory_mib")]
    pub max_memory_mib: u32,
}

impl Default for DecryptConfig {
    fn default() -> Self {
        Self {
            slot_policy: SlotPolicy::default(),
            max_log_n: default_max_log_n(),
            max_r: default_max_r(),
            max_p: default_max_p(),
            max_memory_mib: default_max_memory_mib(),
        }
    }
}

fn default_max_log_n() -> u8 {
    20
}

fn default_max_r() -> u32 {
    16
}

fn default_max_p() -> u32 {
    4
}

fn default_max_memory_mib() -> u32 {
    256
}

/// Output rendering settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Spaces per indentation level in the rendered JSON (default: 2).
    #[serde(default = "default_indent")]
    pub indent: u8,

    /// Drop `icon`, `icon_mime` and `icon_hash` from every entry.
    #[serde(default)]
    pub strip_icons: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            strip_icons: false,
        }
    }
}

fn default_indent() -> u8 {
    2
}
