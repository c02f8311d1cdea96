// SPDX-FileCopyrightText: 2026 Aegis Unvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./unvault.toml` > `~/.config/aegis-unvault/unvault.toml`
//! > `/etc/aegis-unvault/unvault.toml`, with environment variable overrides via
//! the `AEGIS_UNVAULT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::UnvaultConfig;

/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "AEGIS_UNVAULT_";

/// Config sections an environment variable may target.
const SECTIONS: &[&str] = &["log", "decrypt", "output"];

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/aegis-unvault/unvault.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "unvault.toml";

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("aegis-unvault").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/aegis-unvault/unvault.toml` (system-wide)
/// 3. `~/.config/aegis-unvault/unvault.toml` (user XDG config)
/// 4. `./unvault.toml` (local directory)
/// 5. `AEGIS_UNVAULT_*` environment variables
pub fn load_config() -> Result<UnvaultConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<UnvaultConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(UnvaultConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
///
/// Unlike the XDG lookup, a missing file here is an error: the user named it.
pub fn load_config_from_path(path: &Path) -> Result<UnvaultConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(UnvaultConfig::default()))
        .merge(Toml::file_exact(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(UnvaultConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Environment provider mapping `AEGIS_UNVAULT_<SECTION>_<KEY>` to `section.key`.
///
/// Only variables naming a known section are picked up, so unrelated variables
/// sharing the prefix (the password variable in particular) never reach the
/// config model.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).filter_map(|key| map_env_key(key.as_str()).map(Into::into))
}

/// Map a prefix-stripped env key to its dotted config path.
pub(crate) fn map_env_key(key: &str) -> Option<String> {
    let key = key.to_ascii_lowercase();
    SECTIONS.iter().find_map(|section| {
        key.strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
            .filter(|rest| !rest.is_empty())
            .map(|rest| format!("{section}.{rest}"))
    })
}
