// SPDX-FileCopyrightText: 2026 Aegis Unvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the Aegis vault decryptor.
//!
//! TOML files are layered with figment, unknown keys are rejected, values are
//! validated after loading and every problem is reported as a miette
//! diagnostic.
//!
//! # Usage
//!
//! ```no_run
//! use aegis_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("slot policy: {}", config.decrypt.slot_policy);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::{Path, PathBuf};

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::UnvaultConfig;

/// Load from the standard file hierarchy plus env overrides, then validate.
pub fn load_and_validate() -> Result<UnvaultConfig, Vec<ConfigError>> {
    finish(loader::load_config(), hierarchy_sources)
}

/// Load from one named file plus env overrides, then validate.
pub fn load_and_validate_path(path: &Path) -> Result<UnvaultConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        read_source(path).into_iter().collect()
    })
}

/// Load from a TOML string alone, then validate.
pub fn load_and_validate_str(toml_content: &str) -> Result<UnvaultConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

/// Validate a loaded config or turn the figment error into diagnostics.
/// `sources` is only read on failure, to place spans.
fn finish(
    loaded: Result<UnvaultConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<UnvaultConfig, Vec<ConfigError>> {
    let config =
        loaded.map_err(|err| diagnostic::figment_to_config_errors(err, &sources()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Every config file of the hierarchy that exists, named the way figment
/// records them.
fn hierarchy_sources() -> Vec<(String, String)> {
    let local = std::env::current_dir()
        .map(|dir| dir.join(loader::LOCAL_CONFIG_FILE))
        .unwrap_or_else(|_| PathBuf::from(loader::LOCAL_CONFIG_FILE));

    [Some(PathBuf::from(loader::SYSTEM_CONFIG_PATH)), loader::user_config_path(), Some(local)]
        .into_iter()
        .flatten()
        .filter_map(|path| read_source(&path))
        .collect()
}

fn read_source(path: &Path) -> Option<(String, String)> {
    let content = std::fs::read_to_string(path).ok()?;
    Some((path.display().to_string(), content))
}
