// SPDX-FileCopyrightText: 2026 Aegis Unvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! aegis-unvault - decrypt a password-protected Aegis vault export.
//!
//! This is the binary entry point. The heavy lifting lives in `aegis-vault`.

mod unvault;

use std::path::PathBuf;

use aegis_config::{ConfigError, UnvaultConfig};
use aegis_core::{SlotPolicy, UnvaultError};
use clap::Parser;

/// Decrypt a password-protected Aegis Authenticator vault export.
#[derive(Parser, Debug)]
#[command(name = "aegis-unvault", version, about, long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the default locations.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print one line per entry instead of the decrypted JSON document.
    #[arg(long)]
    pub list: bool,

    /// Which key slots to try: `first` or `any-password`.
    #[arg(long, value_name = "POLICY")]
    pub slot_policy: Option<SlotPolicy>,

    /// Write the output to this file instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// The encrypted vault export (JSON).
    #[arg(value_name = "VAULT_FILE")]
    pub vault: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let mut config = match load_config(&cli) {
        Ok(config) => config,
        Err(errors) => {
            aegis_config::render_errors(&errors);
            let err = UnvaultError::Config(format!("{} configuration error(s)", errors.len()));
            eprintln!("error: {err}");
            std::process::exit(err.exit_code());
        }
    };
    if let Some(policy) = cli.slot_policy {
        config.decrypt.slot_policy = policy;
    }

    init_tracing(&config.log.level);

    if let Err(err) = unvault::run(&cli, &config) {
        eprintln!("error: {err}");
        std::process::exit(err.exit_code());
    }
}

fn load_config(cli: &Cli) -> Result<UnvaultConfig, Vec<ConfigError>> {
    match &cli.config {
        Some(path) => aegis_config::load_and_validate_path(path),
        None => aegis_config::load_and_validate(),
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let level = log_level.trim().to_ascii_lowercase();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "aegis_unvault={level},aegis_vault={level},aegis_config={level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
