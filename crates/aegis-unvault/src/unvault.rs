// SPDX-FileCopyrightText: 2026 Aegis Unvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read, decrypt, render, write.

use std::io::Write;
use std::path::Path;

use aegis_config::UnvaultConfig;
use aegis_core::UnvaultError;
use aegis_vault::{
    get_password, render_entry_table, render_json, Container, Database, DecryptOptions,
    RenderOptions, VaultDecryptor,
};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::Cli;

/// Decrypt the vault named on the command line and emit the result.
/// Unencrypted exports are rendered as they are, without a password.
///
/// Nothing is written anywhere unless decryption and rendering both succeed.
pub fn run(cli: &Cli, config: &UnvaultConfig) -> Result<(), UnvaultError> {
    let container = read_container(&cli.vault)?;
    container.check_version()?;

    let plaintext = match container.plaintext_database()? {
        Some(plaintext) => {
            info!("vault is not encrypted, skipping the password");
            plaintext
        }
        None => decrypt_container(&container, config)?,
    };

    let rendered = if cli.list {
        let mut database = Database::from_plaintext(&plaintext)?;
        database.normalize_issuers();
        info!(entries = database.entries.len(), "vault decrypted");
        Zeroizing::new(render_entry_table(&database))
    } else {
        render_json(&plaintext, &RenderOptions::from(&config.output))?
    };

    match &cli.output {
        Some(path) => write_file(path, &rendered),
        None => write_stdout(&rendered),
    }
}

fn decrypt_container(
    container: &Container,
    config: &UnvaultConfig,
) -> Result<Zeroizing<Vec<u8>>, UnvaultError> {
    // Fail on a slotless file before prompting.
    container.slots()?;

    let password = get_password()?;

    let decryptor = VaultDecryptor::new(DecryptOptions::from(&config.decrypt));
    debug!(policy = %decryptor.options().slot_policy, "decrypting vault");
    decryptor.decrypt(container, &password)
}

fn read_container(path: &Path) -> Result<Container, UnvaultError> {
    let bytes = std::fs::read(path).map_err(|source| UnvaultError::Io {
        context: format!("failed to read {}", path.display()),
        source,
    })?;
    Container::from_slice(&bytes)
}

fn write_stdout(rendered: &str) -> Result<(), UnvaultError> {
    let mut stdout = std::io::stdout().lock();
    write_rendered(&mut stdout, rendered).map_err(|source| UnvaultError::Io {
        context: "failed to write to stdout".to_string(),
        source,
    })
}

/// Write the document to a temporary file next to `path`, then rename it
/// over `path`. The result is owner-only on Unix even when `path` already
/// existed, and a failed write leaves an existing `path` untouched.
fn write_file(path: &Path, rendered: &str) -> Result<(), UnvaultError> {
    let io_error = |source| UnvaultError::Io {
        context: format!("failed to write {}", path.display()),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // Created with mode 0600 on Unix.
    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(io_error)?;
    write_rendered(&mut file, rendered).map_err(io_error)?;
    file.as_file().sync_all().map_err(io_error)?;
    file.persist(path).map_err(|e| io_error(e.error))?;

    info!(path = %path.display(), "decrypted vault written");
    Ok(())
}

fn write_rendered(out: &mut impl Write, rendered: &str) -> std::io::Result<()> {
    out.write_all(rendered.as_bytes())?;
    if !rendered.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush()
}
