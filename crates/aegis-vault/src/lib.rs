// SPDX-FileCopyrightText: 2026 Aegis Unvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decryption of password-protected Aegis vault exports.
//!
//! An encrypted vault holds a random master key wrapped once per key slot.
//! A password slot's wrapping key is derived from the password with scrypt;
//! the master key in turn opens the base64 database payload. Both layers are
//! AES-256-GCM, so a wrong password or any tampering fails authentication
//! instead of producing garbage.

pub mod container;
pub mod crypto;
pub mod database;
pub mod decrypt;
pub mod kdf;
pub mod prompt;

pub use container::{AeadParams, Container, Db, Header, Slot, SlotType};
pub use database::{render_entry_table, render_json, Database, Entry, RenderOptions};
pub use decrypt::{decrypt, DecryptOptions, VaultDecryptor};
pub use kdf::{KdfLimits, ScryptCost};
pub use prompt::get_password;
