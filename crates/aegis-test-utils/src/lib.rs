// SPDX-FileCopyrightText: 2026 Aegis Unvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Aegis Unvault.
//!
//! The decryptor only reads vaults, so tests need something that writes them.
//! [`VaultBuilder`] is a small reference encryptor built directly on `ring` and
//! `scrypt`, independent of the code under test.
//!
//! # Components
//!
//! - [`VaultBuilder`] - builds encrypted containers with chosen password, cost and plaintext
//! - [`fixtures`] - vaults produced by an independent encryptor, with known contents

pub mod builder;
pub mod fixtures;

pub use builder::{biometric_slot, flip_hex_bit, VaultBuilder, FAST_N};
