// SPDX-FileCopyrightText: 2026 Aegis Unvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core definitions for the Aegis vault decryptor.
//!
//! This crate holds the error type every other crate in the workspace returns,
//! plus the small enums shared between the configuration layer and the
//! decryption pipeline.

pub mod error;
pub mod types;

pub use error::UnvaultError;
pub use types::SlotPolicy;
