// SPDX-FileCopyrightText: 2026 Aegis Unvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared types used by both the configuration layer and the decryptor.

use serde::{Deserialize, Serialize};

/// How the decryptor picks the key slot used to unwrap the master key.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "kebab-case")]
pub enum SlotPolicy {
    /// Use slot 0 and nothing else. Format mismatches surface downstream.
    #[default]
    First,
    /// Try every password slot in order until one authenticates.
    AnyPassword,
}
