// SPDX-FileCopyrightText: 2026 Aegis Unvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Aegis vault decryptor.

use thiserror::Error;

/// The error type returned by every fallible operation in the workspace.
///
/// The decryption pipeline only ever produces [`UnvaultError::Structural`],
/// [`UnvaultError::AuthenticationFailure`] and [`UnvaultError::Internal`]. The
/// remaining variants belong to the collaborators around it (config, file
/// access, password prompt).
#[derive(Debug, Error)]
pub enum UnvaultError {
    /// The container is missing a required field or a field is not in the
    /// expected encoding (bad hex, bad base64, bad document syntax, wrong length).
    #[error("malformed vault: {0}")]
    Structural(String),

    /// An AEAD tag failed to verify. Wrong password, corrupted slot or a
    /// tampered payload all look the same from here.
    #[error("authentication failed: wrong password or corrupted vault")]
    AuthenticationFailure,

    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Config(String),

    /// Reading the vault file or writing the output failed.
    #[error("{context}: {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },

    /// The password could not be obtained.
    #[error("password error: {0}")]
    Password(String),

    /// A cryptographic primitive failed in a way the input cannot explain.
    #[error("internal error: {0}")]
    Internal(String),
}

impl UnvaultError {
    /// Shorthand for a [`UnvaultError::Structural`] naming the offending field.
    pub fn structural(field: &str, detail: impl std::fmt::Display) -> Self {
        Self::Structural(format!("{field}: {detail}"))
    }

    /// Returns `true` for container format problems.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Structural(_))
    }

    /// Returns `true` when an authentication tag did not verify.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailure)
    }

    /// Process exit code the CLI reports for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_message_names_field() {
        let err = UnvaultError::structural("header.slots[0].salt", "invalid hex");
        assert!(err.is_structural());
        assert!(!err.is_authentication_failure());
        assert_eq!(
            err.to_string(),
            "malformed vault: header.slots[0].salt: invalid hex"
        );
    }

    #[test]
    fn authentication_failure_has_no_detail() {
        let err = UnvaultError::AuthenticationFailure;
        assert!(err.is_authentication_failure());
        assert_eq!(
            err.to_string(),
            "authentication failed: wrong password or corrupted vault"
        );
    }

    #[test]
    fn exit_codes() {
        assert_eq!(UnvaultError::Config("x".into()).exit_code(), 2);
        assert_eq!(UnvaultError::AuthenticationFailure.exit_code(), 1);
        assert_eq!(UnvaultError::Structural("x".into()).exit_code(), 1);
    }
}
