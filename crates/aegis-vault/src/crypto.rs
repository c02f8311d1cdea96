// SPDX-FileCopyrightText: 2026 Aegis Unvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM open with the ciphertext and the tag passed separately.
//!
//! The vault stores every tag next to, not after, its ciphertext, so the
//! detached form is used instead of gluing the two buffers back together.

use aegis_core::UnvaultError;
use ring::aead::{Aad, LessSafeKey, Nonce, Tag, UnboundKey, AES_256_GCM};
use zeroize::Zeroizing;

/// AES-256 key length, for both the slot key and the master key.
pub const KEY_LEN: usize = 32;

/// GCM nonce length used by the vault format.
pub const NONCE_LEN: usize = ring::aead::NONCE_LEN;

/// GCM tag length used by the vault format.
pub const TAG_LEN: usize = 16;

/// Decrypt and authenticate `ciphertext` under `key` with an empty AAD.
///
/// A tag mismatch is reported as [`UnvaultError::AuthenticationFailure`] with
/// no further detail. The plaintext buffer is zeroed on drop.
pub fn open_detached(
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
    tag: &[u8; TAG_LEN],
) -> Result<Zeroizing<Vec<u8>>, UnvaultError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| UnvaultError::Internal("failed to create AES-256-GCM key".to_string()))?;
    let less_safe = LessSafeKey::new(unbound);

    let nonce = Nonce::assume_unique_for_key(*nonce);

    let mut in_out = Zeroizing::new(ciphertext.to_vec());
    less_safe
        .open_in_place_separate_tag(nonce, Aad::empty(), Tag::from(*tag), in_out.as_mut_slice(), 0..)
        .map_err(|_| UnvaultError::AuthenticationFailure)?;

    Ok(in_out)
}
