// SPDX-FileCopyrightText: 2026 Aegis Unvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The decryption pipeline: derive the slot key, unwrap the master key,
//! open the database payload.
//!
//! Key hierarchy:
//! - password + slot salt --scrypt--> slot key
//! - slot key opens the slot's wrapped master key (AES-256-GCM)
//! - master key opens the base64 `db` payload (AES-256-GCM)
//!
//! Either both tags verify and the full plaintext is returned, or nothing is.

use aegis_config::model::DecryptConfig;
use aegis_core::{SlotPolicy, UnvaultError};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use zeroize::Zeroizing;

use crate::container::{Container, Slot};
use crate::crypto::{self, KEY_LEN};
use crate::kdf::{self, KdfLimits};

/// Knobs of the pipeline that do not come from the vault file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecryptOptions {
    pub slot_policy: SlotPolicy,
    pub limits: KdfLimits,
}

impl From<&DecryptConfig> for DecryptOptions {
    fn from(config: &DecryptConfig) -> Self {
        Self {
            slot_policy: config.slot_policy,
            limits: KdfLimits::from(config),
        }
    }
}

/// Decrypts vault containers. Holds no secrets between calls.
#[derive(Debug, Clone, Default)]
pub struct VaultDecryptor {
    options: DecryptOptions,
}

impl VaultDecryptor {
    pub fn new(options: DecryptOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecryptOptions {
        &self.options
    }

    /// Decrypt `container` with `password` and return the plaintext database
    /// document.
    ///
    /// The payload fields are decoded before the KDF runs, so a corrupt `db`
    /// is reported without paying for scrypt.
    pub fn decrypt(
        &self,
        container: &Container,
        password: &SecretString,
    ) -> Result<Zeroizing<Vec<u8>>, UnvaultError> {
        container.check_version()?;
        let payload = container.payload()?;

        let master_key = self.select_master_key(container, password)?;

        let plaintext = crypto::open_detached(
            &master_key,
            &payload.params.nonce,
            &payload.ciphertext,
            &payload.params.tag,
        )?;

        debug!(bytes = plaintext.len(), "vault payload decrypted");
        Ok(plaintext)
    }

    /// Derive the slot key for `slot` and unwrap the master key with it.
    ///
    /// `index` is the slot's position in the header, used in error messages.
    pub fn unwrap_master_key(
        &self,
        slot: &Slot,
        index: usize,
        password: &SecretString,
    ) -> Result<Zeroizing<[u8; KEY_LEN]>, UnvaultError> {
        let material = slot.material(index)?;

        let slot_key = kdf::derive_slot_key(
            password.expose_secret().as_bytes(),
            &material.salt,
            &material.cost,
            &self.options.limits,
        )?;

        let unwrapped = crypto::open_detached(
            &slot_key,
            &material.params.nonce,
            &material.wrapped_key,
            &material.params.tag,
        )?;

        let mut master_key = Zeroizing::new([0u8; KEY_LEN]);
        if unwrapped.len() != KEY_LEN {
            return Err(UnvaultError::structural(
                &format!("header.slots[{index}].key"),
                format!("master key must be {KEY_LEN} bytes, got {}", unwrapped.len()),
            ));
        }
        master_key.copy_from_slice(&unwrapped);
        Ok(master_key)
    }

    fn select_master_key(
        &self,
        container: &Container,
        password: &SecretString,
    ) -> Result<Zeroizing<[u8; KEY_LEN]>, UnvaultError> {
        let slots = container.slots()?;

        match self.options.slot_policy {
            SlotPolicy::First => {
                debug!(slot = 0, total = slots.len(), "using first key slot");
                self.unwrap_master_key(&slots[0], 0, password)
            }
            SlotPolicy::AnyPassword => self.try_password_slots(slots, password),
        }
    }

    /// Try every password slot in order. Any slot that reached the tag check
    /// and failed makes the overall result an authentication failure; if none
    /// got that far the first structural error is returned.
    fn try_password_slots(
        &self,
        slots: &[Slot],
        password: &SecretString,
    ) -> Result<Zeroizing<[u8; KEY_LEN]>, UnvaultError> {
        let mut first_structural = None;
        let mut authentication_failed = false;

        for (index, slot) in slots.iter().enumerate() {
            if !slot.accepts_password() {
                debug!(slot = index, kind = ?slot.kind(), "skipping non-password slot");
                continue;
            }

            match self.unwrap_master_key(slot, index, password) {
                Ok(master_key) => {
                    debug!(slot = index, "master key unwrapped");
                    return Ok(master_key);
                }
                Err(UnvaultError::AuthenticationFailure) => {
                    debug!(slot = index, "slot did not authenticate");
                    authentication_failed = true;
                }
                Err(err @ UnvaultError::Structural(_)) => {
                    debug!(slot = index, "slot is malformed");
                    first_structural.get_or_insert(err);
                }
                Err(err) => return Err(err),
            }
        }

        if authentication_failed {
            return Err(UnvaultError::AuthenticationFailure);
        }
        Err(first_structural
            .unwrap_or_else(|| UnvaultError::structural("header.slots", "no password slot")))
    }
}

/// Decrypt with default options (first slot, default KDF limits).
pub fn decrypt(
    container: &Container,
    password: &SecretString,
) -> Result<Zeroizing<Vec<u8>>, UnvaultError> {
    VaultDecryptor::default().decrypt(container, password)
}
