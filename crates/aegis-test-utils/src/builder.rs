// SPDX-FileCopyrightText: 2026 Aegis Unvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builder that encrypts a plaintext document into a vault container.

use aegis_vault::{AeadParams, Container, Header, Slot};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use ring::rand::{SecureRandom, SystemRandom};

/// Scrypt `n` that keeps tests fast.
pub const FAST_N: u32 = 1024;

/// Builder for encrypted test vaults.
///
/// Salt, nonces and master key are random unless pinned.
pub struct VaultBuilder {
    password: String,
    plaintext: Vec<u8>,
    n: u32,
    r: u32,
    p: u32,
    salt: Option<Vec<u8>>,
    master_key: Option<[u8; 32]>,
    slots_before: Vec<Slot>,
}

impl VaultBuilder {
    pub fn new(password: &str) -> Self {
        Self {
            password: password.to_string(),
            plaintext: br#"{"version": 3, "entries": []}"#.to_vec(),
            n: FAST_N,
            r: 8,
            p: 1,
            salt: None,
            master_key: None,
            slots_before: Vec::new(),
        }
    }

    /// Set the document to encrypt.
    pub fn with_plaintext(mut self, plaintext: impl Into<Vec<u8>>) -> Self {
        self.plaintext = plaintext.into();
        self
    }

    /// Set scrypt cost parameters of the password slot.
    pub fn with_scrypt(mut self, n: u32, r: u32, p: u32) -> Self {
        self.n = n;
        self.r = r;
        self.p = p;
        self
    }

    /// Pin the scrypt salt.
    pub fn with_salt(mut self, salt: &[u8]) -> Self {
        self.salt = Some(salt.to_vec());
        self
    }

    /// Pin the master key.
    pub fn with_master_key(mut self, key: [u8; 32]) -> Self {
        self.master_key = Some(key);
        self
    }

    /// Put `slot` in front of the password slot.
    pub fn with_slot_before(mut self, slot: Slot) -> Self {
        self.slots_before.push(slot);
        self
    }

    /// Encrypt and assemble the container.
    pub fn build(self) -> Container {
        let master_key = self.master_key.unwrap_or_else(random_bytes::<32>);
        let salt = self.salt.unwrap_or_else(|| random_bytes::<32>().to_vec());

        let log_n = u8::try_from(self.n.trailing_zeros()).expect("n fits in u8");
        let params = scrypt::Params::new(log_n, self.r, self.p, 32).expect("valid scrypt params");
        let mut slot_key = [0u8; 32];
        scrypt::scrypt(self.password.as_bytes(), &salt, &params, &mut slot_key)
            .expect("scrypt derivation");

        let (wrapped_key, key_params) = seal(&slot_key, &master_key);
        let (db, db_params) = seal(&master_key, &self.plaintext);

        let mut slots = self.slots_before;
        slots.push(Slot {
            slot_type: Some(1),
            uuid: Some("00000000-0000-4000-8000-000000000001".to_string()),
            key: Some(hex::encode(wrapped_key)),
            key_params: Some(key_params),
            n: Some(self.n),
            r: Some(self.r),
            p: Some(self.p),
            salt: Some(hex::encode(salt)),
            repaired: Some(true),
        });

        Container {
            version: Some(1),
            header: Header {
                slots: Some(slots),
                params: Some(db_params),
            },
            db: BASE64.encode(db).into(),
        }
    }
}

/// A biometric slot as Aegis writes it: no salt and no scrypt parameters.
pub fn biometric_slot() -> Slot {
    Slot {
        slot_type: Some(2),
        uuid: Some("00000000-0000-4000-8000-000000000002".to_string()),
        key: Some(hex::encode(random_bytes::<32>())),
        key_params: Some(AeadParams {
            nonce: hex::encode(random_bytes::<12>()),
            tag: hex::encode(random_bytes::<16>()),
        }),
        ..Slot::default()
    }
}

/// Flip bit `bit` (counted from the first byte's least significant bit) of a
/// hex string.
pub fn flip_hex_bit(value: &str, bit: usize) -> String {
    let mut bytes = hex::decode(value).expect("valid hex");
    let len = bytes.len();
    bytes[(bit / 8) % len] ^= 1 << (bit % 8);
    hex::encode(bytes)
}

fn seal(key: &[u8; 32], plaintext: &[u8]) -> (Vec<u8>, AeadParams) {
    let key = LessSafeKey::new(UnboundKey::new(&AES_256_GCM, key).expect("AES-256 key"));
    let nonce = random_bytes::<12>();
    let mut in_out = plaintext.to_vec();
    let tag = key
        .seal_in_place_separate_tag(Nonce::assume_unique_for_key(nonce), Aad::empty(), &mut in_out)
        .expect("AES-256-GCM seal");
    let tag: &[u8] = tag.as_ref();
    let params = AeadParams {
        nonce: hex::encode(nonce),
        tag: hex::encode(tag),
    };
    (in_out, params)
}

fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    SystemRandom::new().fill(&mut bytes).expect("system RNG");
    bytes
}
