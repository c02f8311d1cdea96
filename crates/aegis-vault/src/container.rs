// SPDX-FileCopyrightText: 2026 Aegis Unvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serde model of the encrypted vault document and typed, length-checked
//! access to its hex and base64 fields.
//!
//! Parsing is lenient: every header field the decryptor needs is
//! optional at the serde level, so a slot of an unexpected kind still parses
//! and the missing piece is reported by name when decryption reaches it.
//! Unencrypted exports parse too; their `db` is the database object itself.

use aegis_core::UnvaultError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use zeroize::Zeroizing;

use crate::crypto::{KEY_LEN, NONCE_LEN, TAG_LEN};
use crate::kdf::ScryptCost;

/// The only container version this decryptor understands.
pub const SUPPORTED_VERSION: u32 = 1;

/// A parsed vault document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    /// Container format version (`1` for every Aegis release so far).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    pub header: Header,
    pub db: Db,
}

/// The `db` field: base64 ciphertext, or the database object of an
/// unencrypted export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Db {
    /// Base64 of the encrypted database, without its tag.
    Encrypted(String),
    Plaintext(Map<String, Value>),
}

impl Db {
    /// The base64 ciphertext, unless this is an unencrypted export.
    pub fn as_encrypted(&self) -> Option<&str> {
        match self {
            Self::Encrypted(text) => Some(text),
            Self::Plaintext(_) => None,
        }
    }

    pub fn is_plaintext(&self) -> bool {
        matches!(self, Self::Plaintext(_))
    }
}

impl From<String> for Db {
    fn from(text: String) -> Self {
        Self::Encrypted(text)
    }
}

impl From<&str> for Db {
    fn from(text: &str) -> Self {
        Self::Encrypted(text.to_string())
    }
}

/// Key slots plus the AEAD parameters of the database payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub slots: Option<Vec<Slot>>,
    #[serde(default)]
    pub params: Option<AeadParams>,
}

/// One method of unlocking the master key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Slot {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub slot_type: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    /// Hex of the wrapped master key, without its tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_params: Option<AeadParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<u32>,
    /// Hex of the scrypt salt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repaired: Option<bool>,
}

/// Hex-encoded nonce and tag that accompany one AEAD ciphertext.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AeadParams {
    pub nonce: String,
    pub tag: String,
}

/// Slot kinds as numbered by the Aegis format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotType {
    Raw,
    Password,
    Biometric,
    Unknown(u32),
}

impl From<u32> for SlotType {
    fn from(value: u32) -> Self {
        match value {
            0 => Self::Raw,
            1 => Self::Password,
            2 => Self::Biometric,
            other => Self::Unknown(other),
        }
    }
}

/// Decoded nonce and tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedParams {
    pub nonce: [u8; NONCE_LEN],
    pub tag: [u8; TAG_LEN],
}

/// Everything a slot contributes to the unwrap step, decoded.
#[derive(Debug, Clone)]
pub struct SlotMaterial {
    pub salt: Vec<u8>,
    pub cost: ScryptCost,
    pub wrapped_key: [u8; KEY_LEN],
    pub params: DecodedParams,
}

/// The database ciphertext together with its own nonce and tag.
#[derive(Debug, Clone)]
pub struct Payload {
    pub ciphertext: Vec<u8>,
    pub params: DecodedParams,
}

impl Container {
    /// Parse a vault document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, UnvaultError> {
        serde_json::from_str(text)
            .map_err(|e| UnvaultError::Structural(format!("invalid vault document: {e}")))
    }

    /// Parse a vault document from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, UnvaultError> {
        serde_json::from_slice(bytes)
            .map_err(|e| UnvaultError::Structural(format!("invalid vault document: {e}")))
    }

    /// Serialize back to pretty JSON, the layout Aegis itself writes.
    pub fn to_json_pretty(&self) -> Result<String, UnvaultError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| UnvaultError::Internal(format!("failed to serialize vault: {e}")))
    }

    /// Reject container versions this decryptor does not know.
    pub fn check_version(&self) -> Result<(), UnvaultError> {
        match self.version {
            None | Some(SUPPORTED_VERSION) => Ok(()),
            Some(other) => Err(UnvaultError::structural(
                "version",
                format!("unsupported vault version {other}, expected {SUPPORTED_VERSION}"),
            )),
        }
    }

    /// JSON bytes of the database of an unencrypted export, in the same form
    /// decryption yields. `None` when the database is encrypted.
    pub fn plaintext_database(&self) -> Result<Option<Zeroizing<Vec<u8>>>, UnvaultError> {
        let Db::Plaintext(database) = &self.db else {
            return Ok(None);
        };
        let bytes = serde_json::to_vec(database)
            .map_err(|e| UnvaultError::Internal(format!("failed to serialize database: {e}")))?;
        Ok(Some(Zeroizing::new(bytes)))
    }

    /// The slot list, which must exist and be non-empty.
    pub fn slots(&self) -> Result<&[Slot], UnvaultError> {
        match self.header.slots.as_deref() {
            None => Err(UnvaultError::structural("header.slots", "missing")),
            Some([]) => Err(UnvaultError::structural("header.slots", "no key slots")),
            Some(slots) => Ok(slots),
        }
    }

    /// Decode the database ciphertext and its AEAD parameters.
    pub fn payload(&self) -> Result<Payload, UnvaultError> {
        let encoded = self
            .db
            .as_encrypted()
            .ok_or_else(|| UnvaultError::structural("db", "not encrypted (plaintext export)"))?;
        let params = self
            .header
            .params
            .as_ref()
            .ok_or_else(|| UnvaultError::structural("header.params", "missing"))?
            .decode("header.params")?;
        let ciphertext = BASE64
            .decode(encoded.trim())
            .map_err(|e| UnvaultError::structural("db", format!("invalid base64: {e}")))?;
        Ok(Payload { ciphertext, params })
    }
}

impl Slot {
    /// The slot kind, if the document states one.
    pub fn kind(&self) -> Option<SlotType> {
        self.slot_type.map(SlotType::from)
    }

    /// Whether a password can possibly unlock this slot. Slots without a
    /// `type` field are given the benefit of the doubt.
    pub fn accepts_password(&self) -> bool {
        matches!(self.kind(), None | Some(SlotType::Password))
    }

    /// Decode every field the unwrap step needs. `index` is only used to name
    /// fields in error messages.
    pub fn material(&self, index: usize) -> Result<SlotMaterial, UnvaultError> {
        let field = |name: &str| format!("header.slots[{index}].{name}");

        let salt_hex = self
            .salt
            .as_deref()
            .ok_or_else(|| UnvaultError::structural(&field("salt"), "missing"))?;
        let salt = hex::decode(salt_hex.trim())
            .map_err(|e| UnvaultError::structural(&field("salt"), format!("invalid hex: {e}")))?;
        if salt.is_empty() {
            return Err(UnvaultError::structural(&field("salt"), "empty"));
        }

        let cost = ScryptCost {
            n: self
                .n
                .ok_or_else(|| UnvaultError::structural(&field("n"), "missing"))?,
            r: self
                .r
                .ok_or_else(|| UnvaultError::structural(&field("r"), "missing"))?,
            p: self
                .p
                .ok_or_else(|| UnvaultError::structural(&field("p"), "missing"))?,
        };

        let key_hex = self
            .key
            .as_deref()
            .ok_or_else(|| UnvaultError::structural(&field("key"), "missing"))?;
        let wrapped_key = decode_fixed::<KEY_LEN>(&field("key"), key_hex)?;

        let params = self
            .key_params
            .as_ref()
            .ok_or_else(|| UnvaultError::structural(&field("key_params"), "missing"))?
            .decode(&field("key_params"))?;

        Ok(SlotMaterial {
            salt,
            cost,
            wrapped_key,
            params,
        })
    }
}

impl AeadParams {
    /// Decode nonce and tag. `prefix` names the params object in errors.
    pub fn decode(&self, prefix: &str) -> Result<DecodedParams, UnvaultError> {
        Ok(DecodedParams {
            nonce: decode_fixed::<NONCE_LEN>(&format!("{prefix}.nonce"), &self.nonce)?,
            tag: decode_fixed::<TAG_LEN>(&format!("{prefix}.tag"), &self.tag)?,
        })
    }
}

/// Decode a hex string that must be exactly `N` bytes long.
fn decode_fixed<const N: usize>(field: &str, value: &str) -> Result<[u8; N], UnvaultError> {
    let bytes = hex::decode(value.trim())
        .map_err(|e| UnvaultError::structural(field, format!("invalid hex: {e}")))?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| UnvaultError::structural(field, format!("expected {N} bytes, got {len}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_slot() -> Slot {
        Slot {
            slot_type: Some(1),
            uuid: Some("a".into()),
            key: Some("11".repeat(32)),
            key_params: Some(AeadParams {
                nonce: "22".repeat(12),
                tag: "33".repeat(16),
            }),
            n: Some(32768),
            r: Some(8),
            p: Some(1),
            salt: Some("44".repeat(32)),
            repaired: None,
        }
    }

    #[test]
    fn slot_material_decodes_all_fields() {
        let material = sample_slot().material(0).unwrap();
        assert_eq!(material.salt, vec![0x44; 32]);
        assert_eq!(material.cost, ScryptCost { n: 32768, r: 8, p: 1 });
        assert_eq!(material.wrapped_key, [0x11; 32]);
        assert_eq!(material.params.nonce, [0x22; 12]);
        assert_eq!(material.params.tag, [0x33; 16]);
    }

    #[test]
    fn non_hex_salt_is_structural() {
        let mut slot = sample_slot();
        slot.salt = Some("not hex at all".into());
        let err = slot.material(0).unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains("header.slots[0].salt"));
    }

    #[test]
    fn missing_fields_are_named() {
        for (name, strip) in [
            ("salt", (|s: &mut Slot| s.salt = None) as fn(&mut Slot)),
            ("n", |s: &mut Slot| s.n = None),
            ("key", |s: &mut Slot| s.key = None),
            ("key_params", |s: &mut Slot| s.key_params = None),
        ] {
            let mut slot = sample_slot();
            strip(&mut slot);
            let err = slot.material(3).unwrap_err();
            assert!(err.is_structural());
            assert!(
                err.to_string().contains(&format!("header.slots[3].{name}")),
                "unexpected message: {err}"
            );
        }
    }

    #[test]
    fn short_nonce_is_structural() {
        let params = AeadParams {
            nonce: "00".repeat(8),
            tag: "00".repeat(16),
        };
        let err = params.decode("header.params").unwrap_err();
        assert!(err.to_string().contains("header.params.nonce"));
        assert!(err.to_string().contains("expected 12 bytes, got 8"));
    }

    #[test]
    fn long_tag_is_structural() {
        let params = AeadParams {
            nonce: "00".repeat(12),
            tag: "00".repeat(17),
        };
        let err = params.decode("header.params").unwrap_err();
        assert!(err.to_string().contains("header.params.tag"));
    }

    #[test]
    fn slot_type_classification() {
        assert_eq!(SlotType::from(0), SlotType::Raw);
        assert_eq!(SlotType::from(1), SlotType::Password);
        assert_eq!(SlotType::from(2), SlotType::Biometric);
        assert_eq!(SlotType::from(9), SlotType::Unknown(9));

        let mut slot = sample_slot();
        assert!(slot.accepts_password());
        slot.slot_type = None;
        assert!(slot.accepts_password());
        slot.slot_type = Some(2);
        assert!(!slot.accepts_password());
    }

    #[test]
    fn empty_slot_list_is_structural() {
        let container = Container::from_json(
            r#"{"header": {"slots": [], "params": {"nonce": "", "tag": ""}}, "db": ""}"#,
        )
        .unwrap();
        assert!(container.slots().unwrap_err().is_structural());
    }

    const PLAINTEXT_EXPORT: &str = r#"{"version": 1, "header": {"slots": null, "params": null}, "db": {"version": 3, "entries": []}}"#;

    #[test]
    fn plaintext_export_parses_with_database_object() {
        let container = Container::from_json(PLAINTEXT_EXPORT).unwrap();
        assert!(container.db.is_plaintext());
        assert!(container.check_version().is_ok());

        let bytes = container.plaintext_database().unwrap().unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["version"], 3);
        assert!(value["entries"].as_array().unwrap().is_empty());
    }

    #[test]
    fn plaintext_export_has_no_payload() {
        let container = Container::from_json(PLAINTEXT_EXPORT).unwrap();
        let err = container.payload().unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains("plaintext export"), "{err}");
    }

    #[test]
    fn encrypted_container_has_no_plaintext_database() {
        let container = Container::from_json(r#"{"header": {}, "db": "AAAA"}"#).unwrap();
        assert_eq!(container.db.as_encrypted(), Some("AAAA"));
        assert!(container.plaintext_database().unwrap().is_none());
    }

    #[test]
    fn non_object_db_is_structural() {
        for db in ["[]", "3", "null", "true"] {
            let text = format!(r#"{{"header": {{}}, "db": {db}}}"#);
            let err = Container::from_json(&text).unwrap_err();
            assert!(err.is_structural(), "db = {db}");
        }
    }

    #[test]
    fn bad_document_syntax_is_structural() {
        assert!(Container::from_json("{ not json").unwrap_err().is_structural());
        assert!(Container::from_slice(b"[]").unwrap_err().is_structural());
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let container =
            Container::from_json(r#"{"version": 2, "header": {}, "db": ""}"#).unwrap();
        assert!(container.check_version().unwrap_err().is_structural());

        let container = Container::from_json(r#"{"header": {}, "db": ""}"#).unwrap();
        assert!(container.check_version().is_ok());
    }

    #[test]
    fn non_base64_db_is_structural() {
        let container = Container {
            version: Some(1),
            header: Header {
                slots: Some(vec![sample_slot()]),
                params: Some(AeadParams {
                    nonce: "00".repeat(12),
                    tag: "00".repeat(16),
                }),
            },
            db: "***not base64***".into(),
        };
        let err = container.payload().unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains("db"));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let container = Container::from_json(
            r#"{"version": 1, "header": {"slots": [{"type": 1, "future": true}], "params": null}, "db": "", "extra": 5}"#,
        )
        .unwrap();
        assert_eq!(container.slots().unwrap().len(), 1);
    }
}
