// SPDX-FileCopyrightText: 2026 Aegis Unvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault files produced by an independent reference encryptor.

use std::path::PathBuf;

/// Password `correct horse`, one password slot, `n = 16384, r = 8, p = 1`.
pub const CORRECT_HORSE_VAULT: &str = include_str!("../fixtures/correct_horse.json");
pub const CORRECT_HORSE_PASSWORD: &str = "correct horse";
pub const CORRECT_HORSE_PLAINTEXT: &str = r#"{"entries": []}"#;

/// Password `test`. Slot 0 is biometric, slot 1 the password slot
/// (`n = 1024`). The database holds two entries (TOTP and HOTP).
pub const MULTI_SLOT_VAULT: &str = include_str!("../fixtures/multi_slot.json");
pub const MULTI_SLOT_PASSWORD: &str = "test";

/// On-disk path of a fixture, for tests that drive the CLI.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

/// An unencrypted Aegis export: `header.slots` and `header.params` are null
/// and `db` is the database object itself. Its one TOTP entry has an empty
/// issuer and an `alice@example.com` name.
pub fn plaintext_export() -> String {
    serde_json::json!({
        "version": 1,
        "header": { "slots": null, "params": null },
        "db": {
            "version": 3,
            "entries": [{
                "type": "totp",
                "uuid": "3ae6f1ad-2e65-4ed2-a953-1ec0dff2386d",
                "name": "alice@example.com",
                "issuer": "",
                "info": {
                    "secret": "JBSWY3DPEHPK3PXP",
                    "algo": "SHA1",
                    "digits": 6,
                    "period": 30
                }
            }]
        }
    })
    .to_string()
}
