// SPDX-FileCopyrightText: 2026 Aegis Unvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The decrypted database document: typed view for listing entries and
//! re-rendering of the raw JSON for output.
//!
//! Rendering works on the untyped JSON value so fields this crate does not
//! model survive untouched.

use aegis_core::UnvaultError;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Entry fields holding icon data, dropped by [`RenderOptions::strip_icons`].
const ICON_FIELDS: &[&str] = &["icon", "icon_mime", "icon_hash"];

/// The plaintext database.
#[derive(Debug, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

/// One OTP entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "type")]
    pub method: OtpMethod,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub favorite: bool,
    pub info: EntryInfo,
}

/// OTP generation parameters. The secret is zeroed on drop.
#[derive(Debug, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct EntryInfo {
    pub secret: String,
    #[serde(rename = "algo", default)]
    #[zeroize(skip)]
    pub algorithm: HashAlgorithm,
    #[serde(default = "default_digits")]
    #[zeroize(skip)]
    pub digits: u32,
    #[serde(default)]
    #[zeroize(skip)]
    pub period: Option<u32>,
    #[serde(default)]
    #[zeroize(skip)]
    pub counter: Option<u64>,
    /// mOTP PIN.
    #[serde(default)]
    pub pin: Option<String>,
}

fn default_digits() -> u32 {
    6
}

/// How the one-time password is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OtpMethod {
    Totp,
    Hotp,
    Steam,
    Motp,
    Yandex,
    #[serde(other)]
    Unknown,
}

/// HMAC hash used by the entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum HashAlgorithm {
    #[default]
    Sha1,
    Sha256,
    Sha512,
    Md5,
    #[serde(other)]
    Unknown,
}

impl Database {
    /// Parse decrypted bytes as a database document.
    pub fn from_plaintext(plaintext: &[u8]) -> Result<Self, UnvaultError> {
        serde_json::from_slice(plaintext)
            .map_err(|e| UnvaultError::Structural(format!("decrypted database: {e}")))
    }

    /// Apply [`Entry::normalize_issuer`] to every entry.
    pub fn normalize_issuers(&mut self) {
        for entry in &mut self.entries {
            entry.normalize_issuer();
        }
    }
}

impl Entry {
    /// Fill an empty issuer from a `label@issuer` style name, splitting at the
    /// last `@`.
    pub fn normalize_issuer(&mut self) {
        if self.issuer.as_deref().is_some_and(|i| !i.trim().is_empty()) {
            return;
        }
        if let Some((label, issuer)) = self.name.rsplit_once('@')
            && !label.is_empty()
            && !issuer.is_empty()
        {
            let (label, issuer) = (label.to_string(), issuer.to_string());
            self.name = label;
            self.issuer = Some(issuer);
        }
    }

    pub fn issuer(&self) -> &str {
        self.issuer.as_deref().unwrap_or_default()
    }
}

/// How the decrypted document is re-emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Spaces per level; `0` renders compact JSON.
    pub indent: u8,
    pub strip_icons: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            strip_icons: false,
        }
    }
}

impl From<&aegis_config::model::OutputConfig> for RenderOptions {
    fn from(config: &aegis_config::model::OutputConfig) -> Self {
        Self {
            indent: config.indent,
            strip_icons: config.strip_icons,
        }
    }
}

/// Re-render the plaintext JSON document with the requested formatting.
pub fn render_json(
    plaintext: &[u8],
    options: &RenderOptions,
) -> Result<Zeroizing<String>, UnvaultError> {
    let mut document: Value = serde_json::from_slice(plaintext)
        .map_err(|e| UnvaultError::Structural(format!("decrypted database is not JSON: {e}")))?;

    if options.strip_icons {
        strip_icons(&mut document);
    }

    let mut out = Zeroizing::new(Vec::new());
    let result = if options.indent == 0 {
        serde_json::to_writer(&mut *out, &document)
    } else {
        let indent = vec![b' '; usize::from(options.indent)];
        let formatter = PrettyFormatter::with_indent(&indent);
        let mut serializer = serde_json::Serializer::with_formatter(&mut *out, formatter);
        document.serialize(&mut serializer)
    };
    result.map_err(|e| UnvaultError::Internal(format!("failed to render database: {e}")))?;

    let text = String::from_utf8(std::mem::take(&mut *out))
        .map_err(|e| UnvaultError::Internal(format!("rendered database is not UTF-8: {e}")))?;
    Ok(Zeroizing::new(text))
}

fn strip_icons(document: &mut Value) {
    let Some(entries) = document.get_mut("entries").and_then(Value::as_array_mut) else {
        return;
    };
    for entry in entries.iter_mut().filter_map(Value::as_object_mut) {
        for field in ICON_FIELDS {
            entry.remove(*field);
        }
    }
}

/// One line per entry: issuer, name, type, algorithm, digits. Never includes
/// secrets.
pub fn render_entry_table(database: &Database) -> String {
    const HEADERS: [&str; 5] = ["ISSUER", "NAME", "TYPE", "ALGO", "DIGITS"];

    let rows: Vec<[String; 5]> = database
        .entries
        .iter()
        .map(|entry| {
            [
                entry.issuer().to_string(),
                entry.name.clone(),
                entry.method.to_string(),
                entry.info.algorithm.to_string(),
                entry.info.digits.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_row = |cells: [&str; 5]| {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    };

    push_row(HEADERS);
    for row in &rows {
        push_row(row.each_ref().map(String::as_str));
    }
    out
}
