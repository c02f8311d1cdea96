// SPDX-FileCopyrightText: 2026 Aegis Unvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns figment errors into miette diagnostics.
//!
//! Unknown keys get a source span and a "did you mean" hint (Jaro-Winkler via
//! `strsim`); type and variant mismatches name the dotted key path.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use figment::error::Kind;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Below this similarity no correction is offered.
const MIN_SIMILARITY: f64 = 0.75;

/// A configuration problem, renderable with miette.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(aegis_unvault::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Closest valid key, if one is close enough.
        suggestion: Option<String>,
        /// Comma-separated keys accepted at this position.
        valid_keys: String,
        #[label("not a known key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(aegis_unvault::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    /// A string that is not one of an enum's spellings.
    #[error("invalid value for key `{key}`: {detail}")]
    #[diagnostic(code(aegis_unvault::config::invalid_value))]
    InvalidValue { key: String, detail: String },

    #[error("validation error: {message}")]
    #[diagnostic(code(aegis_unvault::config::validation))]
    Validation { message: String },

    /// Anything else figment reports, e.g. an unreadable explicit file.
    #[error("configuration error: {0}")]
    #[diagnostic(code(aegis_unvault::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

impl ConfigError {
    /// Classify one figment error. `sources` are `(name, content)` pairs of
    /// the TOML files that fed the figment, used to place spans.
    fn from_figment(error: &figment::Error, sources: &[(String, String)]) -> Self {
        let key = error.path.join(".");

        match &error.kind {
            Kind::UnknownField(field, expected) => {
                let (span, src) = locate(error, field, sources)
                    .map(|(name, content, offset)| {
                        (
                            Some(SourceSpan::new(offset.into(), field.len())),
                            Some(NamedSource::new(name, content.to_string())),
                        )
                    })
                    .unwrap_or((None, None));
                Self::UnknownKey {
                    key: field.clone(),
                    suggestion: suggest_key(field, expected),
                    valid_keys: expected.join(", "),
                    span,
                    src,
                }
            }
            Kind::InvalidType(actual, expected) => Self::InvalidType {
                key,
                detail: format!("found {actual}"),
                expected: expected.clone(),
            },
            Kind::UnknownVariant(variant, expected) => Self::InvalidValue {
                key,
                detail: format!(
                    "`{variant}` is not one of: {}",
                    expected.join(", ")
                ),
            },
            _ => Self::Other(error.to_string()),
        }
    }
}

/// Convert a figment error, which may bundle several, into diagnostics.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| ConfigError::from_figment(&error, toml_sources))
        .collect()
}

/// Find which source produced `error` and where `field` sits in it.
fn locate<'a>(
    error: &figment::Error,
    field: &str,
    sources: &'a [(String, String)],
) -> Option<(&'a str, &'a str, usize)> {
    let origin = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|source| source.file_path())
        .map(|path| path.display().to_string());

    // `Toml::string` sources carry no path; with a single candidate it is unambiguous.
    let (name, content) = match (origin, sources) {
        (Some(path), _) => sources.iter().find(|(name, _)| *name == path)?,
        (None, [only]) => only,
        (None, _) => return None,
    };

    let table = error.path.first().map(String::as_str);
    let offset = find_key_offset(content, table, field)?;
    Some((name.as_str(), content.as_str(), offset))
}

/// Byte offset of `key` inside `[table]`, or among the top-level keys when
/// `table` is `None`. Comment lines are skipped.
pub fn find_key_offset(content: &str, table: Option<&str>, key: &str) -> Option<usize> {
    let mut current: Option<&str> = None;
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let start = offset;
        offset += line.len();

        let body = line.trim_start();
        let indent = line.len() - body.len();

        if let Some(header) = body.strip_prefix('[') {
            current = header.split(']').next().map(str::trim);
            continue;
        }
        if current != table || body.starts_with('#') {
            continue;
        }

        if let Some(rest) = body.strip_prefix(key)
            && rest.trim_start().starts_with('=')
        {
            return Some(start + indent);
        }
    }

    None
}

/// The valid key most similar to `unknown`, if any is similar enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > MIN_SIMILARITY)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Print every error to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut rendered = String::new();
        match handler.render_report(&mut rendered, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{rendered}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }
}
