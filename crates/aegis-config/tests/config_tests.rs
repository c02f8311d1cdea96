// SPDX-FileCopyrightText: 2026 Aegis Unvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the configuration system.

use std::io::Write;

use aegis_config::diagnostic::ConfigError;
use aegis_config::model::UnvaultConfig;
use aegis_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};
use aegis_core::SlotPolicy;
use serial_test::serial;

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_unvault_config() {
    let toml = r#"
[log]
level = "debug"

[decrypt]
slot_policy = "any_password"
max_log_n = 18
max_r = 16
max_p = 4
max_memory_mib = 512

[output]
indent = 4
strip_icons = true
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.log.level, "debug");
    assert_eq!(config.decrypt.slot_policy, SlotPolicy::AnyPassword);
    assert_eq!(config.decrypt.max_log_n, 18);
    assert_eq!(config.decrypt.max_r, 16);
    assert_eq!(config.decrypt.max_p, 4);
    assert_eq!(config.decrypt.max_memory_mib, 512);
    assert_eq!(config.output.indent, 4);
    assert!(config.output.strip_icons);
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.log.level, "warn");
    assert_eq!(config.decrypt.slot_policy, SlotPolicy::First);
    assert_eq!(config.decrypt.max_log_n, 20);
    assert_eq!(config.decrypt.max_r, 16);
    assert_eq!(config.decrypt.max_p, 4);
    assert_eq!(config.decrypt.max_memory_mib, 256);
    assert_eq!(config.output.indent, 2);
    assert!(!config.output.strip_icons);
}

/// Unknown key in [output] yields an UnknownKey diagnostic with a suggestion.
#[test]
fn unknown_key_produces_suggestion() {
    let toml = r#"
[output]
indnet = 4
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "indnet");
            assert_eq!(suggestion.as_deref(), Some("indent"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// Unknown top-level section is rejected.
#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[vault]
path = "x"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown section");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("vault"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// A string where a number is expected is reported as InvalidType.
#[test]
fn wrong_type_produces_invalid_type() {
    let toml = r#"
[output]
indent = "four"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject wrong type");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::InvalidType { .. })));
}

/// Well-formed but semantically invalid values fail validation.
#[test]
fn out_of_range_values_fail_validation() {
    let toml = r#"
[log]
level = "chatty"

[output]
indent = 40
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert_eq!(errors.len(), 2);
    assert!(errors
        .iter()
        .all(|e| matches!(e, ConfigError::Validation { .. })));
}

/// Dotted overrides (what the env provider produces) win over TOML.
#[test]
fn dotted_override_wins_over_toml() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let toml_content = r#"
[decrypt]
slot_policy = "first"
"#;

    let config: UnvaultConfig = Figment::new()
        .merge(Serialized::defaults(UnvaultConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(("decrypt.slot_policy", "any_password"))
        .extract()
        .expect("should merge override");

    assert_eq!(config.decrypt.slot_policy, SlotPolicy::AnyPassword);
}

/// An explicit config file is loaded and env vars still override it.
#[test]
#[serial]
fn explicit_path_with_env_override() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[output]\nindent = 4\n\n[log]\nlevel = \"info\"").unwrap();

    // SAFETY: test-only env mutation, serialized with #[serial].
    unsafe { std::env::set_var("AEGIS_UNVAULT_OUTPUT_STRIP_ICONS", "true") };
    let result = load_and_validate_path(file.path());
    unsafe { std::env::remove_var("AEGIS_UNVAULT_OUTPUT_STRIP_ICONS") };

    let config = result.expect("config should load");
    assert_eq!(config.output.indent, 4);
    assert_eq!(config.log.level, "info");
    assert!(config.output.strip_icons);
}

/// The password variable shares the prefix but must not leak into the model.
#[test]
#[serial]
fn password_env_var_is_not_a_config_key() {
    let file = tempfile::NamedTempFile::new().unwrap();

    unsafe { std::env::set_var("AEGIS_UNVAULT_PASSWORD", "hunter2") };
    let result = load_and_validate_path(file.path());
    unsafe { std::env::remove_var("AEGIS_UNVAULT_PASSWORD") };

    assert!(result.is_ok(), "password var should be ignored: {result:?}");
}

/// A named config file that does not exist is an error, not silently skipped.
#[test]
fn missing_explicit_file_is_an_error() {
    let result = load_and_validate_path(std::path::Path::new(
        "/nonexistent/aegis-unvault/unvault.toml",
    ));
    assert!(result.is_err());
}
