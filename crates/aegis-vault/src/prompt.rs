// SPDX-FileCopyrightText: 2026 Aegis Unvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password acquisition via TTY prompt or the AEGIS_UNVAULT_PASSWORD environment variable.

use aegis_core::UnvaultError;
use secrecy::SecretString;

/// The environment variable name for providing the vault password.
pub const PASSWORD_ENV_VAR: &str = "AEGIS_UNVAULT_PASSWORD";

/// Get the vault password from the environment or an interactive TTY prompt.
///
/// Priority:
/// 1. `AEGIS_UNVAULT_PASSWORD` environment variable (scripts, CI)
/// 2. Interactive TTY prompt via `rpassword`
///
/// Returns an error if neither source is available.
pub fn get_password() -> Result<SecretString, UnvaultError> {
    if let Ok(password) = std::env::var(PASSWORD_ENV_VAR)
        && !password.is_empty()
    {
        return Ok(SecretString::from(password));
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        let password = rpassword::prompt_password("Password: ")
            .map_err(|e| UnvaultError::Password(format!("failed to read password: {e}")))?;
        if password.is_empty() {
            return Err(UnvaultError::Password("empty password not allowed".to_string()));
        }
        return Ok(SecretString::from(password));
    }

    Err(UnvaultError::Password(format!(
        "no password provided. Set {PASSWORD_ENV_VAR} or run interactively."
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serial_test::serial;

    #[test]
    #[serial]
    fn get_password_from_env_var() {
        // SAFETY: test-only env mutation, serialized with #[serial].
        unsafe { std::env::set_var(PASSWORD_ENV_VAR, "correct horse") };
        let result = get_password();
        unsafe { std::env::remove_var(PASSWORD_ENV_VAR) };

        assert_eq!(result.unwrap().expose_secret(), "correct horse");
    }

    #[test]
    #[serial]
    fn empty_env_var_is_rejected() {
        unsafe { std::env::set_var(PASSWORD_ENV_VAR, "") };
        // In CI/test, stdin is not a terminal, so this will fail.
        let result = get_password();
        unsafe { std::env::remove_var(PASSWORD_ENV_VAR) };

        assert!(matches!(result, Err(UnvaultError::Password(_))));
    }
}
