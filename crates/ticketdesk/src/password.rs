// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password acquisition for `ticketdesk hash-password`.

use secrecy::{ExposeSecret, SecretString};
use ticketdesk_core::TicketdeskError;

/// Environment variable consulted before prompting.
pub const PASSWORD_ENV_VAR: &str = "TICKETDESK_PASSWORD";

/// Read a password from `TICKETDESK_PASSWORD` or an interactive prompt
/// (entered twice).
pub fn read_password() -> Result<SecretString, TicketdeskError> {
    if let Ok(password) = std::env::var(PASSWORD_ENV_VAR)
        && !password.is_empty()
    {
        return Ok(SecretString::from(password));
    }

    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return Err(TicketdeskError::Credential(format!(
            "No password provided. Set {PASSWORD_ENV_VAR} or run interactively."
        )));
    }

    eprint!("Password: ");
    let first = rpassword::read_password()
        .map_err(|e| TicketdeskError::Credential(format!("failed to read password: {e}")))?;
    eprint!("Confirm password: ");
    let second = rpassword::read_password()
        .map_err(|e| TicketdeskError::Credential(format!("failed to read password: {e}")))?;

    if first != second {
        return Err(TicketdeskError::Credential("passwords do not match".to_string()));
    }
    if first.trim().is_empty() {
        return Err(TicketdeskError::Credential("empty password not allowed".to_string()));
    }
    Ok(SecretString::from(first))
}

/// Read a password and hash it into a PHC string.
pub fn hash_from_prompt() -> Result<String, TicketdeskError> {
    let password = read_password()?;
    // Login trims the submitted password, so hash the trimmed form.
    let trimmed = SecretString::from(password.expose_secret().trim().to_string());
    ticketdesk_auth::hash_password(&trimmed)
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn password_from_env_var_is_hashed() {
        // SAFETY: test-only env mutation, serialized.
        unsafe { std::env::set_var(PASSWORD_ENV_VAR, " hunter2 ") };
        let result = hash_from_prompt();
        unsafe { std::env::remove_var(PASSWORD_ENV_VAR) };

        let phc = result.unwrap();
        assert!(phc.starts_with("$argon2id$"));
    }
}
