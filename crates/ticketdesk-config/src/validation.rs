// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as bindable hosts, positive timeouts, and a well-formed credential table.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::TicketdeskConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TicketdeskConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    let cookie = config.session.cookie_name.as_str();
    if cookie.is_empty() {
        fail("session.cookie_name must not be empty".to_string());
    } else if !cookie
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        fail(format!(
            "session.cookie_name `{cookie}` may only contain ASCII letters, digits, `_` and `-`"
        ));
    }

    if config.session.idle_timeout_secs == 0 {
        fail("session.idle_timeout_secs must be greater than 0".to_string());
    }

    if config.session.sweep_interval_secs == 0 {
        fail("session.sweep_interval_secs must be greater than 0".to_string());
    }

    if config.session.max_sessions == 0 {
        fail("session.max_sessions must be greater than 0".to_string());
    }

    if config.users.is_empty() {
        fail("at least one [[users]] entry is required".to_string());
    }

    let mut seen_emails = HashSet::new();
    for (i, user) in config.users.iter().enumerate() {
        let email = user.email.trim();
        if email.is_empty() {
            fail(format!("users[{i}].email must not be empty"));
            continue;
        }
        if !seen_emails.insert(email.to_ascii_lowercase()) {
            fail(format!("duplicate user email `{email}` in [[users]] array"));
        }
        match (&user.password, &user.password_hash) {
            (Some(_), Some(_)) => fail(format!(
                "users[{i}] sets both `password` and `password_hash`; keep one"
            )),
            (None, None) => fail(format!(
                "users[{i}] needs either `password` or `password_hash`"
            )),
            _ => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserConfig;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&TicketdeskConfig::default()).is_ok());
    }

    #[test]
    fn empty_host_fails_validation() {
        let mut config = TicketdeskConfig::default();
        config.server.host = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "server.host"));
    }

    #[test]
    fn zero_idle_timeout_fails_validation() {
        let mut config = TicketdeskConfig::default();
        config.session.idle_timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "idle_timeout_secs"));
    }

    #[test]
    fn zero_max_sessions_fails_validation() {
        let mut config = TicketdeskConfig::default();
        config.session.max_sessions = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "max_sessions"));
    }

    #[test]
    fn cookie_name_with_spaces_fails_validation() {
        let mut config = TicketdeskConfig::default();
        config.session.cookie_name = "my session".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "cookie_name"));
    }

    #[test]
    fn duplicate_emails_fail_case_insensitively() {
        let mut config = TicketdeskConfig::default();
        config.users.push(UserConfig {
            email: "TEST@ticketapp.dev".to_string(),
            name: String::new(),
            password: Some("x".to_string()),
            password_hash: None,
        });
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "duplicate user email"));
    }

    #[test]
    fn user_without_secret_fails_validation() {
        let mut config = TicketdeskConfig::default();
        config.users[0].password = None;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "needs either"));
    }

    #[test]
    fn no_users_fails_validation() {
        let mut config = TicketdeskConfig::default();
        config.users.clear();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "at least one"));
    }

    #[test]
    fn errors_are_collected_not_fail_fast() {
        let mut config = TicketdeskConfig::default();
        config.server.host = String::new();
        config.session.sweep_interval_secs = 0;
        config.users.clear();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
