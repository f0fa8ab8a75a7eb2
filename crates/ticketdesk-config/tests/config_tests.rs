// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Ticketdesk configuration system.

use ticketdesk_config::diagnostic::ConfigError;
use ticketdesk_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};
use ticketdesk_core::Priority;

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_ticketdesk_config() {
    let toml = r#"
[server]
host = "0.0.0.0"
port = 9000
log_level = "debug"

[session]
cookie_name = "desk_sid"
idle_timeout_secs = 600
sweep_interval_secs = 30
secure_cookie = true
max_sessions = 50

[security]
csrf_on_api = false

[tickets]
default_priority = "low"
discard_on_logout = true

[[users]]
email = "agent@example.com"
name = "Support Agent"
password = "hunter22"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.log_level, "debug");
    assert_eq!(config.session.cookie_name, "desk_sid");
    assert_eq!(config.session.idle_timeout_secs, 600);
    assert_eq!(config.session.sweep_interval_secs, 30);
    assert!(config.session.secure_cookie);
    assert_eq!(config.session.max_sessions, 50);
    assert!(!config.security.csrf_on_api);
    assert_eq!(config.tickets.default_priority, Priority::Low);
    assert!(config.tickets.discard_on_logout);
    assert_eq!(config.users.len(), 1, "users array replaces the demo user");
    assert_eq!(config.users[0].email, "agent@example.com");
    assert_eq!(config.users[0].password.as_deref(), Some("hunter22"));
}

/// An empty document yields the compiled defaults, demo user included.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_and_validate_str("").expect("defaults should validate");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.users[0].email, "test@ticketapp.dev");
}

/// Unknown field in [server] produces an UnknownKey diagnostic with a suggestion.
#[test]
fn unknown_field_in_server_suggests_correction() {
    let toml = r#"
[server]
prot = 9000
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    let found = errors.iter().any(|e| {
        matches!(
            e,
            ConfigError::UnknownKey { key, suggestion, .. }
                if key == "prot" && suggestion.as_deref() == Some("port")
        )
    });
    assert!(found, "expected UnknownKey for `prot`, got: {errors:?}");
}

/// Unknown top-level section is rejected.
#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[database]
path = "/tmp/tickets.db"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown section");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("database"),
        "error should mention the unknown key, got: {err_str}"
    );
}

/// Wrong value type is reported as InvalidType.
#[test]
fn wrong_type_for_port_produces_invalid_type() {
    let toml = r#"
[server]
port = "eighty"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject string port");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("port"))),
        "expected InvalidType, got: {errors:?}"
    );
}

/// A priority outside low/medium/high is rejected.
#[test]
fn unknown_priority_is_rejected() {
    let toml = r#"
[tickets]
default_priority = "urgent"
"#;

    assert!(load_and_validate_str(toml).is_err());
}

/// Semantic validation runs after deserialization.
#[test]
fn user_with_both_secrets_fails_validation() {
    let toml = r#"
[[users]]
email = "agent@example.com"
password = "plain"
password_hash = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaA"
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("both"))
    ));
}

/// Loading from an explicit path reads the file.
#[test]
fn load_from_path_reads_file() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "desk.toml",
            r#"
[server]
port = 7070
"#,
        )?;
        let config = load_and_validate_path(std::path::Path::new("desk.toml"))
            .expect("file config should validate");
        assert_eq!(config.server.port, 7070);
        Ok(())
    });
}

/// Environment variables override file values.
#[test]
fn env_var_overrides_file_value() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "desk.toml",
            r#"
[tickets]
discard_on_logout = false
"#,
        )?;
        jail.set_env("TICKETDESK_TICKETS_DISCARD_ON_LOGOUT", "true");
        let config = load_and_validate_path(std::path::Path::new("desk.toml"))
            .expect("config should validate");
        assert!(config.tickets.discard_on_logout);
        Ok(())
    });
}
