// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Ticketdesk.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};
use ticketdesk_core::Priority;

/// Top-level Ticketdesk configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TicketdeskConfig {
    /// HTTP listener and logging settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Session cookie and expiry settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Anti-forgery settings.
    #[serde(default)]
    pub security: SecurityConfig,

    /// Ticket defaults.
    #[serde(default)]
    pub tickets: TicketsConfig,

    /// The fixed credential table.
    #[serde(default = "default_users")]
    pub users: Vec<UserConfig>,
}

impl Default for TicketdeskConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            session: SessionConfig::default(),
            security: SecurityConfig::default(),
            tickets: TicketsConfig::default(),
            users: default_users(),
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind. `0` picks an ephemeral port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Session transport and lifetime configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Sessions idle for longer than this are evicted.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// How often the sweeper looks for idle sessions.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Mark the session cookie `Secure` (HTTPS only).
    #[serde(default)]
    pub secure_cookie: bool,

    /// Upper bound on live sessions held in memory.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            idle_timeout_secs: default_idle_timeout_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            secure_cookie: false,
            max_sessions: default_max_sessions(),
        }
    }
}

fn default_cookie_name() -> String {
    "ticketdesk_session".to_string()
}

fn default_idle_timeout_secs() -> u64 {
    1800
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_max_sessions() -> usize {
    10_000
}

/// Anti-forgery configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityConfig {
    /// Require the `X-CSRF-Token` header on mutating JSON API calls.
    /// Form endpoints always require `_csrf_token`.
    #[serde(default = "default_true")]
    pub csrf_on_api: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self { csrf_on_api: true }
    }
}

fn default_true() -> bool {
    true
}

/// Ticket defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TicketsConfig {
    /// Priority assigned when a create request omits one.
    #[serde(default)]
    pub default_priority: Priority,

    /// Drop the session's tickets when its user logs out.
    #[serde(default)]
    pub discard_on_logout: bool,
}

/// One entry in the credential table.
///
/// Exactly one of `password` (hashed at startup) or `password_hash`
/// (argon2 PHC string) must be set.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    /// Login email.
    pub email: String,

    /// Display name. Falls back to the email when empty.
    #[serde(default)]
    pub name: String,

    /// Plaintext password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Argon2 PHC hash, as printed by `ticketdesk hash-password`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

impl std::fmt::Debug for UserConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserConfig")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .field(
                "password_hash",
                &self.password_hash.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

/// The demo account available out of the box.
fn default_users() -> Vec<UserConfig> {
    vec![UserConfig {
        email: "test@ticketapp.dev".to_string(),
        name: "Test User".to_string(),
        password: Some("Password123!".to_string()),
        password_hash: None,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_demo_user() {
        let config = TicketdeskConfig::default();
        assert_eq!(config.users.len(), 1);
        assert_eq!(config.users[0].email, "test@ticketapp.dev");
        assert_eq!(config.users[0].name, "Test User");
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = TicketdeskConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.session.cookie_name, "ticketdesk_session");
        assert_eq!(config.session.idle_timeout_secs, 1800);
        assert!(config.security.csrf_on_api);
        assert_eq!(config.tickets.default_priority, Priority::Medium);
        assert!(!config.tickets.discard_on_logout);
    }

    #[test]
    fn user_debug_redacts_password() {
        let user = &TicketdeskConfig::default().users[0];
        let debug = format!("{user:?}");
        assert!(!debug.contains("Password123!"));
        assert!(debug.contains("[redacted]"));
    }
}
