// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./ticketdesk.toml` > `~/.config/ticketdesk/ticketdesk.toml` >
//! `/etc/ticketdesk/ticketdesk.toml` with environment variable overrides via `TICKETDESK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TicketdeskConfig;

/// System-wide config location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/ticketdesk/ticketdesk.toml";

/// Config file name looked up in the working directory and the XDG config dir.
pub const LOCAL_CONFIG_FILE: &str = "ticketdesk.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/ticketdesk/ticketdesk.toml` (system-wide)
/// 3. `~/.config/ticketdesk/ticketdesk.toml` (user XDG config)
/// 4. `./ticketdesk.toml` (local directory)
/// 5. `TICKETDESK_*` environment variables
pub fn load_config() -> Result<TicketdeskConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<TicketdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TicketdeskConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TicketdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TicketdeskConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TicketdeskConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("ticketdesk").join(LOCAL_CONFIG_FILE))
                .unwrap_or_default(),
        ))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Top-level sections reachable through `TICKETDESK_*` variables.
const ENV_SECTIONS: [&str; 4] = ["server", "session", "security", "tickets"];

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `TICKETDESK_SESSION_COOKIE_NAME` must map to
/// `session.cookie_name`, not `session.cookie.name`. Variables outside the
/// known sections (such as `TICKETDESK_PASSWORD`) are not config keys and are
/// skipped.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("TICKETDESK_")
        .filter(|key| section_of(&key.as_str().to_ascii_lowercase()).is_some())
        .map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}

fn section_of(key: &str) -> Option<(&'static str, &str)> {
    ENV_SECTIONS.into_iter().find_map(|section| {
        key.strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
            .map(|rest| (section, rest))
    })
}

/// Map a lowercased, prefix-stripped env var name to its dotted config path.
pub(crate) fn map_env_key(key: &str) -> String {
    match section_of(key) {
        Some((section, rest)) => format!("{section}.{rest}"),
        None => key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("server_port"), "server.port");
        assert_eq!(map_env_key("session_cookie_name"), "session.cookie_name");
        assert_eq!(map_env_key("tickets_discard_on_logout"), "tickets.discard_on_logout");
        assert_eq!(map_env_key("security_csrf_on_api"), "security.csrf_on_api");
    }

    #[test]
    fn unknown_section_is_left_alone() {
        assert_eq!(map_env_key("users"), "users");
        assert_eq!(map_env_key("serverless"), "serverless");
    }

    #[test]
    fn env_overrides_apply_through_provider() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("TICKETDESK_SERVER_PORT", "9191");
            jail.set_env("TICKETDESK_SESSION_COOKIE_NAME", "desk");
            let config: TicketdeskConfig = Figment::new()
                .merge(Serialized::defaults(TicketdeskConfig::default()))
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.server.port, 9191);
            assert_eq!(config.session.cookie_name, "desk");
            Ok(())
        });
    }

    #[test]
    fn non_section_env_vars_are_ignored() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("TICKETDESK_PASSWORD", "hunter2");
            let config: TicketdeskConfig = Figment::new()
                .merge(Serialized::defaults(TicketdeskConfig::default()))
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.server.port, 8080);
            Ok(())
        });
    }
}
