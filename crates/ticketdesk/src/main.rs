// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticketdesk - session-scoped ticket tracking.
//!
//! This is the binary entry point for the Ticketdesk server.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod password;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ticketdesk_config::{ConfigError, TicketdeskConfig};

/// Ticketdesk - session-scoped ticket tracking.
#[derive(Parser, Debug)]
#[command(name = "ticketdesk", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, short, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server (default).
    Serve,
    /// Load and validate the configuration, then exit.
    CheckConfig,
    /// Hash a password for use as `password_hash` in a `[[users]]` entry.
    HashPassword,
}

fn load_config(path: Option<&PathBuf>) -> Result<TicketdeskConfig, Vec<ConfigError>> {
    match path {
        Some(path) => ticketdesk_config::load_and_validate_path(path),
        None => ticketdesk_config::load_and_validate(),
    }
}

fn load_config_or_exit(path: Option<&PathBuf>) -> TicketdeskConfig {
    match load_config(path) {
        Ok(config) => config,
        Err(errors) => {
            ticketdesk_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let config = load_config_or_exit(cli.config.as_ref());
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Commands::CheckConfig => {
            let config = load_config_or_exit(cli.config.as_ref());
            println!(
                "ticketdesk: config OK (listen={}:{}, users={})",
                config.server.host,
                config.server.port,
                config.users.len()
            );
        }
        Commands::HashPassword => match password::hash_from_prompt() {
            Ok(phc) => println!("{phc}"),
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["ticketdesk"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["ticketdesk", "check-config", "--config", "/tmp/x.toml"])
            .unwrap();
        assert!(matches!(cli.command, Some(Commands::CheckConfig)));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/x.toml")));
    }

    #[test]
    fn hash_password_subcommand_parses() {
        let cli = Cli::try_parse_from(["ticketdesk", "hash-password"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::HashPassword)));
    }
}
