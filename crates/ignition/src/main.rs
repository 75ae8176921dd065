// SPDX-FileCopyrightText: 2026 Ignition Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ignition - an application bootstrap framework.
//!
//! This is the host binary entry point.

use clap::{Parser, Subcommand};

/// Ignition - an application bootstrap framework.
#[derive(Parser, Debug)]
#[command(name = "ignition", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the host: scan addons, start the lifecycle, wait for shutdown.
    Run,
    /// Show the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match ignition_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            ignition_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Run) => match ignition::run::run_host(config).await {
            Ok(code) => std::process::exit(code),
            Err(e) => {
                eprintln!("ignition: {e}");
                std::process::exit(1);
            }
        },
        Some(Commands::Config) => {
            println!("host.name = {}", config.host.name);
            println!("host.log_level = {}", config.host.log_level);
            println!(
                "instance.mutex_id = {}",
                config.instance.mutex_id.as_deref().unwrap_or("(none)")
            );
            println!(
                "instance.owner_label = {}",
                config.instance.owner_label.as_deref().unwrap_or("(none)")
            );
            println!("addons.dirs = {:?}", config.addons.dirs);
            println!(
                "addons.pattern = {}",
                config.addons.pattern.as_deref().unwrap_or("(default)")
            );
        }
        None => {
            println!("ignition: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        let config =
            ignition_config::load_and_validate().expect("default config should be valid");
        assert_eq!(config.host.name, "ignition");
    }
}
