//! # limekit CLI
//!
//! Entry point for the `limekit` binary.
//!
//! Subcommands:
//! - `limekit init`: Generate the keystore and default config
//! - `limekit library`: Add, borrow and return books
//! - `limekit token`: Wrap and unwrap LIB
//! - `limekit election`: Submit state results, end the election
//! - `limekit balance`: ETH / LIB / LMT balances
//! - `limekit sign-authorization`: Sign the `wrapWithSignature` message

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use limekit_core::authorization::DEFAULT_AUTHORIZATION_MESSAGE;

mod commands;

/// Client for the library, LIB token and US election contracts.
#[derive(Parser)]
#[command(name = "limekit", version, about)]
struct Cli {
    /// Path to config.yaml (default: ~/.limekit/config.yaml).
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new limekit instance (keystore, config).
    Init {
        /// Import this hex private key instead of generating one.
        #[arg(long)]
        private_key_file: Option<PathBuf>,

        /// Data directory (default: ~/.limekit).
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Library contract: books, borrowing, returns.
    Library {
        #[command(subcommand)]
        command: commands::library::LibraryCommand,
    },

    /// LIB token: wrap, unwrap, withdraw.
    Token {
        #[command(subcommand)]
        command: commands::token::TokenCommand,
    },

    /// US election contract.
    Election {
        #[command(subcommand)]
        command: commands::election::ElectionCommand,
    },

    /// Show wallet balances.
    Balance {
        /// Keep printing as the ETH price updates.
        #[arg(long)]
        watch: bool,
    },

    /// Sign the authorization message for `token wrap-signed`.
    SignAuthorization {
        #[arg(long, default_value = DEFAULT_AUTHORIZATION_MESSAGE)]
        message: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Init {
            private_key_file,
            data_dir,
        } => commands::init::run(data_dir, private_key_file),
        Commands::Library { command } => commands::library::run(command, config).await,
        Commands::Token { command } => commands::token::run(command, config).await,
        Commands::Election { command } => commands::election::run(command, config).await,
        Commands::Balance { watch } => commands::balance::run(config, watch).await,
        Commands::SignAuthorization { message } => {
            commands::sign_authorization::run(message, config)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
