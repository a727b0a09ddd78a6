//! `limekit token`: Wrap ETH into LIB and back.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Subcommand;
use limekit_core::gateway::TokenGateway;
use limekit_core::screens::{TokenOperation, TokenScreen};
use limekit_core::units::format_balance;
use limekit_evm::TokenContract;

use super::{connect, connect_read_only, load_config, progress, resolve_config_path, CliResult};

#[derive(Subcommand)]
pub enum TokenCommand {
    /// Wrap ETH into LIB.
    Wrap {
        /// Amount in ETH (e.g. "0.01").
        #[arg(long)]
        amount: String,
    },
    /// Unwrap LIB back into ETH, approving the library first if needed.
    Unwrap {
        #[arg(long)]
        amount: String,
    },
    /// Wrap ETH using the pre-signed authorization from the config.
    WrapSigned {
        #[arg(long)]
        amount: String,
    },
    /// Withdraw the library's ETH (owner only).
    Withdraw,
    /// Show the LIB balance of this wallet.
    Balance,
}

impl TokenCommand {
    fn operation(&self) -> Option<(TokenOperation, &str)> {
        match self {
            Self::Wrap { amount } => Some((TokenOperation::Wrap, amount)),
            Self::Unwrap { amount } => Some((TokenOperation::Unwrap, amount)),
            Self::WrapSigned { amount } => Some((TokenOperation::WrapWithSignature, amount)),
            Self::Withdraw => Some((TokenOperation::Withdraw, "")),
            Self::Balance => None,
        }
    }
}

pub async fn run(cmd: TokenCommand, config_path: Option<PathBuf>) -> CliResult {
    let config = load_config(&resolve_config_path(config_path)?)?;
    let adapter = match cmd {
        TokenCommand::Balance => connect_read_only(&config)?,
        _ => connect(&config)?,
    };
    let contract = TokenContract::new(adapter, config.contracts.library, config.contracts.lib_token);

    let mut screen = TokenScreen::new(Arc::new(contract), config.approval_amount()?);
    if let Some(auth) = &config.authorization {
        screen = screen.with_authorization(auth.resolve()?);
    }
    screen.mount().await.map_err(|e| e.user_message().to_string())?;

    let Some((op, amount)) = cmd.operation() else {
        print_balance(&screen);
        return Ok(());
    };
    if !screen.available_operations().contains(&op) {
        return Err(match op {
            TokenOperation::WrapWithSignature => {
                "no authorization configured; add an `authorization` section to the config".into()
            }
            _ => format!("'{op}' is only available to the library owner").into(),
        });
    }
    if op.needs_amount() {
        screen.set_amount(amount);
    }

    let explorer = config.explorer();
    let tracker = progress::track(screen.attempt(), explorer);
    let outcome = screen.submit(op).await;
    drop(tracker);

    progress::report(outcome, explorer)?;
    print_balance(&screen);
    Ok(())
}

fn print_balance<G: TokenGateway>(screen: &TokenScreen<G>) {
    match screen.balance() {
        Some(balance) => println!("LIB balance: {}", format_balance(balance, 18, 3)),
        None => println!("LIB balance: unknown"),
    }
}
