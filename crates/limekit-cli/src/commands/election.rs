//! `limekit election`: Submit state results and follow the election.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Subcommand;
use limekit_core::forms::ElectionField;
use limekit_core::gateway::ElectionGateway;
use limekit_core::notify::{forward_events, DesktopNotifier};
use limekit_core::screens::{ElectionOperation, ElectionScreen};
use limekit_evm::events::watch_election_events;
use limekit_evm::ElectionContract;
use tracing::info;

use super::{connect, connect_read_only, load_config, progress, resolve_config_path, CliResult};

#[derive(Subcommand)]
pub enum ElectionCommand {
    /// Submit the result of one state.
    Submit {
        #[arg(long)]
        state: String,
        #[arg(long)]
        biden: String,
        #[arg(long)]
        trump: String,
        #[arg(long)]
        seats: String,
    },
    /// End the election.
    End,
    /// Show the current leader.
    Leader,
    /// Notify on election events until interrupted.
    Watch,
}

pub async fn run(cmd: ElectionCommand, config_path: Option<PathBuf>) -> CliResult {
    let config = load_config(&resolve_config_path(config_path)?)?;
    let adapter = match cmd {
        ElectionCommand::Leader | ElectionCommand::Watch => connect_read_only(&config)?,
        _ => connect(&config)?,
    };
    let contract = Arc::new(ElectionContract::new(
        Arc::clone(&adapter),
        config.contracts.election,
    ));
    let screen = ElectionScreen::new(Arc::clone(&contract), config.debounce());
    screen.mount().await.map_err(|e| e.user_message().to_string())?;

    let explorer = config.explorer();
    match cmd {
        ElectionCommand::Submit {
            state,
            biden,
            trump,
            seats,
        } => {
            // The screen's lookup is debounced for typing; a one-shot
            // command asks the contract directly.
            if contract.results_submitted(state.trim()).await? {
                let state = state.trim();
                return Err(format!("results for {state} have already been submitted").into());
            }
            screen.set_field(ElectionField::State, state);
            screen.set_field(ElectionField::BidenVotes, biden);
            screen.set_field(ElectionField::TrumpVotes, trump);
            screen.set_field(ElectionField::Seats, seats);

            let tracker = progress::track(screen.attempt(), explorer);
            let outcome = screen.submit(ElectionOperation::SubmitResult).await;
            drop(tracker);
            progress::report(outcome, explorer)?;
            println!("Current leader: {}", screen.leader());
        }
        ElectionCommand::End => {
            let tracker = progress::track(screen.attempt(), explorer);
            let outcome = screen.submit(ElectionOperation::EndElection).await;
            drop(tracker);
            progress::report(outcome, explorer)?;
            println!("Current leader: {}", screen.leader());
        }
        ElectionCommand::Leader => println!("Current leader: {}", screen.leader()),
        ElectionCommand::Watch => {
            let events = watch_election_events(&adapter, config.contracts.election).await?;
            let notifier = Arc::new(DesktopNotifier::new(config.notifications));
            let _forwarding = forward_events(events, notifier);
            info!(contract = %config.contracts.election, "watching election events");
            println!("Watching election events. Press Ctrl-C to stop.");
            tokio::signal::ctrl_c().await?;
        }
    }
    Ok(())
}
