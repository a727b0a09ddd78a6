//! Election contract events and their notification text.

use crate::types::Leader;

/// Event emitted by the election contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElectionEvent {
    /// Results for one state were recorded.
    StateResult {
        winner: Leader,
        seats: u8,
        state: String,
    },
    /// The election was closed.
    ElectionEnded { winner: Leader },
}

impl ElectionEvent {
    /// Header/body pair for a user-facing notification.
    pub fn notification(&self) -> (String, String) {
        match self {
            Self::StateResult {
                winner,
                seats,
                state,
            } => (
                format!("Results submitted for {state}"),
                format!("{winner} wins {seats} seats in {state}"),
            ),
            Self::ElectionEnded { winner } => (
                "Election ended".to_string(),
                format!("The winner is {winner}"),
            ),
        }
    }
}
