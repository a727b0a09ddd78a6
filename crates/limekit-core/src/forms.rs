//! Form state of each screen.
//!
//! Inputs are kept as the raw text the user typed and are only turned into
//! typed contract parameters on submit. Each screen has its own field enum so
//! a form can only be addressed by fields it actually has.

use std::str::FromStr;

use alloy_primitives::utils::parse_ether;

use crate::lifecycle::AttemptError;
use crate::types::{StateResult, U256};

/// Fields of the library form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryField {
    BookId,
    BookName,
    Copies,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryForm {
    pub book_id: String,
    pub book_name: String,
    pub copies: String,
}

impl LibraryForm {
    pub fn set(&mut self, field: LibraryField, value: impl Into<String>) {
        let slot = match field {
            LibraryField::BookId => &mut self.book_id,
            LibraryField::BookName => &mut self.book_name,
            LibraryField::Copies => &mut self.copies,
        };
        *slot = value.into();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn book_id(&self) -> Result<u64, AttemptError> {
        let id = parse_number::<u64>("Book ID", &self.book_id)?;
        if id == 0 {
            return Err(invalid("Book ID must be greater than zero"));
        }
        Ok(id)
    }

    pub fn book_name(&self) -> Result<String, AttemptError> {
        let name = self.book_name.trim();
        if name.is_empty() {
            return Err(invalid("Book name is required"));
        }
        Ok(name.to_string())
    }

    pub fn copies(&self) -> Result<u64, AttemptError> {
        let copies = parse_number::<u64>("Copies", &self.copies)?;
        if copies == 0 {
            return Err(invalid("Copies must be greater than zero"));
        }
        Ok(copies)
    }
}

/// Fields of the election results form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElectionField {
    State,
    BidenVotes,
    TrumpVotes,
    Seats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElectionForm {
    pub state: String,
    pub biden_votes: String,
    pub trump_votes: String,
    pub seats: String,
}

impl ElectionForm {
    pub fn set(&mut self, field: ElectionField, value: impl Into<String>) {
        let slot = match field {
            ElectionField::State => &mut self.state,
            ElectionField::BidenVotes => &mut self.biden_votes,
            ElectionField::TrumpVotes => &mut self.trump_votes,
            ElectionField::Seats => &mut self.seats,
        };
        *slot = value.into();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Trimmed state name as it is sent to the contract.
    pub fn state_name(&self) -> &str {
        self.state.trim()
    }

    pub fn to_result(&self) -> Result<StateResult, AttemptError> {
        let name = self.state_name();
        if name.is_empty() {
            return Err(invalid("State is required"));
        }
        let seats = parse_number::<u8>("Seats", &self.seats)?;
        if seats == 0 {
            return Err(invalid("Seats must be greater than zero"));
        }
        Ok(StateResult {
            name: name.to_string(),
            votes_biden: parse_number("BIDEN votes", &self.biden_votes)?,
            votes_trump: parse_number("TRUMP votes", &self.trump_votes)?,
            seats,
        })
    }
}

/// The single amount input of the token screen, in ETH.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenForm {
    pub amount: String,
}

impl TokenForm {
    pub fn clear(&mut self) {
        self.amount.clear();
    }

    /// Amount in wei. Zero and negative amounts are rejected.
    pub fn amount_wei(&self) -> Result<U256, AttemptError> {
        let raw = self.amount.trim();
        if raw.is_empty() {
            return Err(invalid("Amount is required"));
        }
        // parse_ether accepts a sign and returns the absolute value.
        if raw.starts_with('-') {
            return Err(invalid("Amount must be greater than zero"));
        }
        let wei = parse_ether(raw).map_err(|e| invalid(format!("Amount: {e}")))?;
        if wei.is_zero() {
            return Err(invalid("Amount must be greater than zero"));
        }
        Ok(wei)
    }
}

fn parse_number<T: FromStr>(label: &str, raw: &str) -> Result<T, AttemptError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(invalid(format!("{label} is required")));
    }
    raw.parse()
        .map_err(|_| invalid(format!("{label} must be a whole number, got '{raw}'")))
}

fn invalid(message: impl Into<String>) -> AttemptError {
    AttemptError::Validation(message.into())
}
