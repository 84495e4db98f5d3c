use thiserror::Error;

use crate::cards::Card;
use crate::game::Street;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Deck is empty")]
    EmptyDeck,
    #[error("Invalid raise: amount {amount} with {to_call} to call and {chips} chips behind")]
    InvalidRaise { amount: u32, to_call: u32, chips: u32 },
    #[error("Player {seat} gave no valid action after {attempts} attempts")]
    InvalidAction { seat: usize, attempts: u32 },
    #[error("{0:?} cards were already dealt this hand")]
    DuplicateStreetInsertion(Street),
    #[error("No eligible players at showdown")]
    NoEligiblePlayers,
    #[error("Card {0} appears twice in the deck")]
    DuplicateCard(Card),
    #[error("No hand in progress")]
    NoHandInProgress,
    #[error("A hand is already in progress")]
    HandInProgress,
    #[error("Showdown needs the river to be played, next street is {next:?}")]
    ShowdownBeforeRiver { next: Option<Street> },
    #[error("The pot has not been awarded yet")]
    PotNotAwarded,
    #[error("Hand already complete")]
    HandAlreadyComplete,
    #[error("Betting round is already complete")]
    BettingRoundClosed,
    #[error("Expected {expected:?} but {actual:?} was requested")]
    OutOfOrderStreet {
        expected: Option<Street>,
        actual: Street,
    },
    #[error("Need at least two players in the tournament, {remaining} left")]
    NotEnoughPlayers { remaining: usize },
    #[error("Player already folded")]
    PlayerAlreadyFolded,
    #[error("Player is already all-in")]
    PlayerAllIn,
    #[error("It's not player {actual}'s turn (expected player {expected})")]
    NotPlayersTurn { expected: usize, actual: usize },
    #[error("Hole cards already full")]
    HoleCardsFull,
    #[error("No player at seat {0}")]
    UnknownSeat(usize),
}

impl GameError {
    /// Errors the engine resolves by asking the same player again.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GameError::InvalidRaise { .. }
                | GameError::PlayerAlreadyFolded
                | GameError::PlayerAllIn
                | GameError::NotPlayersTurn { .. }
                | GameError::DuplicateStreetInsertion(_)
        )
    }
}
