use serde::{Deserialize, Serialize};

use crate::player::Player;

/// Represents a betting street in Texas Hold'em poker.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Street {
    /// Before flop (hole cards dealt)
    PreFlop,
    /// After flop (3 community cards)
    Flop,
    /// After turn (4th community card)
    Turn,
    /// After river (5th community card)
    River,
}

impl Street {
    pub fn next(self) -> Option<Street> {
        match self {
            Street::PreFlop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => None,
        }
    }

    /// Community cards revealed when this street starts.
    pub fn cards_dealt(self) -> usize {
        match self {
            Street::PreFlop => 0,
            Street::Flop => 3,
            Street::Turn | Street::River => 1,
        }
    }
}

/// Seats resolved for one hand after skipping eliminated players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAssignment {
    pub dealer: usize,
    pub small_blind: usize,
    pub big_blind: usize,
}

/// Dealer button bookkeeping for a table of fixed size.
///
/// The raw dealer index moves one seat per hand whether or not that seat is
/// still occupied; blinds and action order are the next seated players after
/// it, so they rotate in lockstep with the button.
#[derive(Debug, Clone)]
pub struct TablePositions {
    /// Raw button index, may point at an eliminated seat
    dealer: usize,
    /// Total seats, including eliminated ones
    seats: usize,
}

impl TablePositions {
    /// Creates positions so that the first [`advance`](Self::advance) puts the button on seat 0.
    pub fn new(seats: usize) -> Self {
        Self {
            dealer: seats.saturating_sub(1),
            seats,
        }
    }

    pub fn dealer_index(&self) -> usize {
        self.dealer
    }

    pub fn advance(&mut self) {
        if self.seats > 0 {
            self.dealer = (self.dealer + 1) % self.seats;
        }
    }

    /// Resolves dealer and blinds among players still in the tournament.
    pub fn resolve(&self, players: &[Player]) -> Option<SeatAssignment> {
        let dealer = first_seated_from(players, self.dealer)?;
        let small_blind = next_seated_after(players, dealer)?;
        let big_blind = next_seated_after(players, small_blind)?;
        if small_blind == dealer {
            // a lone player cannot play a hand
            return None;
        }
        Some(SeatAssignment {
            dealer,
            small_blind,
            big_blind,
        })
    }
}

fn first_seated_from(players: &[Player], start: usize) -> Option<usize> {
    let n = players.len();
    (0..n)
        .map(|offset| (start + offset) % n)
        .find(|&i| players[i].is_in_tournament())
}

pub(crate) fn next_seated_after(players: &[Player], seat: usize) -> Option<usize> {
    let n = players.len();
    (1..=n)
        .map(|offset| (seat + offset) % n)
        .find(|&i| players[i].is_in_tournament())
}

/// Seats in clockwise order starting left of `dealer`, the dealer last.
pub(crate) fn seats_from_left_of(dealer: usize, seats: usize) -> impl Iterator<Item = usize> {
    (1..=seats).map(move |offset| (dealer + offset) % seats)
}
