use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::GameError;
use crate::game::Street;

/// The shared cards on the table.
///
/// Every stage is one-shot: once the flop, turn or river is set it cannot be
/// replaced until [`reset`](Self::reset) at the start of the next hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityCards {
    flop: Option<[Card; 3]>,
    turn: Option<Card>,
    river: Option<Card>,
}

impl CommunityCards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn insert_flop(&mut self, cards: [Card; 3]) -> Result<(), GameError> {
        if self.flop.is_some() {
            return Err(GameError::DuplicateStreetInsertion(Street::Flop));
        }
        self.flop = Some(cards);
        Ok(())
    }

    pub fn insert_turn(&mut self, card: Card) -> Result<(), GameError> {
        if self.turn.is_some() {
            return Err(GameError::DuplicateStreetInsertion(Street::Turn));
        }
        self.turn = Some(card);
        Ok(())
    }

    pub fn insert_river(&mut self, card: Card) -> Result<(), GameError> {
        if self.river.is_some() {
            return Err(GameError::DuplicateStreetInsertion(Street::River));
        }
        self.river = Some(card);
        Ok(())
    }

    pub fn flop(&self) -> Option<&[Card; 3]> {
        self.flop.as_ref()
    }
    pub fn turn(&self) -> Option<Card> {
        self.turn
    }
    pub fn river(&self) -> Option<Card> {
        self.river
    }

    /// Revealed cards in deal order.
    pub fn cards(&self) -> Vec<Card> {
        let mut v = Vec::with_capacity(5);
        if let Some(flop) = self.flop {
            v.extend_from_slice(&flop);
        }
        v.extend(self.turn);
        v.extend(self.river);
        v
    }

    pub fn len(&self) -> usize {
        self.flop.map_or(0, |_| 3)
            + usize::from(self.turn.is_some())
            + usize::from(self.river.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
