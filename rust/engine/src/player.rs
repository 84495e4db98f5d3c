use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::GameError;
use crate::hand::HandResult;

/// A decision returned by an action source for the player to act.
/// The engine validates it against the current bet before applying anything.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Fold and forfeit the hand
    Fold,
    /// Check when nothing is owed, otherwise call the outstanding amount
    CheckCall,
    /// Put `amount` more chips in, at least enough to call
    BetOrRaise(u32),
    /// Commit every remaining chip
    AllIn,
}

/// A seated player: chip stack, hole cards and per-street betting state.
///
/// The betting fields (`current_bet`, `folded`, `all_in`, `acted_this_street`)
/// are only changed through the betting round; `still_in_tournament` only by the
/// engine between hands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Display name, unique at the table
    name: String,
    /// Hole cards (0 to 2)
    hole: Vec<Card>,
    /// Chips behind, not counting what is committed this street
    chip_count: u32,
    /// Chips committed on the current street
    current_bet: u32,
    folded: bool,
    all_in: bool,
    acted_this_street: bool,
    still_in_tournament: bool,
    /// Best hand over the cards dealt so far; refreshed as each street is dealt
    last_hand: Option<HandResult>,
}

impl Player {
    pub fn new(name: impl Into<String>, chip_count: u32) -> Self {
        Self {
            name: name.into(),
            hole: Vec::with_capacity(2),
            chip_count,
            current_bet: 0,
            folded: false,
            all_in: false,
            acted_this_street: false,
            still_in_tournament: chip_count > 0,
            last_hand: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn hole_cards(&self) -> &[Card] {
        &self.hole
    }
    pub fn chip_count(&self) -> u32 {
        self.chip_count
    }
    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }
    pub fn is_folded(&self) -> bool {
        self.folded
    }
    pub fn is_all_in(&self) -> bool {
        self.all_in
    }
    pub fn has_acted(&self) -> bool {
        self.acted_this_street
    }
    pub fn is_in_tournament(&self) -> bool {
        self.still_in_tournament
    }
    pub fn last_hand(&self) -> Option<&HandResult> {
        self.last_hand.as_ref()
    }

    /// Still holding cards in the current hand.
    pub fn is_contending(&self) -> bool {
        self.still_in_tournament && !self.folded
    }

    /// Can still be asked for a decision this hand.
    pub fn can_act(&self) -> bool {
        self.is_contending() && !self.all_in
    }

    pub fn give_card(&mut self, c: Card) -> Result<(), GameError> {
        if self.hole.len() >= 2 {
            return Err(GameError::HoleCardsFull);
        }
        self.hole.push(c);
        Ok(())
    }

    /// Moves up to `amount` chips from the stack into the current bet.
    ///
    /// Returns the chips actually committed; emptying the stack marks the player all-in.
    pub fn commit(&mut self, amount: u32) -> u32 {
        let paid = amount.min(self.chip_count);
        self.chip_count -= paid;
        self.current_bet += paid;
        if self.chip_count == 0 && self.still_in_tournament {
            self.all_in = true;
        }
        paid
    }

    pub fn add_chips(&mut self, amount: u32) {
        self.chip_count = self.chip_count.saturating_add(amount);
    }

    pub(crate) fn fold(&mut self) {
        self.folded = true;
    }

    pub(crate) fn mark_acted(&mut self) {
        self.acted_this_street = true;
    }

    pub(crate) fn clear_acted(&mut self) {
        self.acted_this_street = false;
    }

    pub(crate) fn set_last_hand(&mut self, result: HandResult) {
        self.last_hand = Some(result);
    }

    /// Clears the street bet and returns what was committed.
    pub(crate) fn collect_bet(&mut self) -> u32 {
        self.acted_this_street = false;
        std::mem::take(&mut self.current_bet)
    }

    pub(crate) fn reset_for_hand(&mut self) {
        self.hole.clear();
        self.current_bet = 0;
        self.folded = false;
        self.all_in = false;
        self.acted_this_street = false;
    }

    /// Marks a busted player out of the tournament. Returns true when this call eliminated them.
    pub(crate) fn eliminate_if_busted(&mut self) -> bool {
        if self.still_in_tournament && self.chip_count == 0 {
            self.still_in_tournament = false;
            self.hole.clear();
            return true;
        }
        false
    }
}
