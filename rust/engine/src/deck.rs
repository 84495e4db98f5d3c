use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::cards::{full_deck, Card};
use crate::errors::GameError;

/// A single-hand deck of the 52 distinct cards.
///
/// A deck is built fresh for every hand, shuffled once and then drained from the
/// top by deals and burns. It is never refilled mid-hand.
///
/// # Examples
///
/// ```
/// use holdem_engine::deck::Deck;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
///
/// let mut rng = ChaCha20Rng::seed_from_u64(42);
/// let mut deck = Deck::new();
/// deck.shuffle(&mut rng);
///
/// let card = deck.deal_one().expect("fresh deck has cards");
/// assert_eq!(deck.remaining(), 51);
/// println!("top card: {card}");
/// ```
#[derive(Debug, Clone)]
pub struct Deck {
    // top of the deck is the end of the vec
    cards: Vec<Card>,
}

impl Deck {
    pub fn new() -> Self {
        Self { cards: full_deck() }
    }

    /// Builds a pre-arranged deck whose first card is dealt first.
    ///
    /// Used to replay a recorded hand or to set up a known deal.
    pub fn stacked(top_first: impl IntoIterator<Item = Card>) -> Result<Self, GameError> {
        let mut cards: Vec<Card> = top_first.into_iter().collect();
        let mut seen = HashSet::with_capacity(cards.len());
        if let Some(dup) = cards.iter().find(|c| !seen.insert(**c)) {
            return Err(GameError::DuplicateCard(*dup));
        }
        cards.reverse();
        Ok(Self { cards })
    }

    /// Shuffles the remaining cards with the supplied random source.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn deal_one(&mut self) -> Result<Card, GameError> {
        self.cards.pop().ok_or(GameError::EmptyDeck)
    }

    pub fn deal_n(&mut self, n: usize) -> Result<Vec<Card>, GameError> {
        (0..n).map(|_| self.deal_one()).collect()
    }

    pub fn burn(&mut self) -> Result<(), GameError> {
        self.deal_one().map(|_| ())
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}
