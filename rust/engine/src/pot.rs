use serde::{Deserialize, Serialize};

/// The single shared pot of a hand.
///
/// Every chip committed during the hand lands here; there is no side-pot
/// subdivision, so an all-in player can win the whole pot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    total: u32,
}

impl Pot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn add(&mut self, chips: u32) {
        self.total = self.total.saturating_add(chips);
    }

    /// Empties the pot, returning what it held.
    pub fn take(&mut self) -> u32 {
        std::mem::take(&mut self.total)
    }
}

/// Splits `amount` evenly between `winners`.
///
/// `winners` must be ordered starting from the first seat left of the dealer.
/// Leftover chips from an uneven split go one each to the earliest winners in
/// that order.
///
/// ```
/// use holdem_engine::pot::split_pot;
///
/// assert_eq!(split_pot(100, &[3, 1]), vec![(3, 50), (1, 50)]);
/// assert_eq!(split_pot(101, &[3, 1]), vec![(3, 51), (1, 50)]);
/// ```
pub fn split_pot(amount: u32, winners: &[usize]) -> Vec<(usize, u32)> {
    if winners.is_empty() {
        return Vec::new();
    }
    let n = winners.len() as u32;
    let share = amount / n;
    let odd = (amount % n) as usize;
    winners
        .iter()
        .enumerate()
        .map(|(i, &seat)| (seat, share + u32::from(i < odd)))
        .collect()
}
