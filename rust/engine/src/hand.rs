use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::Card;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl Category {
    pub fn name(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::OnePair => "One Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
            Category::RoyalFlush => "Royal Flush",
        }
    }
}

/// The value of a player's best hand over the cards known so far.
///
/// Field order matters: the derived ordering compares `category` first and then
/// `tie_break` element by element, which is exactly the showdown ordering.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct HandResult {
    pub category: Category,
    // ranks high -> low, layout depends on the category
    pub tie_break: Vec<u8>,
}

impl HandResult {
    pub fn description(&self) -> &'static str {
        self.category.name()
    }
}

impl fmt::Display for HandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.category.name(), self.tie_break)
    }
}

/// Evaluates the best hand a player holds from their hole cards and the board.
///
/// Works on any number of known cards up to seven. With five or more cards every
/// five-card combination is scored and the maximum kept; with fewer the pooled
/// cards are scored directly, so straights and flushes cannot appear yet.
///
/// # Examples
///
/// ```
/// use holdem_engine::cards::{Card, Rank, Suit};
/// use holdem_engine::hand::{evaluate, Category};
///
/// let hole = [Card::new(Rank::Ace, Suit::Spades), Card::new(Rank::Two, Suit::Spades)];
/// let board = [
///     Card::new(Rank::Three, Suit::Spades),
///     Card::new(Rank::Four, Suit::Spades),
///     Card::new(Rank::Five, Suit::Spades),
///     Card::new(Rank::King, Suit::Diamonds),
/// ];
///
/// let result = evaluate(&hole, &board);
/// assert_eq!(result.category, Category::StraightFlush);
/// assert_eq!(result.tie_break, vec![5]);
/// ```
pub fn evaluate(hole: &[Card], community: &[Card]) -> HandResult {
    let mut pool = Vec::with_capacity(hole.len() + community.len());
    pool.extend_from_slice(hole);
    pool.extend_from_slice(community);
    evaluate_cards(&pool)
}

pub fn evaluate_cards(cards: &[Card]) -> HandResult {
    if cards.len() <= 5 {
        return score_cards(cards);
    }

    let n = cards.len();
    let mut best: Option<HandResult> = None;
    for a in 0..n {
        for b in a + 1..n {
            for c in b + 1..n {
                for d in c + 1..n {
                    for e in d + 1..n {
                        let five = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                        let scored = score_cards(&five);
                        best = match best {
                            Some(current) if current >= scored => Some(current),
                            _ => Some(scored),
                        };
                    }
                }
            }
        }
    }
    best.unwrap_or_else(|| score_cards(&[]))
}

pub fn compare_hands(a: &HandResult, b: &HandResult) -> Ordering {
    match a.category.cmp(&b.category) {
        Ordering::Equal => a.tie_break.cmp(&b.tie_break),
        ord => ord,
    }
}

// Scores at most five cards as a single poker hand.
fn score_cards(cards: &[Card]) -> HandResult {
    let mut ranks: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();
    ranks.sort_unstable_by(|a, b| b.cmp(a));

    let complete = cards.len() == 5;
    let flush = complete && cards.iter().all(|c| c.suit == cards[0].suit);
    let straight = if complete { straight_high(&ranks) } else { None };

    if flush {
        if let Some(high) = straight {
            let category = if high == 14 {
                Category::RoyalFlush
            } else {
                Category::StraightFlush
            };
            return HandResult {
                category,
                tie_break: vec![high],
            };
        }
    }

    let groups = rank_groups(&ranks);
    let counts: Vec<u8> = groups.iter().map(|&(count, _)| count).collect();
    // group ranks already sit in tie-break order: bigger groups first, then higher ranks
    let grouped: Vec<u8> = groups.iter().map(|&(_, rank)| rank).collect();

    let category = match counts.as_slice() {
        [4, ..] => Category::FourOfAKind,
        [3, 2, ..] => Category::FullHouse,
        _ if flush => Category::Flush,
        _ if straight.is_some() => Category::Straight,
        [3, ..] => Category::ThreeOfAKind,
        [2, 2, ..] => Category::TwoPair,
        [2, ..] => Category::OnePair,
        _ => Category::HighCard,
    };

    let tie_break = match (category, straight) {
        (Category::Straight, Some(high)) => vec![high],
        (Category::Flush, _) => ranks,
        _ => grouped,
    };

    HandResult {
        category,
        tie_break,
    }
}

// (count, rank) pairs, ordered by count desc then rank desc.
fn rank_groups(sorted_desc: &[u8]) -> Vec<(u8, u8)> {
    let mut counts = [0u8; 15];
    for &r in sorted_desc {
        counts[r as usize] += 1;
    }
    let mut groups: Vec<(u8, u8)> = (2..=14u8)
        .rev()
        .filter(|&r| counts[r as usize] > 0)
        .map(|r| (counts[r as usize], r))
        .collect();
    groups.sort_by(|a, b| b.cmp(a));
    groups
}

// Expects exactly five ranks sorted descending.
fn straight_high(sorted_desc: &[u8]) -> Option<u8> {
    let distinct = sorted_desc.windows(2).all(|w| w[0] != w[1]);
    if !distinct {
        return None;
    }
    if sorted_desc[0] - sorted_desc[4] == 4 {
        return Some(sorted_desc[0]);
    }
    // wheel: the ace plays low
    if sorted_desc == [14, 5, 4, 3, 2] {
        return Some(5);
    }
    None
}
