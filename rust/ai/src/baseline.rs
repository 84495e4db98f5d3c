//! Baseline AI implementation for poker gameplay.
//!
//! A simple rule-based opponent used for testing and benchmarking.
//! Decisions come from hand strength and pot odds only, with no randomness.

use crate::AIOpponent;
use holdem_engine::cards::Card;
use holdem_engine::game::Street;
use holdem_engine::hand::{Category, evaluate};
use holdem_engine::player::PlayerAction;
use holdem_engine::source::ActionContext;

/// Deterministic rule-based opponent.
///
/// # Strategy
///
/// **Preflop:**
/// - Strong hands (high pairs 77+, AK, AQ): Raise or call
/// - Medium hands (suited connectors, Ax, small pairs): Call if cheap
/// - Weak hands: Fold to bets, check if free
///
/// **Postflop:**
/// - Strong hands (Two Pair+): Bet or call
/// - Medium hands (One Pair): Check or call small bets
/// - Weak hands: Calculate pot odds, fold if unfavorable
///
/// A player asked again after an illegal answer falls back to check/call.
#[derive(Debug, Clone, Default)]
pub struct BaselineAI;

impl BaselineAI {
    pub fn new() -> Self {
        Self
    }

    /// Preflop hand strength on a scale of 0-10.
    ///
    /// - 9-10: Premium hands (AA, KK, QQ, JJ, AKs)
    /// - 7-8: Strong hands (TT-99, AK, AQ, KQ)
    /// - 5-6: Medium hands (88-77, AJ, suited connectors)
    /// - 3-4: Marginal hands (66-22, Ax, suited cards)
    /// - 0-2: Weak hands (offsuit low cards)
    fn evaluate_preflop_strength(hole: [Card; 2]) -> u8 {
        let r1 = hole[0].rank.value();
        let r2 = hole[1].rank.value();
        let (high, low) = if r1 > r2 { (r1, r2) } else { (r2, r1) };
        let suited = hole[0].suit == hole[1].suit;
        let pick = |s: u8, o: u8| if suited { s } else { o };

        if r1 == r2 {
            return match high {
                13..=14 => 10,
                11..=12 => 9,
                10 => 8,
                9 => 7,
                8 => 6,
                7 => 5,
                _ => 4,
            };
        }

        match (high, low) {
            (14, 13) => pick(10, 8),
            (14, 12) => pick(8, 7),
            (14, 11) => pick(7, 6),
            (14, 10) => pick(6, 5),
            (14, _) => pick(5, 4),
            (13, 12) => pick(7, 6),
            (13, 11) => pick(6, 5),
            (13, 10) => pick(5, 4),
            (12, 11) => pick(6, 5),
            (12, 10) => pick(5, 4),
            _ if suited && high - low <= 2 => {
                if high >= 9 {
                    5
                } else {
                    4
                }
            }
            // broadway
            _ if high >= 11 && low >= 9 => 4,
            _ => 2,
        }
    }

    /// Postflop hand strength on a scale of 0-10, `None` before the flop.
    fn evaluate_postflop_strength(hole: [Card; 2], board: &[Card]) -> Option<u8> {
        if board.len() < 3 {
            return None;
        }
        let result = evaluate(&hole, board);

        let base_strength = match result.category {
            Category::HighCard => 1,
            Category::OnePair => 3,
            Category::TwoPair => 5,
            Category::ThreeOfAKind => 6,
            Category::Straight => 7,
            Category::Flush => 8,
            Category::FullHouse => 9,
            Category::FourOfAKind | Category::StraightFlush | Category::RoyalFlush => 10,
        };
        let kicker_boost = match result.tie_break.first() {
            Some(&rank) if rank >= 12 => 1,
            _ => 0,
        };
        Some((base_strength + kicker_boost).min(10))
    }

    /// Pot odds as pot / (pot + call).
    fn calculate_pot_odds(pot_size: u32, call_amount: u32) -> f32 {
        if call_amount == 0 {
            return 1.0;
        }
        pot_size as f32 / (pot_size + call_amount) as f32
    }

    // Chips to put in for a raise of `size` over the call, capped at the stack.
    fn raise_to(to_call: u32, size: u32, stack: u32) -> PlayerAction {
        let amount = to_call.saturating_add(size.max(1));
        if amount >= stack {
            PlayerAction::AllIn
        } else {
            PlayerAction::BetOrRaise(amount)
        }
    }

    fn decide_action(hand_strength: u8, to_call: u32, stack: u32, pot: u32) -> PlayerAction {
        if to_call == 0 {
            return match hand_strength {
                9..=10 => Self::raise_to(0, pot * 2 / 3, stack),
                7..=8 => Self::raise_to(0, pot / 2, stack),
                _ => PlayerAction::CheckCall,
            };
        }

        // a short call is an all-in anyway
        if to_call >= stack {
            return if hand_strength >= 7 {
                PlayerAction::AllIn
            } else {
                PlayerAction::Fold
            };
        }

        let pot_odds = Self::calculate_pot_odds(pot, to_call);
        match hand_strength {
            9..=10 => Self::raise_to(to_call, pot / 2, stack),
            7..=8 => PlayerAction::CheckCall,
            5..=6 if pot_odds >= 0.3 || to_call <= pot / 4 => PlayerAction::CheckCall,
            3..=4 if pot_odds >= 0.4 || to_call <= pot / 6 => PlayerAction::CheckCall,
            _ => PlayerAction::Fold,
        }
    }
}

impl AIOpponent for BaselineAI {
    fn get_action(&mut self, ctx: &ActionContext<'_>) -> PlayerAction {
        if ctx.attempt > 1 {
            return PlayerAction::CheckCall;
        }
        let hole = match ctx.player.hole_cards() {
            &[c1, c2] => [c1, c2],
            _ => {
                return if ctx.to_call == 0 {
                    PlayerAction::CheckCall
                } else {
                    PlayerAction::Fold
                };
            }
        };

        let hand_strength = match ctx.street {
            Street::PreFlop => Self::evaluate_preflop_strength(hole),
            _ => Self::evaluate_postflop_strength(hole, ctx.board)
                .unwrap_or_else(|| Self::evaluate_preflop_strength(hole)),
        };
        // pot odds count the bets already on this street too
        let pot = ctx.pot + ctx.highest_bet;
        Self::decide_action(hand_strength, ctx.to_call, ctx.player.chip_count(), pot)
    }

    fn name(&self) -> &str {
        "BaselineAI"
    }
}
