//! Seeded random opponent.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::AIOpponent;
use holdem_engine::player::PlayerAction;
use holdem_engine::source::ActionContext;

/// Picks a legal-looking action at random.
///
/// Mostly checks or calls, sometimes folds to a bet, raises or shoves.
/// The same seed always produces the same sequence of decisions.
#[derive(Debug, Clone)]
pub struct RandomAI {
    rng: StdRng,
}

impl RandomAI {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl AIOpponent for RandomAI {
    fn get_action(&mut self, ctx: &ActionContext<'_>) -> PlayerAction {
        let stack = ctx.player.chip_count();
        if ctx.attempt > 1 || stack == 0 {
            return PlayerAction::CheckCall;
        }
        let roll: u32 = self.rng.random_range(0..100);
        match roll {
            0..15 if ctx.to_call > 0 => PlayerAction::Fold,
            0..75 => PlayerAction::CheckCall,
            75..95 => {
                let extra = self.rng.random_range(1..=stack.max(2) / 2);
                let amount = ctx.to_call.saturating_add(extra);
                if amount >= stack {
                    PlayerAction::AllIn
                } else {
                    PlayerAction::BetOrRaise(amount)
                }
            }
            _ => PlayerAction::AllIn,
        }
    }

    fn name(&self) -> &str {
        "RandomAI"
    }
}
