use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::player::{Player, PlayerAction as A};

/// An action after validation, carrying the exact number of chips it commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidatedAction {
    Fold,
    Check,
    Call(u32),
    Raise(u32),
    AllIn(u32),
}

impl ValidatedAction {
    pub fn chips(&self) -> u32 {
        match *self {
            ValidatedAction::Fold | ValidatedAction::Check => 0,
            ValidatedAction::Call(n) | ValidatedAction::Raise(n) | ValidatedAction::AllIn(n) => n,
        }
    }
}

/// Validates a player action against the highest bet on the current street.
///
/// Converts a [`PlayerAction`](crate::player::PlayerAction) into a
/// [`ValidatedAction`]. A check/call the player cannot cover becomes an all-in
/// for whatever is left rather than an error.
///
/// # Errors
///
/// - [`GameError::PlayerAlreadyFolded`] / [`GameError::PlayerAllIn`] - the player cannot act
/// - [`GameError::InvalidRaise`] - zero amount, more than the stack, or less than a call
///
/// # Examples
///
/// ```
/// use holdem_engine::player::{Player, PlayerAction};
/// use holdem_engine::rules::{validate_action, ValidatedAction};
///
/// let short = Player::new("short", 60);
/// let result = validate_action(&short, 100, PlayerAction::CheckCall);
/// assert_eq!(result, Ok(ValidatedAction::AllIn(60)));
/// ```
///
/// ```
/// use holdem_engine::errors::GameError;
/// use holdem_engine::player::{Player, PlayerAction};
/// use holdem_engine::rules::validate_action;
///
/// let deep = Player::new("deep", 1_000);
/// // facing 100, a 50 chip raise does not even call
/// let result = validate_action(&deep, 100, PlayerAction::BetOrRaise(50));
/// assert!(matches!(result, Err(GameError::InvalidRaise { .. })));
/// ```
pub fn validate_action(
    player: &Player,
    highest_bet: u32,
    action: A,
) -> Result<ValidatedAction, GameError> {
    if player.is_folded() {
        return Err(GameError::PlayerAlreadyFolded);
    }
    if player.is_all_in() {
        return Err(GameError::PlayerAllIn);
    }

    let chips = player.chip_count();
    let to_call = highest_bet.saturating_sub(player.current_bet());

    match action {
        A::Fold => Ok(ValidatedAction::Fold),
        A::CheckCall => {
            if to_call == 0 {
                Ok(ValidatedAction::Check)
            } else if to_call >= chips {
                Ok(ValidatedAction::AllIn(chips))
            } else {
                Ok(ValidatedAction::Call(to_call))
            }
        }
        A::BetOrRaise(amount) => {
            if amount == 0 || amount > chips || amount < to_call {
                return Err(GameError::InvalidRaise {
                    amount,
                    to_call,
                    chips,
                });
            }
            if amount == chips {
                Ok(ValidatedAction::AllIn(amount))
            } else if amount == to_call {
                Ok(ValidatedAction::Call(amount))
            } else {
                Ok(ValidatedAction::Raise(amount))
            }
        }
        A::AllIn => Ok(ValidatedAction::AllIn(chips)),
    }
}
