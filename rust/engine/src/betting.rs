use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::game::Street;
use crate::player::{Player, PlayerAction};
use crate::rules::{validate_action, ValidatedAction};

/// Where a betting round stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    /// Waiting on the player in this seat
    AwaitingAction(usize),
    /// Nobody owes an action; chips can be swept into the pot
    RoundComplete,
}

/// The result of applying one action to the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedAction {
    pub seat: usize,
    pub requested: PlayerAction,
    pub applied: ValidatedAction,
    /// A check/call the player could not cover turned into an all-in
    pub converted_to_all_in: bool,
    /// The action raised the highest bet and reopened the action
    pub reopened: bool,
}

/// State machine for one street of betting.
///
/// The round does not own the players; the engine lends it the table for each
/// call so player state stays in one place. Turn order is clockwise from the
/// opening seat, skipping eliminated, folded and all-in players.
///
/// # Examples
///
/// ```
/// use holdem_engine::betting::{BettingRound, RoundState};
/// use holdem_engine::game::Street;
/// use holdem_engine::player::{Player, PlayerAction};
///
/// let mut players = vec![Player::new("a", 100), Player::new("b", 100)];
/// let mut round = BettingRound::open(Street::Flop, &players, 1);
/// assert_eq!(round.state(), RoundState::AwaitingAction(0));
///
/// round.apply(&mut players, 0, PlayerAction::BetOrRaise(20)).unwrap();
/// round.apply(&mut players, 1, PlayerAction::CheckCall).unwrap();
/// assert!(round.is_complete());
/// assert_eq!(round.finish(&mut players), 40);
/// ```
#[derive(Debug, Clone)]
pub struct BettingRound {
    street: Street,
    highest_bet: u32,
    state: RoundState,
}

impl BettingRound {
    /// Opens a round whose first action goes to the next eligible seat after `after`.
    ///
    /// Bets already on the table (posted blinds) set the opening highest bet.
    pub fn open(street: Street, players: &[Player], after: usize) -> Self {
        let highest_bet = players
            .iter()
            .filter(|p| p.is_in_tournament())
            .map(Player::current_bet)
            .max()
            .unwrap_or(0);
        let mut round = Self {
            street,
            highest_bet,
            state: RoundState::RoundComplete,
        };
        round.state = round.next_state(players, after);
        round
    }

    pub fn street(&self) -> Street {
        self.street
    }
    pub fn highest_bet(&self) -> u32 {
        self.highest_bet
    }
    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn current_seat(&self) -> Option<usize> {
        match self.state {
            RoundState::AwaitingAction(seat) => Some(seat),
            RoundState::RoundComplete => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state == RoundState::RoundComplete
    }

    /// Validates and applies `action` for the player in `seat`.
    ///
    /// On error nothing changes and the same seat is still awaited.
    pub fn apply(
        &mut self,
        players: &mut [Player],
        seat: usize,
        action: PlayerAction,
    ) -> Result<AppliedAction, GameError> {
        let expected = self.current_seat().ok_or(GameError::BettingRoundClosed)?;
        if seat != expected {
            return Err(GameError::NotPlayersTurn {
                expected,
                actual: seat,
            });
        }
        let player = players.get_mut(seat).ok_or(GameError::UnknownSeat(seat))?;
        let applied = validate_action(player, self.highest_bet, action)?;

        match applied {
            ValidatedAction::Fold => player.fold(),
            ValidatedAction::Check => {}
            ValidatedAction::Call(n) | ValidatedAction::Raise(n) | ValidatedAction::AllIn(n) => {
                player.commit(n);
            }
        }
        player.mark_acted();

        let converted_to_all_in =
            action == PlayerAction::CheckCall && matches!(applied, ValidatedAction::AllIn(_));
        let new_bet = player.current_bet();
        let reopened = new_bet > self.highest_bet;
        if reopened {
            self.highest_bet = new_bet;
            for (i, other) in players.iter_mut().enumerate() {
                if i != seat && other.can_act() {
                    other.clear_acted();
                }
            }
        }

        self.state = self.next_state(players, seat);
        Ok(AppliedAction {
            seat,
            requested: action,
            applied,
            converted_to_all_in,
            reopened,
        })
    }

    /// True when no player owes an action on this street.
    pub fn is_settled(&self, players: &[Player]) -> bool {
        let contenders = players.iter().filter(|p| p.is_contending()).count();
        if contenders <= 1 {
            return true;
        }
        let actionable: Vec<&Player> = players.iter().filter(|p| p.can_act()).collect();
        match actionable.as_slice() {
            [] => return true,
            // nobody left to bet against
            [only] if only.current_bet() >= self.highest_bet => return true,
            _ => {}
        }
        players
            .iter()
            .filter(|p| p.is_in_tournament())
            .all(|p| p.is_folded() || p.is_all_in() || self.has_matched(p))
    }

    /// Sweeps every street bet into a single amount and resets the street fields.
    pub fn finish(self, players: &mut [Player]) -> u32 {
        players.iter_mut().map(Player::collect_bet).sum()
    }

    fn has_matched(&self, p: &Player) -> bool {
        p.has_acted() && p.current_bet() == self.highest_bet
    }

    fn next_state(&self, players: &[Player], after: usize) -> RoundState {
        if self.is_settled(players) {
            return RoundState::RoundComplete;
        }
        let n = players.len();
        (1..=n)
            .map(|offset| (after + offset) % n)
            .find(|&i| players[i].can_act() && !self.has_matched(&players[i]))
            .map_or(RoundState::RoundComplete, RoundState::AwaitingAction)
    }
}

/// The only player still holding cards, if everyone else folded.
pub fn uncontested_winner(players: &[Player]) -> Option<usize> {
    let mut contending = players
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_contending())
        .map(|(i, _)| i);
    match (contending.next(), contending.next()) {
        (Some(seat), None) => Some(seat),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(stacks: &[u32]) -> Vec<Player> {
        stacks
            .iter()
            .enumerate()
            .map(|(i, &s)| Player::new(format!("p{i}"), s))
            .collect()
    }

    #[test]
    fn apply_out_of_turn_is_rejected_without_changes() {
        let mut players = table(&[100, 100, 100]);
        let mut round = BettingRound::open(Street::Flop, &players, 0);
        assert_eq!(round.current_seat(), Some(1));
        let err = round
            .apply(&mut players, 2, PlayerAction::CheckCall)
            .unwrap_err();
        assert_eq!(
            err,
            GameError::NotPlayersTurn {
                expected: 1,
                actual: 2
            }
        );
        assert_eq!(round.current_seat(), Some(1));
        assert!(!players[2].has_acted());
    }

    #[test]
    fn invalid_raise_keeps_same_player_on_turn() {
        let mut players = table(&[100, 100]);
        let mut round = BettingRound::open(Street::Turn, &players, 1);
        let err = round
            .apply(&mut players, 0, PlayerAction::BetOrRaise(500))
            .unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(round.current_seat(), Some(0));
        assert_eq!(players[0].chip_count(), 100);
    }

    #[test]
    fn short_call_converts_to_all_in() {
        let mut players = table(&[200, 50]);
        let mut round = BettingRound::open(Street::Flop, &players, 1);
        round
            .apply(&mut players, 0, PlayerAction::BetOrRaise(120))
            .unwrap();
        let applied = round
            .apply(&mut players, 1, PlayerAction::CheckCall)
            .unwrap();
        assert!(applied.converted_to_all_in);
        assert_eq!(applied.applied, ValidatedAction::AllIn(50));
        assert!(players[1].is_all_in());
        assert!(round.is_complete());
    }

    #[test]
    fn applying_after_completion_fails() {
        let mut players = table(&[100, 100]);
        let mut round = BettingRound::open(Street::River, &players, 1);
        round.apply(&mut players, 0, PlayerAction::CheckCall).unwrap();
        round.apply(&mut players, 1, PlayerAction::CheckCall).unwrap();
        assert!(round.is_complete());
        assert_eq!(
            round.apply(&mut players, 0, PlayerAction::CheckCall),
            Err(GameError::BettingRoundClosed)
        );
    }

    #[test]
    fn uncontested_winner_needs_exactly_one_contender() {
        let mut players = table(&[100, 100, 100]);
        assert_eq!(uncontested_winner(&players), None);
        players[0].fold();
        players[2].fold();
        assert_eq!(uncontested_winner(&players), Some(1));
    }
}
