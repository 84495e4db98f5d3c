use std::collections::VecDeque;

use crate::cards::Card;
use crate::game::Street;
use crate::player::{Player, PlayerAction};

/// Everything an action source may look at when a player is asked to act.
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    pub seat: usize,
    pub player: &'a Player,
    pub street: Street,
    pub highest_bet: u32,
    /// Chips needed to call, before capping at the player's stack
    pub to_call: u32,
    /// Chips already swept into the pot from earlier streets
    pub pot: u32,
    pub board: &'a [Card],
    /// 1-based attempt counter; above 1 the previous answer was rejected
    pub attempt: u32,
}

/// Supplies player decisions to the engine.
///
/// This is the seam to the outside world: a console prompt, a GUI click
/// handler or an agent policy. The engine validates every answer and asks
/// again (up to the configured limit) when it is illegal.
pub trait ActionSource {
    fn request_action(&mut self, ctx: &ActionContext<'_>) -> PlayerAction;
}

impl<S: ActionSource + ?Sized> ActionSource for Box<S> {
    fn request_action(&mut self, ctx: &ActionContext<'_>) -> PlayerAction {
        (**self).request_action(ctx)
    }
}

/// Wraps a closure as an [`ActionSource`].
///
/// ```
/// use holdem_engine::player::PlayerAction;
/// use holdem_engine::source::from_fn;
///
/// let always_fold = from_fn(|_ctx| PlayerAction::Fold);
/// # let _ = always_fold;
/// ```
pub fn from_fn<F>(f: F) -> FnSource<F>
where
    F: FnMut(&ActionContext<'_>) -> PlayerAction,
{
    FnSource(f)
}

#[derive(Debug, Clone)]
pub struct FnSource<F>(F);

impl<F> ActionSource for FnSource<F>
where
    F: FnMut(&ActionContext<'_>) -> PlayerAction,
{
    fn request_action(&mut self, ctx: &ActionContext<'_>) -> PlayerAction {
        (self.0)(ctx)
    }
}

/// Replays a fixed queue of actions, then falls back to check/call.
///
/// Useful for reproducing a recorded hand or scripting a test scenario.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    queue: VecDeque<PlayerAction>,
    served: usize,
}

impl ScriptedSource {
    pub fn new(actions: impl IntoIterator<Item = PlayerAction>) -> Self {
        Self {
            queue: actions.into_iter().collect(),
            served: 0,
        }
    }

    pub fn push(&mut self, action: PlayerAction) {
        self.queue.push_back(action);
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Number of decisions handed out so far, fallbacks included.
    pub fn served(&self) -> usize {
        self.served
    }
}

impl ActionSource for ScriptedSource {
    fn request_action(&mut self, _ctx: &ActionContext<'_>) -> PlayerAction {
        self.served += 1;
        self.queue.pop_front().unwrap_or(PlayerAction::CheckCall)
    }
}
