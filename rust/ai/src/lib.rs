//! # holdem-ai: Computer Opponents for the Hold'em Engine
//!
//! Provides AI players that plug into the engine's action callback.
//! Every opponent answers from the [`ActionContext`] alone, so the same
//! policy works for any seat at any table size.
//!
//! ## Core Components
//!
//! - [`AIOpponent`] - Trait defining the interface for AI decision-making
//! - [`baseline`] - Rule-based opponent driven by hand strength and pot odds
//! - [`random`] - Seeded random opponent for smoke tests and fuzzing
//! - [`create_ai`] - Factory function for creating AI opponents
//! - [`AgentTable`] - One opponent per seat, usable as an [`ActionSource`]
//!
//! ## Quick Start
//!
//! ```rust
//! use holdem_ai::AgentTable;
//! use holdem_engine::config::GameConfig;
//! use holdem_engine::engine::Engine;
//!
//! let mut config = GameConfig::with_players(["bot-1", "bot-2", "bot-3"]);
//! config.seed = Some(42);
//! let mut engine = Engine::new(config).expect("valid config");
//!
//! let mut table = AgentTable::from_kinds(&["baseline", "random", "baseline"]).unwrap();
//! let summary = engine.play_hand(&mut table).expect("hand completes");
//! println!("pot of {} won by {:?}", summary.showdown.pot_awarded, summary.showdown.winners);
//! ```

use holdem_engine::player::PlayerAction;
use holdem_engine::source::{ActionContext, ActionSource};
use tracing::trace;

pub mod baseline;
pub mod random;

/// Trait defining the interface for AI opponents in poker games.
///
/// # Example Implementation
///
/// ```rust
/// use holdem_ai::AIOpponent;
/// use holdem_engine::player::PlayerAction;
/// use holdem_engine::source::ActionContext;
///
/// struct Calling;
///
/// impl AIOpponent for Calling {
///     fn get_action(&mut self, _ctx: &ActionContext<'_>) -> PlayerAction {
///         PlayerAction::CheckCall
///     }
///
///     fn name(&self) -> &str {
///         "Calling"
///     }
/// }
/// ```
pub trait AIOpponent: Send {
    /// Determine the next action for the seat described by `ctx`.
    ///
    /// The engine validates the answer; an illegal one is asked again with
    /// `ctx.attempt` increased.
    fn get_action(&mut self, ctx: &ActionContext<'_>) -> PlayerAction;

    /// Return the name/identifier of this AI implementation.
    fn name(&self) -> &str;
}

/// Factory function to create AI opponents by type string.
///
/// Supported types are `"baseline"` and `"random"`; anything else yields `None`.
///
/// ```rust
/// use holdem_ai::create_ai;
///
/// let ai = create_ai("baseline").unwrap();
/// assert_eq!(ai.name(), "BaselineAI");
/// assert!(create_ai("oracle").is_none());
/// ```
pub fn create_ai(ai_type: &str) -> Option<Box<dyn AIOpponent>> {
    match ai_type {
        "baseline" => Some(Box::new(baseline::BaselineAI::new())),
        "random" => Some(Box::new(random::RandomAI::new(rand::random()))),
        _ => None,
    }
}

/// Seats AI opponents around a table and routes each decision to its owner.
pub struct AgentTable {
    seats: Vec<Box<dyn AIOpponent>>,
}

impl AgentTable {
    /// One opponent per seat, in seat order.
    pub fn new(seats: Vec<Box<dyn AIOpponent>>) -> Self {
        Self { seats }
    }

    /// Builds a table through [`create_ai`]; `None` if any kind is unknown.
    pub fn from_kinds(kinds: &[&str]) -> Option<Self> {
        kinds
            .iter()
            .map(|kind| create_ai(kind))
            .collect::<Option<Vec<_>>>()
            .map(Self::new)
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn opponent(&self, seat: usize) -> Option<&dyn AIOpponent> {
        self.seats.get(seat).map(|ai| ai.as_ref())
    }
}

impl ActionSource for AgentTable {
    fn request_action(&mut self, ctx: &ActionContext<'_>) -> PlayerAction {
        match self.seats.get_mut(ctx.seat) {
            Some(ai) => {
                let action = ai.get_action(ctx);
                trace!(seat = ctx.seat, ai = ai.name(), ?action, "ai decision");
                action
            }
            // an unseated bot never bets
            None => PlayerAction::Fold,
        }
    }
}

impl std::fmt::Debug for AgentTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.seats.iter().map(|ai| ai.name()))
            .finish()
    }
}
