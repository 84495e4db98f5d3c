//! # holdem-engine: Texas Hold'em Rules Engine
//!
//! A multi-player (2 to 22 seats) no-limit Texas Hold'em engine. It deals
//! cards, runs betting rounds, evaluates hands and awards the pot, while the
//! decisions themselves come from an [`ActionSource`](source::ActionSource)
//! supplied by the caller: a console, a GUI or an AI agent.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card)
//! - [`deck`] - Single-hand deck with seeded shuffling
//! - [`hand`] - Best-of-five hand evaluation and comparison
//! - [`player`] - Player state, actions and chip stack
//! - [`rules`] - Validation of a requested action against the current bet
//! - [`betting`] - Betting round state machine
//! - [`pot`] - Pot accounting and split-pot payouts
//! - [`board`] - Community cards, flop/turn/river
//! - [`game`] - Streets, button rotation and blind seats
//! - [`source`] - The action callback seam
//! - [`engine`] - Hand orchestration
//! - [`config`] - Table configuration from TOML and environment
//! - [`logger`] - JSONL hand history
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use holdem_engine::cards::{Card, Rank, Suit};
//! use holdem_engine::hand::{evaluate, Category};
//!
//! let hole = [
//!     Card::new(Rank::Ace, Suit::Hearts),
//!     Card::new(Rank::King, Suit::Hearts),
//! ];
//! let board = [
//!     Card::new(Rank::Queen, Suit::Hearts),
//!     Card::new(Rank::Jack, Suit::Hearts),
//!     Card::new(Rank::Ten, Suit::Hearts),
//!     Card::new(Rank::Two, Suit::Clubs),
//!     Card::new(Rank::Three, Suit::Diamonds),
//! ];
//!
//! let result = evaluate(&hole, &board);
//! assert_eq!(result.category, Category::RoyalFlush);
//! ```
//!
//! ## Playing a hand
//!
//! ```rust
//! use holdem_engine::config::GameConfig;
//! use holdem_engine::engine::Engine;
//! use holdem_engine::player::PlayerAction;
//! use holdem_engine::source::from_fn;
//!
//! let mut config = GameConfig::with_players(["alice", "bob"]);
//! config.seed = Some(42);
//! let mut engine = Engine::new(config).unwrap();
//!
//! // whoever acts first folds
//! let mut source = from_fn(|_ctx| PlayerAction::Fold);
//! let summary = engine.play_hand(&mut source).unwrap();
//! assert!(summary.showdown.uncontested);
//! ```

pub mod betting;
pub mod board;
pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod game;
pub mod hand;
pub mod logger;
pub mod player;
pub mod pot;
pub mod rules;
pub mod source;
