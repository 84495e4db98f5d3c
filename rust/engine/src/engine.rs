use std::time::Instant;

use chrono::Utc;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::betting::{uncontested_winner, AppliedAction, BettingRound};
use crate::board::CommunityCards;
use crate::cards::Card;
use crate::config::{ConfigError, GameConfig};
use crate::deck::Deck;
use crate::errors::GameError;
use crate::game::{seats_from_left_of, SeatAssignment, Street, TablePositions};
use crate::hand::{evaluate, HandResult};
use crate::logger::{ActionRecord, HandLogger, HandRecord, SeatRecord, ShowdownInfo, ShownHand};
use crate::player::{Player, PlayerAction};
use crate::pot::{split_pot, Pot};
use crate::source::{ActionContext, ActionSource};

/// How the betting on one street ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BettingOutcome {
    /// Players acted and at least two still hold cards
    Completed,
    /// Everyone but `winner` folded
    Uncontested { winner: usize },
    /// Fewer than two players could bet, nobody was asked
    NoAction,
}

/// Result of [`Engine::run_street`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreetOutcome {
    pub street: Street,
    /// Community cards revealed for this street (empty pre-flop)
    pub dealt: Vec<Card>,
    pub betting: BettingOutcome,
    pub actions: Vec<AppliedAction>,
    /// Chips swept into the pot at the end of the street
    pub collected: u32,
}

/// Result of [`Engine::showdown`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowdownResult {
    /// Winning seats, ordered from the dealer's left
    pub winners: Vec<usize>,
    pub pot_awarded: u32,
    pub payouts: Vec<(usize, u32)>,
    /// Evaluated hands; empty when the pot was uncontested
    pub hands: Vec<(usize, HandResult)>,
    pub uncontested: bool,
}

/// Everything that happened in one hand played through [`Engine::play_hand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandSummary {
    pub hand_number: u64,
    pub streets: Vec<StreetOutcome>,
    pub showdown: ShowdownResult,
    pub eliminated: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Dealt,
    Played(Street),
    Settled,
}

/// Core game engine that orchestrates Texas Hold'em hands for a single table.
///
/// Owns the players, the deck, the board and the pot. Each hand goes through
/// [`start_hand`](Self::start_hand), one [`run_street`](Self::run_street) per
/// street, [`showdown`](Self::showdown) and [`end_hand`](Self::end_hand);
/// [`play_hand`](Self::play_hand) chains them.
///
/// # Examples
///
/// ```
/// use holdem_engine::config::GameConfig;
/// use holdem_engine::engine::Engine;
/// use holdem_engine::source::ScriptedSource;
///
/// let mut config = GameConfig::with_players(["alice", "bob", "carol"]);
/// config.seed = Some(7);
/// let mut engine = Engine::new(config).expect("valid config");
///
/// // nobody scripted anything, so everyone checks or calls to the river
/// let mut source = ScriptedSource::default();
/// let summary = engine.play_hand(&mut source).expect("hand plays out");
///
/// assert_eq!(summary.streets.len(), 4);
/// assert_eq!(engine.board().len(), 5);
/// let total: u32 = engine.players().iter().map(|p| p.chip_count()).sum();
/// assert_eq!(total, 3_000);
/// ```
#[derive(Debug)]
pub struct Engine {
    config: GameConfig,
    /// Seats in table order, eliminated players included
    players: Vec<Player>,
    positions: TablePositions,
    /// Seats resolved for the current (or last) hand
    seats: Option<SeatAssignment>,
    seed: u64,
    rng: ChaCha20Rng,
    deck: Deck,
    board: CommunityCards,
    pot: Pot,
    /// Chips each seat has swept into the pot this hand
    contributed: Vec<u32>,
    phase: Phase,
    hand_number: u64,
    history: HandLogger,
    record: Option<HandRecord>,
    last_record: Option<HandRecord>,
}

impl Engine {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let history = match &config.hand_history {
            Some(path) => HandLogger::create(path)?,
            None => HandLogger::detached(&Utc::now().format("%Y%m%d").to_string()),
        };
        let players: Vec<Player> = config
            .players
            .iter()
            .map(|name| Player::new(name.clone(), config.starting_stack))
            .collect();
        let seat_count = players.len();
        Ok(Self {
            positions: TablePositions::new(seat_count),
            contributed: vec![0; seat_count],
            players,
            seats: None,
            seed,
            rng: ChaCha20Rng::seed_from_u64(seed),
            deck: Deck::new(),
            board: CommunityCards::new(),
            pot: Pot::new(),
            phase: Phase::Idle,
            hand_number: 0,
            history,
            record: None,
            last_record: None,
            config,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
    pub fn players(&self) -> &[Player] {
        &self.players
    }
    pub fn player(&self, seat: usize) -> Result<&Player, GameError> {
        self.players.get(seat).ok_or(GameError::UnknownSeat(seat))
    }
    pub fn seed(&self) -> u64 {
        self.seed
    }
    pub fn hand_number(&self) -> u64 {
        self.hand_number
    }
    pub fn seats(&self) -> Option<SeatAssignment> {
        self.seats
    }
    pub fn positions(&self) -> &TablePositions {
        &self.positions
    }
    pub fn community(&self) -> &CommunityCards {
        &self.board
    }
    pub fn board(&self) -> Vec<Card> {
        self.board.cards()
    }
    /// Chips swept into the pot; bets on the current street are not included.
    pub fn pot(&self) -> u32 {
        self.pot.total()
    }
    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }
    /// History record of the most recently finished hand.
    pub fn last_record(&self) -> Option<&HandRecord> {
        self.last_record.as_ref()
    }

    /// Last street that finished betting in the current hand.
    pub fn street(&self) -> Option<Street> {
        match self.phase {
            Phase::Played(street) => Some(street),
            _ => None,
        }
    }

    pub fn is_hand_in_progress(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn players_remaining(&self) -> usize {
        self.players.iter().filter(|p| p.is_in_tournament()).count()
    }

    pub fn is_game_over(&self) -> bool {
        self.players_remaining() <= 1
    }

    /// The last player standing once the game is over.
    pub fn winner(&self) -> Option<usize> {
        if !self.is_game_over() {
            return None;
        }
        self.players.iter().position(|p| p.is_in_tournament())
    }

    /// Starts a new hand with a freshly shuffled deck.
    ///
    /// Moves the button, deals two hole cards to every seated player and posts blinds.
    pub fn start_hand(&mut self) -> Result<(), GameError> {
        let mut deck = Deck::new();
        deck.shuffle(&mut self.rng);
        self.start_hand_with_deck(deck)
    }

    /// Starts a new hand dealing from `deck` as given, without shuffling.
    pub fn start_hand_with_deck(&mut self, deck: Deck) -> Result<(), GameError> {
        if self.phase != Phase::Idle {
            return Err(GameError::HandInProgress);
        }
        let remaining = self.players_remaining();
        if remaining < 2 {
            return Err(GameError::NotEnoughPlayers { remaining });
        }

        self.positions.advance();
        let seats = self
            .positions
            .resolve(&self.players)
            .ok_or(GameError::NotEnoughPlayers { remaining })?;

        self.deck = deck;
        self.board.reset();
        self.pot = Pot::new();
        self.contributed.iter_mut().for_each(|c| *c = 0);
        for p in &mut self.players {
            p.reset_for_hand();
        }

        let seat_count = self.players.len();
        for _ in 0..2 {
            for seat in seats_from_left_of(seats.dealer, seat_count) {
                if self.players[seat].is_in_tournament() {
                    let card = self.deck.deal_one()?;
                    self.players[seat].give_card(card)?;
                }
            }
        }

        self.hand_number += 1;
        let record = HandRecord {
            hand_id: self.history.next_id(),
            seed: Some(self.seed),
            hand_number: self.hand_number,
            dealer: seats.dealer,
            players: self
                .players
                .iter()
                .enumerate()
                .filter(|(_, p)| p.is_in_tournament())
                .map(|(seat, p)| SeatRecord {
                    seat,
                    name: p.name().to_string(),
                    chips: p.chip_count(),
                })
                .collect(),
            blinds: Vec::new(),
            actions: Vec::new(),
            board: Vec::new(),
            pot: 0,
            showdown: None,
            eliminated: Vec::new(),
            ts: None,
        };
        self.record = Some(record);

        self.post_blind(seats.small_blind, self.config.small_blind);
        self.post_blind(seats.big_blind, self.config.big_blind);
        self.seats = Some(seats);
        self.phase = Phase::Dealt;
        self.refresh_hand_strengths();

        info!(
            hand = self.hand_number,
            dealer = seats.dealer,
            small_blind = seats.small_blind,
            big_blind = seats.big_blind,
            "hand started"
        );
        Ok(())
    }

    /// Deals the community cards for `street` and runs its betting round.
    ///
    /// Streets must be played in order. Once everyone but one player has
    /// folded, further streets are refused with [`GameError::HandAlreadyComplete`].
    /// Any other failure aborts the hand and refunds every chip committed to it.
    pub fn run_street<S>(
        &mut self,
        street: Street,
        source: &mut S,
    ) -> Result<StreetOutcome, GameError>
    where
        S: ActionSource + ?Sized,
    {
        let expected = match self.phase {
            Phase::Idle => return Err(GameError::NoHandInProgress),
            Phase::Settled => return Err(GameError::HandAlreadyComplete),
            Phase::Dealt => Some(Street::PreFlop),
            Phase::Played(last) => last.next(),
        };
        if uncontested_winner(&self.players).is_some() {
            return Err(GameError::HandAlreadyComplete);
        }
        if expected != Some(street) {
            return Err(GameError::OutOfOrderStreet {
                expected,
                actual: street,
            });
        }

        match self.play_street(street, source) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                error!(hand = self.hand_number, ?street, error = %e, "aborting hand");
                self.abort_hand();
                Err(e)
            }
        }
    }

    /// Best hand `seat` holds over the cards dealt so far.
    pub fn get_hand_strength(&self, seat: usize) -> Result<HandResult, GameError> {
        let player = self.player(seat)?;
        Ok(evaluate(player.hole_cards(), &self.board.cards()))
    }

    /// Awards the pot.
    ///
    /// An uncontested pot goes to the last player holding cards without looking
    /// at any hand. Otherwise the river must have been played; the best hands
    /// split the pot, odd chips going to the winners nearest the dealer's left.
    pub fn showdown(&mut self) -> Result<ShowdownResult, GameError> {
        let seats = match self.phase {
            Phase::Idle => return Err(GameError::NoHandInProgress),
            Phase::Settled => return Err(GameError::HandAlreadyComplete),
            _ => self.seats.ok_or(GameError::NoHandInProgress)?,
        };
        let contested = uncontested_winner(&self.players).is_none();
        if contested && self.phase != Phase::Played(Street::River) {
            let next = match self.phase {
                Phase::Played(last) => last.next(),
                _ => Some(Street::PreFlop),
            };
            return Err(GameError::ShowdownBeforeRiver { next });
        }
        self.sweep_bets();

        let order: Vec<usize> = seats_from_left_of(seats.dealer, self.players.len()).collect();
        let (winners, hands, uncontested) = match uncontested_winner(&self.players) {
            Some(winner) => (vec![winner], Vec::new(), true),
            None => {
                let board = self.board.cards();
                let hands: Vec<(usize, HandResult)> = order
                    .iter()
                    .copied()
                    .filter(|&seat| self.players[seat].is_contending())
                    .map(|seat| (seat, evaluate(self.players[seat].hole_cards(), &board)))
                    .collect();
                let best = hands
                    .iter()
                    .map(|(_, result)| result)
                    .max()
                    .cloned()
                    .ok_or(GameError::NoEligiblePlayers)?;
                let winners = hands
                    .iter()
                    .filter(|(_, result)| *result == best)
                    .map(|&(seat, _)| seat)
                    .collect();
                (winners, hands, false)
            }
        };

        let pot_awarded = self.pot.take();
        let payouts = split_pot(pot_awarded, &winners);
        for &(seat, chips) in &payouts {
            self.players[seat].add_chips(chips);
        }
        for (seat, result) in &hands {
            self.players[*seat].set_last_hand(result.clone());
        }
        self.phase = Phase::Settled;

        info!(
            hand = self.hand_number,
            ?winners,
            pot = pot_awarded,
            uncontested,
            "pot awarded"
        );

        if let Some(record) = self.record.as_mut() {
            record.pot = pot_awarded;
            record.showdown = Some(ShowdownInfo {
                winners: winners.clone(),
                payouts: payouts.clone(),
                hands: hands
                    .iter()
                    .map(|(seat, result)| ShownHand {
                        seat: *seat,
                        hole: self.players[*seat].hole_cards().to_vec(),
                        result: result.clone(),
                    })
                    .collect(),
                uncontested,
            });
        }

        Ok(ShowdownResult {
            winners,
            pot_awarded,
            payouts,
            hands,
            uncontested,
        })
    }

    /// Closes the hand: retires busted players and writes the hand history.
    ///
    /// Returns the seats eliminated by this hand.
    pub fn end_hand(&mut self) -> Result<Vec<usize>, GameError> {
        match self.phase {
            Phase::Idle => return Err(GameError::NoHandInProgress),
            Phase::Settled => {}
            _ => return Err(GameError::PotNotAwarded),
        }

        let mut eliminated = Vec::new();
        for (seat, p) in self.players.iter_mut().enumerate() {
            if p.eliminate_if_busted() {
                info!(seat, name = p.name(), "player eliminated");
                eliminated.push(seat);
            }
        }

        if let Some(mut record) = self.record.take() {
            record.board = self.board.cards();
            record.eliminated = eliminated.clone();
            if let Err(e) = self.history.write(&record) {
                warn!(hand = self.hand_number, error = %e, "failed to write hand history");
            }
            self.last_record = Some(record);
        }
        self.phase = Phase::Idle;

        if let Some(winner) = self.winner() {
            info!(seat = winner, name = self.players[winner].name(), "game over");
        }
        Ok(eliminated)
    }

    /// Plays one full hand, skipping streets once everyone but one player folded.
    pub fn play_hand<S>(&mut self, source: &mut S) -> Result<HandSummary, GameError>
    where
        S: ActionSource + ?Sized,
    {
        self.start_hand()?;
        let mut streets = Vec::with_capacity(4);
        for street in [Street::PreFlop, Street::Flop, Street::Turn, Street::River] {
            if uncontested_winner(&self.players).is_some() {
                break;
            }
            streets.push(self.run_street(street, source)?);
        }
        let showdown = self.showdown()?;
        let eliminated = self.end_hand()?;
        Ok(HandSummary {
            hand_number: self.hand_number,
            streets,
            showdown,
            eliminated,
        })
    }

    /// Plays hands until one player is left or `max_hands` hands were dealt.
    ///
    /// Returns the winner's seat if the game finished.
    pub fn play_until_winner<S>(
        &mut self,
        source: &mut S,
        max_hands: u64,
    ) -> Result<Option<usize>, GameError>
    where
        S: ActionSource + ?Sized,
    {
        for _ in 0..max_hands {
            if self.is_game_over() {
                break;
            }
            self.play_hand(source)?;
        }
        Ok(self.winner())
    }

    fn play_street<S>(&mut self, street: Street, source: &mut S) -> Result<StreetOutcome, GameError>
    where
        S: ActionSource + ?Sized,
    {
        let seats = self.seats.ok_or(GameError::NoHandInProgress)?;
        let dealt = self.deal_street(street)?;
        if !dealt.is_empty() {
            self.refresh_hand_strengths();
            debug!(
                hand = self.hand_number,
                ?street,
                board = ?self.board.cards(),
                "community cards dealt"
            );
        }

        let opener = match street {
            Street::PreFlop => seats.big_blind,
            _ => seats.dealer,
        };
        let mut round = BettingRound::open(street, &self.players, opener);
        let mut actions = Vec::new();
        while let Some(seat) = round.current_seat() {
            actions.push(self.take_action(&mut round, seat, source)?);
        }

        for (seat, p) in self.players.iter().enumerate() {
            self.contributed[seat] += p.current_bet();
        }
        let collected = round.finish(&mut self.players);
        self.pot.add(collected);
        self.phase = Phase::Played(street);

        let betting = match uncontested_winner(&self.players) {
            Some(winner) => BettingOutcome::Uncontested { winner },
            None if actions.is_empty() => BettingOutcome::NoAction,
            None => BettingOutcome::Completed,
        };
        debug!(
            hand = self.hand_number,
            ?street,
            collected,
            pot = self.pot.total(),
            ?betting,
            "betting round closed"
        );

        Ok(StreetOutcome {
            street,
            dealt,
            betting,
            actions,
            collected,
        })
    }

    // Asks `seat` for a decision until one is legal or the attempt budget runs out.
    fn take_action<S>(
        &mut self,
        round: &mut BettingRound,
        seat: usize,
        source: &mut S,
    ) -> Result<AppliedAction, GameError>
    where
        S: ActionSource + ?Sized,
    {
        let attempts = self.config.max_action_attempts;
        let timeout = self.config.action_timeout();
        let board = self.board.cards();

        for attempt in 1..=attempts {
            let player = &self.players[seat];
            let ctx = ActionContext {
                seat,
                player,
                street: round.street(),
                highest_bet: round.highest_bet(),
                to_call: round.highest_bet().saturating_sub(player.current_bet()),
                pot: self.pot.total(),
                board: &board,
                attempt,
            };
            let started = Instant::now();
            let mut requested = source.request_action(&ctx);
            let timed_out = timeout.is_some_and(|limit| started.elapsed() > limit);
            if timed_out {
                warn!(seat, ?requested, "action timed out, folding");
                requested = PlayerAction::Fold;
            }

            match round.apply(&mut self.players, seat, requested) {
                Ok(applied) => {
                    if applied.converted_to_all_in {
                        warn!(seat, chips = applied.applied.chips(), "call converted to all-in");
                    }
                    debug!(
                        seat,
                        street = ?round.street(),
                        action = ?applied.applied,
                        "action applied"
                    );
                    if let Some(record) = self.record.as_mut() {
                        record.actions.push(ActionRecord {
                            seat,
                            street: round.street(),
                            requested,
                            applied: applied.applied,
                            timed_out,
                        });
                    }
                    return Ok(applied);
                }
                Err(e) if e.is_recoverable() => {
                    warn!(seat, attempt, ?requested, error = %e, "rejected action");
                }
                Err(e) => return Err(e),
            }
        }
        Err(GameError::InvalidAction { seat, attempts })
    }

    fn deal_street(&mut self, street: Street) -> Result<Vec<Card>, GameError> {
        let inserted = match street {
            Street::PreFlop => return Ok(Vec::new()),
            Street::Flop => {
                self.deck.burn()?;
                let flop = [self.deck.deal_one()?, self.deck.deal_one()?, self.deck.deal_one()?];
                self.board.insert_flop(flop).map(|_| flop.to_vec())
            }
            Street::Turn => {
                self.deck.burn()?;
                let turn = self.deck.deal_one()?;
                self.board.insert_turn(turn).map(|_| vec![turn])
            }
            Street::River => {
                self.deck.burn()?;
                let river = self.deck.deal_one()?;
                self.board.insert_river(river).map(|_| vec![river])
            }
        };
        match inserted {
            Ok(cards) => Ok(cards),
            Err(e) => {
                warn!(hand = self.hand_number, error = %e, "community cards unchanged");
                Ok(Vec::new())
            }
        }
    }

    fn post_blind(&mut self, seat: usize, amount: u32) {
        let paid = self.players[seat].commit(amount);
        if paid < amount {
            info!(seat, paid, blind = amount, "blind posted all-in");
        }
        if let Some(record) = self.record.as_mut() {
            record.blinds.push((seat, paid));
        }
    }

    // Moves any street bets still on the table into the pot.
    fn sweep_bets(&mut self) {
        for (seat, p) in self.players.iter_mut().enumerate() {
            let chips = p.collect_bet();
            self.contributed[seat] += chips;
            self.pot.add(chips);
        }
    }

    fn refresh_hand_strengths(&mut self) {
        let board = self.board.cards();
        for p in self.players.iter_mut().filter(|p| p.is_contending()) {
            let result = evaluate(p.hole_cards(), &board);
            p.set_last_hand(result);
        }
    }

    fn abort_hand(&mut self) {
        for (seat, p) in self.players.iter_mut().enumerate() {
            let refund = std::mem::take(&mut self.contributed[seat]) + p.collect_bet();
            p.add_chips(refund);
        }
        self.pot = Pot::new();
        self.record = None;
        self.phase = Phase::Idle;
    }
}
