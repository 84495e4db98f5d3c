use std::thread::sleep;
use std::time::Duration;

use holdem_engine::cards::{Card, Rank, Suit};
use holdem_engine::config::GameConfig;
use holdem_engine::deck::Deck;
use holdem_engine::engine::{BettingOutcome, Engine, ShowdownResult};
use holdem_engine::errors::GameError;
use holdem_engine::game::{SeatAssignment, Street};
use holdem_engine::player::PlayerAction;
use holdem_engine::source::{from_fn, ActionSource, ScriptedSource};

fn c(s: &str) -> Card {
    let mut chars = s.chars();
    let rank = match chars.next().unwrap() {
        'A' => Rank::Ace,
        'K' => Rank::King,
        'Q' => Rank::Queen,
        'J' => Rank::Jack,
        'T' => Rank::Ten,
        d => Rank::from_u8(d.to_digit(10).unwrap() as u8).unwrap(),
    };
    let suit = match chars.next().unwrap() {
        's' => Suit::Spades,
        'h' => Suit::Hearts,
        'd' => Suit::Diamonds,
        _ => Suit::Clubs,
    };
    Card::new(rank, suit)
}

fn stacked(list: &str) -> Deck {
    Deck::stacked(list.split_whitespace().map(c)).expect("no duplicates")
}

fn engine(names: &[&str], configure: impl FnOnce(&mut GameConfig)) -> Engine {
    let mut config = GameConfig::with_players(names.iter().copied());
    config.seed = Some(2024);
    configure(&mut config);
    Engine::new(config).expect("valid config")
}

fn total_chips(engine: &Engine) -> u32 {
    engine.players().iter().map(|p| p.chip_count()).sum()
}

// Plays the four streets on a pre-arranged deck and awards the pot.
fn play_stacked<S: ActionSource>(
    engine: &mut Engine,
    deck: Deck,
    source: &mut S,
) -> ShowdownResult {
    engine.start_hand_with_deck(deck).expect("hand starts");
    for street in [Street::PreFlop, Street::Flop, Street::Turn, Street::River] {
        match engine.run_street(street, source) {
            Ok(_) | Err(GameError::HandAlreadyComplete) => {}
            Err(e) => panic!("street {street:?} failed: {e}"),
        }
    }
    engine.showdown().expect("showdown")
}

#[test]
fn full_hand_deals_board_and_conserves_chips() {
    let mut eng = engine(&["alice", "bob", "carol"], |_| {});
    let summary = eng.play_hand(&mut ScriptedSource::default()).unwrap();

    assert_eq!(summary.hand_number, 1);
    assert_eq!(summary.streets.len(), 4);
    assert_eq!(summary.streets[1].dealt.len(), 3);
    assert_eq!(summary.streets[2].dealt.len(), 1);
    assert_eq!(eng.board().len(), 5);
    // 6 hole cards, 3 burns, 5 board cards
    assert_eq!(eng.deck_remaining(), 52 - 14);
    assert!(!summary.showdown.uncontested);
    assert_eq!(summary.showdown.hands.len(), 3);
    assert_eq!(summary.showdown.pot_awarded, 30);
    assert_eq!(total_chips(&eng), 3_000);
    assert!(!eng.is_hand_in_progress());
}

#[test]
fn uncontested_pot_is_awarded_without_evaluation() {
    let mut eng = engine(&["alice", "bob"], |_| {});
    // heads-up: seat 0 deals and posts the big blind, seat 1 acts first
    let summary = eng.play_hand(&mut from_fn(|_| PlayerAction::Fold)).unwrap();

    assert_eq!(
        eng.seats(),
        Some(SeatAssignment {
            dealer: 0,
            small_blind: 1,
            big_blind: 0
        })
    );
    assert_eq!(summary.streets.len(), 1);
    assert_eq!(
        summary.streets[0].betting,
        BettingOutcome::Uncontested { winner: 0 }
    );
    assert!(summary.showdown.uncontested);
    assert!(summary.showdown.hands.is_empty());
    assert_eq!(summary.showdown.payouts, vec![(0, 15)]);
    assert_eq!(eng.players()[0].chip_count(), 1_005);
    assert_eq!(eng.players()[1].chip_count(), 995);
    assert!(eng.board().is_empty());
}

#[test]
fn later_streets_are_refused_once_everyone_folded() {
    let mut eng = engine(&["alice", "bob"], |_| {});
    eng.start_hand().unwrap();
    eng.run_street(Street::PreFlop, &mut from_fn(|_| PlayerAction::Fold))
        .unwrap();
    let err = eng
        .run_street(Street::Flop, &mut ScriptedSource::default())
        .unwrap_err();
    assert_eq!(err, GameError::HandAlreadyComplete);
}

#[test]
fn tied_hands_split_the_pot_evenly() {
    let mut eng = engine(&["alice", "bob"], |cfg| {
        cfg.small_blind = 25;
        cfg.big_blind = 50;
    });
    // hole cards alternate seat 1, seat 0; the board is a royal flush
    let deck = stacked("2c 4h 3d 5h 6c As Ks Qs 7c Js 8c Ts");
    let result = play_stacked(&mut eng, deck, &mut ScriptedSource::default());

    assert_eq!(result.pot_awarded, 100);
    assert_eq!(result.winners, vec![1, 0]);
    assert_eq!(result.payouts, vec![(1, 50), (0, 50)]);
    eng.end_hand().unwrap();
    assert_eq!(eng.players()[0].chip_count(), 1_000);
    assert_eq!(eng.players()[1].chip_count(), 1_000);
}

#[test]
fn odd_chip_goes_to_first_winner_left_of_dealer() {
    let mut eng = engine(&["alice", "bob", "carol"], |_| {});
    // dealer 0, small blind 1 folds after posting, pot is 25
    let deck = stacked("2c 3c 4h 2d 3d 5h 6c As Ks Qs 7c Js 8c Ts");
    let mut source = ScriptedSource::new([
        PlayerAction::CheckCall,
        PlayerAction::Fold,
        PlayerAction::CheckCall,
    ]);
    let result = play_stacked(&mut eng, deck, &mut source);

    assert_eq!(result.pot_awarded, 25);
    assert_eq!(result.winners, vec![2, 0]);
    assert_eq!(result.payouts, vec![(2, 13), (0, 12)]);
    eng.end_hand().unwrap();
    assert_eq!(eng.players()[0].chip_count(), 1_002);
    assert_eq!(eng.players()[1].chip_count(), 995);
    assert_eq!(eng.players()[2].chip_count(), 1_003);
}

#[test]
fn busted_player_is_eliminated_and_skipped_by_the_button() {
    let mut eng = engine(&["alice", "bob", "carol"], |cfg| cfg.starting_stack = 100);
    // seat 1: 9c 9d, seat 2: 7c 2d, seat 0: Ah Ad
    let deck = stacked("9c 7c Ah 9d 2d Ad 3s Kh 8s 4c 3h Jd 5s 6c");
    let mut source = ScriptedSource::new([
        PlayerAction::AllIn,
        PlayerAction::Fold,
        PlayerAction::CheckCall,
    ]);
    let result = play_stacked(&mut eng, deck, &mut source);
    assert_eq!(result.winners, vec![0]);
    assert_eq!(result.pot_awarded, 205);

    let eliminated = eng.end_hand().unwrap();
    assert_eq!(eliminated, vec![2]);
    assert!(!eng.players()[2].is_in_tournament());
    assert_eq!(eng.players_remaining(), 2);

    let record = eng.last_record().unwrap();
    assert_eq!(record.eliminated, vec![2]);
    assert!(record.actions.iter().any(|a| a.seat == 2
        && a.requested == PlayerAction::CheckCall
        && a.applied.chips() == 90));

    let mut asked = Vec::new();
    let mut source = from_fn(|ctx| {
        asked.push(ctx.seat);
        PlayerAction::CheckCall
    });
    eng.play_hand(&mut source).unwrap();

    assert_eq!(
        eng.seats(),
        Some(SeatAssignment {
            dealer: 1,
            small_blind: 0,
            big_blind: 1
        })
    );
    assert!(!asked.is_empty());
    assert!(!asked.contains(&2), "eliminated seat was asked to act: {asked:?}");
    assert!(eng.players()[2].hole_cards().is_empty());
    assert_eq!(eng.players()[2].chip_count(), 0);

    let record = eng.last_record().unwrap();
    assert_eq!(record.blinds, vec![(0, 5), (1, 10)]);
    assert!(record.players.iter().all(|p| p.seat != 2));
    assert!(record.actions.iter().all(|a| a.seat != 2));
    assert_eq!(total_chips(&eng), 300);
}

#[test]
fn game_ends_when_one_player_has_every_chip() {
    let mut eng = engine(&["alice", "bob"], |cfg| cfg.starting_stack = 100);
    // seat 1: 2c 7d, seat 0: Ah Ad
    let deck = stacked("2c Ah 7d Ad 3s Kh 8s 4c 3h Jd 5s 9c");
    play_stacked(&mut eng, deck, &mut from_fn(|_| PlayerAction::AllIn));
    eng.end_hand().unwrap();

    assert!(eng.is_game_over());
    assert_eq!(eng.winner(), Some(0));
    assert_eq!(eng.players()[0].chip_count(), 200);
    assert_eq!(
        eng.start_hand(),
        Err(GameError::NotEnoughPlayers { remaining: 1 })
    );
}

#[test]
fn streets_must_be_played_in_order() {
    let mut eng = engine(&["alice", "bob", "carol"], |_| {});
    assert_eq!(
        eng.run_street(Street::PreFlop, &mut ScriptedSource::default()),
        Err(GameError::NoHandInProgress)
    );
    eng.start_hand().unwrap();
    assert_eq!(eng.start_hand(), Err(GameError::HandInProgress));

    let err = eng
        .run_street(Street::Flop, &mut ScriptedSource::default())
        .unwrap_err();
    assert_eq!(
        err,
        GameError::OutOfOrderStreet {
            expected: Some(Street::PreFlop),
            actual: Street::Flop
        }
    );
    // the hand survives the refused call
    eng.run_street(Street::PreFlop, &mut ScriptedSource::default())
        .unwrap();
    assert_eq!(eng.street(), Some(Street::PreFlop));
}

#[test]
fn showdown_and_end_hand_check_progress() {
    let mut eng = engine(&["alice", "bob"], |_| {});
    eng.start_hand().unwrap();
    assert_eq!(eng.end_hand(), Err(GameError::PotNotAwarded));
    assert_eq!(
        eng.showdown(),
        Err(GameError::ShowdownBeforeRiver {
            next: Some(Street::PreFlop)
        })
    );
    eng.run_street(Street::PreFlop, &mut ScriptedSource::default())
        .unwrap();
    assert_eq!(
        eng.showdown(),
        Err(GameError::ShowdownBeforeRiver {
            next: Some(Street::Flop)
        })
    );
    assert_eq!(eng.pot(), 20);
}

#[test]
fn exhausted_retries_abort_the_hand_and_refund() {
    let mut eng = engine(&["alice", "bob", "carol"], |_| {});
    let mut attempts_seen = Vec::new();
    let mut source = from_fn(|ctx| {
        attempts_seen.push(ctx.attempt);
        PlayerAction::BetOrRaise(50_000)
    });
    eng.start_hand().unwrap();
    let err = eng.run_street(Street::PreFlop, &mut source).unwrap_err();

    assert_eq!(
        err,
        GameError::InvalidAction {
            seat: 0,
            attempts: 3
        }
    );
    assert_eq!(attempts_seen, vec![1, 2, 3]);
    assert!(!eng.is_hand_in_progress());
    assert_eq!(eng.pot(), 0);
    assert!(eng.players().iter().all(|p| p.chip_count() == 1_000));
}

#[test]
fn rejected_action_is_asked_again() {
    let mut eng = engine(&["alice", "bob"], |_| {});
    let mut source = ScriptedSource::new([PlayerAction::BetOrRaise(0), PlayerAction::Fold]);
    eng.start_hand().unwrap();
    let outcome = eng.run_street(Street::PreFlop, &mut source).unwrap();

    assert_eq!(source.served(), 2);
    assert_eq!(outcome.actions.len(), 1);
    assert_eq!(outcome.betting, BettingOutcome::Uncontested { winner: 0 });
}

#[test]
fn slow_decision_is_replaced_by_a_fold() {
    let mut eng = engine(&["alice", "bob"], |cfg| cfg.action_timeout_ms = Some(1));
    let mut source = from_fn(|_| {
        sleep(Duration::from_millis(20));
        PlayerAction::CheckCall
    });
    let summary = eng.play_hand(&mut source).unwrap();

    assert!(summary.showdown.uncontested);
    let record = eng.last_record().unwrap();
    assert!(record.actions[0].timed_out);
    assert_eq!(record.actions[0].requested, PlayerAction::Fold);
}

#[test]
fn hand_strength_tracks_the_board() {
    let mut eng = engine(&["alice", "bob"], |_| {});
    let deck = stacked("9c 2h 9d 3h 4s 9h Kd 5c 6s 7c 8s Jd");
    eng.start_hand_with_deck(deck).unwrap();
    let preflop = eng.get_hand_strength(1).unwrap();
    assert_eq!(preflop.description(), "One Pair");

    let mut source = ScriptedSource::default();
    eng.run_street(Street::PreFlop, &mut source).unwrap();
    eng.run_street(Street::Flop, &mut source).unwrap();
    let flop = eng.get_hand_strength(1).unwrap();
    assert_eq!(flop.description(), "Three of a Kind");
    assert_eq!(eng.players()[1].last_hand(), Some(&flop));
    assert_eq!(eng.get_hand_strength(7), Err(GameError::UnknownSeat(7)));
}

#[test]
fn many_hands_keep_chip_total_constant() {
    let mut eng = engine(&["a", "b", "c", "d", "e"], |cfg| cfg.starting_stack = 200);
    let mut turn = 0u32;
    let mut source = from_fn(move |ctx| {
        turn += 1;
        match turn % 7 {
            0 => PlayerAction::AllIn,
            1 | 4 if ctx.to_call > 0 => PlayerAction::Fold,
            2 => PlayerAction::BetOrRaise(ctx.to_call + 20),
            _ => PlayerAction::CheckCall,
        }
    });
    for _ in 0..100 {
        if eng.is_game_over() {
            break;
        }
        eng.play_hand(&mut source).unwrap();
        assert_eq!(total_chips(&eng), 1_000);
    }
}

#[test]
fn three_of_four_folding_preflop_ends_the_hand() {
    let mut eng = engine(&["a", "b", "c", "d"], |_| {});
    let mut asked = Vec::new();
    let mut source = from_fn(|ctx| {
        asked.push(ctx.seat);
        PlayerAction::Fold
    });
    let summary = eng.play_hand(&mut source).unwrap();

    // the big blind is never asked
    assert_eq!(asked, vec![3, 0, 1]);
    assert_eq!(summary.streets.len(), 1);
    assert_eq!(summary.showdown.winners, vec![2]);
    assert!(summary.showdown.hands.is_empty());
    assert_eq!(eng.players()[2].chip_count(), 1_005);
    assert_eq!(eng.positions().dealer_index(), 0);
}
