use std::fs;

use holdem_engine::config::{self, ConfigError, GameConfig, ValueSource};
use holdem_engine::engine::Engine;
use holdem_engine::player::PlayerAction;
use holdem_engine::source::from_fn;
use serial_test::serial;
use tempfile::TempDir;

const VARS: [&str; 5] = [
    "HOLDEM_CONFIG",
    "HOLDEM_SEED",
    "HOLDEM_STARTING_STACK",
    "HOLDEM_SMALL_BLIND",
    "HOLDEM_BIG_BLIND",
];

fn clear_env() {
    for key in VARS {
        // SAFETY: tests touching the environment run serially
        unsafe { std::env::remove_var(key) };
    }
}

fn set_env(key: &str, value: &str) {
    // SAFETY: tests touching the environment run serially
    unsafe { std::env::set_var(key, value) };
}

#[test]
#[serial]
fn defaults_apply_without_file_or_env() {
    clear_env();
    let resolved = config::load_with_sources().unwrap();
    assert_eq!(resolved.config, GameConfig::default());
    assert_eq!(resolved.sources.seed, ValueSource::Default);
}

#[test]
#[serial]
fn file_values_then_env_overrides() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("table.toml");
    fs::write(
        &path,
        r#"
players = ["alice", "bob", "carol"]
starting_stack = 500
small_blind = 10
big_blind = 20
seed = 7
action_timeout_ms = 2500
"#,
    )
    .unwrap();
    set_env("HOLDEM_CONFIG", path.to_str().unwrap());
    set_env("HOLDEM_SEED", "99");

    let resolved = config::load_with_sources().unwrap();
    clear_env();

    let cfg = resolved.config;
    assert_eq!(cfg.players, vec!["alice", "bob", "carol"]);
    assert_eq!(cfg.starting_stack, 500);
    assert_eq!(cfg.big_blind, 20);
    assert_eq!(cfg.seed, Some(99));
    assert_eq!(cfg.action_timeout().unwrap().as_millis(), 2500);
    assert_eq!(resolved.sources.starting_stack, ValueSource::File);
    assert_eq!(resolved.sources.seed, ValueSource::Env);
    assert_eq!(resolved.sources.small_blind, ValueSource::File);
}

#[test]
#[serial]
fn malformed_env_value_is_rejected() {
    clear_env();
    set_env("HOLDEM_BIG_BLIND", "lots");
    let err = config::load().unwrap_err();
    clear_env();
    assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("HOLDEM_BIG_BLIND")));
}

#[test]
#[serial]
fn unknown_file_keys_are_a_parse_error() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "ante = 5\n").unwrap();
    set_env("HOLDEM_CONFIG", path.to_str().unwrap());
    let err = config::load().unwrap_err();
    clear_env();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn player_count_is_bounded() {
    let one = GameConfig::with_players(["solo"]);
    assert!(matches!(one.validate(), Err(ConfigError::Invalid(_))));

    let names: Vec<String> = (0..23).map(|i| format!("p{i}")).collect();
    let crowded = GameConfig::with_players(names);
    assert!(crowded.validate().is_err());

    let names: Vec<String> = (0..22).map(|i| format!("p{i}")).collect();
    assert!(GameConfig::with_players(names).validate().is_ok());
}

#[test]
fn blinds_and_names_are_validated() {
    let mut cfg = GameConfig::default();
    cfg.small_blind = 20;
    cfg.big_blind = 10;
    assert!(cfg.validate().is_err());

    let dup = GameConfig::with_players(["bob", "bob"]);
    assert!(dup.validate().is_err());

    let err = GameConfig::from_toml_str("starting_stack = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn toml_string_fills_missing_fields_with_defaults() {
    let cfg = GameConfig::from_toml_str("players = [\"x\", \"y\", \"z\"]\n").unwrap();
    assert_eq!(cfg.players.len(), 3);
    assert_eq!(cfg.starting_stack, 1_000);
    assert_eq!(cfg.max_action_attempts, 3);
    assert_eq!(cfg.seed, None);
}

#[test]
fn table_chip_total_must_fit_in_a_pot() {
    let mut cfg = GameConfig::with_players(["alice", "bob"]);
    cfg.starting_stack = 3_000_000_000;
    let err = cfg.validate().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("chip table limit")));
    assert!(Engine::new(cfg).is_err());

    let mut at_limit = GameConfig::with_players(["alice", "bob"]);
    at_limit.starting_stack = u32::MAX / 2;
    assert!(at_limit.validate().is_ok());
}

#[test]
fn largest_accepted_stacks_keep_every_chip() {
    let mut cfg = GameConfig::with_players(["alice", "bob"]);
    cfg.seed = Some(3);
    cfg.starting_stack = u32::MAX / 2;
    let mut eng = Engine::new(cfg).unwrap();
    eng.play_hand(&mut from_fn(|_| PlayerAction::AllIn)).unwrap();

    let total: u64 = eng.players().iter().map(|p| u64::from(p.chip_count())).sum();
    assert_eq!(total, u64::from(u32::MAX / 2) * 2);
}
