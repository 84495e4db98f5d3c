use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Most players one deck can serve: 22 x 2 hole cards + 5 board + 3 burns = 52.
pub const MAX_PLAYERS: usize = 22;

/// Table setup handed to [`Engine::new`](crate::engine::Engine::new).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameConfig {
    /// Seat order; the first hand's button goes to the first name
    pub players: Vec<String>,
    pub starting_stack: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    /// Seed for the shuffle RNG; random when absent
    pub seed: Option<u64>,
    /// Illegal answers tolerated per decision before the hand is aborted
    pub max_action_attempts: u32,
    /// Decisions slower than this are replaced with a fold
    pub action_timeout_ms: Option<u64>,
    /// JSONL hand history destination
    pub hand_history: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            players: vec!["Player 1".into(), "Player 2".into()],
            starting_stack: 1_000,
            small_blind: 5,
            big_blind: 10,
            seed: None,
            max_action_attempts: 3,
            action_timeout_ms: None,
            hand_history: None,
        }
    }
}

impl GameConfig {
    pub fn with_players<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            players: names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(s)?;
        let mut cfg = Self::default();
        file.apply(&mut cfg, &mut ConfigSources::default());
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn action_timeout(&self) -> Option<Duration> {
        self.action_timeout_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let n = self.players.len();
        if !(2..=MAX_PLAYERS).contains(&n) {
            return Err(ConfigError::Invalid(format!(
                "need between 2 and {MAX_PLAYERS} players, got {n}"
            )));
        }
        let mut seen = HashSet::new();
        for name in &self.players {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid("player names must not be empty".into()));
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate player name {name:?}")));
            }
        }
        if self.starting_stack == 0 {
            return Err(ConfigError::Invalid("starting_stack must be >0".into()));
        }
        // every chip at the table must fit in one pot
        if self.starting_stack.checked_mul(n as u32).is_none() {
            return Err(ConfigError::Invalid(format!(
                "{n} stacks of {} chips exceed the {} chip table limit",
                self.starting_stack,
                u32::MAX
            )));
        }
        if self.small_blind == 0 || self.small_blind > self.big_blind {
            return Err(ConfigError::Invalid(
                "blinds must satisfy 0 < small_blind <= big_blind".into(),
            ));
        }
        if self.max_action_attempts == 0 {
            return Err(ConfigError::Invalid("max_action_attempts must be >=1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigSources {
    pub players: ValueSource,
    pub starting_stack: ValueSource,
    pub small_blind: ValueSource,
    pub big_blind: ValueSource,
    pub seed: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            players: ValueSource::Default,
            starting_stack: ValueSource::Default,
            small_blind: ValueSource::Default,
            big_blind: ValueSource::Default,
            seed: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: GameConfig,
    pub sources: ConfigSources,
}

pub fn load() -> Result<GameConfig, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

/// Resolves the configuration: defaults, then the TOML file named by
/// `HOLDEM_CONFIG`, then `HOLDEM_*` environment overrides.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = GameConfig::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("HOLDEM_CONFIG") {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        f.apply(&mut cfg, &mut sources);
    }

    if let Some(seed) = env_override("HOLDEM_SEED")? {
        cfg.seed = Some(seed);
        sources.seed = ValueSource::Env;
    }
    if let Some(stack) = env_override("HOLDEM_STARTING_STACK")? {
        cfg.starting_stack = stack;
        sources.starting_stack = ValueSource::Env;
    }
    if let Some(sb) = env_override("HOLDEM_SMALL_BLIND")? {
        cfg.small_blind = sb;
        sources.small_blind = ValueSource::Env;
    }
    if let Some(bb) = env_override("HOLDEM_BIG_BLIND")? {
        cfg.big_blind = bb;
        sources.big_blind = ValueSource::Env;
    }

    cfg.validate()?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

fn env_override<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(v) if !v.is_empty() => v
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("{key} is not a valid number: {v:?}"))),
        _ => Ok(None),
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    players: Option<Vec<String>>,
    #[serde(default)]
    starting_stack: Option<u32>,
    #[serde(default)]
    small_blind: Option<u32>,
    #[serde(default)]
    big_blind: Option<u32>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    max_action_attempts: Option<u32>,
    #[serde(default)]
    action_timeout_ms: Option<u64>,
    #[serde(default)]
    hand_history: Option<PathBuf>,
}

impl FileConfig {
    fn apply(self, cfg: &mut GameConfig, sources: &mut ConfigSources) {
        if let Some(v) = self.players {
            cfg.players = v;
            sources.players = ValueSource::File;
        }
        if let Some(v) = self.starting_stack {
            cfg.starting_stack = v;
            sources.starting_stack = ValueSource::File;
        }
        if let Some(v) = self.small_blind {
            cfg.small_blind = v;
            sources.small_blind = ValueSource::File;
        }
        if let Some(v) = self.big_blind {
            cfg.big_blind = v;
            sources.big_blind = ValueSource::File;
        }
        if let Some(v) = self.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = self.max_action_attempts {
            cfg.max_action_attempts = v;
        }
        if self.action_timeout_ms.is_some() {
            cfg.action_timeout_ms = self.action_timeout_ms;
        }
        if self.hand_history.is_some() {
            cfg.hand_history = self.hand_history;
        }
    }
}
