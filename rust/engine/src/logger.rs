use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::game::Street;
use crate::hand::HandResult;
use crate::player::PlayerAction;
use crate::rules::ValidatedAction;

/// A player as seated when the hand started.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeatRecord {
    pub seat: usize,
    pub name: String,
    /// Chips before blinds were posted
    pub chips: u32,
}

/// Records a single player action during a hand.
/// Keeps both what the source asked for and what the engine actually applied.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Seat of the acting player
    pub seat: usize,
    /// The betting street when this action occurred
    pub street: Street,
    /// Decision returned by the action source
    pub requested: PlayerAction,
    /// Validated action with its chip amount
    pub applied: ValidatedAction,
    /// The decision arrived after the timeout and was replaced with a fold
    #[serde(default)]
    pub timed_out: bool,
}

/// A hand revealed at showdown.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShownHand {
    pub seat: usize,
    pub hole: Vec<Card>,
    pub result: HandResult,
}

/// Information about how the pot was awarded.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShowdownInfo {
    /// Seats that won a share of the pot
    pub winners: Vec<usize>,
    /// (seat, chips) paid out, odd chips included
    pub payouts: Vec<(usize, u32)>,
    /// Hands that were evaluated; empty when everyone else folded
    #[serde(default)]
    pub hands: Vec<ShownHand>,
    /// Everyone else folded, no cards were compared
    #[serde(default)]
    pub uncontested: bool,
}

/// Complete record of a poker hand including all actions, board cards, and outcome.
/// Serialized to JSONL format for hand history storage and replay.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    /// Unique identifier for this hand (format: YYYYMMDD-NNNNNN)
    pub hand_id: String,
    /// RNG seed of the session (enables deterministic replay)
    pub seed: Option<u64>,
    /// 1-based hand counter within the session
    pub hand_number: u64,
    /// Seat holding the button
    pub dealer: usize,
    /// Players dealt into the hand
    pub players: Vec<SeatRecord>,
    /// (seat, chips) posted as small and big blind
    #[serde(default)]
    pub blinds: Vec<(usize, u32)>,
    /// Chronological list of all player actions
    pub actions: Vec<ActionRecord>,
    /// Community cards on the board (up to 5 cards)
    pub board: Vec<Card>,
    /// Total chips awarded
    pub pot: u32,
    /// How the pot was awarded
    #[serde(default)]
    pub showdown: Option<ShowdownInfo>,
    /// Seats knocked out by this hand
    #[serde(default)]
    pub eliminated: Vec<usize>,
    /// Timestamp when the hand was written (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
}

pub fn format_hand_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

/// Appends [`HandRecord`]s to a JSON-lines file, one hand per line.
pub struct HandLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl std::fmt::Debug for HandLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandLogger")
            .field("date", &self.date)
            .field("seq", &self.seq)
            .finish()
    }
}

impl HandLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    /// A logger that only hands out ids and writes nowhere.
    pub fn detached(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_hand_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &HandRecord) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}
