use crate::puzzle::PuzzleId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of puzzle ids a ledger remembers
pub const LEDGER_CAPACITY: usize = 100;

/// The puzzles a player has recently been served, oldest first.
///
/// Re-recording an id moves it to the most recent position instead of
/// duplicating it, and the oldest id is dropped once the ledger would
/// exceed [`LEDGER_CAPACITY`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PuzzleId>", into = "Vec<PuzzleId>")]
pub struct PlayerLedger {
    ids: VecDeque<PuzzleId>,
}

impl PlayerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from an externally stored list, oldest first.
    ///
    /// The list is replayed through [`record`](Self::record), so duplicates
    /// collapse to their latest position and only the newest
    /// [`LEDGER_CAPACITY`] ids survive.
    pub fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = PuzzleId>,
    {
        let mut ledger = Self::new();
        for id in ids {
            ledger.record(id);
        }
        ledger
    }

    /// Record that a puzzle was served
    pub fn record(&mut self, id: PuzzleId) {
        if let Some(pos) = self.ids.iter().position(|existing| *existing == id) {
            self.ids.remove(pos);
        }
        self.ids.push_back(id);
        while self.ids.len() > LEDGER_CAPACITY {
            self.ids.pop_front();
        }
    }

    pub fn contains(&self, id: &PuzzleId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids oldest first
    pub fn ids(&self) -> impl Iterator<Item = &PuzzleId> {
        self.ids.iter()
    }

    /// The most recently recorded id
    pub fn latest(&self) -> Option<&PuzzleId> {
        self.ids.back()
    }

    pub fn to_vec(&self) -> Vec<PuzzleId> {
        self.ids.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

impl From<Vec<PuzzleId>> for PlayerLedger {
    fn from(ids: Vec<PuzzleId>) -> Self {
        Self::from_ids(ids)
    }
}

impl From<PlayerLedger> for Vec<PuzzleId> {
    fn from(ledger: PlayerLedger) -> Self {
        ledger.ids.into()
    }
}
