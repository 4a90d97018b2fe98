//! Store abstractions for puzzle data and persisted ledgers.
//!
//! Backends:
//! - [`Catalog`](crate::Catalog): static puzzle data
//! - [`MemoryLedgerStore`]: in-process ledgers, used in tests and offline play
//! - front ends add their own (a JSON file on desktop, `localStorage` in the browser)

use crate::puzzle::{Difficulty, Puzzle, PuzzleId};
use crate::session::PlayerId;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur talking to a store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Reading or writing the backing storage failed
    #[error("storage error: {0}")]
    Storage(String),

    /// The store returned data that could not be understood
    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// Read-only source of puzzles, addressed by difficulty
pub trait PuzzleStore: Send + Sync {
    /// All puzzles of one difficulty
    fn list_puzzles(&self, difficulty: Difficulty) -> StoreResult<Vec<Puzzle>>;

    /// Get backend name for display
    fn backend_name(&self) -> &'static str;
}

/// Persisted recent-puzzle ledgers for signed-in players
pub trait LedgerStore: Send + Sync {
    /// The player's recently served puzzle ids, oldest first
    fn get_recent_ids(&self, player: &PlayerId) -> StoreResult<Vec<PuzzleId>>;

    /// Replace the player's recently served puzzle ids
    fn set_recent_ids(&self, player: &PlayerId, ids: &[PuzzleId]) -> StoreResult<()>;

    /// Check if backend is available/connected
    fn is_available(&self) -> bool;

    /// Get backend name for display
    fn backend_name(&self) -> &'static str;
}

// ==================== Memory Backend ====================

/// In-memory ledger store
#[derive(Debug)]
pub struct MemoryLedgerStore {
    ledgers: Mutex<HashMap<PlayerId, Vec<PuzzleId>>>,
    available: Mutex<bool>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self {
            ledgers: Mutex::new(HashMap::new()),
            available: Mutex::new(true),
        }
    }

    /// Set whether the backend should report as available
    pub fn set_available(&self, available: bool) {
        *lock(&self.available) = available;
    }

    /// Number of players with a stored ledger
    pub fn player_count(&self) -> usize {
        lock(&self.ledgers).len()
    }

    fn check_available(&self) -> StoreResult<()> {
        if *lock(&self.available) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store offline".into()))
        }
    }
}

impl Default for MemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn get_recent_ids(&self, player: &PlayerId) -> StoreResult<Vec<PuzzleId>> {
        self.check_available()?;
        Ok(lock(&self.ledgers).get(player).cloned().unwrap_or_default())
    }

    fn set_recent_ids(&self, player: &PlayerId, ids: &[PuzzleId]) -> StoreResult<()> {
        self.check_available()?;
        lock(&self.ledgers).insert(player.clone(), ids.to_vec());
        Ok(())
    }

    fn is_available(&self) -> bool {
        *lock(&self.available)
    }

    fn backend_name(&self) -> &'static str {
        "Memory"
    }
}

/// Lock a mutex, recovering the data if a previous holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str) -> PlayerId {
        PlayerId::new(name).unwrap()
    }

    #[test]
    fn test_memory_round_trip() {
        let store = MemoryLedgerStore::new();
        let alice = player("alice");

        assert!(store.get_recent_ids(&alice).unwrap().is_empty());

        let ids = vec![PuzzleId::from("easy-1"), PuzzleId::from("easy-2")];
        store.set_recent_ids(&alice, &ids).unwrap();
        assert_eq!(store.get_recent_ids(&alice).unwrap(), ids);
        assert!(store.get_recent_ids(&player("bob")).unwrap().is_empty());
        assert_eq!(store.player_count(), 1);
    }

    #[test]
    fn test_memory_unavailable() {
        let store = MemoryLedgerStore::new();
        store.set_available(false);

        assert!(!store.is_available());
        assert!(matches!(
            store.get_recent_ids(&player("alice")),
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.set_recent_ids(&player("alice"), &[]).is_err());
    }
}
