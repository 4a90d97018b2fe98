//! Ledger persistence in the browser's localStorage

use tristack_core::{LedgerStore, PlayerId, PuzzleId, StoreError, StoreResult};
use web_sys::Storage;

/// Ledgers for signed-in players, one localStorage entry per player.
///
/// Holds only the key prefix; the storage handle is looked up on each call
/// because browser handles cannot cross threads.
pub struct LocalStorageLedgerStore {
    prefix: String,
}

impl LocalStorageLedgerStore {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    fn key(&self, player: &PlayerId) -> String {
        format!("{}:ledger:{}", self.prefix, player)
    }

    fn storage() -> StoreResult<Storage> {
        web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no window".into()))?
            .local_storage()
            .map_err(|_| StoreError::Unavailable("localStorage blocked".into()))?
            .ok_or_else(|| StoreError::Unavailable("localStorage missing".into()))
    }

    /// Remove a player's ledger entry
    pub fn forget(&self, player: &PlayerId) -> StoreResult<()> {
        Self::storage()?
            .remove_item(&self.key(player))
            .map_err(|_| StoreError::Storage("could not remove ledger".into()))
    }
}

impl Default for LocalStorageLedgerStore {
    fn default() -> Self {
        Self::new("tristack")
    }
}

impl LedgerStore for LocalStorageLedgerStore {
    fn get_recent_ids(&self, player: &PlayerId) -> StoreResult<Vec<PuzzleId>> {
        let raw = Self::storage()?
            .get_item(&self.key(player))
            .map_err(|_| StoreError::Storage("could not read ledger".into()))?;
        match raw {
            Some(json) => {
                serde_json::from_str(&json).map_err(|e| StoreError::InvalidData(e.to_string()))
            }
            None => Ok(Vec::new()),
        }
    }

    fn set_recent_ids(&self, player: &PlayerId, ids: &[PuzzleId]) -> StoreResult<()> {
        let json = serde_json::to_string(ids).map_err(|e| StoreError::Storage(e.to_string()))?;
        Self::storage()?
            .set_item(&self.key(player), &json)
            .map_err(|_| StoreError::Storage("could not write ledger (quota?)".into()))
    }

    fn is_available(&self) -> bool {
        Self::storage().is_ok()
    }

    fn backend_name(&self) -> &'static str {
        "LocalStorage"
    }
}
