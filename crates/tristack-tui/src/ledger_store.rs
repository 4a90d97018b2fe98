//! Ledger store backends for the terminal game
//!
//! - Local: JSON file in the data directory
//! - Test: in-memory store from the core crate

use crate::config::Environment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tristack_core::{LedgerStore, MemoryLedgerStore, PlayerId, PuzzleId, StoreError, StoreResult};

/// File-based ledger store for signed-in players
pub struct FileLedgerStore {
    path: PathBuf,
    cache: Mutex<Option<LedgerFile>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LedgerFile {
    players: BTreeMap<PlayerId, Vec<PuzzleId>>,
}

impl FileLedgerStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("ledgers.json"),
            cache: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StoreResult<LedgerFile> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| StoreError::Storage("ledger cache poisoned".into()))?;
        if let Some(ref data) = *cache {
            return Ok(data.clone());
        }

        let data = match std::fs::read_to_string(&self.path) {
            Ok(json) => serde_json::from_str(&json)
                .map_err(|e| StoreError::InvalidData(format!("{}: {}", self.path.display(), e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => LedgerFile::default(),
            Err(e) => return Err(StoreError::Storage(e.to_string())),
        };

        *cache = Some(data.clone());
        Ok(data)
    }

    fn save(&self, data: &LedgerFile) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        std::fs::write(&self.path, json).map_err(|e| StoreError::Storage(e.to_string()))?;

        let mut cache = self
            .cache
            .lock()
            .map_err(|_| StoreError::Storage("ledger cache poisoned".into()))?;
        *cache = Some(data.clone());
        Ok(())
    }
}

impl LedgerStore for FileLedgerStore {
    fn get_recent_ids(&self, player: &PlayerId) -> StoreResult<Vec<PuzzleId>> {
        Ok(self.load()?.players.remove(player).unwrap_or_default())
    }

    fn set_recent_ids(&self, player: &PlayerId, ids: &[PuzzleId]) -> StoreResult<()> {
        let mut data = self.load()?;
        data.players.insert(player.clone(), ids.to_vec());
        self.save(&data)
    }

    fn is_available(&self) -> bool {
        self.load().is_ok()
    }

    fn backend_name(&self) -> &'static str {
        "File"
    }
}

/// Create the appropriate backend based on environment
pub fn create_backend(env: Environment, data_dir: &Path) -> Arc<dyn LedgerStore> {
    match env {
        Environment::Local => {
            let store = FileLedgerStore::new(data_dir);
            log::debug!("ledgers stored at {}", store.path().display());
            Arc::new(store)
        }
        Environment::Test => Arc::new(MemoryLedgerStore::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let alice = PlayerId::new("alice").unwrap();
        let ids = vec![PuzzleId::from("easy-1"), PuzzleId::from("hard-1")];

        let store = FileLedgerStore::new(dir.path());
        assert!(store.get_recent_ids(&alice).unwrap().is_empty());
        store.set_recent_ids(&alice, &ids).unwrap();

        // A fresh store reads what the first one wrote
        let reopened = FileLedgerStore::new(dir.path());
        assert_eq!(reopened.get_recent_ids(&alice).unwrap(), ids);
        assert!(reopened.is_available());
    }

    #[test]
    fn test_numeric_ids_are_normalized() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("ledgers.json"),
            r#"{"players": {"bob": [12, "easy-2"]}}"#,
        )
        .unwrap();

        let store = FileLedgerStore::new(dir.path());
        let ids = store.get_recent_ids(&PlayerId::new("bob").unwrap()).unwrap();
        assert_eq!(ids, vec![PuzzleId::from("12"), PuzzleId::from("easy-2")]);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ledgers.json"), "{not json").unwrap();

        let store = FileLedgerStore::new(dir.path());
        assert!(matches!(
            store.get_recent_ids(&PlayerId::new("bob").unwrap()),
            Err(StoreError::InvalidData(_))
        ));
        assert!(!store.is_available());
    }

    #[test]
    fn test_save_creates_missing_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let erin = PlayerId::new("erin").unwrap();

        let store = FileLedgerStore::new(&nested);
        store.set_recent_ids(&erin, &[PuzzleId::from("medium-1")]).unwrap();
        assert!(nested.join("ledgers.json").exists());
    }

    #[test]
    fn test_backend_factory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(create_backend(Environment::Local, dir.path()).backend_name(), "File");
        assert_eq!(create_backend(Environment::Test, dir.path()).backend_name(), "Memory");
    }
}
