//! Picking a puzzle the player has not recently seen.
//!
//! Selection and recording are separate calls. The front end selects a
//! puzzle, shows it, and records it once on first presentation (see
//! [`Round::take_presentation`](crate::Round::take_presentation)).

use crate::puzzle::{Difficulty, Puzzle, PuzzleId};
use crate::session::{LedgerSource, Session};
use crate::store::{LedgerStore, PuzzleStore, StoreError};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Outcome of a selection request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A puzzle the player has not recently played
    Puzzle(Puzzle),
    /// Every puzzle of the difficulty is in the player's ledger
    Exhausted,
}

impl Selection {
    pub fn puzzle(&self) -> Option<&Puzzle> {
        match self {
            Selection::Puzzle(puzzle) => Some(puzzle),
            Selection::Exhausted => None,
        }
    }

    pub fn into_puzzle(self) -> Option<Puzzle> {
        match self {
            Selection::Puzzle(puzzle) => Some(puzzle),
            Selection::Exhausted => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Selection::Exhausted)
    }
}

/// Errors surfaced to the caller of a selection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The puzzle data has nothing at this difficulty
    #[error("no puzzles exist for difficulty {0}")]
    NoPuzzles(Difficulty),

    /// The puzzle store itself failed
    #[error("could not list puzzles: {0}")]
    PuzzleStore(#[from] StoreError),
}

/// Pick a uniformly random puzzle of `difficulty` that is not in the
/// player's ledger.
///
/// Returns [`Selection::Exhausted`] when every puzzle has been played. If a
/// persisted ledger cannot be read, the exclusion is skipped and any puzzle
/// of the difficulty may be returned.
pub fn select_unplayed_puzzle<R: Rng + ?Sized>(
    puzzles: &dyn PuzzleStore,
    ledger: &LedgerSource<'_>,
    difficulty: Difficulty,
    rng: &mut R,
) -> Result<Selection, SelectionError> {
    let all = puzzles.list_puzzles(difficulty)?;
    if all.is_empty() {
        log::error!(
            "{} has no {difficulty} puzzles",
            puzzles.backend_name()
        );
        return Err(SelectionError::NoPuzzles(difficulty));
    }

    let excluded: HashSet<PuzzleId> = match ledger.recent_ids() {
        Ok(ids) => ids.into_iter().collect(),
        Err(e) => {
            log::warn!("ledger read failed, selecting without exclusion: {e}");
            HashSet::new()
        }
    };

    let candidates: Vec<&Puzzle> = all.iter().filter(|p| !excluded.contains(&p.id)).collect();

    match candidates.choose(rng) {
        Some(&puzzle) => {
            log::debug!(
                "selected {} ({} of {} {difficulty} puzzles unplayed)",
                puzzle.id,
                candidates.len(),
                all.len()
            );
            Ok(Selection::Puzzle(puzzle.clone()))
        }
        None => {
            log::debug!("all {} {difficulty} puzzles played", all.len());
            Ok(Selection::Exhausted)
        }
    }
}

/// Record that a puzzle was presented to the player
pub fn record_played(ledger: &mut LedgerSource<'_>, id: &PuzzleId) -> Result<(), StoreError> {
    log::debug!("recording {id} as played");
    ledger.record(id.clone())
}

/// Puzzle and ledger stores bundled for front ends
#[derive(Clone)]
pub struct PuzzleService {
    puzzles: Arc<dyn PuzzleStore>,
    ledgers: Arc<dyn LedgerStore>,
}

impl std::fmt::Debug for PuzzleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PuzzleService")
            .field("puzzles", &self.puzzles.backend_name())
            .field("ledgers", &self.ledgers.backend_name())
            .finish()
    }
}

impl PuzzleService {
    pub fn new(puzzles: Arc<dyn PuzzleStore>, ledgers: Arc<dyn LedgerStore>) -> Self {
        Self { puzzles, ledgers }
    }

    pub fn puzzles(&self) -> &dyn PuzzleStore {
        self.puzzles.as_ref()
    }

    pub fn ledgers(&self) -> &dyn LedgerStore {
        self.ledgers.as_ref()
    }

    /// Select an unplayed puzzle for the session's player
    pub fn next_puzzle<R: Rng + ?Sized>(
        &self,
        session: &mut Session,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Result<Selection, SelectionError> {
        let source = session.ledger_source(self.ledgers.as_ref());
        select_unplayed_puzzle(self.puzzles.as_ref(), &source, difficulty, rng)
    }

    /// Record a presented puzzle in the session's ledger
    pub fn record_played(&self, session: &mut Session, id: &PuzzleId) -> Result<(), StoreError> {
        let mut source = session.ledger_source(self.ledgers.as_ref());
        record_played(&mut source, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::ledger::PlayerLedger;
    use crate::session::{PlayerId, SessionConfig};
    use crate::store::{MemoryLedgerStore, StoreResult};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct EmptyStore;

    impl PuzzleStore for EmptyStore {
        fn list_puzzles(&self, _difficulty: Difficulty) -> StoreResult<Vec<Puzzle>> {
            Ok(Vec::new())
        }

        fn backend_name(&self) -> &'static str {
            "Empty"
        }
    }

    struct BrokenStore;

    impl PuzzleStore for BrokenStore {
        fn list_puzzles(&self, _difficulty: Difficulty) -> StoreResult<Vec<Puzzle>> {
            Err(StoreError::Unavailable("down".into()))
        }

        fn backend_name(&self) -> &'static str {
            "Broken"
        }
    }

    fn easy_ids(catalog: &Catalog) -> Vec<PuzzleId> {
        catalog
            .by_difficulty(Difficulty::Easy)
            .map(|p| p.id.clone())
            .collect()
    }

    #[test]
    fn test_guest_excludes_played() {
        let catalog = Catalog::bundled();
        let ids = easy_ids(&catalog);
        let mut ledger = PlayerLedger::from_ids(ids[1..].iter().cloned());
        let source = LedgerSource::Guest(&mut ledger);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let selection =
                select_unplayed_puzzle(&catalog, &source, Difficulty::Easy, &mut rng).unwrap();
            assert_eq!(selection.puzzle().map(|p| &p.id), Some(&ids[0]));
        }
    }

    #[test]
    fn test_exhausted_when_all_played() {
        let catalog = Catalog::bundled();
        let mut ledger = PlayerLedger::from_ids(easy_ids(&catalog));
        let source = LedgerSource::Guest(&mut ledger);
        let mut rng = StdRng::seed_from_u64(7);

        let selection =
            select_unplayed_puzzle(&catalog, &source, Difficulty::Easy, &mut rng).unwrap();
        assert!(selection.is_exhausted());
        assert_eq!(selection.into_puzzle(), None);
    }

    #[test]
    fn test_no_puzzles_is_configuration_error() {
        let mut ledger = PlayerLedger::new();
        let source = LedgerSource::Guest(&mut ledger);
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(
            select_unplayed_puzzle(&EmptyStore, &source, Difficulty::Hard, &mut rng),
            Err(SelectionError::NoPuzzles(Difficulty::Hard))
        );
        assert!(matches!(
            select_unplayed_puzzle(&BrokenStore, &source, Difficulty::Hard, &mut rng),
            Err(SelectionError::PuzzleStore(StoreError::Unavailable(_)))
        ));
    }

    #[test]
    fn test_ledger_failure_falls_back_to_any_puzzle() {
        let catalog = Catalog::bundled();
        let store = MemoryLedgerStore::new();
        let alice = PlayerId::new("alice").unwrap();
        store.set_recent_ids(&alice, &easy_ids(&catalog)).unwrap();
        store.set_available(false);

        let source = LedgerSource::Persisted {
            store: &store,
            player: &alice,
        };
        let mut rng = StdRng::seed_from_u64(7);
        let selection =
            select_unplayed_puzzle(&catalog, &source, Difficulty::Easy, &mut rng).unwrap();
        assert!(selection.puzzle().is_some());
    }

    #[test]
    fn test_service_select_then_record() {
        let catalog = Arc::new(Catalog::bundled());
        let store = Arc::new(MemoryLedgerStore::new());
        let service = PuzzleService::new(catalog.clone(), store.clone());
        let alice = PlayerId::new("alice").unwrap();
        let mut session = Session::signed_in(alice.clone(), SessionConfig::default(), 0);
        let mut rng = StdRng::seed_from_u64(3);

        let total = catalog.by_difficulty(Difficulty::Easy).count();
        let mut seen = HashSet::new();
        for _ in 0..total {
            let puzzle = service
                .next_puzzle(&mut session, Difficulty::Easy, &mut rng)
                .unwrap()
                .into_puzzle()
                .unwrap();
            assert!(seen.insert(puzzle.id.clone()), "repeated {}", puzzle.id);
            service.record_played(&mut session, &puzzle.id).unwrap();
        }

        assert!(service
            .next_puzzle(&mut session, Difficulty::Easy, &mut rng)
            .unwrap()
            .is_exhausted());
        assert_eq!(store.get_recent_ids(&alice).unwrap().len(), total);
    }
}
