//! Static, hand-authored puzzle data.
//!
//! The bundled catalog is compiled into the crate; additional catalogs can
//! be loaded from JSON files with the same layout. Every puzzle is checked
//! with [`Puzzle::validate`] when a catalog is built.

use crate::puzzle::{Difficulty, Puzzle, PuzzleError, PuzzleId};
use crate::store::{PuzzleStore, StoreResult};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

const BUNDLED_PUZZLES: &str = include_str!("../data/puzzles.json");

/// Errors from loading a puzzle catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    InvalidPuzzle(#[from] PuzzleError),

    #[error("duplicate puzzle id {0}")]
    DuplicateId(PuzzleId),
}

/// A validated collection of puzzles
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    puzzles: Vec<Puzzle>,
}

impl Catalog {
    /// Build a catalog, rejecting it on the first invalid puzzle or repeated id
    pub fn new(puzzles: Vec<Puzzle>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for puzzle in &puzzles {
            puzzle.validate()?;
            if !seen.insert(puzzle.id.clone()) {
                return Err(CatalogError::DuplicateId(puzzle.id.clone()));
            }
        }
        Ok(Self { puzzles })
    }

    /// The puzzles shipped with the game
    pub fn bundled() -> Self {
        match Self::from_json(BUNDLED_PUZZLES) {
            Ok(catalog) => catalog,
            Err(e) => {
                // Covered by tests; an empty catalog surfaces as a
                // configuration error on first selection.
                log::error!("bundled puzzle catalog is invalid: {e}");
                Self::default()
            }
        }
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Load a catalog from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_json(&json)?;
        log::info!(
            "loaded {} puzzles from {}",
            catalog.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    pub fn puzzles(&self) -> &[Puzzle] {
        &self.puzzles
    }

    /// Puzzles of one difficulty, in authored order
    pub fn by_difficulty(&self, difficulty: Difficulty) -> impl Iterator<Item = &Puzzle> {
        self.puzzles
            .iter()
            .filter(move |p| p.difficulty == difficulty)
    }

    pub fn get(&self, id: &PuzzleId) -> Option<&Puzzle> {
        self.puzzles.iter().find(|p| &p.id == id)
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }
}

impl PuzzleStore for Catalog {
    fn list_puzzles(&self, difficulty: Difficulty) -> StoreResult<Vec<Puzzle>> {
        Ok(self.by_difficulty(difficulty).cloned().collect())
    }

    fn backend_name(&self) -> &'static str {
        "Catalog"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{can_overlay, validate_solution};
    use crate::grid::Position;

    #[test]
    fn test_bundled_catalog_is_valid() {
        let catalog = Catalog::from_json(BUNDLED_PUZZLES).unwrap();
        for &difficulty in Difficulty::all() {
            assert!(
                catalog.by_difficulty(difficulty).count() > 0,
                "no puzzles for {difficulty}"
            );
        }
    }

    #[test]
    fn test_sample_easy_puzzle() {
        let catalog = Catalog::bundled();
        let puzzle = catalog.get(&"easy-1".into()).unwrap();
        let grids = &puzzle.available_grids;

        assert!(validate_solution(&[grids[0], grids[1], grids[2]], &puzzle.target));
        assert!(!validate_solution(&[grids[3], grids[1], grids[2]], &puzzle.target));

        assert!(!can_overlay(&grids[0], &grids[6]));
        assert!(grids[0].cell(Position::new(0, 0)).is_ink());
        assert!(grids[6].cell(Position::new(0, 0)).is_ink());
    }

    #[test]
    fn test_every_solution_round_trips() {
        for puzzle in Catalog::bundled().puzzles() {
            assert!(
                validate_solution(&puzzle.solution_grids(), &puzzle.target),
                "puzzle {} does not validate",
                puzzle.id
            );
        }
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let catalog = Catalog::bundled();
        let mut puzzles = catalog.puzzles().to_vec();
        puzzles.push(puzzles[0].clone());
        assert!(matches!(
            Catalog::new(puzzles),
            Err(CatalogError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_puzzle() {
        let json = r#"[{
            "id": 7,
            "difficulty": "easy",
            "target": ["RXX", "XXX", "XXX"],
            "availableGrids": [["RXX","XXX","XXX"], ["XXX","XXX","XXX"], ["BXX","XXX","XXX"]],
            "solutionIndices": [0, 1, 2]
        }]"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidPuzzle(PuzzleError::OverlappingSolution { .. })
        ));
        assert!(err.to_string().contains("puzzle 7"));
    }

    #[test]
    fn test_list_puzzles_filters() {
        let catalog = Catalog::bundled();
        let hard = catalog.list_puzzles(Difficulty::Hard).unwrap();
        assert!(!hard.is_empty());
        assert!(hard.iter().all(|p| p.difficulty == Difficulty::Hard));
    }
}
