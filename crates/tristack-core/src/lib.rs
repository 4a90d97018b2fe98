//! Core engine for Tristack, a puzzle game where three 3x3 colored grids
//! are stacked to rebuild a target pattern.
//!
//! - [`overlay`]: the stacking rules and the acceptance check for a submission
//! - [`selection`]: choosing a puzzle the player has not recently seen
//! - [`Session`]: explicit player/session state passed into every call
//!
//! ```
//! use tristack_core::{validate_solution, Catalog};
//!
//! let catalog = Catalog::bundled();
//! let puzzle = &catalog.puzzles()[0];
//! assert!(validate_solution(&puzzle.solution_grids(), &puzzle.target));
//! ```

pub mod catalog;
pub mod grid;
pub mod ledger;
pub mod overlay;
pub mod puzzle;
pub mod reveal;
pub mod round;
pub mod selection;
pub mod session;
pub mod store;
pub mod tutorial;

pub use catalog::{Catalog, CatalogError};
pub use grid::{Cell, Grid, GridError, Position, CELL_COUNT, GRID_SIZE};
pub use ledger::{PlayerLedger, LEDGER_CAPACITY};
pub use overlay::{
    can_overlay, check_selection, conflicts, grids_equal, overlay_grids, validate_solution,
    Verdict, SELECTION_SIZE,
};
pub use puzzle::{Difficulty, ParseDifficultyError, Puzzle, PuzzleError, PuzzleId};
pub use reveal::{RevealSequence, RevealStep, RevealTiming};
pub use round::{Round, ToggleResult};
pub use selection::{
    record_played, select_unplayed_puzzle, PuzzleService, Selection, SelectionError,
};
pub use session::{
    LedgerSource, PlayerId, PlayerRef, Session, SessionConfig, SessionError, MAX_PLAYER_NAME,
};
pub use store::{LedgerStore, MemoryLedgerStore, PuzzleStore, StoreError, StoreResult};
pub use tutorial::{DemoBeat, DemoTiming, TutorialDemo, TUTORIAL_PUZZLE_ID};
