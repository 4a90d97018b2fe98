use crate::grid::Grid;
use crate::overlay::{check_selection, overlay_grids, Verdict, SELECTION_SIZE};
use crate::puzzle::Puzzle;

/// Result of toggling a candidate grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleResult {
    Selected,
    Deselected,
    /// Three grids are already selected
    SelectionFull,
    /// No candidate at that index
    OutOfRange,
    /// The round is already solved
    Locked,
}

/// One presentation of a puzzle to a player.
///
/// Submitting and resetting can repeat any number of times within a round;
/// the puzzle is recorded as played only once, when the round is first
/// presented.
#[derive(Debug, Clone)]
pub struct Round {
    puzzle: Puzzle,
    selected: Vec<usize>,
    attempts: usize,
    last_verdict: Option<Verdict>,
    presented: bool,
}

impl Round {
    pub fn new(puzzle: Puzzle) -> Self {
        Self {
            puzzle,
            selected: Vec::with_capacity(SELECTION_SIZE),
            attempts: 0,
            last_verdict: None,
            presented: false,
        }
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    /// Returns true the first time it is called for this round.
    ///
    /// The caller records the puzzle in the player's ledger when this
    /// returns true.
    pub fn take_presentation(&mut self) -> bool {
        !std::mem::replace(&mut self.presented, true)
    }

    /// Selected candidate indices, in the order they were picked
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn selected_grids(&self) -> Vec<Grid> {
        self.puzzle.grids_at(&self.selected)
    }

    /// Overlay of the current selection, for a live preview
    pub fn preview(&self) -> Grid {
        overlay_grids(&self.selected_grids())
    }

    pub fn is_solved(&self) -> bool {
        self.last_verdict.is_some_and(|v| v.is_solved())
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn last_verdict(&self) -> Option<Verdict> {
        self.last_verdict
    }

    /// Select or deselect a candidate grid
    pub fn toggle(&mut self, index: usize) -> ToggleResult {
        if self.is_solved() {
            return ToggleResult::Locked;
        }
        if index >= self.puzzle.available_grids.len() {
            return ToggleResult::OutOfRange;
        }

        self.last_verdict = None;
        if let Some(pos) = self.selected.iter().position(|&i| i == index) {
            self.selected.remove(pos);
            ToggleResult::Deselected
        } else if self.selected.len() >= SELECTION_SIZE {
            ToggleResult::SelectionFull
        } else {
            self.selected.push(index);
            ToggleResult::Selected
        }
    }

    /// Check the current selection against the target
    pub fn submit(&mut self) -> Verdict {
        if let Some(verdict) = self.last_verdict.filter(|v| v.is_solved()) {
            return verdict;
        }
        let verdict = check_selection(&self.selected_grids(), &self.puzzle.target);
        self.attempts += 1;
        self.last_verdict = Some(verdict);
        log::debug!(
            "puzzle {} attempt {}: {:?}",
            self.puzzle.id,
            self.attempts,
            verdict
        );
        verdict
    }

    /// Clear the selection to try again
    pub fn reset(&mut self) {
        self.selected.clear();
        self.last_verdict = None;
    }
}
