//! Overlay engine: stacking grids and checking a player's submission.
//!
//! Everything here is pure and total over its inputs. A failed check is a
//! normal `false`/[`Verdict`], never an error.

use crate::grid::{Grid, Position};
use serde::{Deserialize, Serialize};

/// Number of grids a submission must contain
pub const SELECTION_SIZE: usize = 3;

/// Check that two grids never color the same cell.
///
/// Empty cells never conflict, with each other or with ink.
pub fn can_overlay(a: &Grid, b: &Grid) -> bool {
    Position::all().all(|pos| !(a.cell(pos).is_ink() && b.cell(pos).is_ink()))
}

/// Positions where both grids carry ink
pub fn conflicts(a: &Grid, b: &Grid) -> Vec<Position> {
    Position::all()
        .filter(|&pos| a.cell(pos).is_ink() && b.cell(pos).is_ink())
        .collect()
}

/// Stack grids onto an empty base, in order.
///
/// Later grids overwrite earlier ones where both carry ink. For pairwise
/// compatible grids the result does not depend on order.
pub fn overlay_grids<'a, I>(grids: I) -> Grid
where
    I: IntoIterator<Item = &'a Grid>,
{
    grids.into_iter().fold(Grid::empty(), |acc, grid| {
        grid.inked_positions()
            .fold(acc, |acc, pos| acc.with_cell(pos, grid.cell(pos)))
    })
}

/// Cell-for-cell equality
pub fn grids_equal(a: &Grid, b: &Grid) -> bool {
    Position::all().all(|pos| a.cell(pos) == b.cell(pos))
}

/// Outcome of checking a submission, with the reason it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Verdict {
    /// Stacking the selection reproduces the target
    Solved,
    /// Not exactly three grids were supplied
    WrongCount { count: usize },
    /// Two selected grids color the same cell (indices into the selection)
    Conflict { first: usize, second: usize },
    /// The selection stacks cleanly but does not match the target
    Mismatch,
}

impl Verdict {
    pub fn is_solved(&self) -> bool {
        matches!(self, Verdict::Solved)
    }

    /// Short player-facing description
    pub fn message(&self) -> &'static str {
        match self {
            Verdict::Solved => "Solved!",
            Verdict::WrongCount { .. } => "Pick exactly three grids",
            Verdict::Conflict { .. } => "Two of those grids overlap",
            Verdict::Mismatch => "That doesn't match the target",
        }
    }
}

/// Check a selection and report why it fails.
///
/// The count check comes first, then the pairwise conflict check, and
/// only then is the overlay computed and compared. A conflicting selection
/// fails even if its overlay happens to equal the target.
pub fn check_selection(selected: &[Grid], target: &Grid) -> Verdict {
    if selected.len() != SELECTION_SIZE {
        return Verdict::WrongCount {
            count: selected.len(),
        };
    }

    for first in 0..selected.len() {
        for second in first + 1..selected.len() {
            if !can_overlay(&selected[first], &selected[second]) {
                return Verdict::Conflict { first, second };
            }
        }
    }

    if grids_equal(&overlay_grids(selected), target) {
        Verdict::Solved
    } else {
        Verdict::Mismatch
    }
}

/// The acceptance predicate for a submission
pub fn validate_solution(selected: &[Grid], target: &Grid) -> bool {
    check_selection(selected, target).is_solved()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;

    fn g(s: &str) -> Grid {
        Grid::from_string(s).unwrap()
    }

    #[test]
    fn test_can_overlay_disjoint() {
        assert!(can_overlay(&g("RXX/RXX/XXX"), &g("XBX/XBX/XXX")));
        assert!(can_overlay(&Grid::empty(), &Grid::empty()));
        assert!(can_overlay(&Grid::empty(), &g("RBY/RBY/RBY")));
    }

    #[test]
    fn test_can_overlay_conflict() {
        // Same color on the same cell is still a conflict
        assert!(!can_overlay(&g("RXX/XXX/XXX"), &g("RXX/XXX/XXX")));
        assert!(!can_overlay(&g("RXX/RXX/XXX"), &g("YXX/YXX/XXX")));
        assert_eq!(
            conflicts(&g("RXX/RXX/XXX"), &g("YXX/XXX/XXX")),
            vec![Position::new(0, 0)]
        );
    }

    #[test]
    fn test_overlay_empty_input() {
        assert_eq!(overlay_grids(&[]), Grid::empty());
    }

    #[test]
    fn test_overlay_last_writer_wins() {
        let grids = [g("RXX/XXX/XXX"), g("BXX/XXX/XXX")];
        assert_eq!(overlay_grids(&grids).cell(Position::new(0, 0)), Cell::Blue);
        let reversed = [grids[1], grids[0]];
        assert_eq!(overlay_grids(&reversed).cell(Position::new(0, 0)), Cell::Red);
    }

    #[test]
    fn test_overlay_empty_cells_do_not_erase() {
        let grids = [g("RBY/RBY/RBY"), Grid::empty()];
        assert_eq!(overlay_grids(&grids), grids[0]);
    }

    #[test]
    fn test_validate_wrong_counts() {
        let target = g("RBX/RBY/XXY");
        let a = g("RXX/RXX/XXX");
        let b = g("XBX/XBX/XXX");
        let c = g("XXX/XXY/XXY");
        assert!(!validate_solution(&[], &target));
        assert!(!validate_solution(&[a], &target));
        assert!(!validate_solution(&[a, b], &target));
        assert!(validate_solution(&[a, b, c], &target));
        assert_eq!(
            check_selection(&[a, b, c, Grid::empty()], &target),
            Verdict::WrongCount { count: 4 }
        );
    }

    #[test]
    fn test_conflict_beats_matching_overlay() {
        // The overlay of these three equals the target, but two of them
        // both paint (0,0)
        let target = g("RBX/RBY/XXY");
        let a = g("RXX/RXX/XXX");
        let b = g("BBX/XBX/XXX");
        let c = g("RXX/XXY/XXY");
        assert!(grids_equal(&overlay_grids(&[b, a, c]), &target));
        assert_eq!(
            check_selection(&[b, a, c], &target),
            Verdict::Conflict { first: 0, second: 1 }
        );
    }

    #[test]
    fn test_mismatch() {
        let target = g("RBX/RBY/XXY");
        let verdict = check_selection(
            &[g("RXX/XXX/RXX"), g("XBX/XBX/XXX"), g("XXX/XXY/XXY")],
            &target,
        );
        assert_eq!(verdict, Verdict::Mismatch);
        assert!(!verdict.is_solved());
    }
}
