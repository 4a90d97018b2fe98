//! Property-based tests for the overlay engine and the player ledger.
//!
//! These tests use proptest to check that the stacking rules hold across
//! many randomly generated grids.

use proptest::prelude::*;
use std::collections::HashSet;
use tristack_core::{
    can_overlay, overlay_grids, validate_solution, Cell, Grid, PlayerLedger, Position, PuzzleId,
    CELL_COUNT, GRID_SIZE, LEDGER_CAPACITY,
};

prop_compose! {
    fn arbitrary_cell()(variant in 0..4u8) -> Cell {
        match variant {
            0 => Cell::Red,
            1 => Cell::Blue,
            2 => Cell::Yellow,
            _ => Cell::Empty,
        }
    }
}

prop_compose! {
    fn arbitrary_grid()(cells in prop::collection::vec(arbitrary_cell(), CELL_COUNT)) -> Grid {
        let mut rows = [[Cell::Empty; GRID_SIZE]; GRID_SIZE];
        for (i, cell) in cells.into_iter().enumerate() {
            rows[i / GRID_SIZE][i % GRID_SIZE] = cell;
        }
        Grid::from_rows(rows)
    }
}

prop_compose! {
    /// Three grids that never color the same cell: each cell is owned by at
    /// most one of them.
    fn compatible_triple()(
        owners in prop::collection::vec(0..4usize, CELL_COUNT),
        inks in prop::collection::vec(0..3usize, CELL_COUNT),
    ) -> [Grid; 3] {
        let mut grids = [Grid::empty(); 3];
        for (pos, (owner, ink)) in Position::all().zip(owners.into_iter().zip(inks)) {
            if owner < 3 {
                grids[owner] = grids[owner].with_cell(pos, Cell::INKS[ink]);
            }
        }
        grids
    }
}

proptest! {
    #[test]
    fn can_overlay_is_symmetric(a in arbitrary_grid(), b in arbitrary_grid()) {
        prop_assert_eq!(can_overlay(&a, &b), can_overlay(&b, &a));
    }

    #[test]
    fn self_overlay_only_when_empty(a in arbitrary_grid()) {
        prop_assert_eq!(can_overlay(&a, &a), a.is_empty());
    }

    #[test]
    fn empty_grid_overlays_anything(a in arbitrary_grid()) {
        prop_assert!(can_overlay(&Grid::empty(), &a));
        prop_assert_eq!(overlay_grids(&[Grid::empty(), a]), a);
    }

    #[test]
    fn compatible_overlay_ignores_order(grids in compatible_triple()) {
        let [a, b, c] = grids;
        prop_assert!(can_overlay(&a, &b) && can_overlay(&a, &c) && can_overlay(&b, &c));

        let expected = overlay_grids(&[a, b, c]);
        for permutation in [[a, c, b], [b, a, c], [b, c, a], [c, a, b], [c, b, a]] {
            prop_assert_eq!(overlay_grids(&permutation), expected);
        }
    }

    #[test]
    fn compatible_triple_solves_its_own_overlay(grids in compatible_triple()) {
        let target = overlay_grids(&grids);
        prop_assert!(validate_solution(&grids, &target));
    }

    #[test]
    fn wrong_counts_never_validate(
        grids in prop::collection::vec(arbitrary_grid(), 4),
        target in arbitrary_grid(),
    ) {
        for count in [0, 1, 2, 4] {
            prop_assert!(!validate_solution(&grids[..count], &target));
        }
    }

    #[test]
    fn ledger_stays_bounded_and_unique(ids in prop::collection::vec(0..150u32, 0..400)) {
        let mut ledger = PlayerLedger::new();
        for &n in &ids {
            ledger.record(PuzzleId::from(u64::from(n)));
        }

        prop_assert!(ledger.len() <= LEDGER_CAPACITY);
        let unique: HashSet<_> = ledger.ids().collect();
        prop_assert_eq!(unique.len(), ledger.len());
        if let Some(&last) = ids.last() {
            prop_assert_eq!(ledger.latest(), Some(&PuzzleId::from(u64::from(last))));
        }
    }

    #[test]
    fn ledger_rerecord_keeps_length(ids in prop::collection::vec(0..50u32, 1..60), pick in any::<prop::sample::Index>()) {
        let mut ledger = PlayerLedger::new();
        for &n in &ids {
            ledger.record(PuzzleId::from(u64::from(n)));
        }
        let before = ledger.len();
        let existing = ledger.to_vec()[pick.index(before)].clone();

        ledger.record(existing.clone());
        prop_assert_eq!(ledger.len(), before);
        prop_assert_eq!(ledger.latest(), Some(&existing));
    }
}
