//! Basic example of using the Tristack engine

use rand::thread_rng;
use std::sync::Arc;
use tristack_core::{
    can_overlay, Catalog, Difficulty, MemoryLedgerStore, PuzzleService, Round, Selection,
    Session, SessionConfig,
};

fn main() {
    let catalog = Arc::new(Catalog::bundled());
    println!("Loaded {} puzzles\n", catalog.len());

    let service = PuzzleService::new(catalog, Arc::new(MemoryLedgerStore::new()));
    let mut session = Session::guest(SessionConfig::default(), 0);
    let mut rng = thread_rng();

    // Play every easy puzzle once by submitting its authored solution
    loop {
        let puzzle = match service.next_puzzle(&mut session, Difficulty::Easy, &mut rng) {
            Ok(Selection::Puzzle(puzzle)) => puzzle,
            Ok(Selection::Exhausted) => {
                println!("No easy puzzles left for this session");
                break;
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return;
            }
        };

        println!("Puzzle {} target:\n{}\n", puzzle.id, puzzle.target);

        let mut round = Round::new(puzzle);
        if round.take_presentation() {
            if let Err(e) = service.record_played(&mut session, &round.puzzle().id) {
                eprintln!("Could not record puzzle: {}", e);
            }
        }

        for index in round.puzzle().solution_indices {
            round.toggle(index);
        }
        let verdict = round.submit();
        println!("Stacked:\n{}\n{}\n", round.preview(), verdict.message());
    }

    // Two grids that color the same cell can never be stacked
    let catalog = Catalog::bundled();
    if let Some(puzzle) = catalog.by_difficulty(Difficulty::Easy).next() {
        let grids = &puzzle.available_grids;
        for (i, a) in grids.iter().enumerate() {
            for (j, b) in grids.iter().enumerate().skip(i + 1) {
                if !can_overlay(a, b) {
                    println!("Grids {} and {} overlap", i, j);
                }
            }
        }
    };
}
