//! Tests for the browser game state and localStorage ledgers

use crate::game::{GameState, ScreenState};
use crate::storage::LocalStorageLedgerStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tristack_core::{
    Catalog, Difficulty, LedgerStore, MemoryLedgerStore, PlayerId, PuzzleId, RevealStep,
    SessionConfig, Verdict,
};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn state() -> (GameState, Arc<MemoryLedgerStore>) {
    let store = Arc::new(MemoryLedgerStore::new());
    let state = GameState::new(
        Catalog::bundled(),
        store.clone(),
        SessionConfig::default(),
        StdRng::seed_from_u64(3),
        0,
    );
    (state, store)
}

#[wasm_bindgen_test]
fn test_menu_to_round() {
    let (mut state, _) = state();
    assert_eq!(state.screen(), ScreenState::Title);

    assert!(state.handle_key("Enter", 10));
    assert_eq!(state.screen(), ScreenState::DifficultySelect);
    assert!(state.handle_key("ArrowDown", 20));
    assert!(state.handle_key("Enter", 30));

    assert_eq!(state.screen(), ScreenState::Playing);
    assert_eq!(state.difficulty(), Difficulty::Medium);
    assert_eq!(state.session().guest_ledger().len(), 1);
}

#[wasm_bindgen_test]
fn test_solve_through_keys() {
    let (mut state, _) = state();
    state.start_round(Difficulty::Easy, 0);
    let solution = state.round().unwrap().puzzle().solution_indices;

    for index in solution {
        assert!(state.handle_key(&(index + 1).to_string(), 0));
    }
    assert!(state.handle_key("Enter", 0));
    assert_eq!(state.screen(), ScreenState::Reveal);

    // Any key skips to the verdict
    state.handle_key("x", 0);
    let snapshot = state.snapshot();
    assert!(matches!(
        snapshot.reveal,
        Some(RevealStep::Final {
            verdict: Verdict::Solved,
            ..
        })
    ));
    assert_eq!(snapshot.selected.len(), 3);
    assert_eq!(state.message(), Some("Solved!"));
}

#[wasm_bindgen_test]
fn test_wrong_count_does_not_reveal() {
    let (mut state, _) = state();
    state.start_round(Difficulty::Easy, 0);
    state.toggle(0, 0);
    assert_eq!(state.submit(0), Some(Verdict::WrongCount { count: 1 }));
    assert_eq!(state.screen(), ScreenState::Playing);
}

#[wasm_bindgen_test]
fn test_guest_exhaustion() {
    let (mut state, store) = state();
    let total = Catalog::bundled().by_difficulty(Difficulty::Easy).count();
    for _ in 0..total {
        state.start_round(Difficulty::Easy, 0);
    }
    state.start_round(Difficulty::Easy, 0);
    assert_eq!(state.screen(), ScreenState::Exhausted);
    assert_eq!(store.player_count(), 0);

    assert!(state.handle_key("r", 0));
    assert_eq!(state.screen(), ScreenState::Playing);
}

#[wasm_bindgen_test]
fn test_signed_in_player_uses_store() {
    let (mut state, store) = state();
    assert!(state.sign_in("not valid!", 0).is_err());
    state.sign_in("carol", 0).unwrap();
    state.start_round(Difficulty::Hard, 0);

    let carol = PlayerId::new("carol").unwrap();
    assert_eq!(store.get_recent_ids(&carol).unwrap().len(), 1);
    assert!(state.session().guest_ledger().is_empty());

    // Idle past the timeout signs the player out
    let timeout = SessionConfig::default().inactivity_timeout_ms;
    state.tick(timeout + 1);
    assert!(state.session().player().is_guest());
}

#[wasm_bindgen_test]
fn test_api_calls_keep_player_signed_in() {
    let store = Arc::new(MemoryLedgerStore::new());
    let config = SessionConfig {
        inactivity_timeout_ms: 1_000,
    };
    let mut state = GameState::new(
        Catalog::bundled(),
        store,
        config,
        StdRng::seed_from_u64(5),
        0,
    );
    state.sign_in("alice", 0).unwrap();

    let mut now = 0;
    for _ in 0..5 {
        now += 400;
        state.start_round(Difficulty::Easy, now);
        now += 400;
        state.toggle(0, now);
        now += 400;
        state.submit(now);
        state.tick(now);
    }
    assert!(!state.session().player().is_guest());

    state.tick(now + 1_001);
    assert!(state.session().player().is_guest());
}

#[wasm_bindgen_test]
fn test_local_storage_round_trip() {
    let store = LocalStorageLedgerStore::new("tristack-test");
    let dave = PlayerId::new("dave").unwrap();
    store.forget(&dave).unwrap();

    assert!(store.is_available());
    assert!(store.get_recent_ids(&dave).unwrap().is_empty());

    let ids = vec![PuzzleId::from("easy-1"), PuzzleId::from(7u64)];
    store.set_recent_ids(&dave, &ids).unwrap();
    assert_eq!(store.get_recent_ids(&dave).unwrap(), ids);

    store.forget(&dave).unwrap();
}
