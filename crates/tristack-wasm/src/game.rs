//! Game state for the browser UI, independent of the canvas

use rand::rngs::StdRng;
use serde::Serialize;
use std::sync::Arc;
use tristack_core::{
    Catalog, DemoTiming, Difficulty, Grid, LedgerStore, PlayerId, PuzzleId, PuzzleService,
    RevealSequence, RevealStep, RevealTiming, Round, Selection, Session, SessionConfig,
    SessionError, ToggleResult, TutorialDemo, Verdict,
};

/// Current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScreenState {
    Title,
    DifficultySelect,
    Playing,
    Reveal,
    Exhausted,
    Tutorial,
}

pub const TITLE_MENU: [&str; 2] = ["Play", "How to play"];

/// Message lifetime in ticks (~2 seconds at 60 FPS)
const MESSAGE_TICKS: u32 = 120;

/// Browser game state
pub struct GameState {
    screen: ScreenState,
    menu_selection: usize,
    difficulty: Difficulty,
    session: Session,
    service: PuzzleService,
    rng: StdRng,
    round: Option<Round>,
    cursor: usize,
    reveal: Option<RevealSequence>,
    demo: Option<TutorialDemo>,
    message: Option<String>,
    message_timer: u32,
}

/// Plain view of the game handed to JavaScript
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub screen: ScreenState,
    pub player: String,
    pub guest: bool,
    pub difficulty: Difficulty,
    pub puzzle_id: Option<PuzzleId>,
    pub target: Option<Grid>,
    pub candidates: Vec<Grid>,
    pub selected: Vec<usize>,
    pub cursor: usize,
    pub preview: Option<Grid>,
    pub attempts: usize,
    pub verdict: Option<Verdict>,
    pub reveal: Option<RevealStep>,
    pub message: Option<String>,
}

impl GameState {
    pub fn new(
        catalog: Catalog,
        ledgers: Arc<dyn LedgerStore>,
        session_config: SessionConfig,
        rng: StdRng,
        now_ms: u64,
    ) -> Self {
        let demo = TutorialDemo::from_catalog(&catalog, DemoTiming::default());
        Self {
            screen: ScreenState::Title,
            menu_selection: 0,
            difficulty: Difficulty::Easy,
            session: Session::guest(session_config, now_ms),
            service: PuzzleService::new(Arc::new(catalog), ledgers),
            rng,
            round: None,
            cursor: 0,
            reveal: None,
            demo,
            message: None,
            message_timer: 0,
        }
    }

    pub fn screen(&self) -> ScreenState {
        self.screen
    }

    pub fn menu_selection(&self) -> usize {
        self.menu_selection
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn reveal(&self) -> Option<&RevealSequence> {
        self.reveal.as_ref()
    }

    pub fn demo(&self) -> Option<&TutorialDemo> {
        self.demo.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = MESSAGE_TICKS;
    }

    pub fn sign_in(&mut self, name: &str, now_ms: u64) -> Result<(), SessionError> {
        let player = PlayerId::new(name.trim())?;
        log::info!("signed in as {}", player);
        self.show_message(&format!("Signed in as {}", player));
        self.session.sign_in(player, now_ms);
        Ok(())
    }

    pub fn sign_out(&mut self, now_ms: u64) {
        if !self.session.player().is_guest() {
            self.session.sign_out(now_ms);
            self.show_message("Signed out, playing as guest");
        }
    }

    /// Forget the guest's played puzzles
    pub fn reset_guest_history(&mut self, now_ms: u64) {
        self.record_activity(now_ms);
        self.session.reset_guest_ledger();
    }

    /// Sign out an idle player, then mark `now_ms` as the latest activity
    fn record_activity(&mut self, now_ms: u64) {
        if self.session.expire_if_idle(now_ms) {
            self.show_message("Signed out after inactivity");
        }
        self.session.touch(now_ms);
    }

    /// Select and present a puzzle of `difficulty`
    pub fn start_round(&mut self, difficulty: Difficulty, now_ms: u64) {
        self.record_activity(now_ms);
        self.present_round(difficulty);
    }

    fn present_round(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.reveal = None;

        match self
            .service
            .next_puzzle(&mut self.session, difficulty, &mut self.rng)
        {
            Ok(Selection::Puzzle(puzzle)) => {
                let mut round = Round::new(puzzle);
                if round.take_presentation() {
                    if let Err(e) = self
                        .service
                        .record_played(&mut self.session, &round.puzzle().id)
                    {
                        log::warn!("could not record {}: {}", round.puzzle().id, e);
                    }
                }
                self.round = Some(round);
                self.cursor = 0;
                self.screen = ScreenState::Playing;
            }
            Ok(Selection::Exhausted) => {
                self.round = None;
                self.screen = ScreenState::Exhausted;
            }
            Err(e) => {
                log::error!("could not select a puzzle: {}", e);
                self.show_message(&e.to_string());
                self.round = None;
                self.screen = ScreenState::DifficultySelect;
            }
        }
    }

    pub fn toggle(&mut self, index: usize, now_ms: u64) {
        self.record_activity(now_ms);
        self.toggle_candidate(index);
    }

    fn toggle_candidate(&mut self, index: usize) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        match round.toggle(index) {
            ToggleResult::SelectionFull => self.show_message("Only three grids can be stacked"),
            ToggleResult::Locked => self.show_message("Already solved"),
            _ => {}
        }
    }

    /// Submit the selection; anything but a count error starts the reveal
    pub fn submit(&mut self, now_ms: u64) -> Option<Verdict> {
        self.record_activity(now_ms);
        self.submit_selection()
    }

    fn submit_selection(&mut self) -> Option<Verdict> {
        let round = self.round.as_mut()?;
        let verdict = round.submit();
        if let Verdict::WrongCount { .. } = verdict {
            self.show_message(verdict.message());
        } else {
            self.reveal = Some(RevealSequence::new(
                &round.selected_grids(),
                verdict,
                RevealTiming::default(),
            ));
            self.screen = ScreenState::Reveal;
        }
        Some(verdict)
    }

    /// Advance one animation frame
    pub fn tick(&mut self, now_ms: u64) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }

        if self.session.expire_if_idle(now_ms) {
            self.show_message("Signed out after inactivity");
        }

        match self.screen {
            ScreenState::Title | ScreenState::Tutorial => {
                if let Some(demo) = self.demo.as_mut() {
                    demo.tick();
                }
            }
            ScreenState::Reveal => {
                let finished = match self.reveal.as_mut() {
                    Some(reveal) if !reveal.is_finished() => !reveal.advance(),
                    _ => false,
                };
                if finished {
                    self.announce_verdict();
                }
            }
            _ => {}
        }
    }

    fn announce_verdict(&mut self) {
        if let Some(verdict) = self.reveal.as_ref().map(|r| r.verdict()) {
            self.show_message(verdict.message());
        }
    }

    /// Handle a browser key name. Returns false for keys the game ignores.
    pub fn handle_key(&mut self, key: &str, now_ms: u64) -> bool {
        self.record_activity(now_ms);

        match self.screen {
            ScreenState::Title => self.handle_title_key(key),
            ScreenState::DifficultySelect => self.handle_difficulty_key(key),
            ScreenState::Playing => self.handle_playing_key(key),
            ScreenState::Reveal => self.handle_reveal_key(key),
            ScreenState::Exhausted => self.handle_exhausted_key(key),
            ScreenState::Tutorial => match key {
                "Escape" | "Enter" | "q" => {
                    self.screen = ScreenState::Title;
                    true
                }
                _ => false,
            },
        }
    }

    fn handle_title_key(&mut self, key: &str) -> bool {
        match key {
            "ArrowUp" | "k" => self.menu_selection = self.menu_selection.saturating_sub(1),
            "ArrowDown" | "j" => {
                self.menu_selection = (self.menu_selection + 1).min(TITLE_MENU.len() - 1)
            }
            "Enter" | " " => {
                if self.menu_selection == 0 {
                    self.open_difficulty_select();
                } else {
                    self.screen = ScreenState::Tutorial;
                }
            }
            _ => return false,
        }
        true
    }

    fn open_difficulty_select(&mut self) {
        self.menu_selection = Difficulty::all()
            .iter()
            .position(|&d| d == self.difficulty)
            .unwrap_or(0);
        self.screen = ScreenState::DifficultySelect;
    }

    fn handle_difficulty_key(&mut self, key: &str) -> bool {
        let levels = Difficulty::all();
        match key {
            "ArrowUp" | "k" => self.menu_selection = self.menu_selection.saturating_sub(1),
            "ArrowDown" | "j" => {
                self.menu_selection = (self.menu_selection + 1).min(levels.len() - 1)
            }
            "Enter" | " " => {
                if let Some(&difficulty) = levels.get(self.menu_selection) {
                    self.present_round(difficulty);
                }
            }
            "Escape" => {
                self.menu_selection = 0;
                self.screen = ScreenState::Title;
            }
            _ => return false,
        }
        true
    }

    fn handle_playing_key(&mut self, key: &str) -> bool {
        let count = self
            .round
            .as_ref()
            .map_or(0, |r| r.puzzle().available_grids.len());
        match key {
            "ArrowLeft" | "h" => self.cursor = self.cursor.saturating_sub(1),
            "ArrowRight" | "l" => {
                if self.cursor + 1 < count {
                    self.cursor += 1;
                }
            }
            " " => self.toggle_candidate(self.cursor),
            "Enter" => {
                self.submit_selection();
            }
            "r" => {
                if let Some(round) = self.round.as_mut() {
                    round.reset();
                }
            }
            "n" => self.present_round(self.difficulty),
            "Escape" => self.open_difficulty_select(),
            _ => match key.parse::<usize>() {
                Ok(n @ 1..=9) if n <= count => {
                    self.cursor = n - 1;
                    self.toggle_candidate(n - 1);
                }
                _ => return false,
            },
        }
        true
    }

    fn handle_reveal_key(&mut self, key: &str) -> bool {
        let Some(reveal) = self.reveal.as_mut() else {
            self.screen = ScreenState::Playing;
            return true;
        };
        if !reveal.is_finished() {
            reveal.skip();
            self.announce_verdict();
            return true;
        }

        if reveal.verdict().is_solved() {
            match key {
                "Enter" | " " | "n" => self.present_round(self.difficulty),
                "Escape" => self.open_difficulty_select(),
                _ => return false,
            }
        } else {
            self.reveal = None;
            self.screen = ScreenState::Playing;
        }
        true
    }

    fn handle_exhausted_key(&mut self, key: &str) -> bool {
        match key {
            "r" if self.session.player().is_guest() => {
                self.session.reset_guest_ledger();
                self.present_round(self.difficulty);
            }
            "Enter" | "Escape" => self.open_difficulty_select(),
            _ => return false,
        }
        true
    }

    /// Serializable view of the current state
    pub fn snapshot(&self) -> GameSnapshot {
        let round = self.round.as_ref();
        GameSnapshot {
            screen: self.screen,
            player: self.session.player().display_name().to_string(),
            guest: self.session.player().is_guest(),
            difficulty: self.difficulty,
            puzzle_id: round.map(|r| r.puzzle().id.clone()),
            target: round.map(|r| r.puzzle().target),
            candidates: round
                .map(|r| r.puzzle().available_grids.clone())
                .unwrap_or_default(),
            selected: round.map(|r| r.selected().to_vec()).unwrap_or_default(),
            cursor: self.cursor,
            preview: round.map(|r| r.preview()),
            attempts: round.map_or(0, |r| r.attempts()),
            verdict: round.and_then(|r| r.last_verdict()),
            reveal: self.reveal.as_ref().map(|r| *r.current()),
            message: self.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use tristack_core::MemoryLedgerStore;

    fn signed_in_state(timeout_ms: u64) -> GameState {
        let mut state = GameState::new(
            Catalog::bundled(),
            Arc::new(MemoryLedgerStore::new()),
            SessionConfig {
                inactivity_timeout_ms: timeout_ms,
            },
            StdRng::seed_from_u64(11),
            0,
        );
        state.sign_in("alice", 0).unwrap();
        state
    }

    #[test]
    fn test_api_activity_resets_idle_timer() {
        let mut state = signed_in_state(1_000);

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

        state.reset_guest_history(now + 900);
        state.tick(now + 1_800);
        assert!(!state.session().player().is_guest());
    }

    #[test]
    fn test_idle_player_is_signed_out_on_next_call() {
        let mut state = signed_in_state(1_000);
        state.start_round(Difficulty::Easy, 1_500);

        assert!(state.session().player().is_guest());
        assert_eq!(state.message(), Some("Signed out after inactivity"));
        assert_eq!(state.session().guest_ledger().len(), 1);
    }
}
