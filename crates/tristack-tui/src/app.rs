use crate::animations::Confetti;
use crate::config::AppConfig;
use crate::ledger_store::create_backend;
use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent};
use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tristack_core::{
    Catalog, CatalogError, DemoTiming, Difficulty, LedgerStore, PlayerId, PuzzleService,
    RevealSequence, RevealTiming, Round, Selection, Session, SessionConfig, ToggleResult,
    TutorialDemo, Verdict, MAX_PLAYER_NAME,
};

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// Current screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Title menu with the demo running beside it
    Title,
    /// Entering a player name
    SignIn,
    /// Picking a difficulty
    DifficultySelect,
    /// Picking candidate grids
    Playing,
    /// Stacking animation after a submission
    Reveal,
    /// Every puzzle of the difficulty has been played recently
    Exhausted,
    /// Full-screen tutorial demo
    Tutorial,
}

/// Entries of the title menu
pub const TITLE_MENU_LEN: usize = 5;

/// The main application state
pub struct App {
    /// Color theme
    pub theme: Theme,
    /// Current screen state
    pub screen_state: ScreenState,
    /// Selected menu item
    pub menu_selection: usize,
    /// Difficulty of the current or next round
    pub difficulty: Difficulty,
    /// Who is playing
    pub session: Session,
    service: PuzzleService,
    rng: StdRng,
    started: Instant,
    /// Current round
    pub round: Option<Round>,
    /// Candidate under the cursor
    pub cursor: usize,
    /// Reveal of the last submission
    pub reveal: Option<RevealSequence>,
    /// Looping tutorial demo
    pub demo: Option<TutorialDemo>,
    /// Player name being typed on the sign-in screen
    pub name_input: String,
    /// Message to display
    pub message: Option<String>,
    /// Message timer
    message_timer: u32,
    /// Solve celebration
    pub confetti: Confetti,
}

impl App {
    /// Build the app from command-line configuration
    pub fn new(config: &AppConfig) -> Result<Self, CatalogError> {
        let catalog = match &config.catalog {
            Some(path) => Catalog::load(path)?,
            None => Catalog::bundled(),
        };
        info!("loaded {} puzzles", catalog.len());

        let ledgers = create_backend(config.environment, &config.data_dir);
        info!("using {} ledger store", ledgers.backend_name());

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut app = Self::with_backends(catalog, ledgers, config.session, rng);
        if let Some(name) = &config.player {
            app.sign_in(name);
        }
        if config.tutorial {
            app.screen_state = ScreenState::Tutorial;
        } else if let Some(difficulty) = config.difficulty {
            app.start_round(difficulty);
        }
        Ok(app)
    }

    /// Build the app around explicit backends
    pub fn with_backends(
        catalog: Catalog,
        ledgers: Arc<dyn LedgerStore>,
        session_config: SessionConfig,
        rng: StdRng,
    ) -> Self {
        let demo = TutorialDemo::from_catalog(&catalog, DemoTiming::default());
        if demo.is_none() {
            warn!("catalog is empty, tutorial demo disabled");
        }

        Self {
            theme: Theme::dark(),
            screen_state: ScreenState::Title,
            menu_selection: 0,
            difficulty: Difficulty::Easy,
            session: Session::guest(session_config, 0),
            service: PuzzleService::new(Arc::new(catalog), ledgers),
            rng,
            started: Instant::now(),
            round: None,
            cursor: 0,
            reveal: None,
            demo,
            name_input: String::new(),
            message: None,
            message_timer: 0,
            confetti: Confetti::default(),
        }
    }

    /// Milliseconds since the app started
    pub fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Get the tick rate based on current screen
    pub fn get_tick_rate(&self) -> Duration {
        match self.screen_state {
            // 30 FPS for animations
            ScreenState::Title | ScreenState::Tutorial | ScreenState::Reveal => {
                Duration::from_millis(33)
            }
            _ => Duration::from_millis(100),
        }
    }

    /// Update animations and timers (called every tick)
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }

        let now = self.now_ms();
        self.expire_idle(now);

        match self.screen_state {
            ScreenState::Title | ScreenState::Tutorial => {
                if let Some(demo) = self.demo.as_mut() {
                    demo.tick();
                }
            }
            ScreenState::Reveal => self.tick_reveal(),
            _ => {}
        }
        self.confetti.tick();
    }

    fn tick_reveal(&mut self) {
        let Some(reveal) = self.reveal.as_mut() else {
            return;
        };
        if reveal.is_finished() {
            return;
        }
        reveal.advance();
        if reveal.is_finished() {
            self.finish_reveal();
        }
    }

    fn finish_reveal(&mut self) {
        let Some(verdict) = self.reveal.as_ref().map(|r| r.verdict()) else {
            return;
        };
        if verdict.is_solved() {
            self.confetti.burst(40.0, 10.0, 60);
        }
        self.show_message(verdict.message());
    }

    /// Sign out a player who has been idle too long
    pub fn expire_idle(&mut self, now_ms: u64) -> bool {
        let expired = self.session.expire_if_idle(now_ms);
        if expired {
            info!("session expired after inactivity");
            self.show_message("Signed out after inactivity");
        }
        expired
    }

    /// Show a temporary message
    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = 60; // ~2 seconds at 33ms poll
    }

    /// Name shown in the header
    pub fn player_name(&self) -> &str {
        self.session.player().display_name()
    }

    /// Labels of the title menu
    pub fn title_menu(&self) -> [&'static str; TITLE_MENU_LEN] {
        let account = if self.session.player().is_guest() {
            "Sign in"
        } else {
            "Sign out"
        };
        ["Play", account, "How to play", "Theme", "Quit"]
    }

    /// Sign in as `name`. Returns false if the name is rejected.
    pub fn sign_in(&mut self, name: &str) -> bool {
        match PlayerId::new(name) {
            Ok(player) => {
                info!("signed in as {}", player);
                self.show_message(&format!("Signed in as {}", player));
                let now = self.now_ms();
                self.session.sign_in(player, now);
                true
            }
            Err(e) => {
                self.show_message(&e.to_string());
                false
            }
        }
    }

    pub fn sign_out(&mut self) {
        if self.session.player().is_guest() {
            return;
        }
        let now = self.now_ms();
        self.session.sign_out(now);
        info!("signed out");
        self.show_message("Signed out, playing as guest");
    }

    /// Select and present a puzzle of `difficulty`
    pub fn start_round(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.reveal = None;
        self.confetti.clear();

        let selection =
            self.service
                .next_puzzle(&mut self.session, difficulty, &mut self.rng);
        match selection {
            Ok(Selection::Puzzle(puzzle)) => {
                let mut round = Round::new(puzzle);
                if round.take_presentation() {
                    if let Err(e) = self
                        .service
                        .record_played(&mut self.session, &round.puzzle().id)
                    {
                        warn!("could not record {}: {}", round.puzzle().id, e);
                    }
                }
                debug!("presenting puzzle {}", round.puzzle().id);
                self.round = Some(round);
                self.cursor = 0;
                self.screen_state = ScreenState::Playing;
            }
            Ok(Selection::Exhausted) => {
                info!("no unplayed {} puzzles left", difficulty);
                self.round = None;
                self.screen_state = ScreenState::Exhausted;
            }
            Err(e) => {
                error!("could not select a puzzle: {}", e);
                self.show_message(&e.to_string());
                self.round = None;
                self.screen_state = ScreenState::DifficultySelect;
            }
        }
    }

    /// Toggle the candidate at `index` in the current round
    pub fn toggle_candidate(&mut self, index: usize) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        match round.toggle(index) {
            ToggleResult::Selected | ToggleResult::Deselected => {}
            ToggleResult::SelectionFull => self.show_message("Only three grids can be stacked"),
            ToggleResult::OutOfRange => {}
            ToggleResult::Locked => self.show_message("Already solved - press n for another"),
        }
    }

    /// Submit the current selection and start the reveal
    pub fn submit(&mut self) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        let verdict = round.submit();
        debug!("submission {} on {}: {:?}", round.attempts(), round.puzzle().id, verdict);

        if let Verdict::WrongCount { .. } = verdict {
            self.show_message(verdict.message());
            return;
        }
        self.reveal = Some(RevealSequence::new(
            &round.selected_grids(),
            verdict,
            RevealTiming::default(),
        ));
        self.screen_state = ScreenState::Reveal;
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        let now = self.now_ms();
        self.expire_idle(now);
        self.session.touch(now);

        match self.screen_state {
            ScreenState::Title => self.handle_title_key(key),
            ScreenState::SignIn => self.handle_sign_in_key(key),
            ScreenState::DifficultySelect => self.handle_difficulty_key(key),
            ScreenState::Playing => self.handle_game_key(key),
            ScreenState::Reveal => self.handle_reveal_key(key),
            ScreenState::Exhausted => self.handle_exhausted_key(key),
            ScreenState::Tutorial => self.handle_tutorial_key(key),
        }
    }

    fn handle_title_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.menu_selection = self.menu_selection.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.menu_selection + 1 < TITLE_MENU_LEN {
                    self.menu_selection += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => match self.menu_selection {
                0 => self.open_difficulty_select(),
                1 => {
                    if self.session.player().is_guest() {
                        self.name_input.clear();
                        self.screen_state = ScreenState::SignIn;
                    } else {
                        self.sign_out();
                    }
                }
                2 => self.screen_state = ScreenState::Tutorial,
                3 => self.theme = self.theme.next(),
                _ => return AppAction::Quit,
            },
            KeyCode::Char('q') | KeyCode::Esc => return AppAction::Quit,
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_sign_in_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc => self.screen_state = ScreenState::Title,
            KeyCode::Enter => {
                let name = std::mem::take(&mut self.name_input);
                if self.sign_in(name.trim()) {
                    self.screen_state = ScreenState::Title;
                } else {
                    self.name_input = name;
                }
            }
            KeyCode::Backspace => {
                self.name_input.pop();
            }
            KeyCode::Char(c) if !c.is_control() => {
                if self.name_input.chars().count() < MAX_PLAYER_NAME {
                    self.name_input.push(c);
                }
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn open_difficulty_select(&mut self) {
        self.menu_selection = Difficulty::all()
            .iter()
            .position(|&d| d == self.difficulty)
            .unwrap_or(0);
        self.screen_state = ScreenState::DifficultySelect;
    }

    fn handle_difficulty_key(&mut self, key: KeyEvent) -> AppAction {
        let levels = Difficulty::all();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.menu_selection = self.menu_selection.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.menu_selection + 1 < levels.len() {
                    self.menu_selection += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(&difficulty) = levels.get(self.menu_selection) {
                    self.start_round(difficulty);
                }
            }
            KeyCode::Esc | KeyCode::Char('q') => {
                self.menu_selection = 0;
                self.screen_state = ScreenState::Title;
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn candidate_count(&self) -> usize {
        self.round
            .as_ref()
            .map_or(0, |r| r.puzzle().available_grids.len())
    }

    fn handle_game_key(&mut self, key: KeyEvent) -> AppAction {
        let count = self.candidate_count();
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.cursor + 1 < count {
                    self.cursor += 1;
                }
            }
            KeyCode::Char(' ') => self.toggle_candidate(self.cursor),
            KeyCode::Char(c @ '1'..='9') => {
                let index = (c as u8 - b'1') as usize;
                if index < count {
                    self.cursor = index;
                    self.toggle_candidate(index);
                }
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Char('r') => {
                if let Some(round) = self.round.as_mut() {
                    round.reset();
                    self.show_message("Selection cleared");
                }
            }
            KeyCode::Char('n') => self.start_round(self.difficulty),
            KeyCode::Char('t') => self.theme = self.theme.next(),
            KeyCode::Esc | KeyCode::Char('q') => self.open_difficulty_select(),
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_reveal_key(&mut self, key: KeyEvent) -> AppAction {
        let Some(reveal) = self.reveal.as_mut() else {
            self.screen_state = ScreenState::Playing;
            return AppAction::Continue;
        };

        if !reveal.is_finished() {
            reveal.skip();
            self.finish_reveal();
            return AppAction::Continue;
        }

        if reveal.verdict().is_solved() {
            match key.code {
                KeyCode::Enter | KeyCode::Char('n') | KeyCode::Char(' ') => {
                    self.start_round(self.difficulty)
                }
                KeyCode::Esc | KeyCode::Char('q') => {
                    self.confetti.clear();
                    self.open_difficulty_select();
                }
                _ => {}
            }
        } else {
            self.reveal = None;
            self.screen_state = ScreenState::Playing;
        }
        AppAction::Continue
    }

    fn handle_exhausted_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('r') if self.session.player().is_guest() => {
                self.session.reset_guest_ledger();
                info!("guest history cleared");
                self.start_round(self.difficulty);
            }
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => self.open_difficulty_select(),
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_tutorial_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => {
                self.screen_state = ScreenState::Title;
            }
            KeyCode::Char('p') => self.open_difficulty_select(),
            _ => {}
        }
        AppAction::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use tristack_core::{MemoryLedgerStore, PuzzleId};

    fn app_with_store() -> (App, Arc<MemoryLedgerStore>) {
        let store = Arc::new(MemoryLedgerStore::new());
        let app = App::with_backends(
            Catalog::bundled(),
            store.clone(),
            SessionConfig::default(),
            StdRng::seed_from_u64(7),
        );
        (app, store)
    }

    fn press(app: &mut App, code: KeyCode) -> AppAction {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn finish_reveal(app: &mut App) {
        while !app.reveal.as_ref().unwrap().is_finished() {
            app.tick();
        }
    }

    #[test]
    fn test_new_round_is_recorded_once() {
        let (mut app, _) = app_with_store();
        app.start_round(Difficulty::Easy);
        assert_eq!(app.screen_state, ScreenState::Playing);
        let id = app.round.as_ref().unwrap().puzzle().id.clone();

        // Reset and resubmit cycles stay in the same round
        for _ in 0..3 {
            press(&mut app, KeyCode::Char('1'));
            press(&mut app, KeyCode::Enter);
            press(&mut app, KeyCode::Char('r'));
        }
        assert_eq!(app.session.guest_ledger().len(), 1);
        assert!(app.session.guest_ledger().contains(&id));
    }

    #[test]
    fn test_solving_plays_reveal_and_celebrates() {
        let (mut app, _) = app_with_store();
        app.start_round(Difficulty::Easy);
        let solution = app.round.as_ref().unwrap().puzzle().solution_indices;

        for index in solution {
            app.toggle_candidate(index);
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen_state, ScreenState::Reveal);
        assert!(!app.reveal.as_ref().unwrap().is_finished());

        finish_reveal(&mut app);
        let reveal = app.reveal.as_ref().unwrap();
        assert!(reveal.is_finished());
        assert_eq!(reveal.verdict(), Verdict::Solved);
        assert_eq!(app.message.as_deref(), Some("Solved!"));

        // Another round of the same difficulty
        let first = app.round.as_ref().unwrap().puzzle().id.clone();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen_state, ScreenState::Playing);
        assert_ne!(app.round.as_ref().unwrap().puzzle().id, first);
    }

    #[test]
    fn test_key_skips_reveal_then_returns_to_play() {
        let (mut app, _) = app_with_store();
        app.start_round(Difficulty::Easy);
        let round = app.round.as_ref().unwrap();
        let wrong = (0..round.puzzle().available_grids.len())
            .filter(|i| !round.puzzle().solution_indices.contains(i))
            .take(1)
            .chain(round.puzzle().solution_indices.into_iter().take(2))
            .collect::<Vec<_>>();

        for index in wrong {
            app.toggle_candidate(index);
        }
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('x'));
        assert!(app.reveal.as_ref().unwrap().is_finished());
        assert!(!app.reveal.as_ref().unwrap().verdict().is_solved());

        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.screen_state, ScreenState::Playing);
        assert_eq!(app.round.as_ref().unwrap().selected().len(), 3);
    }

    #[test]
    fn test_wrong_count_stays_on_board() {
        let (mut app, _) = app_with_store();
        app.start_round(Difficulty::Easy);
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen_state, ScreenState::Playing);
        assert_eq!(app.message.as_deref(), Some("Pick exactly three grids"));
    }

    #[test]
    fn test_guest_exhaustion_and_reset() {
        let (mut app, store) = app_with_store();
        let total = Catalog::bundled().by_difficulty(Difficulty::Hard).count();
        for _ in 0..total {
            app.start_round(Difficulty::Hard);
            assert_eq!(app.screen_state, ScreenState::Playing);
        }
        app.start_round(Difficulty::Hard);
        assert_eq!(app.screen_state, ScreenState::Exhausted);
        assert_eq!(store.player_count(), 0);

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.screen_state, ScreenState::Playing);
        assert_eq!(app.session.guest_ledger().len(), 1);
    }

    #[test]
    fn test_sign_in_flow_persists_ledger() {
        let (mut app, store) = app_with_store();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen_state, ScreenState::SignIn);

        type_text(&mut app, "bad name");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen_state, ScreenState::SignIn);
        assert!(app.session.player().is_guest());

        app.name_input.clear();
        type_text(&mut app, "alice");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen_state, ScreenState::Title);
        assert_eq!(app.player_name(), "alice");
        assert_eq!(app.title_menu()[1], "Sign out");

        app.start_round(Difficulty::Medium);
        let id: PuzzleId = app.round.as_ref().unwrap().puzzle().id.clone();
        let alice = PlayerId::new("alice").unwrap();
        assert_eq!(store.get_recent_ids(&alice).unwrap(), vec![id]);
        assert!(app.session.guest_ledger().is_empty());
    }

    #[test]
    fn test_idle_player_is_signed_out() {
        let (mut app, _) = app_with_store();
        assert!(app.sign_in("bob"));
        let timeout = app.session.config().inactivity_timeout_ms;

        assert!(!app.expire_idle(timeout / 2));
        assert!(app.expire_idle(timeout * 2));
        assert!(app.session.player().is_guest());
        assert_eq!(app.message.as_deref(), Some("Signed out after inactivity"));
    }

    #[test]
    fn test_title_menu_and_quit() {
        let (mut app, _) = app_with_store();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen_state, ScreenState::Tutorial);
        app.tick();
        assert!(app.demo.is_some());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen_state, ScreenState::Title);
        assert!(matches!(press(&mut app, KeyCode::Char('q')), AppAction::Quit));
    }

    #[test]
    fn test_difficulty_picker() {
        let (mut app, _) = app_with_store();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen_state, ScreenState::DifficultySelect);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.difficulty, Difficulty::Hard);
        assert_eq!(app.screen_state, ScreenState::Playing);
    }
}
