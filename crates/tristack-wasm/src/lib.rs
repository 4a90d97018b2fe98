//! WebAssembly build of Tristack
//!
//! Draws the game on a canvas and keeps signed-in players' recent puzzles in
//! `localStorage`. Guests keep theirs only for the life of the page.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tristack_core::{Catalog, Difficulty, SessionConfig};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, KeyboardEvent};

mod game;
mod render;
mod storage;
mod theme;

// WASM tests require wasm-pack test to run
#[cfg(all(test, target_arch = "wasm32"))]
mod tests;

pub use game::{GameSnapshot, GameState, ScreenState};
pub use storage::LocalStorageLedgerStore;
pub use theme::Theme;

// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    wasm_logger::init(wasm_logger::Config::new(log::Level::Info));
}

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// The main WASM game controller
#[wasm_bindgen]
pub struct TristackGame {
    state: GameState,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    theme: Theme,
    layout: render::Layout,
    dpr: f64, // Device pixel ratio for crisp rendering
}

#[wasm_bindgen]
impl TristackGame {
    /// Create a new game attached to a canvas element
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<TristackGame, JsValue> {
        let document = web_sys::window()
            .ok_or("No window")?
            .document()
            .ok_or("No document")?;

        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("Canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        let ctx = canvas
            .get_context("2d")?
            .ok_or("Failed to get 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);

        let ledgers = Arc::new(LocalStorageLedgerStore::default());
        if !tristack_core::LedgerStore::is_available(ledgers.as_ref()) {
            log::warn!("localStorage unavailable, signed-in history will not be kept");
        }

        let state = GameState::new(
            Catalog::bundled(),
            ledgers,
            SessionConfig::default(),
            StdRng::from_entropy(),
            now_ms(),
        );

        let mut game = TristackGame {
            state,
            canvas,
            ctx,
            theme: Theme::dark(),
            layout: render::Layout::new(900, 640),
            dpr,
        };
        game.resize(900, 640);
        Ok(game)
    }

    /// Handle keyboard input. Returns true if the key was used.
    #[wasm_bindgen]
    pub fn handle_key(&mut self, event: &KeyboardEvent) -> bool {
        let handled = self.state.handle_key(&event.key(), now_ms());
        self.render();
        handled
    }

    /// Update game state (call from requestAnimationFrame)
    #[wasm_bindgen]
    pub fn tick(&mut self) {
        self.state.tick(now_ms());
        self.render();
    }

    /// Sign in. Returns an error message for rejected names.
    #[wasm_bindgen]
    pub fn sign_in(&mut self, name: &str) -> Result<(), JsValue> {
        let result = self
            .state
            .sign_in(name, now_ms())
            .map_err(|e| JsValue::from_str(&e.to_string()));
        self.render();
        result
    }

    #[wasm_bindgen]
    pub fn sign_out(&mut self) {
        self.state.sign_out(now_ms());
        self.render();
    }

    /// Start a round of the given difficulty ("easy", "medium", "hard")
    #[wasm_bindgen]
    pub fn new_round(&mut self, difficulty: &str) -> Result<(), JsValue> {
        let difficulty: Difficulty = difficulty
            .parse()
            .map_err(|e: tristack_core::ParseDifficultyError| JsValue::from_str(&e.to_string()))?;
        self.state.start_round(difficulty, now_ms());
        self.render();
        Ok(())
    }

    /// Toggle a candidate grid by index
    #[wasm_bindgen]
    pub fn toggle(&mut self, index: usize) {
        self.state.toggle(index, now_ms());
        self.render();
    }

    /// Submit the selection; returns the verdict as a JS object
    #[wasm_bindgen]
    pub fn submit(&mut self) -> Result<JsValue, JsValue> {
        let verdict = self.state.submit(now_ms());
        self.render();
        Ok(serde_wasm_bindgen::to_value(&verdict)?)
    }

    /// Forget the guest's played puzzles
    #[wasm_bindgen]
    pub fn reset_guest_history(&mut self) {
        self.state.reset_guest_history(now_ms());
        self.render();
    }

    /// Set the color theme
    #[wasm_bindgen]
    pub fn set_theme(&mut self, theme_name: &str) {
        self.theme = Theme::by_name(theme_name);
        self.render();
    }

    /// Current state as a JS object
    #[wasm_bindgen]
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.state.snapshot())?)
    }

    /// Current state as JSON
    #[wasm_bindgen]
    pub fn get_state_json(&self) -> String {
        serde_json::to_string(&self.state.snapshot()).unwrap_or_default()
    }

    /// Resize the game canvas
    #[wasm_bindgen]
    pub fn resize(&mut self, width: u32, height: u32) {
        let width = width.max(480);
        let height = height.max(400);

        // Update dpr in case it changed (e.g., moving to different monitor)
        self.dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);

        self.canvas.set_width((width as f64 * self.dpr) as u32);
        self.canvas.set_height((height as f64 * self.dpr) as u32);

        let html_element: &HtmlElement = self.canvas.as_ref();
        let style = html_element.style();
        let _ = style.set_property("width", &format!("{}px", width));
        let _ = style.set_property("height", &format!("{}px", height));

        let _ = self.ctx.reset_transform();
        let _ = self.ctx.scale(self.dpr, self.dpr);

        self.layout = render::Layout::new(width, height);
        self.render();
    }

    fn render(&self) {
        render::render_game(&self.ctx, &self.state, &self.theme, &self.layout);
    }
}
