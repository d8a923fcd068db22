//! Browser bindings
//!
//! JavaScript owns the widgets (grid buttons, nickname box, download link) and
//! calls into [`EmojiDash`] on every event. A `setInterval` of one second or
//! faster should call `tick()` while the sprint runs.

use std::sync::Arc;

use wasm_bindgen::prelude::*;

use crate::card::{CardComposer, FontSource};
use crate::consts::{CARD_FILE_NAME, CARD_MIME};
use crate::platform::now_secs;
use crate::sim::{EventOutcome, GameEvent, Session, TapOutcome};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Emoji Dash (web) ready");
}

/// One browser session
#[wasm_bindgen]
pub struct EmojiDash {
    session: Session,
    composer: CardComposer,
}

#[wasm_bindgen]
impl EmojiDash {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let seed = js_sys::Date::now() as u64 ^ rand::random::<u64>();
        Self {
            session: Session::new(seed),
            // No filesystem in the browser; fonts arrive through add_font
            composer: CardComposer::builtin_only(),
        }
    }

    /// Returns false if a sprint is already running
    pub fn start(&mut self) -> bool {
        self.session.handle(GameEvent::Start, now_secs()) == EventOutcome::Started
    }

    /// 1 = hit, 0 = miss, -1 = rejected
    pub fn tap(&mut self, cell: usize) -> i32 {
        match self.session.handle(GameEvent::Tap(cell), now_secs()) {
            EventOutcome::Tapped(TapOutcome::Hit) => 1,
            EventOutcome::Tapped(TapOutcome::Miss) => 0,
            _ => -1,
        }
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// True when this call ended the sprint
    pub fn tick(&mut self) -> bool {
        self.session.tick(now_secs())
    }

    pub fn remaining(&self) -> u32 {
        self.session.remaining_seconds(now_secs())
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn rounds(&self) -> u32 {
        self.session.round_count
    }

    pub fn status(&self) -> String {
        self.session.status.as_str().to_string()
    }

    /// Grid symbols in row-major order
    pub fn grid(&self) -> Vec<String> {
        self.session.grid.iter().map(|c| c.symbol.to_string()).collect()
    }

    pub fn set_name(&mut self, name: &str) {
        self.session.set_player_name(name);
    }

    pub fn name(&self) -> String {
        self.session.player_name.clone()
    }

    /// Register TrueType data fetched by the page; tried before older fonts
    pub fn add_font(&mut self, bytes: Vec<u8>) {
        self.composer.sources.insert(0, FontSource::Bytes(Arc::from(bytes)));
    }

    /// PNG bytes of a share card for the current name and score
    pub fn card_png(&self) -> Result<Vec<u8>, JsValue> {
        let card = self.composer.compose(&self.session.card_request());
        card.to_png().map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn card_file_name(&self) -> String {
        CARD_FILE_NAME.to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn card_mime(&self) -> String {
        CARD_MIME.to_string()
    }

    /// Full session state as JSON
    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Default for EmojiDash {
    fn default() -> Self {
        Self::new()
    }
}
