//! Emoji Dash - a 15-second tap sprint
//!
//! Core modules:
//! - `sim`: Session state machine, timer and grid generation
//! - `card`: Share card layout and rasterization
//! - `platform`: Browser/native platform abstraction
//! - `settings`: Shell configuration loaded from JSON

pub mod card;
pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use card::{CardComposer, CardDownload, ShareCard};
pub use error::{Error, Result};
pub use settings::Settings;
pub use sim::{CardRequest, GameEvent, Session, SessionStatus, TapOutcome};

/// Game configuration constants
pub mod consts {
    /// Grid is GRID_SIZE x GRID_SIZE cells
    pub const GRID_SIZE: usize = 4;
    /// Length of one sprint
    pub const GAME_SECONDS: u32 = 15;
    /// Nicknames longer than this are truncated (in chars, not bytes)
    pub const MAX_NAME_CHARS: usize = 20;

    /// The symbol the player hunts for
    pub const TARGET: char = '⭐';
    /// Filler symbols; never contains TARGET
    pub const DECOYS: [char; 15] = [
        '😎', '🐸', '🐱', '🐼', '🦊', '🐯', '🐵', '🦄', '👻', '🤖', '💀', '🐨', '🐶', '🦁', '🐻',
    ];

    /// Share card canvas
    pub const CARD_WIDTH: u32 = 1080;
    pub const CARD_HEIGHT: u32 = 1350;
    pub const CARD_FILE_NAME: &str = "emoji_dash_card.png";
    pub const CARD_MIME: &str = "image/png";

    pub const TITLE: &str = "🎮 Emoji Dash — 15-Second Tap Sprint";
    pub const TAGLINE: &str = "Tap ⭐ as many times as you can in 15 seconds. Share your score!";
    pub const HOW_TO_PLAY: &str = "1) Enter a nickname. 2) Press Start. 3) Tap the ⭐ as fast as you can. \
                                   4) When time ends, generate a share card.";
}

/// Truncate a nickname to `MAX_NAME_CHARS` characters
pub fn truncate_name(raw: &str) -> String {
    raw.chars().take(consts::MAX_NAME_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoys_exclude_target() {
        assert!(!consts::DECOYS.contains(&consts::TARGET));
    }

    #[test]
    fn test_truncate_name_counts_chars() {
        assert_eq!(truncate_name("short"), "short");
        let long = "🦊".repeat(30);
        let cut = truncate_name(&long);
        assert_eq!(cut.chars().count(), consts::MAX_NAME_CHARS);
        assert_eq!(truncate_name(""), "");
    }
}
