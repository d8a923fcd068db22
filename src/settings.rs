//! Shell settings
//!
//! Persisted as JSON next to the binary (or wherever the caller points).
//! Game rules are constants; only presentation and output live here.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::card::fonts::{self, FontSource};
use crate::card::{CanvasCaps, CardComposer};
use crate::consts::CARD_FILE_NAME;
use crate::error::{Error, Result};

/// Shell settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Nickname pre-filled for the share card
    pub player_name: String,
    /// Fixed RNG seed (random when absent)
    pub seed: Option<u64>,

    // === Share card ===
    /// Font candidates, tried in order
    pub font_sources: Vec<FontSource>,
    /// Folders searched for named fonts
    pub font_dirs: Vec<PathBuf>,
    /// Draw rounded panels with the native primitive
    pub native_rounded_rect: bool,
    /// Where `card` writes the PNG by default
    pub card_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: String::new(),
            seed: None,

            font_sources: fonts::default_font_sources(),
            font_dirs: fonts::default_font_dirs(),
            native_rounded_rect: true,
            card_path: PathBuf::from(CARD_FILE_NAME),
        }
    }
}

impl Settings {
    /// Default settings file name
    pub const FILE_NAME: &'static str = "emoji_dash.json";

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load, or log why not and use defaults
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(Error::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(err) => {
                log::warn!("Ignoring settings: {}", err);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| Error::io(path, e))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Card composer configured from these settings
    pub fn composer(&self) -> CardComposer {
        CardComposer {
            sources: self.font_sources.clone(),
            font_dirs: self.font_dirs.clone(),
            caps: CanvasCaps {
                native_rounded_rect: self.native_rounded_rect,
            },
            ..CardComposer::default()
        }
    }

    /// Configured seed, or a fresh random one
    pub fn seed_or_random(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}
