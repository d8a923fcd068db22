//! Font resolution for the share card
//!
//! Candidate sources are tried in order; the first one that yields all three
//! size tiers wins. When every source fails the built-in bitmap fonts are
//! used and the glyph scale is multiplied by [`FALLBACK_SCALE`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ab_glyph::{FontArc, InvalidFont};
use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_9X15, FONT_10X20};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Glyph scale multiplier applied when only the built-in fonts are left
pub const FALLBACK_SCALE: f32 = 2.5;

/// How deep to walk into font directories looking for a named file
const SEARCH_DEPTH: usize = 4;

/// Font file names tried by default, in order
pub const DEFAULT_FONT_NAMES: [&str; 5] = [
    "DejaVuSans.ttf",
    "arial.ttf",
    "Arial.ttf",
    "calibri.ttf",
    "Calibri.ttf",
];

/// Text size tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontTier {
    Large,
    Medium,
    Small,
}

impl FontTier {
    /// Nominal point size before scaling
    pub fn points(&self) -> f32 {
        match self {
            FontTier::Large => 100.0,
            FontTier::Medium => 60.0,
            FontTier::Small => 40.0,
        }
    }
}

/// Where to get a TrueType font from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FontSource {
    /// A file name, looked up as a path first and then in the font directories
    Named { name: String },
    /// An explicit file path
    Path { path: PathBuf },
    /// Font data already in memory (e.g. fetched by a browser shell)
    #[serde(skip)]
    Bytes(Arc<[u8]>),
}

impl FontSource {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named { name: name.into() }
    }

    pub fn label(&self) -> String {
        match self {
            FontSource::Named { name } => name.clone(),
            FontSource::Path { path } => path.display().to_string(),
            FontSource::Bytes(bytes) => format!("<{} bytes in memory>", bytes.len()),
        }
    }

    fn read(&self, dirs: &[PathBuf]) -> Result<Vec<u8>, FontLoadError> {
        match self {
            FontSource::Named { name } => {
                let direct = Path::new(name);
                let path = if direct.is_file() {
                    direct.to_path_buf()
                } else {
                    dirs.iter()
                        .find_map(|dir| find_file(dir, name, SEARCH_DEPTH))
                        .ok_or_else(|| FontLoadError::NotFound { name: name.clone() })?
                };
                read_file(&path)
            }
            FontSource::Path { path } => read_file(path),
            FontSource::Bytes(bytes) => Ok(bytes.to_vec()),
        }
    }
}

/// Why a single source was skipped. Never leaves this module except in logs.
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("font {name} not found")]
    NotFound { name: String },

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a usable font: {0}")]
    Invalid(#[from] InvalidFont),

    #[error("size {points}pt is too small to render")]
    BadSize { points: f32 },
}

fn read_file(path: &Path) -> Result<Vec<u8>, FontLoadError> {
    fs::read(path).map_err(|source| FontLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Depth-limited search for a file called `name` under `dir`
fn find_file(dir: &Path, name: &str, depth: usize) -> Option<PathBuf> {
    let candidate = dir.join(name);
    if candidate.is_file() {
        return Some(candidate);
    }
    if depth == 0 {
        return None;
    }
    let mut subdirs: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    // Stable order across platforms
    subdirs.sort();
    subdirs
        .iter()
        .find_map(|sub| find_file(sub, name, depth - 1))
}

/// Platform font folders searched for named sources
pub fn default_font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    let home = std::env::var_os("HOME").map(PathBuf::from);

    if cfg!(target_os = "windows") {
        let windir = std::env::var_os("WINDIR").unwrap_or_else(|| "C:\\Windows".into());
        dirs.push(PathBuf::from(windir).join("Fonts"));
    } else if cfg!(target_os = "macos") {
        dirs.push(PathBuf::from("/Library/Fonts"));
        dirs.push(PathBuf::from("/System/Library/Fonts"));
        if let Some(home) = &home {
            dirs.push(home.join("Library/Fonts"));
        }
    } else {
        dirs.push(PathBuf::from("/usr/share/fonts"));
        dirs.push(PathBuf::from("/usr/local/share/fonts"));
        if let Some(home) = &home {
            dirs.push(home.join(".local/share/fonts"));
            dirs.push(home.join(".fonts"));
        }
    }
    dirs
}

/// Default candidate list
pub fn default_font_sources() -> Vec<FontSource> {
    DEFAULT_FONT_NAMES.iter().map(|n| FontSource::named(*n)).collect()
}

/// A font at one size
#[derive(Clone)]
pub enum FontFace {
    /// Outline font rendered at `px` pixels
    TrueType { font: FontArc, px: f32 },
    /// Built-in bitmap font, each pixel drawn `magnify` pixels wide
    Builtin {
        font: &'static MonoFont<'static>,
        magnify: f32,
    },
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontFace::TrueType { px, .. } => f.debug_struct("TrueType").field("px", px).finish(),
            FontFace::Builtin { font, magnify } => f
                .debug_struct("Builtin")
                .field("cell", &(font.character_size.width, font.character_size.height))
                .field("magnify", magnify)
                .finish(),
        }
    }
}

impl FontFace {
    pub fn is_builtin(&self) -> bool {
        matches!(self, FontFace::Builtin { .. })
    }
}

/// The three text tiers used on a card
#[derive(Debug, Clone)]
pub struct FontSet {
    pub large: FontFace,
    pub medium: FontFace,
    pub small: FontFace,
    /// Scale the glyphs were resolved at (includes the fallback multiplier)
    pub scale: f32,
    /// Which source won, for logs and card metadata
    pub source: String,
}

impl FontSet {
    /// Try `sources` in order, falling back to the built-in fonts.
    ///
    /// Never fails.
    pub fn resolve(sources: &[FontSource], dirs: &[PathBuf], scale: f32) -> Self {
        sources
            .iter()
            .find_map(|source| match Self::load(source, dirs, scale) {
                Ok(set) => {
                    log::debug!("Using font {}", set.source);
                    Some(set)
                }
                Err(err) => {
                    log::debug!("Skipping font {}: {}", source.label(), err);
                    None
                }
            })
            .unwrap_or_else(|| {
                log::warn!(
                    "No font source usable ({} tried), using built-in font",
                    sources.len()
                );
                Self::builtin(scale * FALLBACK_SCALE)
            })
    }

    /// Load all three tiers from one source
    pub fn load(source: &FontSource, dirs: &[PathBuf], scale: f32) -> Result<Self, FontLoadError> {
        let font = FontArc::try_from_vec(source.read(dirs)?)?;
        let face = |tier: FontTier| -> Result<FontFace, FontLoadError> {
            let px = (tier.points() * scale).floor();
            if px.is_nan() || px < 1.0 {
                return Err(FontLoadError::BadSize {
                    points: tier.points() * scale,
                });
            }
            Ok(FontFace::TrueType {
                font: font.clone(),
                px,
            })
        };

        Ok(Self {
            large: face(FontTier::Large)?,
            medium: face(FontTier::Medium)?,
            small: face(FontTier::Small)?,
            scale,
            source: source.label(),
        })
    }

    /// Built-in bitmap fonts magnified by `scale`
    pub fn builtin(scale: f32) -> Self {
        let face = |font: &'static MonoFont<'static>| FontFace::Builtin {
            font,
            magnify: scale,
        };
        Self {
            large: face(&FONT_10X20),
            medium: face(&FONT_9X15),
            small: face(&FONT_6X10),
            scale,
            source: "built-in".to_string(),
        }
    }

    pub fn face(&self, tier: FontTier) -> &FontFace {
        match tier {
            FontTier::Large => &self.large,
            FontTier::Medium => &self.medium,
            FontTier::Small => &self.small,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.large.is_builtin()
    }
}

/// DejaVu Sans, checked in under `tests/fonts`
#[cfg(test)]
pub(crate) fn test_font() -> FontSource {
    static DEJAVU: &[u8] = include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fonts/DejaVuSans.ttf"));
    FontSource::Bytes(Arc::from(DEJAVU))
}
