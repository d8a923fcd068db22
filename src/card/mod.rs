//! Share card composer
//!
//! Lays out and rasterizes the end-of-sprint summary image. Composition is a
//! pure function of a [`CardRequest`] snapshot and always produces an image;
//! missing fonts only degrade text quality.

pub mod canvas;
pub mod fonts;
pub mod geometry;

use std::io::Cursor;
use std::path::{Path, PathBuf};

use glam::Vec2;
use image::{ImageFormat, Rgb, RgbImage};

pub use canvas::{Canvas, CanvasCaps, Surface, draw_round_rect};
pub use fonts::{FontFace, FontSet, FontSource, FontTier};
pub use geometry::{PieSlice, Rect, RoundedRectParts, rounded_rect_parts};

use crate::consts::{CARD_FILE_NAME, CARD_HEIGHT, CARD_MIME, CARD_WIDTH};
use crate::error::{Error, Result};
use crate::sim::CardRequest;

/// Height the layout coordinates are written against
pub const BASE_HEIGHT: f32 = 1350.0;

pub const BACKGROUND: Rgb<u8> = Rgb([10, 10, 10]);

mod palette {
    use image::Rgb;

    pub const HEADER: Rgb<u8> = Rgb([30, 30, 30]);
    pub const BODY: Rgb<u8> = Rgb([25, 25, 25]);
    pub const FOOTER: Rgb<u8> = Rgb([30, 30, 30]);

    pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    pub const SUBTITLE: Rgb<u8> = Rgb([200, 200, 200]);
    pub const SCORE: Rgb<u8> = Rgb([255, 230, 90]);
    pub const CAPTION: Rgb<u8> = Rgb([210, 210, 210]);
    pub const CAPTION_DIM: Rgb<u8> = Rgb([160, 160, 160]);
}

/// Panel margin from the canvas edge
const MARGIN: f32 = 40.0;
/// Text inset from the canvas edge
const TEXT_X: f32 = 70.0;
const CORNER_RADIUS: f32 = 40.0;

/// One line of text placed on a panel
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    /// Top-left of the line in canvas pixels
    pub position: Vec2,
    pub tier: FontTier,
    pub color: Rgb<u8>,
}

/// A filled rounded rectangle and the text drawn on it
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub rect: Rect,
    pub corner_radius: f32,
    pub fill: Rgb<u8>,
    pub lines: Vec<TextLine>,
}

/// Header, body and footer panels for a `width` x `height` card.
///
/// Vertical positions scale with `height / BASE_HEIGHT`, truncated to whole
/// pixels. Panels are independent of each other and of the fonts.
pub fn layout(width: u32, height: u32, request: &CardRequest) -> Vec<Panel> {
    let scale = height as f32 / BASE_HEIGHT;
    let (w, h) = (width as f32, height as f32);
    let y = |v: f32| (v * scale).floor();
    let line = |text: String, top: f32, tier: FontTier, color: Rgb<u8>| TextLine {
        text,
        position: Vec2::new(TEXT_X, top),
        tier,
        color,
    };
    let radius = y(CORNER_RADIUS);
    let name = if request.name.is_empty() {
        "Anon"
    } else {
        request.name.as_str()
    };

    vec![
        Panel {
            rect: Rect::from_corners(MARGIN, MARGIN, w - MARGIN, y(300.0)),
            corner_radius: radius,
            fill: palette::HEADER,
            lines: vec![
                line("🎮 Emoji Dash".into(), 70.0, FontTier::Large, palette::WHITE),
                line(
                    "15-Second Tap Sprint".into(),
                    y(180.0),
                    FontTier::Medium,
                    palette::SUBTITLE,
                ),
            ],
        },
        Panel {
            rect: Rect::from_corners(MARGIN, y(330.0), w - MARGIN, y(880.0)),
            corner_radius: radius,
            fill: palette::BODY,
            lines: vec![
                line(format!("Player: {name}"), y(380.0), FontTier::Medium, palette::WHITE),
                line(
                    format!("⭐ Taps: {}", request.score),
                    y(500.0),
                    FontTier::Large,
                    palette::SCORE,
                ),
                line(
                    "Think you're faster? Tap the ⭐ and beat my score.".into(),
                    y(640.0),
                    FontTier::Small,
                    palette::CAPTION,
                ),
                line(
                    "Play now: (add your game link in caption/bio)".into(),
                    y(700.0),
                    FontTier::Small,
                    palette::CAPTION_DIM,
                ),
            ],
        },
        Panel {
            rect: Rect::from_corners(MARGIN, y(930.0), w - MARGIN, h - MARGIN),
            corner_radius: radius,
            fill: palette::FOOTER,
            lines: vec![line(
                "Screenshot & share to Instagram Stories/Reels • Tag your friends".into(),
                y(960.0),
                FontTier::Small,
                palette::SUBTITLE,
            )],
        },
    ]
}

/// Finished card. Immutable; compose a new one to change it.
#[derive(Debug, Clone)]
pub struct ShareCard {
    pub width: u32,
    pub height: u32,
    pub panels: Vec<Panel>,
    /// Font source that won resolution ("built-in" on fallback)
    pub font_source: String,
    /// Glyph scale actually used (2.5x layout scale on fallback)
    pub glyph_scale: f32,
    pub image: RgbImage,
}

/// Encoded card ready to hand to a download or share target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDownload {
    pub file_name: &'static str,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ShareCard {
    /// Encode as PNG
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        self.image.write_to(&mut buf, ImageFormat::Png)?;
        Ok(buf.into_inner())
    }

    pub fn download(&self) -> Result<CardDownload> {
        Ok(CardDownload {
            file_name: CARD_FILE_NAME,
            mime: CARD_MIME,
            bytes: self.to_png()?,
        })
    }

    /// Write the PNG to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_png()?;
        std::fs::write(path, &bytes).map_err(|e| Error::io(path, e))?;
        log::info!("Share card written to {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

/// Renders share cards at a fixed resolution
#[derive(Debug, Clone)]
pub struct CardComposer {
    pub width: u32,
    pub height: u32,
    /// Font candidates, tried in order
    pub sources: Vec<FontSource>,
    /// Folders searched for named font sources
    pub font_dirs: Vec<PathBuf>,
    pub caps: CanvasCaps,
}

impl Default for CardComposer {
    fn default() -> Self {
        Self {
            width: CARD_WIDTH,
            height: CARD_HEIGHT,
            sources: fonts::default_font_sources(),
            font_dirs: fonts::default_font_dirs(),
            caps: CanvasCaps::default(),
        }
    }
}

impl CardComposer {
    /// Composer that never touches the filesystem and uses the built-in font
    pub fn builtin_only() -> Self {
        Self {
            sources: Vec::new(),
            font_dirs: Vec::new(),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Layout scale (`height / 1350`)
    pub fn scale(&self) -> f32 {
        self.height as f32 / BASE_HEIGHT
    }

    /// Render a card. Never fails.
    pub fn compose(&self, request: &CardRequest) -> ShareCard {
        // Requests built by hand may skip the boundary truncation
        let request = CardRequest::new(&request.name, request.score);
        let fonts = FontSet::resolve(&self.sources, &self.font_dirs, self.scale());
        let panels = layout(self.width, self.height, &request);

        let mut canvas = Canvas::new(self.width, self.height, BACKGROUND, self.caps);
        for panel in &panels {
            draw_round_rect(&mut canvas, panel.rect, panel.corner_radius, panel.fill);
            for line in &panel.lines {
                canvas.draw_text(line.position, &line.text, fonts.face(line.tier), line.color);
            }
        }
        log::debug!(
            "Composed {}x{} card for {:?} (score {}, font {})",
            self.width,
            self.height,
            request.name,
            request.score,
            fonts.source
        );

        ShareCard {
            width: self.width,
            height: self.height,
            panels,
            font_source: fonts.source,
            glyph_scale: fonts.scale,
            image: canvas.into_image(),
        }
    }

    /// Convenience wrapper around [`compose`](Self::compose)
    pub fn compose_for(&self, name: &str, score: u32) -> ShareCard {
        self.compose(&CardRequest::new(name, score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_geometry_at_base_size() {
        let panels = layout(1080, 1350, &CardRequest::new("Kit", 12));
        assert_eq!(panels.len(), 3);

        assert_eq!(panels[0].rect, Rect::from_corners(40.0, 40.0, 1040.0, 300.0));
        assert_eq!(panels[1].rect, Rect::from_corners(40.0, 330.0, 1040.0, 880.0));
        assert_eq!(panels[2].rect, Rect::from_corners(40.0, 930.0, 1040.0, 1310.0));
        assert!(panels.iter().all(|p| p.corner_radius == 40.0));

        let body = &panels[1].lines;
        assert_eq!(body[0].text, "Player: Kit");
        assert_eq!(body[1].text, "⭐ Taps: 12");
        assert_eq!(body[1].color, Rgb([255, 230, 90]));
        assert_eq!(body[1].tier, FontTier::Large);
        assert_eq!(body[1].position, Vec2::new(70.0, 500.0));
        assert!(body.iter().any(|l| l.text == "Play now: (add your game link in caption/bio)"));
    }

    #[test]
    fn test_layout_scales_vertically() {
        let panels = layout(1080, 675, &CardRequest::new("", 0));
        assert_eq!(panels[0].rect.max.y, 150.0);
        assert_eq!(panels[1].rect.min.y, 165.0);
        assert_eq!(panels[0].corner_radius, 20.0);
        assert_eq!(panels[1].lines[0].text, "Player: Anon");
    }

    #[test]
    fn test_fallback_card_keeps_canvas_size() {
        let card = CardComposer::builtin_only().compose_for("Kit", 7);
        assert_eq!((card.width, card.height), (1080, 1350));
        assert_eq!(card.image.dimensions(), (1080, 1350));
        assert_eq!(card.font_source, "built-in");
        assert_eq!(card.glyph_scale, 2.5);
        // Panel geometry does not follow the glyph multiplier
        assert_eq!(card.panels[2].rect.max.y, 1310.0);
    }

    #[test]
    fn test_card_pixels() {
        let card = CardComposer::builtin_only().compose_for("Kit", 7);
        // Outside every panel
        assert_eq!(*card.image.get_pixel(5, 5), BACKGROUND);
        assert_eq!(*card.image.get_pixel(540, 315), BACKGROUND);
        // Rounded corner stays background
        assert_eq!(*card.image.get_pixel(41, 41), BACKGROUND);
        // Panel fills
        assert_eq!(*card.image.get_pixel(1000, 250), palette::HEADER);
        assert_eq!(*card.image.get_pixel(1000, 850), palette::BODY);
        assert_eq!(*card.image.get_pixel(1000, 1300), palette::FOOTER);
        // Score line put some yellow on the body panel
        let yellow = card
            .image
            .enumerate_pixels()
            .filter(|(_, y, p)| (500..640).contains(y) && **p == palette::SCORE)
            .count();
        assert!(yellow > 0);
    }

    #[test]
    fn test_truetype_card() {
        let composer = CardComposer {
            sources: vec![fonts::test_font()],
            font_dirs: Vec::new(),
            ..CardComposer::default()
        };
        let card = composer.compose_for("Kit", 7);

        assert_ne!(card.font_source, "built-in");
        assert_eq!(card.glyph_scale, 1.0);
        assert_eq!(card.image.dimensions(), (1080, 1350));

        let yellow: Vec<u32> = card
            .image
            .enumerate_pixels()
            .filter(|(_, _, p)| **p == palette::SCORE)
            .map(|(_, y, _)| y)
            .collect();
        assert!(yellow.iter().any(|y| (500..640).contains(y)));
        // Score text stays inside the body panel
        assert!(yellow.iter().all(|y| (330..880).contains(y)));
        assert_eq!(*card.image.get_pixel(1000, 850), palette::BODY);
    }

    #[test]
    fn test_any_name_or_score_fits_canvas() {
        let composer = CardComposer::builtin_only();
        for (name, score) in [
            ("", 0),
            ("W".repeat(200).as_str(), u32::MAX),
            ("🦊🦊🦊 ünïcödé", 1_000_000),
        ] {
            let card = composer.compose_for(name, score);
            assert_eq!(card.image.dimensions(), (1080, 1350));
        }
    }

    #[test]
    fn test_compose_truncates_unchecked_requests() {
        let request = CardRequest {
            name: "x".repeat(50),
            score: 3,
        };
        let card = CardComposer::builtin_only().compose(&request);
        assert_eq!(card.panels[1].lines[0].text, format!("Player: {}", "x".repeat(20)));
    }

    #[test]
    fn test_fallback_surface_renders_same_card() {
        let native = CardComposer::builtin_only().compose_for("Kit", 3);
        let manual = CardComposer {
            caps: CanvasCaps {
                native_rounded_rect: false,
            },
            ..CardComposer::builtin_only()
        }
        .compose_for("Kit", 3);
        assert!(native.image == manual.image);
    }

    #[test]
    fn test_alternate_resolution() {
        let card = CardComposer::builtin_only()
            .with_size(540, 675)
            .compose_for("Kit", 3);
        assert_eq!(card.image.dimensions(), (540, 675));
        assert_eq!(card.glyph_scale, 1.25);
    }

    #[test]
    fn test_png_download() {
        let card = CardComposer::builtin_only().compose_for("Kit", 9);
        let download = card.download().unwrap();

        assert_eq!(download.file_name, "emoji_dash_card.png");
        assert_eq!(download.mime, "image/png");
        assert_eq!(&download.bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory_with_format(&download.bytes, ImageFormat::Png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1080, 1350));
    }

    #[test]
    fn test_save_to_bad_path_is_an_error() {
        let card = CardComposer::builtin_only().with_size(64, 80).compose_for("", 0);
        let err = card
            .save(Path::new("/nonexistent/dir/emoji_dash_card.png"))
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
