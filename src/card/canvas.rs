//! Raster surface for the share card
//!
//! [`Surface`] is the minimal drawing API the composer needs. Rounded
//! rectangles go through [`draw_round_rect`], which falls back to bands and
//! pie slices when a surface has no native primitive.

use std::convert::Infallible;

use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};
use glam::{DVec2, Vec2};
use image::{Rgb, RgbImage};

use super::fonts::FontFace;
use super::geometry::{PieSlice, Rect, pixel_center, sd_rounded_box};

/// The surface has no native rounded rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unsupported;

/// Minimal 2D fill API
pub trait Surface {
    fn dimensions(&self) -> (u32, u32);

    fn fill_rect(&mut self, rect: Rect, color: Rgb<u8>);

    fn fill_pieslice(&mut self, slice: &PieSlice, color: Rgb<u8>);

    /// Native rounded rectangle, if the surface has one
    fn fill_rounded_rect(
        &mut self,
        _rect: Rect,
        _radius: f32,
        _color: Rgb<u8>,
    ) -> Result<(), Unsupported> {
        Err(Unsupported)
    }
}

/// Fill a rounded rectangle on any surface
pub fn draw_round_rect<S: Surface + ?Sized>(surface: &mut S, rect: Rect, radius: f32, color: Rgb<u8>) {
    if surface.fill_rounded_rect(rect, radius, color).is_ok() {
        return;
    }

    let parts = super::geometry::rounded_rect_parts(rect, radius);
    for band in parts.bands {
        surface.fill_rect(band, color);
    }
    for corner in &parts.corners {
        surface.fill_pieslice(corner, color);
    }
}

/// Optional drawing features of a [`Canvas`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasCaps {
    pub native_rounded_rect: bool,
}

impl Default for CanvasCaps {
    fn default() -> Self {
        Self {
            native_rounded_rect: true,
        }
    }
}

/// RGB pixel buffer. Writes outside the buffer are dropped.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbImage,
    caps: CanvasCaps,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb<u8>, caps: CanvasCaps) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, background),
            caps,
        }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    #[inline]
    fn put(&mut self, x: i32, y: i32, color: Rgb<u8>) {
        if x >= 0 && y >= 0 && (x as u32) < self.image.width() && (y as u32) < self.image.height() {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    /// Blend `color` over the pixel with the given coverage (0-1)
    fn blend(&mut self, x: i32, y: i32, color: Rgb<u8>, coverage: f32) {
        if x < 0 || y < 0 || x as u32 >= self.image.width() || y as u32 >= self.image.height() {
            return;
        }
        let a = coverage.clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        for (d, s) in dst.0.iter_mut().zip(color.0) {
            *d = (*d as f32 + (s as f32 - *d as f32) * a).round() as u8;
        }
    }

    /// Paint every pixel in `bounds` whose centre passes `inside`
    fn fill_where(&mut self, bounds: Rect, color: Rgb<u8>, inside: impl Fn(DVec2) -> bool) {
        let Some((x0, y0, x1, y1)) = bounds.pixel_bounds(self.image.width(), self.image.height())
        else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                if inside(pixel_center(x, y)) {
                    self.image.put_pixel(x, y, color);
                }
            }
        }
    }

    /// Draw one line of text with its top-left corner at `origin`
    pub fn draw_text(&mut self, origin: Vec2, text: &str, face: &FontFace, color: Rgb<u8>) {
        match face {
            FontFace::TrueType { font, px } => self.draw_truetype(origin, text, font, *px, color),
            FontFace::Builtin { font, magnify } => {
                self.draw_builtin(origin, text, *font, *magnify, color)
            }
        }
    }

    fn draw_truetype(&mut self, origin: Vec2, text: &str, font: &FontArc, px: f32, color: Rgb<u8>) {
        let scaled = font.as_scaled(PxScale::from(px));
        let mut caret = point(origin.x, origin.y + scaled.ascent());
        let mut previous: Option<GlyphId> = None;
        let right_edge = self.image.width() as f32;

        for c in text.chars().filter(|c| !c.is_control()) {
            let id = scaled.glyph_id(c);
            if let Some(previous) = previous {
                caret.x += scaled.kern(previous, id);
            }
            let glyph = id.with_scale_and_position(scaled.scale(), caret);
            caret.x += scaled.h_advance(id);
            previous = Some(id);

            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                let (left, top) = (bounds.min.x as i32, bounds.min.y as i32);
                outlined.draw(|gx, gy, coverage| {
                    self.blend(left + gx as i32, top + gy as i32, color, coverage);
                });
            }
            // Rest of the line is clipped anyway
            if caret.x > right_edge {
                break;
            }
        }
    }

    fn draw_builtin(
        &mut self,
        origin: Vec2,
        text: &str,
        font: &'static MonoFont<'static>,
        magnify: f32,
        color: Rgb<u8>,
    ) {
        let style = MonoTextStyle::new(font, Rgb888::new(color[0], color[1], color[2]));
        let mut target = Magnified {
            inner: self,
            origin,
            factor: magnify.max(1.0),
        };
        let Ok(_) = Text::with_baseline(text, Point::zero(), style, Baseline::Top).draw(&mut target);
    }
}

impl Surface for Canvas {
    fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb<u8>) {
        self.fill_where(rect, color, |p| rect.contains(p));
    }

    fn fill_pieslice(&mut self, slice: &PieSlice, color: Rgb<u8>) {
        self.fill_where(slice.bbox, color, |p| slice.contains(p));
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Rgb<u8>) -> Result<(), Unsupported> {
        if !self.caps.native_rounded_rect {
            return Err(Unsupported);
        }
        self.fill_where(rect, color, |p| sd_rounded_box(p, rect, radius) <= 0.0);
        Ok(())
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            self.put(p.x, p.y, Rgb([c.r(), c.g(), c.b()]));
        }
        Ok(())
    }
}

/// Draws every source pixel as a `factor`-sized block placed at `origin`.
///
/// Built-in bitmap fonts are tiny; this is how they are blown up to card size.
struct Magnified<'a, D> {
    inner: &'a mut D,
    origin: Vec2,
    factor: f32,
}

impl<D: OriginDimensions> OriginDimensions for Magnified<'_, D> {
    fn size(&self) -> Size {
        let inner = self.inner.size();
        Size::new(
            (inner.width as f32 / self.factor).ceil() as u32,
            (inner.height as f32 / self.factor).ceil() as u32,
        )
    }
}

impl<D> DrawTarget for Magnified<'_, D>
where
    D: DrawTarget<Color = Rgb888, Error = Infallible> + OriginDimensions,
{
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            let x0 = (self.origin.x + p.x as f32 * self.factor).round() as i32;
            let y0 = (self.origin.y + p.y as f32 * self.factor).round() as i32;
            let x1 = (self.origin.x + (p.x + 1) as f32 * self.factor).round() as i32;
            let y1 = (self.origin.y + (p.y + 1) as f32 * self.factor).round() as i32;
            if x1 <= x0 || y1 <= y0 {
                continue;
            }
            let block = Rectangle::new(
                Point::new(x0, y0),
                Size::new((x1 - x0) as u32, (y1 - y0) as u32),
            );
            self.inner.fill_solid(&block, c)?;
        }
        Ok(())
    }
}
