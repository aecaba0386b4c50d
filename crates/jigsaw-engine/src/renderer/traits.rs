//! Drawing-surface contract for render backends.
//!
//! The render pipeline only ever talks to a `DrawSurface`. Backends in this
//! crate are `RecordingSurface` (headless command log) and `MeshSurface`
//! (lyon tessellation into textured triangles); the web crate adds a Canvas2D
//! implementation.

use glam::Vec2;
use crate::api::config::Viewport;
use crate::core::rect::Rect;
use crate::systems::outline::OutlinePath;

/// RGBA color, components in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from RGBA u8 values, with alpha given as 0.0 - 1.0
    /// the way CSS `rgba()` does.
    pub fn rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a,
        }
    }

    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba8(r, g, b, 1.0)
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// CSS color string, e.g. `rgba(255,20,147,0.3)`.
    pub fn to_css(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "rgba({},{},{},{})",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            self.a.clamp(0.0, 1.0)
        )
    }

    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Line style for `DrawSurface::stroke_path`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f32,
    /// `[on, off]` dash lengths; `None` for a solid line.
    pub dash: Option<[f32; 2]>,
}

impl StrokeStyle {
    pub const fn solid(color: Color, width: f32) -> Self {
        Self { color, width, dash: None }
    }

    pub const fn dashed(color: Color, width: f32, on: f32, off: f32) -> Self {
        Self { color, width, dash: Some([on, off]) }
    }
}

/// Drop shadow under a piece that is not yet locked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Color,
    pub blur: f32,
    pub offset: Vec2,
}

/// Minimal capability set a render backend must provide.
///
/// Every path argument is in piece-local coordinates and is drawn translated
/// by `offset`. Rects passed to `draw_clipped_image` are `src` in image pixel
/// space and `dst` in the same local space as the path.
pub trait DrawSurface {
    /// Whether the source image can be sampled yet.
    fn image_ready(&self) -> bool;

    /// Clear the whole surface.
    fn clear(&mut self, viewport: Viewport);

    /// Draw the `src` region of the source image into `dst`, clipped to `path`.
    fn draw_clipped_image(&mut self, path: &OutlinePath, offset: Vec2, src: Rect, dst: Rect);

    fn stroke_path(&mut self, path: &OutlinePath, offset: Vec2, style: &StrokeStyle);

    fn fill_path(&mut self, path: &OutlinePath, offset: Vec2, color: Color);

    /// Shadow applied to subsequent image and fill draws. Backends without
    /// shadow support ignore it.
    fn set_shadow(&mut self, _shadow: Option<Shadow>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_round_trip_of_guide_color() {
        let guide = Color::rgba8(255, 20, 147, 0.3);
        assert_eq!(guide.to_css(), "rgba(255,20,147,0.3)");
    }

    #[test]
    fn stroke_constructors() {
        let dashed = StrokeStyle::dashed(Color::WHITE, 2.0, 5.0, 5.0);
        assert_eq!(dashed.dash, Some([5.0, 5.0]));
        assert_eq!(StrokeStyle::solid(Color::BLACK, 1.0).dash, None);
    }
}
