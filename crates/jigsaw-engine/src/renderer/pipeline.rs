//! Frame composition.
//!
//! Paint order: clear, dashed guide around the solved rectangle, locked
//! pieces, then loose pieces by ascending pick order so the most recently
//! touched piece ends up on top. Each piece is the source image clipped to
//! its outline, or a placeholder fill while the image is not ready, followed
//! by a thin translucent border.

use glam::Vec2;
use crate::api::config::Viewport;
use crate::assets::catalog::ImageSize;
use crate::components::piece::Piece;
use crate::core::pieces::PieceSet;
use crate::core::rect::Rect;
use crate::systems::outline::OutlinePath;
use super::traits::{Color, DrawSurface, Shadow, StrokeStyle};

/// Extra image sampled around each cell so tabs show real content, as a
/// fraction of the larger piece side.
pub const IMAGE_TAB_MARGIN: f32 = 0.5;

/// Everything the pipeline reads to draw one frame.
#[derive(Clone, Copy)]
pub struct FrameView<'a> {
    pub viewport: Viewport,
    /// `None` until a level has been laid out.
    pub puzzle_rect: Option<Rect>,
    pub pieces: &'a PieceSet,
    /// Source image size, once decoded.
    pub image: Option<ImageSize>,
}

pub fn guide_style() -> StrokeStyle {
    StrokeStyle::dashed(Color::rgba8(255, 20, 147, 0.3), 2.0, 5.0, 5.0)
}

pub fn border_style() -> StrokeStyle {
    StrokeStyle::solid(Color::WHITE.with_alpha(0.4), 1.0)
}

pub fn placeholder_color() -> Color {
    Color::rgb8(0xff, 0x69, 0xb4)
}

pub fn loose_shadow() -> Shadow {
    Shadow {
        color: Color::BLACK.with_alpha(0.3),
        blur: 10.0,
        offset: Vec2::new(2.0, 2.0),
    }
}

/// Piece indices in paint order: by layer, then ascending pick order, then
/// storage order. Hit testing walks loose pieces in exactly the reverse.
pub fn draw_order(pieces: &PieceSet) -> Vec<usize> {
    let slice = pieces.as_slice();
    let mut order: Vec<usize> = (0..slice.len()).collect();
    order.sort_by_key(|&i| (slice[i].layer(), slice[i].pick_order, i));
    order
}

/// Image region for `piece` in image pixels, and where it lands in
/// piece-local coordinates. Both include the tab margin.
pub fn image_mapping(piece: &Piece, puzzle: Rect, image: ImageSize) -> (Rect, Rect) {
    let size = piece.size();
    let scale = Vec2::new(image.width / puzzle.w, image.height / puzzle.h);
    let origin = Vec2::new(piece.col() as f32, piece.row() as f32) * size * scale;
    let margin = size.x.max(size.y) * IMAGE_TAB_MARGIN;

    let src = Rect::from_min_size(
        origin - Vec2::splat(margin) * scale,
        (size + Vec2::splat(2.0 * margin)) * scale,
    );
    let dst = Rect::from_min_size(Vec2::splat(-margin), size + Vec2::splat(2.0 * margin));
    (src, dst)
}

/// Draw one frame.
pub fn render<S: DrawSurface + ?Sized>(surface: &mut S, frame: &FrameView<'_>) {
    surface.clear(frame.viewport);

    let Some(puzzle) = frame.puzzle_rect else {
        return;
    };
    surface.stroke_path(&OutlinePath::rect(puzzle), Vec2::ZERO, &guide_style());

    let image = frame.image.filter(|size| !size.is_empty() && surface.image_ready());
    let pieces = frame.pieces.as_slice();
    for i in draw_order(frame.pieces) {
        draw_piece(surface, &pieces[i], puzzle, image);
    }
}

fn draw_piece<S: DrawSurface + ?Sized>(surface: &mut S, piece: &Piece, puzzle: Rect, image: Option<ImageSize>) {
    let outline = piece.outline();
    let offset = piece.position;

    surface.set_shadow(if piece.locked { None } else { Some(loose_shadow()) });
    match image {
        Some(image) => {
            let (src, dst) = image_mapping(piece, puzzle, image);
            surface.draw_clipped_image(outline, offset, src, dst);
        }
        None => surface.fill_path(outline, offset, placeholder_color()),
    }
    surface.set_shadow(None);

    surface.stroke_path(outline, offset, &border_style());
}
