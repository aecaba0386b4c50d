//! Solved-rectangle placement and scatter.
//!
//! The solved rectangle is centred horizontally and centred vertically in the
//! band between the header and the bottom margin. Loose pieces start inside
//! "safe zones": the bands above and below the rectangle, shrunk by a tab
//! buffer on every side so that neither a piece nor its protruding tabs can
//! touch the chrome, the screen edge, or the rectangle.

use glam::Vec2;
use crate::api::config::{ChromeInsets, Viewport};
use crate::components::piece::Piece;
use crate::core::rect::Rect;
use crate::core::rng::RandomSource;
use crate::systems::grid::{GridPlan, TabPlan};

/// Puzzle width as a fraction of viewport width, at or below the breakpoint.
pub const NARROW_WIDTH_RATIO: f32 = 0.96;
/// Puzzle width as a fraction of viewport width, above the breakpoint.
pub const WIDE_WIDTH_RATIO: f32 = 0.6;
pub const WIDE_BREAKPOINT: f32 = 800.0;
/// Cap on puzzle height as a fraction of the space below the header.
pub const MAX_HEIGHT_RATIO: f32 = 0.75;
/// Worst-case tab reach, as a fraction of the larger piece side.
/// Kept above the real tab size (0.25) so curves stay off every boundary.
pub const TAB_BUFFER_RATIO: f32 = 0.45;

/// Clearance reserved around a piece for its tabs.
pub fn tab_buffer(piece: Vec2) -> f32 {
    piece.x.max(piece.y) * TAB_BUFFER_RATIO
}

/// Vertical space between the header and the bottom margin.
pub fn available_height(viewport: Viewport, chrome: &ChromeInsets) -> f32 {
    (viewport.height - chrome.header_height - chrome.bottom_margin).max(0.0)
}

/// Compute the solved rectangle for an image of the given aspect ratio.
///
/// When the aspect-derived height exceeds the cap, only the height is
/// clamped; the width keeps its policy value so that the bands above and
/// below always have room for scatter, at the cost of a stretched image.
pub fn puzzle_rect(viewport: Viewport, chrome: &ChromeInsets, image_aspect: f32) -> Rect {
    let ratio = if viewport.width > WIDE_BREAKPOINT {
        WIDE_WIDTH_RATIO
    } else {
        NARROW_WIDTH_RATIO
    };
    let width = viewport.width * ratio;
    let aspect = if image_aspect.is_finite() && image_aspect > 0.0 {
        image_aspect
    } else {
        1.0
    };

    let max_height = available_height(viewport, chrome) * MAX_HEIGHT_RATIO;
    let height = (width / aspect).min(max_height);

    anchor_rect(viewport, chrome, Vec2::new(width, height))
}

/// Place a rectangle of `size` with the solved-rectangle centring policy.
fn anchor_rect(viewport: Viewport, chrome: &ChromeInsets, size: Vec2) -> Rect {
    let available = available_height(viewport, chrome);
    Rect::new(
        (viewport.width - size.x) / 2.0,
        chrome.header_height + (available - size.y) / 2.0,
        size.x,
        size.y,
    )
}

/// Scatter regions for one layout.
#[derive(Debug, Clone, PartialEq)]
pub struct SafeZones {
    /// Never empty.
    pub zones: Vec<Rect>,
    /// True when neither band had room and the synthetic bottom zone is used.
    pub fallback: bool,
}

/// Derive the scatter zones above and below `puzzle`.
pub fn safe_zones(viewport: Viewport, chrome: &ChromeInsets, puzzle: Rect, piece: Vec2) -> SafeZones {
    let buffer = tab_buffer(piece) + chrome.zone_padding;
    let side = chrome.side_margin(viewport.width);
    let zone_x = side + buffer;
    let zone_w = viewport.width - 2.0 * (side + buffer);

    let mut zones = Vec::with_capacity(2);

    // Band between header and puzzle top.
    let top_band = puzzle.y - chrome.header_height;
    let top_usable = top_band - 2.0 * buffer;
    if top_usable > piece.y {
        zones.push(Rect::new(zone_x, chrome.header_height + buffer, zone_w, top_usable));
    }

    // Band between puzzle bottom and bottom margin.
    let bottom_band = viewport.height - puzzle.bottom() - chrome.bottom_margin;
    let bottom_usable = bottom_band - 2.0 * buffer;
    if bottom_usable > piece.y {
        zones.push(Rect::new(zone_x, puzzle.bottom() + buffer, zone_w, bottom_usable));
    }

    if !zones.is_empty() {
        return SafeZones { zones, fallback: false };
    }

    // One row at the bottom: below the puzzle if possible, but never so low
    // that tabs leave the screen.
    let lowest = viewport.height - chrome.bottom_margin - buffer - piece.y;
    let y = lowest
        .max(puzzle.bottom() + chrome.zone_padding)
        .min(viewport.height - piece.y - buffer)
        .max(0.0);
    log::debug!("safe_zones: no band fits a piece, using fallback row at y={}", y);
    SafeZones {
        zones: vec![Rect::new(zone_x, y, zone_w.max(piece.x), piece.y)],
        fallback: true,
    }
}

/// Uniform position for a piece's top-left corner inside `zone`.
/// A zone smaller than the piece pins that axis to the zone origin.
pub fn scatter_position<R: RandomSource + ?Sized>(zone: &Rect, piece: Vec2, rng: &mut R) -> Vec2 {
    let range = (zone.size() - piece).max(Vec2::ZERO);
    zone.min() + Vec2::new(rng.next_f32() * range.x, rng.next_f32() * range.y)
}

/// Geometry shared by every piece of a level.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub grid: GridPlan,
    pub puzzle_rect: Rect,
    pub piece_size: Vec2,
    pub zones: SafeZones,
}

impl Layout {
    /// Solved position of the top-left corner of cell `(row, col)`.
    pub fn target_for(&self, row: u32, col: u32) -> Vec2 {
        self.puzzle_rect.min() + Vec2::new(col as f32, row as f32) * self.piece_size
    }

    /// Recompute the solved rectangle for a new viewport with the load-time
    /// policy. The grid is kept, so every cell keeps its relative place.
    pub fn refit(&mut self, viewport: Viewport, chrome: &ChromeInsets, image_aspect: f32) {
        self.puzzle_rect = puzzle_rect(viewport, chrome, image_aspect);
        self.piece_size = self.puzzle_rect.size() / Vec2::new(self.grid.cols as f32, self.grid.rows as f32);
        self.zones = safe_zones(viewport, chrome, self.puzzle_rect, self.piece_size);
    }

    /// Carry a point from `previous` into the current solved rectangle,
    /// scaling its offset by the change in size.
    pub fn carry(&self, previous: Rect, point: Vec2) -> Vec2 {
        let scale = self.puzzle_rect.size() / previous.size().max(Vec2::splat(f32::EPSILON));
        self.puzzle_rect.min() + (point - previous.min()) * scale
    }
}

/// Lay out a full level: solved rectangle, zones, and one scattered piece per
/// grid cell with its outline built from `tabs`.
pub fn layout<R: RandomSource + ?Sized>(
    viewport: Viewport,
    chrome: &ChromeInsets,
    tabs: &TabPlan,
    image_aspect: f32,
    rng: &mut R,
) -> (Layout, Vec<Piece>) {
    let plan = tabs.plan();
    let puzzle = puzzle_rect(viewport, chrome, image_aspect);
    let piece_size = puzzle.size() / Vec2::new(plan.cols as f32, plan.rows as f32);
    let zones = safe_zones(viewport, chrome, puzzle, piece_size);

    let layout = Layout {
        grid: plan,
        puzzle_rect: puzzle,
        piece_size,
        zones,
    };

    let mut pieces = Vec::with_capacity(plan.piece_count() as usize);
    for row in 0..plan.rows {
        for col in 0..plan.cols {
            let zone = &layout.zones.zones[rng.next_index(layout.zones.zones.len())];
            let position = scatter_position(zone, piece_size, rng);
            pieces.push(Piece::new(
                row,
                col,
                piece_size,
                tabs.edge_tabs(row, col),
                layout.target_for(row, col),
                position,
            ));
        }
    }

    (layout, pieces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::Rng;
    use crate::systems::grid::{plan_grid, GridPlan};

    const EPS: f32 = 1e-3;

    #[test]
    fn narrow_viewport_uses_96_percent() {
        let rect = puzzle_rect(Viewport::new(400.0, 800.0), &ChromeInsets::default(), 1.0);
        assert!((rect.w - 384.0).abs() < EPS);
        assert!((rect.h - 384.0).abs() < EPS);
        assert!((rect.x - 8.0).abs() < EPS);
        assert!((rect.y - 238.0).abs() < EPS);
    }

    #[test]
    fn capped_height_keeps_policy_width() {
        let rect = puzzle_rect(Viewport::new(1280.0, 720.0), &ChromeInsets::default(), 1.0);
        assert!((rect.w - 768.0).abs() < EPS);
        // 75% of 620 available
        assert!((rect.h - 465.0).abs() < EPS);
        assert!((rect.y - 157.5).abs() < EPS);
    }

    #[test]
    fn phone_layout_has_two_zones_clear_of_puzzle() {
        let viewport = Viewport::new(400.0, 800.0);
        let chrome = ChromeInsets::default();
        let puzzle = puzzle_rect(viewport, &chrome, 1.0);
        let piece = Vec2::splat(384.0 / 7.0);
        let zones = safe_zones(viewport, &chrome, puzzle, piece);
        assert!(!zones.fallback);
        assert_eq!(zones.zones.len(), 2);
        for zone in &zones.zones {
            assert!(!zone.intersects(&puzzle));
            assert!(zone.y >= chrome.header_height);
            assert!(zone.h > piece.y);
        }
    }

    #[test]
    fn cramped_layout_falls_back_to_single_zone() {
        let viewport = Viewport::new(1280.0, 720.0);
        let chrome = ChromeInsets::default();
        let puzzle = puzzle_rect(viewport, &chrome, 1.0);
        let piece = puzzle.size() / 7.0;
        let zones = safe_zones(viewport, &chrome, puzzle, piece);
        assert!(zones.fallback);
        assert_eq!(zones.zones.len(), 1);
        let zone = zones.zones[0];
        assert!(zone.bottom() + tab_buffer(piece) <= viewport.height + EPS);
    }

    #[test]
    fn scatter_clamps_small_zone_to_origin() {
        let zone = Rect::new(10.0, 20.0, 5.0, 5.0);
        let pos = scatter_position(&zone, Vec2::splat(30.0), &mut Rng::new(9));
        assert_eq!(pos, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn layout_assigns_targets_by_cell() {
        let viewport = Viewport::new(400.0, 800.0);
        let plan = plan_grid(1.0, 45);
        let mut rng = Rng::new(11);
        let tabs = TabPlan::generate(plan, &mut rng);
        let (layout, pieces) = super::layout(viewport, &ChromeInsets::default(), &tabs, 1.0, &mut rng);

        assert_eq!(pieces.len(), 49);
        let last = &pieces[48];
        assert_eq!((last.row(), last.col()), (6, 6));
        let expected = layout.puzzle_rect.max() - layout.piece_size;
        assert!(last.target().distance(expected) < EPS);
        assert_eq!(layout.target_for(0, 0), layout.puzzle_rect.min());
    }

    #[test]
    fn refit_follows_the_policy_for_the_new_viewport() {
        let chrome = ChromeInsets::default();
        let tabs = TabPlan::generate(GridPlan { rows: 3, cols: 3 }, &mut Rng::new(1));
        let (mut layout, _) = super::layout(Viewport::new(1280.0, 900.0), &chrome, &tabs, 1.0, &mut Rng::new(2));
        let before = layout.puzzle_rect;

        let narrow = Viewport::new(600.0, 900.0);
        layout.refit(narrow, &chrome, 1.0);
        assert_eq!(layout.puzzle_rect, puzzle_rect(narrow, &chrome, 1.0));
        assert!(layout.puzzle_rect.x >= 0.0 && layout.puzzle_rect.right() <= 600.0);
        assert!((layout.piece_size - layout.puzzle_rect.size() / 3.0).length() < EPS);

        // A point at the centre of the old rect lands at the centre of the new one.
        let carried = layout.carry(before, before.min() + before.size() * 0.5);
        let centre = layout.puzzle_rect.min() + layout.puzzle_rect.size() * 0.5;
        assert!(carried.distance(centre) < EPS);
    }
}
