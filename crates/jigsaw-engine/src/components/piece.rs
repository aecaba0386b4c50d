use glam::Vec2;
use crate::components::layer::DrawLayer;
use crate::core::rect::Rect;
use crate::systems::outline::{generate_outline, OutlinePath};

/// Margin of the cheap bounding-box pre-filter used before precise hit testing,
/// as a fraction of the cell size on each axis.
pub const HIT_BOX_MARGIN: f32 = 0.3;

/// Shape of one piece edge.
///
/// `Tab` protrudes outward, `Blank` recesses inward, `Flat` is a border edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i8)]
pub enum TabPolarity {
    Blank = -1,
    #[default]
    Flat = 0,
    Tab = 1,
}

impl TabPolarity {
    /// Map a sign to a polarity: positive is a tab, negative a blank.
    pub fn from_sign(sign: i8) -> Self {
        match sign.signum() {
            1 => Self::Tab,
            -1 => Self::Blank,
            _ => Self::Flat,
        }
    }

    /// The polarity the neighbour sees across the same seam.
    pub fn opposite(self) -> Self {
        match self {
            Self::Tab => Self::Blank,
            Self::Blank => Self::Tab,
            Self::Flat => Self::Flat,
        }
    }

    pub fn sign(self) -> f32 {
        self as i8 as f32
    }

    pub fn is_flat(self) -> bool {
        self == Self::Flat
    }
}

/// Polarity of each of a piece's four edges, in the piece's own frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EdgeTabs {
    pub top: TabPolarity,
    pub right: TabPolarity,
    pub bottom: TabPolarity,
    pub left: TabPolarity,
}

impl EdgeTabs {
    pub const FLAT: Self = Self {
        top: TabPolarity::Flat,
        right: TabPolarity::Flat,
        bottom: TabPolarity::Flat,
        left: TabPolarity::Flat,
    };
}

/// One puzzle piece.
///
/// Grid cell, size, tabs, outline and target are fixed at generation time;
/// only `position`, `locked` and `pick_order` change during play.
#[derive(Debug, Clone)]
pub struct Piece {
    row: u32,
    col: u32,
    size: Vec2,
    tabs: EdgeTabs,
    outline: OutlinePath,
    target: Vec2,
    /// Top-left corner of the cell on the play surface.
    pub position: Vec2,
    /// Snapped into place; never picked up again.
    pub locked: bool,
    /// Draw/hit priority among loose pieces. Higher is on top.
    pub pick_order: u32,
}

impl Piece {
    pub fn new(row: u32, col: u32, size: Vec2, tabs: EdgeTabs, target: Vec2, position: Vec2) -> Self {
        Self {
            row,
            col,
            size,
            tabs,
            outline: generate_outline(size.x, size.y, tabs),
            target,
            position,
            locked: false,
            pick_order: 0,
        }
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn col(&self) -> u32 {
        self.col
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn tabs(&self) -> EdgeTabs {
        self.tabs
    }

    pub fn outline(&self) -> &OutlinePath {
        &self.outline
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    /// The cell rectangle at the current position, tabs excluded.
    pub fn cell_bounds(&self) -> Rect {
        Rect::from_min_size(self.position, self.size)
    }

    /// Tight box around the outline (tabs included) at the current position.
    pub fn outline_bounds(&self) -> Rect {
        self.outline.bounds().translate(self.position)
    }

    /// Pre-filter box: the cell inflated by `HIT_BOX_MARGIN` on every side.
    pub fn hit_box(&self) -> Rect {
        self.cell_bounds().inflate(self.size * HIT_BOX_MARGIN)
    }

    /// Precise hit test against the curved outline.
    pub fn hit_test(&self, point: Vec2) -> bool {
        self.hit_box().contains(point) && self.outline.contains(point - self.position)
    }

    pub fn distance_to_target(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// Move onto the target and lock. Locked pieces sit on the lowest layer.
    pub fn snap(&mut self) {
        self.position = self.target;
        self.locked = true;
        self.pick_order = 0;
    }

    pub fn layer(&self) -> DrawLayer {
        if self.locked {
            DrawLayer::Locked
        } else {
            DrawLayer::Loose
        }
    }

    /// Move onto a refitted layout. The outline is rebuilt when the cell
    /// size changes; locked pieces stay on their target.
    pub(crate) fn refit(&mut self, size: Vec2, target: Vec2, position: Vec2) {
        if size != self.size {
            self.size = size;
            self.outline = generate_outline(size.x, size.y, self.tabs);
        }
        self.target = target;
        self.position = if self.locked { target } else { position };
    }
}
