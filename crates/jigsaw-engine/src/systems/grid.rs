use crate::components::piece::{EdgeTabs, TabPolarity};
use crate::core::rng::RandomSource;

/// Smallest row/column count of any puzzle.
pub const GRID_MIN: u32 = 3;
/// Image aspect ratios are clamped into this range before planning.
pub const ASPECT_MIN: f32 = 0.1;
pub const ASPECT_MAX: f32 = 10.0;

/// Rows and columns of a puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridPlan {
    pub rows: u32,
    pub cols: u32,
}

impl GridPlan {
    pub fn piece_count(&self) -> u32 {
        self.rows * self.cols
    }
}

/// Choose rows/cols so that `rows * cols ≈ target_pieces` and
/// `cols / rows ≈ image_aspect`, each at least `GRID_MIN`.
pub fn plan_grid(image_aspect: f32, target_pieces: u32) -> GridPlan {
    let aspect = if image_aspect.is_finite() && image_aspect > 0.0 {
        image_aspect.clamp(ASPECT_MIN, ASPECT_MAX)
    } else {
        log::warn!("plan_grid: invalid image aspect {}, using 1.0", image_aspect);
        1.0
    };
    let target = target_pieces.max(GRID_MIN * GRID_MIN) as f32;

    let rows = ((target / aspect).sqrt().round() as u32).max(GRID_MIN);
    let cols = ((rows as f32 * aspect).round() as u32).max(GRID_MIN);
    GridPlan { rows, cols }
}

/// Polarity of every internal seam of a grid.
///
/// Vertical seams sit between `(r, c)` and `(r, c + 1)`; horizontal seams sit
/// between `(r, c)` and `(r + 1, c)`. A seam value is what the left/upper
/// piece sees on its right/bottom edge; the neighbour sees the opposite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabPlan {
    plan: GridPlan,
    vertical: Vec<TabPolarity>,
    horizontal: Vec<TabPolarity>,
}

impl TabPlan {
    /// Draw one independent ±1 per internal seam.
    pub fn generate<R: RandomSource + ?Sized>(plan: GridPlan, rng: &mut R) -> Self {
        let rows = plan.rows as usize;
        let cols = plan.cols as usize;
        let vertical = (0..rows * cols.saturating_sub(1))
            .map(|_| TabPolarity::from_sign(rng.next_sign()))
            .collect();
        let horizontal = (0..rows.saturating_sub(1) * cols)
            .map(|_| TabPolarity::from_sign(rng.next_sign()))
            .collect();
        Self { plan, vertical, horizontal }
    }

    pub fn plan(&self) -> GridPlan {
        self.plan
    }

    /// Seam between `(row, col)` and `(row, col + 1)`.
    pub fn vertical_seam(&self, row: u32, col: u32) -> TabPolarity {
        if col + 1 >= self.plan.cols || row >= self.plan.rows {
            return TabPolarity::Flat;
        }
        let stride = (self.plan.cols - 1) as usize;
        self.vertical[row as usize * stride + col as usize]
    }

    /// Seam between `(row, col)` and `(row + 1, col)`.
    pub fn horizontal_seam(&self, row: u32, col: u32) -> TabPolarity {
        if row + 1 >= self.plan.rows || col >= self.plan.cols {
            return TabPolarity::Flat;
        }
        self.horizontal[row as usize * self.plan.cols as usize + col as usize]
    }

    /// Edge polarities of the piece at `(row, col)`, in its own frame.
    /// Border edges are flat.
    pub fn edge_tabs(&self, row: u32, col: u32) -> EdgeTabs {
        EdgeTabs {
            top: if row == 0 {
                TabPolarity::Flat
            } else {
                self.horizontal_seam(row - 1, col).opposite()
            },
            right: self.vertical_seam(row, col),
            bottom: self.horizontal_seam(row, col),
            left: if col == 0 {
                TabPolarity::Flat
            } else {
                self.vertical_seam(row, col - 1).opposite()
            },
        }
    }
}
