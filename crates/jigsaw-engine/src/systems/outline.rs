//! Interlocking piece outlines.
//!
//! `generate_outline` traces the four edges of a cell clockwise (top, right,
//! bottom, left) in piece-local coordinates, origin at the cell's top-left
//! corner. Flat edges are straight lines; tabbed edges swap the middle 30% of
//! the edge for two cubic segments that bulge outward (`Tab`) or inward
//! (`Blank`) by up to `min(width, height) * TAB_SIZE_RATIO`.
//!
//! The result is kept both as a plain command list (what drawing backends
//! replay) and as a lyon `Path` (what hit testing and tessellation consume).

use glam::Vec2;
use lyon::algorithms::hit_test::hit_test_path;
use lyon::math::point;
use lyon::path::{FillRule, Path};
use crate::components::piece::{EdgeTabs, TabPolarity};
use crate::core::rect::Rect;

/// Tab height as a fraction of the shorter cell side.
pub const TAB_SIZE_RATIO: f32 = 0.25;

/// Flattening tolerance for point-in-path tests, in surface units.
const HIT_TOLERANCE: f32 = 0.1;

// Edge parameters at which the tab neck starts and ends.
const NECK_START: f32 = 0.35;
const NECK_END: f32 = 0.65;
// Along-edge offset of the shoulder control points from the midpoint.
const SHOULDER_SPREAD: f32 = 0.1;
// Perpendicular reach of neck/shoulder control points, in tab sizes.
const NECK_REACH: f32 = 0.2;
const SHOULDER_REACH: f32 = 0.9;

/// One drawing command of an outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutlineCommand {
    MoveTo(Vec2),
    LineTo(Vec2),
    CubicTo { ctrl1: Vec2, ctrl2: Vec2, to: Vec2 },
    Close,
}

/// An immutable closed vector outline.
#[derive(Debug, Clone)]
pub struct OutlinePath {
    commands: Vec<OutlineCommand>,
    path: Path,
    bounds: Rect,
}

impl PartialEq for OutlinePath {
    fn eq(&self, other: &Self) -> bool {
        self.commands == other.commands
    }
}

impl OutlinePath {
    pub fn from_commands(commands: Vec<OutlineCommand>) -> Self {
        let path = build_path(&commands);
        let bounds = control_bounds(&commands);
        Self { commands, path, bounds }
    }

    /// A plain rectangle outline, used for the solved-area guide.
    pub fn rect(rect: Rect) -> Self {
        Self::from_commands(vec![
            OutlineCommand::MoveTo(rect.min()),
            OutlineCommand::LineTo(Vec2::new(rect.right(), rect.y)),
            OutlineCommand::LineTo(rect.max()),
            OutlineCommand::LineTo(Vec2::new(rect.x, rect.bottom())),
            OutlineCommand::Close,
        ])
    }

    pub fn commands(&self) -> &[OutlineCommand] {
        &self.commands
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Box around every point and control point. For tab curves the control
    /// hull reaches exactly the tab tip, so this is also the tight box.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Non-zero point-in-path test in local coordinates.
    pub fn contains(&self, local: Vec2) -> bool {
        hit_test_path(
            &point(local.x, local.y),
            self.path.iter(),
            FillRule::NonZero,
            HIT_TOLERANCE,
        )
    }
}

/// Tab size for a `width × height` cell.
pub fn tab_size(width: f32, height: f32) -> f32 {
    width.min(height) * TAB_SIZE_RATIO
}

/// Build the outline of a `width × height` piece with the given edge tabs.
///
/// Pure and deterministic: identical inputs give identical command lists.
pub fn generate_outline(width: f32, height: f32, tabs: EdgeTabs) -> OutlinePath {
    let t = tab_size(width, height);
    let corners = [
        Vec2::new(0.0, 0.0),
        Vec2::new(width, 0.0),
        Vec2::new(width, height),
        Vec2::new(0.0, height),
    ];
    let polarities = [tabs.top, tabs.right, tabs.bottom, tabs.left];

    let mut commands = Vec::with_capacity(1 + 4 * 4 + 1);
    commands.push(OutlineCommand::MoveTo(corners[0]));
    for (i, polarity) in polarities.into_iter().enumerate() {
        trace_edge(&mut commands, corners[i], corners[(i + 1) % 4], polarity, t);
    }
    commands.push(OutlineCommand::Close);

    OutlinePath::from_commands(commands)
}

fn trace_edge(out: &mut Vec<OutlineCommand>, from: Vec2, to: Vec2, polarity: TabPolarity, t: f32) {
    if polarity.is_flat() {
        out.push(OutlineCommand::LineTo(to));
        return;
    }

    let d = to - from;
    // Edges run clockwise on a y-down surface, so the left-hand normal of the
    // direction vector points out of the piece.
    let dir = d.normalize_or_zero();
    let outward = Vec2::new(dir.y, -dir.x);
    let reach = outward * t * polarity.sign();

    let mid = from + d * 0.5;
    let neck_a = from + d * NECK_START;
    let neck_b = from + d * NECK_END;

    out.push(OutlineCommand::LineTo(neck_a));
    out.push(OutlineCommand::CubicTo {
        ctrl1: neck_a + reach * NECK_REACH,
        ctrl2: mid - d * SHOULDER_SPREAD + reach * SHOULDER_REACH,
        to: mid + reach,
    });
    out.push(OutlineCommand::CubicTo {
        ctrl1: mid + d * SHOULDER_SPREAD + reach * SHOULDER_REACH,
        ctrl2: neck_b + reach * NECK_REACH,
        to: neck_b,
    });
    out.push(OutlineCommand::LineTo(to));
}

fn build_path(commands: &[OutlineCommand]) -> Path {
    let mut builder = Path::builder();
    let mut open = false;
    for cmd in commands {
        match *cmd {
            OutlineCommand::MoveTo(p) => {
                if open {
                    builder.end(false);
                }
                builder.begin(point(p.x, p.y));
                open = true;
            }
            OutlineCommand::LineTo(p) => {
                if open {
                    builder.line_to(point(p.x, p.y));
                } else {
                    builder.begin(point(p.x, p.y));
                    open = true;
                }
            }
            OutlineCommand::CubicTo { ctrl1, ctrl2, to } => {
                if !open {
                    builder.begin(point(ctrl1.x, ctrl1.y));
                    open = true;
                }
                builder.cubic_bezier_to(
                    point(ctrl1.x, ctrl1.y),
                    point(ctrl2.x, ctrl2.y),
                    point(to.x, to.y),
                );
            }
            OutlineCommand::Close => {
                if open {
                    builder.close();
                    open = false;
                }
            }
        }
    }
    if open {
        builder.end(false);
    }
    builder.build()
}

fn control_bounds(commands: &[OutlineCommand]) -> Rect {
    let mut min = Vec2::splat(f32::INFINITY);
    let mut max = Vec2::splat(f32::NEG_INFINITY);
    let mut include = |p: Vec2| {
        min = min.min(p);
        max = max.max(p);
    };
    for cmd in commands {
        match *cmd {
            OutlineCommand::MoveTo(p) | OutlineCommand::LineTo(p) => include(p),
            OutlineCommand::CubicTo { ctrl1, ctrl2, to } => {
                include(ctrl1);
                include(ctrl2);
                include(to);
            }
            OutlineCommand::Close => {}
        }
    }
    if min.x > max.x {
        return Rect::default();
    }
    Rect::from_min_size(min, max - min)
}
