use glam::Vec2;
use crate::api::config::Viewport;
use crate::core::rect::Rect;
use crate::systems::outline::OutlinePath;
use super::traits::{Color, DrawSurface, Shadow, StrokeStyle};

/// One recorded surface call. Paths are reduced to their world-space bounds.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Viewport),
    Image { bounds: Rect, src: Rect, dst: Rect },
    Stroke { bounds: Rect, style: StrokeStyle },
    Fill { bounds: Rect, color: Color },
    Shadow(Option<Shadow>),
}

/// Headless surface that logs every call, for tests and debugging.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub image_ready: bool,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(image_ready: bool) -> Self {
        Self {
            image_ready,
            commands: Vec::new(),
        }
    }

    pub fn clear_log(&mut self) {
        self.commands.clear();
    }

    /// World-space bounds of every clipped image or placeholder fill, in
    /// paint order. One entry per piece drawn.
    pub fn piece_bounds(&self) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Image { bounds, .. } | DrawCommand::Fill { bounds, .. } => Some(*bounds),
                _ => None,
            })
            .collect()
    }
}

impl DrawSurface for RecordingSurface {
    fn image_ready(&self) -> bool {
        self.image_ready
    }

    fn clear(&mut self, viewport: Viewport) {
        self.commands.push(DrawCommand::Clear(viewport));
    }

    fn draw_clipped_image(&mut self, path: &OutlinePath, offset: Vec2, src: Rect, dst: Rect) {
        self.commands.push(DrawCommand::Image {
            bounds: path.bounds().translate(offset),
            src,
            dst,
        });
    }

    fn stroke_path(&mut self, path: &OutlinePath, offset: Vec2, style: &StrokeStyle) {
        self.commands.push(DrawCommand::Stroke {
            bounds: path.bounds().translate(offset),
            style: *style,
        });
    }

    fn fill_path(&mut self, path: &OutlinePath, offset: Vec2, color: Color) {
        self.commands.push(DrawCommand::Fill {
            bounds: path.bounds().translate(offset),
            color,
        });
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.commands.push(DrawCommand::Shadow(shadow));
    }
}
