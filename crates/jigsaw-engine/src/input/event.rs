use glam::Vec2;
use crate::api::config::Viewport;

/// Input events the engine understands, already in surface coordinates.
/// Mouse, pen and touch all arrive as pointer events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch/click began at (x, y).
    PointerDown { x: f32, y: f32 },
    /// A touch/cursor moved to (x, y).
    PointerMove { x: f32, y: f32 },
    /// A touch/click ended at (x, y).
    PointerUp { x: f32, y: f32 },
    /// The surface lost the pointer (blur, capture lost, touch cancelled).
    PointerCancel,
    /// The play surface changed size.
    Resize { width: f32, height: f32 },
}

impl InputEvent {
    /// Pointer position carried by the event, if any.
    pub fn position(&self) -> Option<Vec2> {
        match *self {
            InputEvent::PointerDown { x, y }
            | InputEvent::PointerMove { x, y }
            | InputEvent::PointerUp { x, y } => Some(Vec2::new(x, y)),
            InputEvent::PointerCancel | InputEvent::Resize { .. } => None,
        }
    }

    pub fn viewport(&self) -> Option<Viewport> {
        match *self {
            InputEvent::Resize { width, height } => Some(Viewport::new(width, height)),
            _ => None,
        }
    }
}

/// Reduce a flat `[x0, y0, x1, y1, ...]` touch list to its first point.
pub fn primary_touch(touches: &[f32]) -> Option<Vec2> {
    match touches {
        [x, y, ..] => Some(Vec2::new(*x, *y)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_touch_wins() {
        assert_eq!(primary_touch(&[10.0, 20.0, 30.0, 40.0]), Some(Vec2::new(10.0, 20.0)));
    }

    #[test]
    fn incomplete_touch_list_is_ignored() {
        assert_eq!(primary_touch(&[]), None);
        assert_eq!(primary_touch(&[5.0]), None);
    }

    #[test]
    fn pointer_events_carry_position() {
        assert_eq!(InputEvent::PointerUp { x: 1.0, y: 2.0 }.position(), Some(Vec2::new(1.0, 2.0)));
        assert_eq!(InputEvent::PointerCancel.position(), None);
        assert_eq!(
            InputEvent::Resize { width: 320.0, height: 640.0 }.viewport(),
            Some(Viewport::new(320.0, 640.0))
        );
    }
}
