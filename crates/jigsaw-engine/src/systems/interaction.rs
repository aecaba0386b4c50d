//! Pointer-driven drag, snap and win detection.
//!
//! Idle → Dragging → Idle, with Solved as the terminal phase once every piece
//! is locked. Only one drag is active at a time. The active piece is held as
//! a generation-checked `PieceHandle`; if the piece set was replaced under it,
//! the drag is dropped on the next event instead of touching the wrong piece.

use glam::Vec2;
use crate::api::config::{ChromeInsets, Viewport};
use crate::api::types::PieceId;
use crate::core::pieces::{PieceHandle, PieceSet};
use crate::core::rect::Rect;
use crate::systems::layout::tab_buffer;

/// Region a dragged piece's tab-inclusive box must stay inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragBounds {
    pub width: f32,
    pub height: f32,
    /// Pieces never rise above this line.
    pub header: f32,
    /// Solved rectangle. Every cell of it stays reachable even where the
    /// tab buffer would otherwise keep a piece out.
    pub solved: Option<Rect>,
}

impl DragBounds {
    pub fn new(viewport: Viewport, chrome: &ChromeInsets) -> Self {
        Self {
            width: viewport.width,
            height: viewport.height,
            header: chrome.header_height,
            solved: None,
        }
    }

    pub fn covering(self, solved: Rect) -> Self {
        Self {
            solved: Some(solved),
            ..self
        }
    }

    /// Clamp a piece's top-left corner. On a surface too small for the piece
    /// the far edge wins, matching a sequential min/max clamp.
    pub fn clamp(&self, pos: Vec2, piece: Vec2) -> Vec2 {
        let tab = tab_buffer(piece);
        let mut lo = Vec2::new(tab, self.header + tab);
        let mut hi = Vec2::new(self.width, self.height) - piece - Vec2::splat(tab);
        if let Some(solved) = self.solved {
            lo = lo.min(solved.min());
            hi = hi.max(solved.max() - piece);
        }
        Vec2::new(pos.x.max(lo.x).min(hi.x), pos.y.max(lo.y).min(hi.y))
    }
}

/// Current phase of the drag session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragPhase {
    Idle,
    Dragging {
        piece: PieceHandle,
        /// Pointer position minus piece position at pick-up.
        grab_offset: Vec2,
    },
    Solved,
}

/// What a pointer event did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionResult {
    /// Nothing changed.
    None,
    PickedUp(PieceId),
    Moved(PieceId),
    /// Released within snap distance and locked.
    Placed(PieceId),
    /// Released elsewhere; stays loose where it was dropped.
    Released(PieceId),
    /// Locked the last piece. Reported once per puzzle.
    Solved(PieceId),
}

impl InteractionResult {
    /// Whether the frame needs to be redrawn.
    pub fn changed(&self) -> bool {
        !matches!(self, InteractionResult::None)
    }
}

/// Drag session state machine.
pub struct InteractionController {
    phase: DragPhase,
    next_pick_order: u32,
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            phase: DragPhase::Idle,
            next_pick_order: 0,
        }
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    pub fn is_solved(&self) -> bool {
        self.phase == DragPhase::Solved
    }

    pub fn active_piece(&self) -> Option<PieceHandle> {
        match self.phase {
            DragPhase::Dragging { piece, .. } => Some(piece),
            _ => None,
        }
    }

    /// Start a fresh session for a newly generated piece set.
    pub fn begin_level(&mut self) {
        self.phase = DragPhase::Idle;
        self.next_pick_order = 0;
    }

    /// Pick up the topmost loose piece whose outline contains `pos`.
    pub fn pointer_down(&mut self, pieces: &mut PieceSet, pos: Vec2) -> InteractionResult {
        match self.phase {
            DragPhase::Idle => {}
            DragPhase::Dragging { .. } => {
                log::debug!("pointer_down ignored: drag already in progress");
                return InteractionResult::None;
            }
            DragPhase::Solved => return InteractionResult::None,
        }

        let hit = pieces
            .loose_top_down()
            .into_iter()
            .find(|&i| pieces.as_slice()[i].hit_test(pos));
        let Some(handle) = hit.and_then(|i| pieces.handle(i)) else {
            return InteractionResult::None;
        };
        let Some(piece) = pieces.get_mut(handle) else {
            return InteractionResult::None;
        };

        self.next_pick_order += 1;
        piece.pick_order = self.next_pick_order;
        self.phase = DragPhase::Dragging {
            piece: handle,
            grab_offset: pos - piece.position,
        };
        InteractionResult::PickedUp(handle.id())
    }

    /// Follow the pointer with the active piece, clamped to `bounds`.
    pub fn pointer_move(&mut self, pieces: &mut PieceSet, pos: Vec2, bounds: &DragBounds) -> InteractionResult {
        let DragPhase::Dragging { piece: handle, grab_offset } = self.phase else {
            return InteractionResult::None;
        };
        let Some(piece) = pieces.get_mut(handle) else {
            self.drop_stale(handle);
            return InteractionResult::None;
        };

        piece.position = bounds.clamp(pos - grab_offset, piece.size());
        InteractionResult::Moved(handle.id())
    }

    /// End the drag: snap if within `snap_distance` of the target, then check
    /// for a win.
    pub fn pointer_up(&mut self, pieces: &mut PieceSet, snap_distance: f32) -> InteractionResult {
        let DragPhase::Dragging { piece: handle, .. } = self.phase else {
            return InteractionResult::None;
        };
        let Some(piece) = pieces.get_mut(handle) else {
            self.drop_stale(handle);
            return InteractionResult::None;
        };

        let placed = piece.distance_to_target() < snap_distance;
        if placed {
            piece.snap();
        }
        self.phase = DragPhase::Idle;

        if pieces.all_locked() {
            log::info!("puzzle solved: {} pieces locked", pieces.len());
            self.phase = DragPhase::Solved;
            return InteractionResult::Solved(handle.id());
        }
        if placed {
            InteractionResult::Placed(handle.id())
        } else {
            InteractionResult::Released(handle.id())
        }
    }

    /// Resolve an active drag as a release without snapping (lost capture).
    pub fn cancel(&mut self, pieces: &PieceSet) -> InteractionResult {
        let DragPhase::Dragging { piece: handle, .. } = self.phase else {
            return InteractionResult::None;
        };
        self.phase = DragPhase::Idle;
        if pieces.is_current(handle) {
            InteractionResult::Released(handle.id())
        } else {
            InteractionResult::None
        }
    }

    fn drop_stale(&mut self, handle: PieceHandle) {
        log::debug!("drag on {:?} dropped: piece set was replaced", handle.id());
        self.phase = DragPhase::Idle;
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}
