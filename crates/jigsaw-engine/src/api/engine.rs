use glam::Vec2;
use crate::api::config::{PuzzleConfig, Viewport};
use crate::api::types::{PieceId, PuzzleEvent};
use crate::assets::catalog::{ImageSize, LevelCatalog};
use crate::assets::error::LoadError;
use crate::core::pieces::PieceSet;
use crate::core::rect::Rect;
use crate::core::rng::{RandomSource, Rng};
use crate::input::event::InputEvent;
use crate::renderer::pipeline::{self, FrameView};
use crate::renderer::traits::DrawSurface;
use crate::systems::grid::{plan_grid, TabPlan};
use crate::systems::interaction::{DragBounds, DragPhase, InteractionController, InteractionResult};
use crate::systems::layout::{self, Layout};

/// Image the host must decode before `complete_level` can run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub level: u32,
    /// Index into the level catalog.
    pub asset_index: usize,
    pub path: String,
}

/// The level currently on the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LevelInfo {
    level: u32,
    image: ImageSize,
}

/// Owns one puzzle session: the piece set, its layout, the drag state
/// machine and the outgoing event queue.
///
/// Everything runs synchronously on the caller's thread. The only
/// asynchronous boundary is image decoding, which the host performs between
/// `request_level` and `complete_level`.
pub struct PuzzleEngine<R: RandomSource = Rng> {
    config: PuzzleConfig,
    catalog: LevelCatalog,
    viewport: Viewport,
    rng: R,
    pieces: PieceSet,
    layout: Option<Layout>,
    level: Option<LevelInfo>,
    pending: Option<u32>,
    controller: InteractionController,
    events: Vec<PuzzleEvent>,
}

impl PuzzleEngine<Rng> {
    /// Engine with the default xorshift source seeded from `config.seed`.
    pub fn new(config: PuzzleConfig, catalog: LevelCatalog) -> Self {
        let rng = Rng::new(config.seed);
        Self::with_rng(config, catalog, rng)
    }
}

impl<R: RandomSource> PuzzleEngine<R> {
    pub fn with_rng(config: PuzzleConfig, catalog: LevelCatalog, rng: R) -> Self {
        Self {
            viewport: config.viewport,
            config,
            catalog,
            rng,
            pieces: PieceSet::new(),
            layout: None,
            level: None,
            pending: None,
            controller: InteractionController::new(),
            events: Vec::with_capacity(8),
        }
    }

    // ---- Level lifecycle ----

    /// Pick the image for `level` and remember it as the pending load.
    /// A newer request supersedes any older one still in flight.
    pub fn request_level(&mut self, level: u32) -> Result<AssetRequest, LoadError> {
        let Some((asset_index, path)) = self.catalog.asset_for_level(level) else {
            log::warn!("request_level({}): catalog is empty", level);
            return Err(LoadError::NoAssets);
        };
        let request = AssetRequest {
            level,
            asset_index,
            path: path.to_owned(),
        };
        if let Some(previous) = self.pending.replace(level) {
            log::debug!("request_level({}): superseding pending level {}", level, previous);
        }
        log::info!("level {}: requesting {}", level, request.path);
        Ok(request)
    }

    /// Finish a load started by `request_level` once the host has decoded
    /// (or failed to decode) the image. On error the current puzzle is left
    /// exactly as it was.
    pub fn complete_level(&mut self, level: u32, image: Result<ImageSize, LoadError>) -> Result<(), LoadError> {
        match self.pending {
            None => return Err(LoadError::NotRequested(level)),
            Some(pending) if pending != level => {
                log::debug!("complete_level({}): stale, level {} is pending", level, pending);
                return Err(LoadError::Superseded { requested: level, pending });
            }
            Some(_) => {}
        }
        self.pending = None;

        match image {
            Ok(size) => self.load_level(level, size),
            Err(err) => {
                log::warn!("level {}: {}", level, err);
                Err(err)
            }
        }
    }

    /// Plan, scatter and start `level` for an already decoded image.
    /// Replaces the previous piece set and resets the drag session.
    pub fn load_level(&mut self, level: u32, image: ImageSize) -> Result<(), LoadError> {
        if image.is_empty() {
            log::warn!("level {}: image is {}x{}, keeping current puzzle", level, image.width, image.height);
            return Err(LoadError::EmptyImage {
                width: image.width,
                height: image.height,
            });
        }
        self.pending = None;

        let aspect = image.aspect();
        let grid = plan_grid(aspect, self.config.target_pieces(level));
        let tabs = TabPlan::generate(grid, &mut self.rng);
        let (layout, pieces) = layout::layout(self.viewport, &self.config.chrome, &tabs, aspect, &mut self.rng);

        if layout.zones.fallback {
            log::warn!(
                "level {}: viewport {}x{} too small for scatter bands, using fallback zone",
                level,
                self.viewport.width,
                self.viewport.height
            );
        }

        self.pieces.replace(pieces);
        self.layout = Some(layout);
        self.level = Some(LevelInfo { level, image });
        self.controller.begin_level();

        log::info!(
            "level {}: {}x{} grid, {} pieces",
            level,
            grid.rows,
            grid.cols,
            self.pieces.len()
        );
        Ok(())
    }

    // ---- Input ----

    /// Dispatch one input event. Returns true when the frame needs a redraw.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { x, y } => self.pointer_down(Vec2::new(x, y)),
            InputEvent::PointerMove { x, y } => self.pointer_move(Vec2::new(x, y)),
            InputEvent::PointerUp { .. } => self.pointer_up(),
            InputEvent::PointerCancel => self.pointer_cancel(),
            InputEvent::Resize { width, height } => self.resize(Viewport::new(width, height)),
        }
    }

    pub fn pointer_down(&mut self, pos: Vec2) -> bool {
        let result = self.controller.pointer_down(&mut self.pieces, pos);
        self.apply(result)
    }

    pub fn pointer_move(&mut self, pos: Vec2) -> bool {
        let bounds = self.drag_bounds();
        let result = self.controller.pointer_move(&mut self.pieces, pos, &bounds);
        self.apply(result)
    }

    pub fn pointer_up(&mut self) -> bool {
        let result = self.controller.pointer_up(&mut self.pieces, self.config.snap_distance);
        self.apply(result)
    }

    /// Release the active drag without snapping.
    pub fn pointer_cancel(&mut self) -> bool {
        let result = self.controller.cancel(&self.pieces);
        self.apply(result)
    }

    /// Adopt a new surface size. The solved rectangle is recomputed with the
    /// load-time policy; every piece keeps its cell and its place relative
    /// to the rectangle, locked pieces stay on target and loose pieces are
    /// pulled back inside the drag bounds. Nothing is re-scattered.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        self.viewport = viewport;
        let Some(layout) = self.layout.as_mut() else {
            return true;
        };

        let previous = layout.puzzle_rect;
        let aspect = self.level.map_or(previous.w / previous.h, |info| info.image.aspect());
        layout.refit(viewport, &self.config.chrome, aspect);

        let bounds = DragBounds::new(viewport, &self.config.chrome).covering(layout.puzzle_rect);
        for piece in self.pieces.iter_mut() {
            let target = layout.target_for(piece.row(), piece.col());
            let position = layout.carry(previous, piece.position);
            piece.refit(layout.piece_size, target, position);
            if !piece.locked {
                piece.position = bounds.clamp(piece.position, piece.size());
            }
        }
        log::debug!(
            "resize to {}x{}: solved rect {:?} -> {:?}",
            viewport.width,
            viewport.height,
            previous,
            layout.puzzle_rect
        );
        true
    }

    /// Drag bounds for the current surface. They always admit every target.
    fn drag_bounds(&self) -> DragBounds {
        let bounds = DragBounds::new(self.viewport, &self.config.chrome);
        match self.puzzle_rect() {
            Some(solved) => bounds.covering(solved),
            None => bounds,
        }
    }

    fn apply(&mut self, result: InteractionResult) -> bool {
        match result {
            InteractionResult::PickedUp(id) => {
                if let Some((row, col)) = self.cell_of(id) {
                    self.events.push(PuzzleEvent::PiecePickedUp { piece: id, row, col });
                }
            }
            InteractionResult::Placed(id) => self.push_placed(id),
            InteractionResult::Solved(id) => {
                self.push_placed(id);
                if let Some(info) = self.level {
                    self.events.push(PuzzleEvent::Solved { level: info.level });
                }
            }
            InteractionResult::Moved(_) | InteractionResult::Released(_) | InteractionResult::None => {}
        }
        result.changed()
    }

    fn push_placed(&mut self, id: PieceId) {
        if let Some((row, col)) = self.cell_of(id) {
            self.events.push(PuzzleEvent::PiecePlaced { piece: id, row, col });
        }
    }

    fn cell_of(&self, id: PieceId) -> Option<(u32, u32)> {
        self.pieces.by_id(id).map(|p| (p.row(), p.col()))
    }

    // ---- Output ----

    /// Everything the render pipeline needs for the current state.
    pub fn frame(&self) -> FrameView<'_> {
        FrameView {
            viewport: self.viewport,
            puzzle_rect: self.puzzle_rect(),
            pieces: &self.pieces,
            image: self.level.map(|info| info.image),
        }
    }

    pub fn render<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        pipeline::render(surface, &self.frame());
    }

    /// Take all events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<PuzzleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[PuzzleEvent] {
        &self.events
    }

    // ---- Accessors ----

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn pieces(&self) -> &PieceSet {
        &self.pieces
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn puzzle_rect(&self) -> Option<Rect> {
        self.layout.as_ref().map(|l| l.puzzle_rect)
    }

    pub fn level(&self) -> Option<u32> {
        self.level.map(|info| info.level)
    }

    pub fn pending_level(&self) -> Option<u32> {
        self.pending
    }

    pub fn phase(&self) -> DragPhase {
        self.controller.phase()
    }

    pub fn is_dragging(&self) -> bool {
        self.controller.is_dragging()
    }

    pub fn is_solved(&self) -> bool {
        self.controller.is_solved()
    }
}
