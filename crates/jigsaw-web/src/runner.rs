use jigsaw_engine::{
    pack_events, AssetRequest, ImageSize, InputEvent, LevelCatalog, LoadError, PuzzleConfig, PuzzleEngine, Viewport,
};
use web_sys::HtmlImageElement;
use crate::canvas::CanvasSurface;

/// Couples one `PuzzleEngine` to one canvas.
///
/// Lives in a `thread_local!` because wasm-bindgen cannot export generic
/// structs or hold borrowed state across calls. Every mutating call redraws
/// synchronously when the engine reports a change.
pub struct PuzzleRunner {
    engine: PuzzleEngine,
    surface: CanvasSurface,
}

impl PuzzleRunner {
    pub fn new(mut config: PuzzleConfig, catalog: LevelCatalog, surface: CanvasSurface) -> Self {
        config.viewport = surface.viewport();
        Self {
            engine: PuzzleEngine::new(config, catalog),
            surface,
        }
    }

    pub fn request_level(&mut self, level: u32) -> Result<AssetRequest, LoadError> {
        self.engine.request_level(level)
    }

    /// The image for `level` finished loading.
    pub fn image_loaded(&mut self, level: u32, image: HtmlImageElement) {
        let size = ImageSize::new(image.natural_width() as f32, image.natural_height() as f32);
        match self.engine.complete_level(level, Ok(size)) {
            Ok(()) => {
                self.surface.set_image(Some(image));
                self.redraw();
            }
            Err(err) => log::warn!("level {} not started: {}", level, err),
        }
    }

    /// The image for `level` could not be loaded.
    pub fn image_failed(&mut self, level: u32, path: &str) {
        let err = LoadError::Decode(format!("could not load {}", path));
        if let Err(err) = self.engine.complete_level(level, Err(err)) {
            log::warn!("level {}: {}", level, err);
        }
    }

    pub fn handle(&mut self, event: InputEvent) {
        if let InputEvent::Resize { width, height } = event {
            self.surface.set_size(Viewport::new(width, height));
        }
        if self.engine.handle(event) {
            self.redraw();
        }
    }

    pub fn redraw(&mut self) {
        self.engine.render(&mut self.surface);
    }

    /// Pending events as flat `[kind, a, b, c]` quads.
    pub fn take_events(&mut self) -> Vec<f32> {
        pack_events(&self.engine.drain_events())
    }

    pub fn level(&self) -> u32 {
        self.engine.level().unwrap_or(0)
    }

    pub fn is_solved(&self) -> bool {
        self.engine.is_solved()
    }

    pub fn locked_count(&self) -> u32 {
        self.engine.pieces().locked_count() as u32
    }

    pub fn piece_count(&self) -> u32 {
        self.engine.pieces().len() as u32
    }
}
