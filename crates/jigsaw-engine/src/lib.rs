pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod assets;

// Re-export key types at crate root for convenience
pub use api::config::{PuzzleConfig, Viewport, ChromeInsets, PieceCountPolicy};
pub use api::engine::{PuzzleEngine, AssetRequest};
pub use api::types::{PieceId, PuzzleEvent, WireEvent, pack_events};
pub use assets::catalog::{LevelCatalog, ImageSize};
pub use assets::error::LoadError;
pub use components::layer::DrawLayer;
pub use components::piece::{Piece, EdgeTabs, TabPolarity};
pub use crate::core::pieces::{PieceSet, PieceHandle};
pub use crate::core::rect::Rect;
pub use crate::core::rng::{RandomSource, Rng};
pub use input::event::{InputEvent, primary_touch};
pub use renderer::{
    DrawSurface, Color, StrokeStyle, Shadow, FrameView, render,
    RecordingSurface, DrawCommand, MeshSurface, MeshVertex,
};
pub use systems::outline::{generate_outline, OutlinePath, OutlineCommand};
pub use systems::grid::{plan_grid, GridPlan, TabPlan};
pub use systems::layout::{Layout, SafeZones};
pub use systems::interaction::{InteractionController, DragPhase, DragBounds, InteractionResult};
