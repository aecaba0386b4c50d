pub mod traits;
pub mod pipeline;
pub mod recording;
pub mod mesh;

pub use traits::{Color, DrawSurface, Shadow, StrokeStyle};
pub use pipeline::{render, FrameView};
pub use recording::{DrawCommand, RecordingSurface};
pub use mesh::{MeshSurface, MeshVertex};
