/// Why a level could not be loaded. The engine keeps its previous state on
/// any of these, and a fresh request is always allowed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error("image decode failed: {0}")]
    Decode(String),
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: f32, height: f32 },
    #[error("level catalog is empty")]
    NoAssets,
    #[error("image for level {requested} arrived after level {pending} was requested")]
    Superseded { requested: u32, pending: u32 },
    #[error("no image was requested for level {0}")]
    NotRequested(u32),
}
