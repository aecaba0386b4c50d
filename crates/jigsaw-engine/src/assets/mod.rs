pub mod catalog;
pub mod error;

pub use catalog::{ImageSize, LevelCatalog};
pub use error::LoadError;
