pub mod layer;
pub mod piece;
