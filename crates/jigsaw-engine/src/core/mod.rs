pub mod pieces;
pub mod rect;
pub mod rng;
