pub mod event;

pub use event::{primary_touch, InputEvent};
