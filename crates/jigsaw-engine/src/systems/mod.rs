pub mod outline;
pub mod grid;
pub mod layout;
pub mod interaction;
