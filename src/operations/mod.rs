pub mod creation;
pub mod drag;
pub mod edit;

pub use drag::{DragSession, DragTarget};
