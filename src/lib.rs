pub mod camera;
pub mod config;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod raycaster;
pub mod scene;
pub mod tessellation;

pub use error::{CadbaneError, Result};
