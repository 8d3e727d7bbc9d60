//! Cutting large images into overlapping square tiles.

mod engine;
mod grid;
mod projector;

pub use engine::*;
pub use grid::*;
pub use projector::*;
