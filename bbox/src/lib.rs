//! Safe bounding box types and functions.
//!
//! Boxes are expressed with the x axis first, the way YOLO and DOTA label
//! files order their fields.

mod common;

pub mod into_cxcywh;
pub use into_cxcywh::*;

pub use transform::*;
mod transform;

pub use rect::*;
pub mod rect;

pub use xyxy::*;
pub mod xyxy;

pub use cxcywh::*;
pub mod cxcywh;

pub use wh::*;
pub mod wh;

pub use quad::*;
pub mod quad;

pub mod prelude {
    pub use crate::rect::{Rect, RectFloat, RectNum};
}
