use super::TileWindow;
use crate::common::*;

/// A label in absolute image pixels.
pub type PixelLabel = Label<XyXy<f64>, usize>;

/// Re-projects image-space boxes into the normalized frame of a tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxProjector {
    min_box_size: f64,
}

impl BoxProjector {
    pub fn new(min_box_size: u32) -> Self {
        Self {
            min_box_size: min_box_size as f64,
        }
    }

    /// Clip `label` to `window` and normalize it against the window size.
    ///
    /// Returns `None` if the clipped box is narrower or shorter than the
    /// minimum box size, including boxes that miss the window entirely.
    pub fn project(&self, label: &PixelLabel, window: &TileWindow) -> Option<YoloLabel> {
        let clipped = Label {
            rect: label.rect.intersect_with(&window.to_xyxy())?,
            class: label.class,
        };
        if clipped.rect.w() < self.min_box_size || clipped.rect.h() < self.min_box_size {
            return None;
        }

        let local = &Transform::translation(-(window.x0 as f64), -(window.y0 as f64)) * &clipped;
        let rect = local.rect.to_normalized(&window.frame());
        if rect.w() <= 0.0 || rect.h() <= 0.0 {
            return None;
        }

        Some(Label {
            rect,
            class: label.class,
        })
    }
}
