use super::XyXy;
use crate::common::*;

/// Oriented box given by four arbitrary vertices, as found in DOTA labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quad<T> {
    points: [[T; 2]; 4],
}

impl<T> Quad<T>
where
    T: Float,
{
    /// Build from the flat `x1 y1 x2 y2 x3 y3 x4 y4` layout.
    pub fn from_coords(coords: [T; 8]) -> Self {
        let [x1, y1, x2, y2, x3, y3, x4, y4] = coords;
        Self {
            points: [[x1, y1], [x2, y2], [x3, y3], [x4, y4]],
        }
    }

    /// The axis-aligned bounds of the vertices.
    pub fn to_xyxy(&self) -> XyXy<T> {
        let [[x, y], rest @ ..] = self.points;
        let init = XyXy {
            xmin: x,
            ymin: y,
            xmax: x,
            ymax: y,
        };

        rest.iter().fold(init, |bounds, &[x, y]| XyXy {
            xmin: bounds.xmin.min(x),
            ymin: bounds.ymin.min(y),
            xmax: bounds.xmax.max(x),
            ymax: bounds.ymax.max(y),
        })
    }
}
