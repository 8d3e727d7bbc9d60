use super::{Rect, WH, XyXy};
use crate::{common::*, Transform};

/// Bounding box in CxCyWH (center and size) format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CxCyWH<T> {
    pub(crate) cx: T,
    pub(crate) cy: T,
    pub(crate) w: T,
    pub(crate) h: T,
}

impl<T> CxCyWH<T>
where
    T: Copy + Num + PartialOrd,
{
    pub fn transform(&self, transform: &Transform<T>) -> Self {
        CxCyWH {
            cx: self.cx * transform.sx + transform.tx,
            cy: self.cy * transform.sy + transform.ty,
            w: self.w * transform.sx,
            h: self.h * transform.sy,
        }
    }

    /// Map a box normalized against `frame` back to absolute corners.
    ///
    /// `xmin = cx * W - w * W / 2` and so on. No clamping is performed.
    pub fn to_pixel(&self, frame: &WH<T>) -> XyXy<T> {
        let scaled = &Transform::scaling(frame.w(), frame.h()) * self;
        XyXy::from(&scaled)
    }
}

impl<T> Rect for CxCyWH<T>
where
    T: Copy + Num + PartialOrd,
{
    type Type = T;

    fn xmin(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.cx - self.w / two
    }

    fn ymin(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.cy - self.h / two
    }

    fn xmax(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.cx + self.w / two
    }

    fn ymax(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.cy + self.h / two
    }

    fn cx(&self) -> Self::Type {
        self.cx
    }

    fn cy(&self) -> Self::Type {
        self.cy
    }

    fn w(&self) -> Self::Type {
        self.w
    }

    fn h(&self) -> Self::Type {
        self.h
    }

    fn try_from_xyxy(xyxy: [T; 4]) -> Result<Self> {
        let [xmin, ymin, xmax, ymax] = xyxy;
        let zero = T::zero();
        let two = T::one() + T::one();
        let w = xmax - xmin;
        let h = ymax - ymin;
        ensure!(
            w >= zero && h >= zero,
            "box width and height must be non-negative"
        );
        let cx = xmin + w / two;
        let cy = ymin + h / two;

        Ok(Self { cx, cy, w, h })
    }

    fn try_from_cxcywh(cxcywh: [T; 4]) -> Result<Self> {
        let [cx, cy, w, h] = cxcywh;
        let zero = T::zero();
        ensure!(
            w >= zero && h >= zero,
            "box width and height must be non-negative"
        );

        Ok(Self { cx, cy, w, h })
    }
}
