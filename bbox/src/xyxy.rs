use super::{CxCyWH, Rect, WH};
use crate::{common::*, Transform};

/// Bounding box in XyXy (corner) format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct XyXy<T> {
    pub(crate) xmin: T,
    pub(crate) ymin: T,
    pub(crate) xmax: T,
    pub(crate) ymax: T,
}

impl<T> XyXy<T>
where
    T: Copy + Num + PartialOrd,
{
    pub fn transform(&self, transform: &Transform<T>) -> Self {
        XyXy {
            xmin: self.xmin * transform.sx + transform.tx,
            ymin: self.ymin * transform.sy + transform.ty,
            xmax: self.xmax * transform.sx + transform.tx,
            ymax: self.ymax * transform.sy + transform.ty,
        }
    }

    /// Express the box relative to a frame of the given size.
    ///
    /// The center and size are divided by the frame width and height. The
    /// result is not clamped to the unit square.
    pub fn to_normalized(&self, frame: &WH<T>) -> CxCyWH<T> {
        let two = T::one() + T::one();
        let Self {
            xmin,
            ymin,
            xmax,
            ymax,
        } = *self;

        CxCyWH {
            cx: ((xmin + xmax) / two) / frame.w(),
            cy: ((ymin + ymax) / two) / frame.h(),
            w: (xmax - xmin) / frame.w(),
            h: (ymax - ymin) / frame.h(),
        }
    }
}

impl<T> Rect for XyXy<T>
where
    T: Copy + Num + PartialOrd,
{
    type Type = T;

    fn xmin(&self) -> Self::Type {
        self.xmin
    }

    fn ymin(&self) -> Self::Type {
        self.ymin
    }

    fn xmax(&self) -> Self::Type {
        self.xmax
    }

    fn ymax(&self) -> Self::Type {
        self.ymax
    }

    fn cx(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.xmin + self.w() / two
    }

    fn cy(&self) -> Self::Type {
        let two = T::one() + T::one();
        self.ymin + self.h() / two
    }

    fn w(&self) -> Self::Type {
        self.xmax - self.xmin
    }

    fn h(&self) -> Self::Type {
        self.ymax - self.ymin
    }

    fn try_from_xyxy(xyxy: [Self::Type; 4]) -> Result<Self> {
        let [xmin, ymin, xmax, ymax] = xyxy;
        ensure!(
            xmax >= xmin && ymax >= ymin,
            "xmax >= xmin and ymax >= ymin must hold"
        );

        Ok(Self {
            xmin,
            ymin,
            xmax,
            ymax,
        })
    }

    fn try_from_cxcywh(cxcywh: [Self::Type; 4]) -> Result<Self> {
        let [cx, cy, w, h] = cxcywh;
        let zero = T::zero();
        ensure!(w >= zero && h >= zero, "w and h must be non-negative");

        let two = T::one() + T::one();
        let xmin = cx - w / two;
        let ymin = cy - h / two;
        let xmax = cx + w / two;
        let ymax = cy + h / two;

        Ok(Self {
            xmin,
            ymin,
            xmax,
            ymax,
        })
    }
}

impl<T> From<&CxCyWH<T>> for XyXy<T>
where
    T: Copy + Num,
{
    fn from(from: &CxCyWH<T>) -> Self {
        let two = T::one() + T::one();
        let CxCyWH { cx, cy, w, h } = *from;
        let xmin = cx - w / two;
        let ymin = cy - h / two;
        let xmax = cx + w / two;
        let ymax = cy + h / two;
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RectNum;
    use approx::assert_abs_diff_eq;

    #[test]
    fn reject_inverted_corners() {
        assert!(XyXy::try_from_xyxy([10.0, 0.0, 5.0, 3.0]).is_err());
        assert!(XyXy::try_from_xyxy([0.0, 0.0, 2.0, -1.0]).is_err());
        assert!(XyXy::try_from_cxcywh([0.0, 0.0, 2.0, -1.0]).is_err());
    }

    #[test]
    fn normalize_against_frame() {
        let rect = XyXy::from_xyxy([540.0, 540.0, 660.0, 660.0]);
        let frame = WH::from_wh([1024.0, 1024.0]);
        let [cx, cy, w, h] = rect.to_normalized(&frame).cxcywh();
        assert_abs_diff_eq!(cx, 0.5859375);
        assert_abs_diff_eq!(cy, 0.5859375);
        assert_abs_diff_eq!(w, 0.1171875);
        assert_abs_diff_eq!(h, 0.1171875);
    }

    #[test]
    fn translate_by_transform() {
        let rect = XyXy::from_xyxy([830.0, 20.0, 900.0, 60.0]);
        let moved = rect.transform(&Transform::translation(-824.0, 0.0));
        assert_eq!(moved.xyxy(), [6.0, 20.0, 76.0, 60.0]);
    }
}
