use super::XyXy;
use crate::common::*;

/// The generic rectangle.
pub trait Rect {
    type Type;

    fn xmin(&self) -> Self::Type;
    fn ymin(&self) -> Self::Type;
    fn xmax(&self) -> Self::Type;
    fn ymax(&self) -> Self::Type;
    fn cx(&self) -> Self::Type;
    fn cy(&self) -> Self::Type;
    fn w(&self) -> Self::Type;
    fn h(&self) -> Self::Type;

    fn try_from_xyxy(xyxy: [Self::Type; 4]) -> Result<Self>
    where
        Self: Sized;

    fn try_from_cxcywh(cxcywh: [Self::Type; 4]) -> Result<Self>
    where
        Self: Sized;
}

pub trait RectNum: Rect
where
    Self::Type: Num + PartialOrd,
{
    fn from_xyxy(xyxy: [Self::Type; 4]) -> Self
    where
        Self: Sized,
    {
        Self::try_from_xyxy(xyxy).unwrap()
    }

    fn from_cxcywh(cxcywh: [Self::Type; 4]) -> Self
    where
        Self: Sized,
    {
        Self::try_from_cxcywh(cxcywh).unwrap()
    }

    fn cxcywh(&self) -> [Self::Type; 4] {
        [self.cx(), self.cy(), self.w(), self.h()]
    }

    fn xyxy(&self) -> [Self::Type; 4] {
        [self.xmin(), self.ymin(), self.xmax(), self.ymax()]
    }
}

pub trait RectFloat: RectNum
where
    Self::Type: Float,
{
    /// Clip this box against another one.
    ///
    /// Returns `None` if the intersection has no area.
    fn intersect_with<R>(&self, other: &R) -> Option<XyXy<Self::Type>>
    where
        R: Rect<Type = Self::Type>,
    {
        let xmin = self.xmin().max(other.xmin());
        let ymin = self.ymin().max(other.ymin());
        let xmax = self.xmax().min(other.xmax());
        let ymax = self.ymax().min(other.ymax());
        (xmax > xmin && ymax > ymin).then(|| XyXy {
            xmin,
            ymin,
            xmax,
            ymax,
        })
    }
}

impl<T> RectNum for T
where
    T: Rect,
    T::Type: Num + PartialOrd,
{
}

impl<T> RectFloat for T
where
    T: Rect,
    T::Type: Float,
{
}
