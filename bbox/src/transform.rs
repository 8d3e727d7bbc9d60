use super::{CxCyWH, XyXy};
use crate::common::*;

/// Axis-aligned scaling followed by translation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transform<T> {
    pub sx: T,
    pub sy: T,
    pub tx: T,
    pub ty: T,
}

impl<T> Transform<T>
where
    T: Copy + Num,
{
    pub fn identity() -> Self {
        Self {
            sx: T::one(),
            sy: T::one(),
            tx: T::zero(),
            ty: T::zero(),
        }
    }

    pub fn translation(tx: T, ty: T) -> Self {
        Self {
            tx,
            ty,
            ..Self::identity()
        }
    }

    pub fn scaling(sx: T, sy: T) -> Self {
        Self {
            sx,
            sy,
            ..Self::identity()
        }
    }
}

impl<T> Mul<&XyXy<T>> for &Transform<T>
where
    T: Copy + Num + PartialOrd,
{
    type Output = XyXy<T>;

    fn mul(self, rhs: &XyXy<T>) -> Self::Output {
        rhs.transform(self)
    }
}

impl<T> Mul<&CxCyWH<T>> for &Transform<T>
where
    T: Copy + Num + PartialOrd,
{
    type Output = CxCyWH<T>;

    fn mul(self, rhs: &CxCyWH<T>) -> Self::Output {
        rhs.transform(self)
    }
}
