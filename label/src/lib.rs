use bbox::{Transform, XyXy};
use num_traits::Num;
use std::ops::Mul;

pub mod dota;
pub mod yolo;

pub use dota::DotaObject;
pub use yolo::YoloLabel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label<R, C> {
    pub rect: R,
    pub class: C,
}

impl<'a, T, C> Mul<&'a Label<XyXy<T>, C>> for &'a Transform<T>
where
    T: Copy + Num + PartialOrd,
    C: Copy,
{
    type Output = Label<XyXy<T>, C>;

    fn mul(self, rhs: &'a Label<XyXy<T>, C>) -> Self::Output {
        Label {
            rect: self * &rhs.rect,
            class: rhs.class,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbox::prelude::*;

    #[test]
    fn transform_keeps_class() {
        let label = Label {
            rect: XyXy::from_xyxy([830.0, 20.0, 900.0, 60.0]),
            class: 6usize,
        };
        let moved = &Transform::translation(-824.0, 0.0) * &label;
        assert_eq!(moved.class, 6);
        assert_eq!(moved.rect.xyxy(), [6.0, 20.0, 76.0, 60.0]);
    }
}
