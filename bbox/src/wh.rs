use crate::common::*;

/// The width and height of a frame, such as an image or a tile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WH<T> {
    w: T,
    h: T,
}

impl<T> WH<T>
where
    T: Num + PartialOrd + Copy,
{
    pub fn try_from_wh(wh: [T; 2]) -> Result<Self> {
        let [w, h] = wh;
        let zero = T::zero();
        ensure!(
            w >= zero && h >= zero,
            "width and height parameters must be non-negative"
        );
        Ok(Self { w, h })
    }

    pub fn from_wh(wh: [T; 2]) -> Self {
        Self::try_from_wh(wh).unwrap()
    }

    pub fn w(&self) -> T {
        self.w
    }

    pub fn h(&self) -> T {
        self.h
    }
}
