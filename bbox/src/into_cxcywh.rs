use crate::{common::*, rect::Rect, CxCyWH};

/// Unchecked bounding box in CxCyWH format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CxCyWH_<T> {
    pub cx: T,
    pub cy: T,
    pub w: T,
    pub h: T,
}

impl<T> TryFrom<&CxCyWH_<T>> for CxCyWH<T>
where
    T: Copy + Num + PartialOrd,
{
    type Error = anyhow::Error;

    fn try_from(from: &CxCyWH_<T>) -> Result<Self, Self::Error> {
        let CxCyWH_ { cx, cy, w, h } = *from;
        Self::try_from_cxcywh([cx, cy, w, h])
    }
}

impl<T> TryFrom<CxCyWH_<T>> for CxCyWH<T>
where
    T: Copy + Num + PartialOrd,
{
    type Error = anyhow::Error;

    fn try_from(from: CxCyWH_<T>) -> Result<Self, Self::Error> {
        Self::try_from(&from)
    }
}
