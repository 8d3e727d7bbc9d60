//! The DOTA v1.0 category set.

use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString, FromRepr, IntoStaticStr};

/// The 15 DOTA v1.0 categories.
///
/// The discriminant is the class index written to normalized label files.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    AsRefStr,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    FromRepr,
    IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
#[repr(usize)]
pub enum DotaClass {
    Plane = 0,
    BaseballDiamond,
    Bridge,
    GroundTrackField,
    SmallVehicle,
    LargeVehicle,
    Ship,
    TennisCourt,
    BasketballCourt,
    StorageTank,
    SoccerBallField,
    Roundabout,
    Harbor,
    SwimmingPool,
    Helicopter,
}

impl DotaClass {
    pub fn id(self) -> usize {
        self as usize
    }

    pub fn from_id(id: usize) -> Option<Self> {
        Self::from_repr(id)
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// The name of a class index, or `unknown` outside the category set.
pub fn class_name(id: usize) -> &'static str {
    DotaClass::from_id(id)
        .map(DotaClass::name)
        .unwrap_or("unknown")
}
