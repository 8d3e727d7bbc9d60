//! Dataset preparation for DOTA aerial imagery.
//!
//! The pipeline converts oriented DOTA labels into normalized axis-aligned
//! labels, cuts large images into overlapping square tiles with re-projected
//! labels, partitions samples into train and validation sets and collects
//! dataset statistics.

mod common;
pub mod classes;
pub mod config;
pub mod convert;
pub mod label_io;
pub mod ratio;
pub mod report;
pub mod sample;
pub mod split;
pub mod stats;
pub mod tiling;

pub use classes::DotaClass;
pub use config::Config;
