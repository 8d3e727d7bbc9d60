//! Pipeline configuration format.

use crate::common::*;

pub use convert::*;
pub use split::*;
pub use tiling::*;

/// The main configuration. Every section falls back to its defaults when
/// omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub convert: ConvertConfig,
    pub tiling: TilingConfig,
    pub split: SplitConfig,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file '{}'", path.display()))?;
        let config: Self = json5::from_str(&text)
            .with_context(|| format!("unable to parse config file '{}'", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.tiling.validate()?;
        self.split.validate()?;
        Ok(())
    }
}

mod convert {
    use super::*;

    /// OBB to HBB conversion options.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct ConvertConfig {
        /// Drop objects flagged as difficult.
        pub ignore_difficult: bool,
    }

    impl Default for ConvertConfig {
        fn default() -> Self {
            Self {
                ignore_difficult: true,
            }
        }
    }
}

mod tiling {
    use super::*;
    use crate::tiling::TileGrid;

    /// Tiling options, in pixels.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct TilingConfig {
        /// The side length of square tiles.
        pub tile_size: u32,
        /// The number of pixels shared by adjacent tiles.
        pub overlap: u32,
        /// Clipped boxes narrower or shorter than this are dropped.
        pub min_box_size: u32,
    }

    impl TilingConfig {
        pub fn validate(&self) -> Result<()> {
            ensure!(self.tile_size > 0, "tile_size must be positive");
            ensure!(
                self.overlap < self.tile_size,
                "overlap ({}) must be less than tile_size ({})",
                self.overlap,
                self.tile_size
            );
            Ok(())
        }

        pub fn stride(&self) -> u32 {
            self.tile_size - self.overlap
        }

        /// Plan the tile grid of an image of the given size.
        pub fn grid(&self, image_w: u32, image_h: u32) -> Result<TileGrid> {
            TileGrid::new(image_w, image_h, self.tile_size, self.overlap)
        }
    }

    impl Default for TilingConfig {
        fn default() -> Self {
            Self {
                tile_size: 1024,
                overlap: 200,
                min_box_size: 10,
            }
        }
    }
}

mod split {
    use super::*;
    use crate::ratio::Ratio;

    /// Train and validation partition options.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct SplitConfig {
        /// The fraction of samples assigned to the validation set.
        pub val_ratio: Ratio,
        /// The shuffle seed.
        pub seed: u64,
    }

    impl SplitConfig {
        pub fn validate(&self) -> Result<()> {
            let val_ratio = self.val_ratio.to_f64();
            ensure!(
                val_ratio > 0.0 && val_ratio < 1.0,
                "val_ratio must be within range (0.0, 1.0), but get {}",
                val_ratio
            );
            Ok(())
        }
    }

    impl Default for SplitConfig {
        fn default() -> Self {
            Self {
                val_ratio: Ratio::try_from(0.2).unwrap(),
                seed: 42,
            }
        }
    }
}
