use super::{BoxProjector, PixelLabel, TileGrid, TileWindow};
use crate::{
    common::*,
    config::TilingConfig,
    label_io,
    report::{SkipReason, Skips},
    sample::{self, SampleKey, TILE_EXTENSION},
};
use image::{DynamicImage, GenericImageView as _, ImageFormat};

/// Outcome counts of a tiling run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TilingReport {
    /// Source images that were decoded and tiled.
    pub images: usize,
    pub tiles_written: usize,
    /// Tiles dropped because no box survived the projection.
    pub tiles_discarded: usize,
    pub boxes_written: usize,
    pub skips: Skips,
}

impl TilingReport {
    pub fn merge(&mut self, other: TilingReport) {
        self.images += other.images;
        self.tiles_written += other.tiles_written;
        self.tiles_discarded += other.tiles_discarded;
        self.boxes_written += other.boxes_written;
        self.skips.merge(other.skips);
    }
}

/// A cropped tile with its tile-local labels.
#[derive(Debug, Clone)]
pub struct Tile {
    pub key: SampleKey,
    pub window: TileWindow,
    pub image: DynamicImage,
    pub labels: Vec<YoloLabel>,
}

/// Splits image and label pairs into tile pairs.
#[derive(Debug, Clone)]
pub struct Tiler {
    images_dir: PathBuf,
    labels_dir: PathBuf,
    output_images_dir: PathBuf,
    output_labels_dir: PathBuf,
    config: TilingConfig,
    projector: BoxProjector,
}

impl Tiler {
    pub fn new(
        images_dir: impl AsRef<Path>,
        labels_dir: impl AsRef<Path>,
        output_images_dir: impl AsRef<Path>,
        output_labels_dir: impl AsRef<Path>,
        config: &TilingConfig,
    ) -> Result<Self> {
        config.validate()?;
        let output_images_dir = output_images_dir.as_ref();
        let output_labels_dir = output_labels_dir.as_ref();
        for dir in [output_images_dir, output_labels_dir] {
            fs::create_dir_all(dir).with_context(|| {
                format!("unable to create output directory '{}'", dir.display())
            })?;
        }

        Ok(Self {
            images_dir: images_dir.as_ref().to_owned(),
            labels_dir: labels_dir.as_ref().to_owned(),
            output_images_dir: output_images_dir.to_owned(),
            output_labels_dir: output_labels_dir.to_owned(),
            config: config.clone(),
            projector: BoxProjector::new(config.min_box_size),
        })
    }

    /// Tile every image in the image directory in file name order.
    ///
    /// Tiles are named after the source stem, so only the first image of a
    /// stem is tiled. Later images sharing it are skipped.
    pub fn tile_all(&self) -> Result<TilingReport> {
        let image_files = sample::list_images(&self.images_dir)?;
        info!(
            "tiling {} images from '{}'",
            image_files.len(),
            self.images_dir.display()
        );

        let mut report = TilingReport::default();
        let mut seen = IndexSet::new();
        for image_file in &image_files {
            if let Ok(key) = SampleKey::from_path(image_file) {
                if let Some(first) = seen.get(&key) {
                    report.skips.record(
                        image_file,
                        None,
                        SkipReason::DuplicateStem,
                        format!("stem '{}' is already taken by another image", first),
                    );
                    continue;
                }
                seen.insert(key);
            }
            report.merge(self.tile_single(image_file)?);
        }

        info!(
            "wrote {} tiles with {} boxes, discarded {} empty tiles, skipped {} inputs",
            report.tiles_written,
            report.boxes_written,
            report.tiles_discarded,
            report.skips.total()
        );
        Ok(report)
    }

    /// Tile one source image.
    ///
    /// Failures specific to this image are recorded in the returned report.
    pub fn tile_single(&self, image_file: &Path) -> Result<TilingReport> {
        let mut report = TilingReport::default();
        let key = match SampleKey::from_path(image_file) {
            Ok(key) => key,
            Err(err) => {
                report
                    .skips
                    .record(image_file, None, SkipReason::InvalidFileName, err);
                return Ok(report);
            }
        };

        let image = match image::open(image_file) {
            Ok(image) => image,
            Err(err) => {
                report
                    .skips
                    .record(image_file, None, SkipReason::UnreadableImage, err);
                return Ok(report);
            }
        };

        let label_file = key.label_path(&self.labels_dir);
        let labels = if label_file.is_file() {
            match label_io::load_labels(&label_file, &mut report.skips) {
                Ok(labels) => labels,
                Err(err) => {
                    report.skips.record(
                        &label_file,
                        None,
                        SkipReason::UnreadableLabels,
                        format!("{:#}", err),
                    );
                    return Ok(report);
                }
            }
        } else {
            report.skips.record(
                &label_file,
                None,
                SkipReason::MissingLabels,
                "no label file, treated as unannotated",
            );
            vec![]
        };

        for tile in self.tiles(&key, &image, &labels, &mut report.tiles_discarded)? {
            match self.save_tile(&tile) {
                Ok(()) => {
                    report.tiles_written += 1;
                    report.boxes_written += tile.labels.len();
                }
                Err(err) => {
                    let path = tile.key.file_path(&self.output_images_dir, TILE_EXTENSION);
                    report
                        .skips
                        .record(&path, None, SkipReason::WriteFailed, format!("{:#}", err));
                }
            }
        }

        debug!(
            "tiled '{}' ({}x{}) with {} labels",
            image_file.display(),
            image.width(),
            image.height(),
            labels.len()
        );
        report.images += 1;
        Ok(report)
    }

    /// Produce the non-empty tiles of an image in row-major order.
    ///
    /// Tiles whose label set is empty are counted in `discarded` and not
    /// cropped.
    pub fn tiles<'a>(
        &'a self,
        key: &'a SampleKey,
        image: &'a DynamicImage,
        labels: &[YoloLabel],
        discarded: &'a mut usize,
    ) -> Result<impl Iterator<Item = Tile> + 'a> {
        let (image_w, image_h) = image.dimensions();
        let frame = WH::from_wh([image_w as f64, image_h as f64]);
        let pixel_labels: Vec<PixelLabel> = labels
            .iter()
            .map(|label| Label {
                rect: label.rect.to_pixel(&frame),
                class: label.class,
            })
            .collect();
        let grid: TileGrid = self.config.grid(image_w, image_h)?;

        let tiles = grid.iter().filter_map(move |window| {
            let labels: Vec<YoloLabel> = pixel_labels
                .iter()
                .filter_map(|label| self.projector.project(label, &window))
                .collect();
            if labels.is_empty() {
                *discarded += 1;
                return None;
            }

            let cropped = image.crop_imm(window.x0, window.y0, window.width(), window.height());
            if cropped.width() == 0 || cropped.height() == 0 {
                *discarded += 1;
                return None;
            }

            Some(Tile {
                key: key.tile(window.xi, window.yi),
                window,
                image: cropped,
                labels,
            })
        });
        Ok(tiles)
    }

    /// Write the image and label file of a tile as a pair.
    ///
    /// Both files are staged next to their targets and renamed into place.
    /// If the label file cannot be committed, the tile image is removed again.
    pub fn save_tile(&self, tile: &Tile) -> Result<()> {
        let image_file = tile
            .key
            .file_path(&self.output_images_dir, TILE_EXTENSION);
        let label_file = tile.key.label_path(&self.output_labels_dir);

        let staged_image = stage(&image_file, |writer| {
            to_jpeg_compatible(&tile.image).write_to(writer, ImageFormat::Jpeg)?;
            Ok(())
        })?;
        let staged_label = match stage(&label_file, |writer| {
            writer.write_all(label_io::format_labels(&tile.labels).as_bytes())?;
            Ok(())
        }) {
            Ok(path) => path,
            Err(err) => {
                let _ = fs::remove_file(&staged_image);
                return Err(err);
            }
        };

        if let Err(err) = fs::rename(&staged_image, &image_file) {
            let _ = fs::remove_file(&staged_image);
            let _ = fs::remove_file(&staged_label);
            return Err(err)
                .with_context(|| format!("unable to write '{}'", image_file.display()));
        }
        if let Err(err) = fs::rename(&staged_label, &label_file) {
            let _ = fs::remove_file(&image_file);
            let _ = fs::remove_file(&staged_label);
            return Err(err)
                .with_context(|| format!("unable to write '{}'", label_file.display()));
        }

        Ok(())
    }
}

/// Write a staging file next to `path` and return the staging path.
fn stage<F>(path: &Path, write: F) -> Result<PathBuf>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let mut staging = path.as_os_str().to_owned();
    staging.push(".part");
    let staging = PathBuf::from(staging);

    let result = (|| -> Result<()> {
        let mut writer = BufWriter::new(File::create(&staging)?);
        write(&mut writer)?;
        writer.flush()?;
        Ok(())
    })();

    match result {
        Ok(()) => Ok(staging),
        Err(err) => {
            let _ = fs::remove_file(&staging);
            Err(err.context(format!("unable to write '{}'", path.display())))
        }
    }
}

/// JPEG stores 8-bit gray or RGB only.
fn to_jpeg_compatible(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => Cow::Borrowed(image),
        _ => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn convert_alpha_for_jpeg() {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 4])));
        let converted = to_jpeg_compatible(&rgba);
        assert!(matches!(&*converted, DynamicImage::ImageRgb8(_)));

        let rgb = DynamicImage::new_rgb8(2, 2);
        assert!(matches!(to_jpeg_compatible(&rgb), Cow::Borrowed(_)));
    }

    #[test]
    fn stage_then_discard_on_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let target = dir.path().join("a.txt");

        let staged = stage(&target, |writer| {
            writer.write_all(b"0 0.5 0.5 0.1 0.1")?;
            Ok(())
        })?;
        assert_eq!(staged, dir.path().join("a.txt.part"));
        assert!(staged.is_file() && !target.exists());

        let failed = stage(&dir.path().join("b.txt"), |_| bail!("encoder failure"));
        assert!(failed.is_err());
        assert!(!dir.path().join("b.txt.part").exists());
        Ok(())
    }
}
