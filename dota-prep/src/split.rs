//! Seeded partition of tile pairs into train and validation sets.

use crate::{
    common::*,
    config::SplitConfig,
    ratio::Ratio,
    sample::{self, SampleKey},
};
use rand::{rngs::StdRng, seq::SliceRandom as _, SeedableRng as _};
use strum::{Display, EnumIter, IntoEnumIterator as _};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Subset {
    Train,
    Val,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SplitSummary {
    pub train: usize,
    pub val: usize,
    /// Images copied without a label file.
    pub labels_missing: usize,
}

/// Copies image and label pairs into `images/{train,val}` and
/// `labels/{train,val}` under the output directory.
#[derive(Debug, Clone)]
pub struct TrainValSplitter {
    images_dir: PathBuf,
    labels_dir: PathBuf,
    output_dir: PathBuf,
    val_ratio: Ratio,
    seed: u64,
}

impl TrainValSplitter {
    pub fn new(
        images_dir: impl AsRef<Path>,
        labels_dir: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        config: &SplitConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            images_dir: images_dir.as_ref().to_owned(),
            labels_dir: labels_dir.as_ref().to_owned(),
            output_dir: output_dir.as_ref().to_owned(),
            val_ratio: config.val_ratio,
            seed: config.seed,
        })
    }

    pub fn images_dir(&self, subset: Subset) -> PathBuf {
        self.output_dir.join("images").join(subset.to_string())
    }

    pub fn labels_dir(&self, subset: Subset) -> PathBuf {
        self.output_dir.join("labels").join(subset.to_string())
    }

    pub fn split(&self) -> Result<SplitSummary> {
        for subset in Subset::iter() {
            for dir in [self.images_dir(subset), self.labels_dir(subset)] {
                fs::create_dir_all(&dir).with_context(|| {
                    format!("unable to create output directory '{}'", dir.display())
                })?;
            }
        }

        let image_files = sample::list_images(&self.images_dir)?;
        let (train, val) = self.partition(image_files);
        info!("split into {} train and {} val samples", train.len(), val.len());

        let mut summary = SplitSummary::default();
        summary.labels_missing += self.copy_pairs(&train, Subset::Train)?;
        summary.labels_missing += self.copy_pairs(&val, Subset::Val)?;
        summary.train = train.len();
        summary.val = val.len();
        Ok(summary)
    }

    /// Shuffle `image_files` deterministically and cut them into train and
    /// validation parts.
    ///
    /// The outcome depends only on the set of file names and the seed.
    pub fn partition(&self, mut image_files: Vec<PathBuf>) -> (Vec<PathBuf>, Vec<PathBuf>) {
        image_files.sort_by(|lhs, rhs| lhs.file_name().cmp(&rhs.file_name()));
        let mut rng = StdRng::seed_from_u64(self.seed);
        image_files.shuffle(&mut rng);

        let split_idx = (image_files.len() as f64 * self.val_ratio.complement().to_f64()) as usize;
        let val = image_files.split_off(split_idx.min(image_files.len()));
        (image_files, val)
    }

    /// Copy images and their labels into a subset, returning the number of
    /// images without a label file.
    fn copy_pairs(&self, image_files: &[PathBuf], subset: Subset) -> Result<usize> {
        let images_dir = self.images_dir(subset);
        let labels_dir = self.labels_dir(subset);
        let mut labels_missing = 0;

        for image_file in image_files {
            let file_name = image_file
                .file_name()
                .ok_or_else(|| format_err!("'{}' has no file name", image_file.display()))?;
            fs::copy(image_file, images_dir.join(file_name))
                .with_context(|| format!("unable to copy '{}'", image_file.display()))?;

            let key = match SampleKey::from_path(image_file) {
                Ok(key) => key,
                Err(err) => {
                    warn!("{:#}, its label file is not copied", err);
                    labels_missing += 1;
                    continue;
                }
            };
            let label_file = key.label_path(&self.labels_dir);
            if label_file.is_file() {
                fs::copy(&label_file, key.label_path(&labels_dir))
                    .with_context(|| format!("unable to copy '{}'", label_file.display()))?;
            } else {
                warn!("no label file for '{}'", image_file.display());
                labels_missing += 1;
            }
        }

        Ok(labels_missing)
    }
}
