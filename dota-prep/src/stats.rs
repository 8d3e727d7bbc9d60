//! Statistics of a normalized label set.

use crate::{
    classes,
    common::*,
    label_io,
    report::{SkipReason, Skips},
    sample::{self, SampleKey},
};

/// Per-class statistics. Sizes are normalized to the image.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassStats {
    pub name: &'static str,
    /// Number of boxes of this class.
    pub objects: usize,
    /// Number of images containing at least one box of this class.
    pub images: usize,
    pub bbox_width_avg: f64,
    pub bbox_height_avg: f64,
    /// Mean of `w / h`, where boxes with zero height count as zero.
    pub aspect_ratio_avg: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetStats {
    pub total_images: usize,
    pub total_objects: usize,
    /// Keyed by class index in ascending order.
    pub classes: IndexMap<usize, ClassStats>,
    /// Object count of every annotated image, keyed by image file name.
    pub objects_per_image: IndexMap<String, usize>,
    /// Images without a label file or without any valid label line.
    pub empty_images: Vec<String>,
    pub malformed_lines: usize,
    /// Images left out because their file name is not valid UTF-8.
    pub skipped_images: usize,
}

#[derive(Debug, Default)]
struct ClassAccum {
    objects: usize,
    images: usize,
    width_sum: f64,
    height_sum: f64,
    aspect_sum: f64,
}

impl DatasetStats {
    /// Collect statistics over the images of `images_dir` and the matching
    /// label files in `labels_dir`.
    pub fn compute(images_dir: impl AsRef<Path>, labels_dir: impl AsRef<Path>) -> Result<Self> {
        let images_dir = images_dir.as_ref();
        let labels_dir = labels_dir.as_ref();
        let image_files = sample::list_images(images_dir)?;

        let mut skips = Skips::default();
        let mut samples = vec![];
        for image_file in &image_files {
            let file_name = image_file.file_name().and_then(|name| name.to_str());
            let (file_name, key) = match (file_name, SampleKey::from_path(image_file)) {
                (Some(file_name), Ok(key)) => (file_name.to_owned(), key),
                (_, result) => {
                    let detail = result.err().map(|err| format!("{:#}", err));
                    skips.record(
                        image_file,
                        None,
                        SkipReason::InvalidFileName,
                        detail.as_deref().unwrap_or("file name is not valid UTF-8"),
                    );
                    continue;
                }
            };
            let label_file = key.label_path(labels_dir);

            let labels = if label_file.is_file() {
                label_io::load_labels(&label_file, &mut skips).unwrap_or_else(|err| {
                    warn!("{:#}", err);
                    vec![]
                })
            } else {
                vec![]
            };
            samples.push((file_name, labels));
        }

        let mut stats = Self::from_samples(samples);
        stats.malformed_lines = skips.count(SkipReason::MalformedRecord);
        stats.skipped_images = skips.count(SkipReason::InvalidFileName);
        Ok(stats)
    }

    /// Collect statistics over `(image name, labels)` pairs.
    pub fn from_samples<I>(samples: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<YoloLabel>)>,
    {
        let mut stats = Self::default();
        let mut accums: IndexMap<usize, ClassAccum> = IndexMap::new();

        for (image_name, labels) in samples {
            stats.total_images += 1;
            if labels.is_empty() {
                stats.empty_images.push(image_name);
                continue;
            }

            for label in &labels {
                let [_, _, w, h] = label.rect.cxcywh();
                let accum = accums.entry(label.class).or_default();
                accum.objects += 1;
                accum.width_sum += w;
                accum.height_sum += h;
                accum.aspect_sum += if h > 0.0 { w / h } else { 0.0 };
            }
            for class in labels.iter().map(|label| label.class).unique() {
                accums.entry(class).or_default().images += 1;
            }

            stats.total_objects += labels.len();
            *stats.objects_per_image.entry(image_name).or_insert(0) += labels.len();
        }

        accums.sort_keys();
        stats.classes = accums
            .into_iter()
            .map(|(class, accum)| {
                let count = accum.objects as f64;
                let class_stats = ClassStats {
                    name: classes::class_name(class),
                    objects: accum.objects,
                    images: accum.images,
                    bbox_width_avg: accum.width_sum / count,
                    bbox_height_avg: accum.height_sum / count,
                    aspect_ratio_avg: accum.aspect_sum / count,
                };
                (class, class_stats)
            })
            .collect();

        stats
    }

    /// The `n` images with the most objects, most crowded first. Ties keep
    /// file name order.
    pub fn densest(&self, n: usize) -> Vec<(&str, usize)> {
        self.objects_per_image
            .iter()
            .map(|(name, &count)| (name.as_str(), count))
            .sorted_by(|lhs, rhs| rhs.1.cmp(&lhs.1))
            .take(n)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn labels(lines: &[&str]) -> Vec<YoloLabel> {
        lines.iter().map(|line| line.parse().unwrap()).collect()
    }

    #[test]
    fn hand_computed_stats() {
        let samples = vec![
            (
                "a.jpg".to_owned(),
                labels(&["0 0.5 0.5 0.2 0.1", "0 0.5 0.5 0.4 0.2", "4 0.1 0.1 0.1 0.0"]),
            ),
            ("b.jpg".to_owned(), vec![]),
            ("c.jpg".to_owned(), labels(&["0 0.3 0.3 0.3 0.3"])),
        ];
        let stats = DatasetStats::from_samples(samples);

        assert_eq!(stats.total_images, 3);
        assert_eq!(stats.total_objects, 4);
        assert_eq!(stats.empty_images, ["b.jpg"]);
        assert_eq!(stats.classes.keys().copied().collect::<Vec<_>>(), [0, 4]);

        let plane = &stats.classes[&0];
        assert_eq!(plane.name, "plane");
        assert_eq!(plane.objects, 3);
        assert_eq!(plane.images, 2);
        assert_abs_diff_eq!(plane.bbox_width_avg, 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(plane.bbox_height_avg, 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(plane.aspect_ratio_avg, 5.0 / 3.0, epsilon = 1e-12);

        let vehicle = &stats.classes[&4];
        assert_eq!(vehicle.images, 1);
        assert_abs_diff_eq!(vehicle.aspect_ratio_avg, 0.0);

        assert_eq!(stats.densest(1), [("a.jpg", 3)]);
        assert_eq!(stats.densest(10), [("a.jpg", 3), ("c.jpg", 1)]);
    }
}
