//! Conversion of oriented DOTA labels into normalized axis-aligned labels.

use crate::{
    classes::DotaClass,
    common::*,
    config::ConvertConfig,
    label_io,
    report::{SkipReason, Skips},
    sample::{self, SampleKey, LABEL_EXTENSION},
};
use std::str::FromStr as _;

/// Outcome counts of a conversion run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConvertReport {
    /// DOTA label files visited.
    pub files: usize,
    /// Label files written, one per file with at least one surviving object.
    pub files_written: usize,
    pub objects_written: usize,
    pub difficult_dropped: usize,
    pub degenerate_dropped: usize,
    pub skips: Skips,
}

impl ConvertReport {
    pub fn merge(&mut self, other: ConvertReport) {
        self.files += other.files;
        self.files_written += other.files_written;
        self.objects_written += other.objects_written;
        self.difficult_dropped += other.difficult_dropped;
        self.degenerate_dropped += other.degenerate_dropped;
        self.skips.merge(other.skips);
    }
}

/// Converts a directory of DOTA label files.
#[derive(Debug, Clone)]
pub struct ObbConverter {
    images_dir: PathBuf,
    dota_labels_dir: PathBuf,
    output_labels_dir: PathBuf,
    ignore_difficult: bool,
}

impl ObbConverter {
    pub fn new(
        images_dir: impl AsRef<Path>,
        dota_labels_dir: impl AsRef<Path>,
        output_labels_dir: impl AsRef<Path>,
        config: &ConvertConfig,
    ) -> Result<Self> {
        let output_labels_dir = output_labels_dir.as_ref();
        fs::create_dir_all(output_labels_dir).with_context(|| {
            format!(
                "unable to create output directory '{}'",
                output_labels_dir.display()
            )
        })?;

        Ok(Self {
            images_dir: images_dir.as_ref().to_owned(),
            dota_labels_dir: dota_labels_dir.as_ref().to_owned(),
            output_labels_dir: output_labels_dir.to_owned(),
            ignore_difficult: config.ignore_difficult,
        })
    }

    /// Convert every label file in file name order.
    pub fn convert_all(&self) -> Result<ConvertReport> {
        let label_files = sample::list_files(&self.dota_labels_dir, &[LABEL_EXTENSION])?;
        info!(
            "converting {} label files from '{}'",
            label_files.len(),
            self.dota_labels_dir.display()
        );

        let mut report = ConvertReport::default();
        for label_file in &label_files {
            report.merge(self.convert_single(label_file)?);
        }

        info!(
            "wrote {} label files with {} objects, skipped {} inputs",
            report.files_written,
            report.objects_written,
            report.skips.total()
        );
        Ok(report)
    }

    /// Convert one DOTA label file.
    pub fn convert_single(&self, label_file: &Path) -> Result<ConvertReport> {
        let mut report = ConvertReport::default();
        let key = match SampleKey::from_path(label_file) {
            Ok(key) => key,
            Err(err) => {
                report
                    .skips
                    .record(label_file, None, SkipReason::InvalidFileName, err);
                return Ok(report);
            }
        };

        let image_file = match key.find_image(&self.images_dir) {
            Some(path) => path,
            None => {
                report.skips.record(
                    label_file,
                    None,
                    SkipReason::MissingImage,
                    format!("no image for '{}' in '{}'", key, self.images_dir.display()),
                );
                return Ok(report);
            }
        };
        let frame = match imagesize::size(&image_file) {
            Ok(imagesize::ImageSize { width, height }) => {
                WH::from_wh([width as f64, height as f64])
            }
            Err(err) => {
                report
                    .skips
                    .record(&image_file, None, SkipReason::UnreadableImage, err);
                return Ok(report);
            }
        };
        if frame.w() <= 0.0 || frame.h() <= 0.0 {
            report.skips.record(
                &image_file,
                None,
                SkipReason::UnreadableImage,
                "image has zero width or height",
            );
            return Ok(report);
        }

        let text = match fs::read_to_string(label_file) {
            Ok(text) => text,
            Err(err) => {
                report
                    .skips
                    .record(label_file, None, SkipReason::UnreadableLabels, err);
                return Ok(report);
            }
        };
        let labels = self.convert_text(&text, label_file, &frame, &mut report);
        report.files += 1;

        if labels.is_empty() {
            debug!("no object left in '{}'", label_file.display());
            return Ok(report);
        }

        let output_file = key.label_path(&self.output_labels_dir);
        match label_io::write_labels(&output_file, &labels) {
            Ok(()) => {
                report.files_written += 1;
                report.objects_written += labels.len();
            }
            Err(err) => {
                report.skips.record(
                    &output_file,
                    None,
                    SkipReason::WriteFailed,
                    format!("{:#}", err),
                );
            }
        }
        Ok(report)
    }

    /// Convert the object lines of a DOTA label file against the image frame.
    pub fn convert_text(
        &self,
        text: &str,
        path: &Path,
        frame: &WH<f64>,
        report: &mut ConvertReport,
    ) -> Vec<YoloLabel> {
        text.lines()
            .enumerate()
            .filter_map(|(index, line)| {
                let line_no = index + 1;
                let object = match DotaObject::parse_line(line) {
                    Ok(Some(object)) => object,
                    Ok(None) => return None,
                    Err(err) => {
                        report.skips.record(
                            path,
                            Some(line_no),
                            SkipReason::MalformedRecord,
                            format!("{:#}", err),
                        );
                        return None;
                    }
                };

                if self.ignore_difficult && object.difficult {
                    report.difficult_dropped += 1;
                    return None;
                }
                let class = match DotaClass::from_str(&object.class_name) {
                    Ok(class) => class,
                    Err(_) => {
                        report.skips.record(
                            path,
                            Some(line_no),
                            SkipReason::UnknownClass,
                            format!("unknown class '{}'", object.class_name),
                        );
                        return None;
                    }
                };

                let rect = object.quad.to_xyxy().to_normalized(frame);
                if rect.w() <= 0.0 || rect.h() <= 0.0 {
                    report.degenerate_dropped += 1;
                    return None;
                }
                Some(Label {
                    rect,
                    class: class.id(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn converter(ignore_difficult: bool) -> ObbConverter {
        ObbConverter {
            images_dir: PathBuf::new(),
            dota_labels_dir: PathBuf::new(),
            output_labels_dir: PathBuf::new(),
            ignore_difficult,
        }
    }

    const TEXT: &str = "\
imagesource:GoogleEarth
gsd:0.146
100 100 200 100 200 150 100 150 plane 0
10 10 20 10 20 20 10 20 ship 1
10 10 20 10 20 20 10 20 container-crane 0
10 10 20 10 20 10 10 10 bridge 0
10 10 20 ten 20 20 10 20 harbor 0
";

    #[test]
    fn convert_object_lines() {
        let frame = WH::from_wh([400.0, 200.0]);
        let mut report = ConvertReport::default();
        let labels =
            converter(true).convert_text(TEXT, Path::new("P0001.txt"), &frame, &mut report);

        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].class, DotaClass::Plane.id());
        let [cx, cy, w, h] = labels[0].rect.cxcywh();
        assert_abs_diff_eq!(cx, 0.375);
        assert_abs_diff_eq!(cy, 0.625);
        assert_abs_diff_eq!(w, 0.25);
        assert_abs_diff_eq!(h, 0.25);

        assert_eq!(report.difficult_dropped, 1);
        assert_eq!(report.degenerate_dropped, 1);
        assert_eq!(report.skips.count(SkipReason::UnknownClass), 1);
        assert_eq!(report.skips.count(SkipReason::MalformedRecord), 1);
        assert_eq!(report.skips.records()[0].line, Some(5));
    }

    #[test]
    fn keep_difficult_objects() {
        let frame = WH::from_wh([400.0, 200.0]);
        let mut report = ConvertReport::default();
        let labels =
            converter(false).convert_text(TEXT, Path::new("P0001.txt"), &frame, &mut report);

        assert_eq!(labels.len(), 2);
        assert_eq!(labels[1].class, DotaClass::Ship.id());
        assert_eq!(report.difficult_dropped, 0);
    }
}
