mod common;

use anyhow::Result;
use common::{file_names, write_image, write_text};
use dota_prep::{
    config::SplitConfig,
    split::{Subset, TrainValSplitter},
    stats::DatasetStats,
};
use std::{fs, path::Path};

fn populate(images: &Path, labels: &Path, count: usize) -> Result<()> {
    fs::create_dir_all(images)?;
    fs::create_dir_all(labels)?;
    for index in 0..count {
        let stem = format!("P{:04}_x0_y0", index);
        write_image(images, &format!("{}.jpg", stem), 8, 8)?;
        if index != 0 {
            let text = (0..index % 3 + 1)
                .map(|_| format!("{} 0.5 0.5 0.25 0.5", index % 2))
                .collect::<Vec<_>>()
                .join("\n");
            write_text(labels, &format!("{}.txt", stem), &text)?;
        }
    }
    Ok(())
}

#[test]
fn split_is_deterministic_and_complete() -> Result<()> {
    let root = tempfile::tempdir()?;
    let images = root.path().join("images");
    let labels = root.path().join("labels");
    populate(&images, &labels, 10)?;

    let config = SplitConfig::default();
    let first = TrainValSplitter::new(&images, &labels, root.path().join("a"), &config)?;
    let second = TrainValSplitter::new(&images, &labels, root.path().join("b"), &config)?;
    let summary = first.split()?;
    second.split()?;

    assert_eq!(summary.train, 8);
    assert_eq!(summary.val, 2);
    assert_eq!(summary.labels_missing, 1);

    let mut all = vec![];
    for subset in [Subset::Train, Subset::Val] {
        let names = file_names(&first.images_dir(subset))?;
        assert_eq!(names, file_names(&second.images_dir(subset))?);
        all.extend(names);
    }
    all.sort();
    assert_eq!(all, file_names(&images)?);

    let val_labels = file_names(&first.labels_dir(Subset::Val))?;
    for name in val_labels {
        let image_name = name.replace(".txt", ".jpg");
        assert!(first.images_dir(Subset::Val).join(image_name).is_file());
    }
    assert!(root.path().join("a/images/train").is_dir());
    Ok(())
}

#[test]
fn stats_over_directory() -> Result<()> {
    let root = tempfile::tempdir()?;
    let images = root.path().join("images");
    let labels = root.path().join("labels");
    populate(&images, &labels, 4)?;
    write_image(&images, "P9999_x0_y0.jpg", 8, 8)?;
    write_text(&labels, "P9999_x0_y0.txt", "0 0.5 0.5 0.25 0.5\nbroken\n")?;

    let stats = DatasetStats::compute(&images, &labels)?;

    // P0001: 2 x class 1, P0002: 3 x class 0, P0003: 1 x class 1, P9999: 1 x class 0
    assert_eq!(stats.total_images, 5);
    assert_eq!(stats.total_objects, 7);
    assert_eq!(stats.empty_images, ["P0000_x0_y0.jpg"]);
    assert_eq!(stats.malformed_lines, 1);
    assert_eq!(stats.skipped_images, 0);
    assert_eq!(stats.classes[&0].objects, 4);
    assert_eq!(stats.classes[&0].images, 2);
    assert_eq!(stats.classes[&1].objects, 3);
    assert_eq!(stats.classes[&1].images, 2);
    assert!((stats.classes[&1].aspect_ratio_avg - 0.5).abs() < 1e-12);
    assert_eq!(stats.densest(1), [("P0002_x0_y0.jpg", 3)]);

    let json = serde_json::to_value(&stats)?;
    assert_eq!(json["classes"]["0"]["name"], "plane");
    Ok(())
}

#[cfg(unix)]
#[test]
fn stats_skip_non_utf8_names() -> Result<()> {
    use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

    let root = tempfile::tempdir()?;
    let images = root.path().join("images");
    let labels = root.path().join("labels");
    populate(&images, &labels, 2)?;
    let image = write_image(&images, "P0009_x0_y0.jpg", 8, 8)?;
    fs::rename(&image, images.join(OsStr::from_bytes(b"\xfe_x0_y0.jpg")))?;

    let stats = DatasetStats::compute(&images, &labels)?;

    assert_eq!(stats.total_images, 2);
    assert_eq!(stats.total_objects, 2);
    assert_eq!(stats.skipped_images, 1);
    assert_eq!(stats.malformed_lines, 0);
    Ok(())
}
