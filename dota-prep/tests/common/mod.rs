#![allow(dead_code)]

use anyhow::Result;
use image::{Rgb, RgbImage};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Save a synthetic gradient image.
pub fn write_image(dir: &Path, name: &str, width: u32, height: u32) -> Result<PathBuf> {
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let path = dir.join(name);
    image.save(&path)?;
    Ok(path)
}

pub fn write_text(dir: &Path, name: &str, text: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, text)?;
    Ok(path)
}

/// Sorted file names in `dir`.
pub fn file_names(dir: &Path) -> Result<Vec<String>> {
    let mut names: Vec<_> = fs::read_dir(dir)?
        .map(|entry| -> Result<String> {
            Ok(entry?.file_name().to_string_lossy().into_owned())
        })
        .collect::<Result<_>>()?;
    names.sort();
    Ok(names)
}
