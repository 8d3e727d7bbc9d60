//! Pairing of images and label files by their shared file stem.

use crate::common::*;

/// Image extensions tried when looking up the image of a sample, in lookup
/// order.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];
pub const LABEL_EXTENSION: &str = "txt";
pub const TILE_EXTENSION: &str = "jpg";

/// The stem shared by an image and its label file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SampleKey {
    stem: String,
}

impl SampleKey {
    pub fn new(stem: impl Into<String>) -> Self {
        Self { stem: stem.into() }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| format_err!("'{}' has no valid file stem", path.display()))?;
        Ok(Self::new(stem))
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// The key of the tile at grid cell `(xi, yi)`.
    pub fn tile(&self, xi: u32, yi: u32) -> Self {
        Self::new(format!("{}_x{}_y{}", self.stem, xi, yi))
    }

    pub fn label_path(&self, dir: &Path) -> PathBuf {
        self.file_path(dir, LABEL_EXTENSION)
    }

    pub fn file_path(&self, dir: &Path, extension: &str) -> PathBuf {
        dir.join(format!("{}.{}", self.stem, extension))
    }

    /// The first existing image file of this key in `dir`.
    pub fn find_image(&self, dir: &Path) -> Option<PathBuf> {
        IMAGE_EXTENSIONS
            .iter()
            .map(|ext| self.file_path(dir, ext))
            .find(|path| path.is_file())
    }
}

impl fmt::Display for SampleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stem)
    }
}

/// List image files in `dir`, sorted by file name.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    list_files(dir, IMAGE_EXTENSIONS)
}

/// List files in `dir` whose extension matches one of `extensions` ignoring
/// case, sorted by file name.
pub fn list_files(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("unable to list directory '{}'", dir.display()))?;

    let mut paths: Vec<PathBuf> = entries
        .map(|entry| -> Result<_> { Ok(entry?.path()) })
        .filter(|path| match path {
            Ok(path) => path.is_file() && has_extension(path, extensions),
            Err(_) => true,
        })
        .collect::<Result<_>>()?;
    paths.sort_by(|lhs, rhs| lhs.file_name().cmp(&rhs.file_name()));

    Ok(paths)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|cand| ext.eq_ignore_ascii_case(cand)))
        .unwrap_or(false)
}
