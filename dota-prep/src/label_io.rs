//! Reading and writing normalized label files.

use crate::{
    common::*,
    report::{SkipReason, Skips},
};

/// Load a label file, skipping malformed lines.
///
/// Blank lines are ignored. Every other line that does not parse is recorded
/// in `skips` as [SkipReason::MalformedRecord].
pub fn load_labels(path: &Path, skips: &mut Skips) -> Result<Vec<YoloLabel>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("unable to read label file '{}'", path.display()))?;
    Ok(parse_labels(&text, path, skips))
}

pub fn parse_labels(text: &str, path: &Path, skips: &mut Skips) -> Vec<YoloLabel> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| match line.parse::<YoloLabel>() {
            Ok(label) => Some(label),
            Err(err) => {
                skips.record(
                    path,
                    Some(index + 1),
                    SkipReason::MalformedRecord,
                    format!("{:#}", err),
                );
                None
            }
        })
        .collect()
}

/// Render labels one per line, without a trailing newline.
pub fn format_labels(labels: &[YoloLabel]) -> String {
    labels.iter().join("\n")
}

pub fn write_labels(path: &Path, labels: &[YoloLabel]) -> Result<()> {
    fs::write(path, format_labels(labels))
        .with_context(|| format!("unable to write label file '{}'", path.display()))?;
    Ok(())
}
