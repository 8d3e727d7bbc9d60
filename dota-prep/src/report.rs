//! Accounting of inputs skipped during a batch run.
//!
//! Per-file and per-line failures never abort a batch. They are logged and
//! recorded here so that callers can inspect what was dropped.

use crate::common::*;
use strum::{AsRefStr, Display};

/// At most this many skip records are retained. Counts are always exact.
pub const MAX_SKIP_RECORDS: usize = 1024;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, AsRefStr, Display, Serialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No image file matches a label file.
    MissingImage,
    /// No label file matches an image. The image is treated as unannotated.
    MissingLabels,
    /// The image file exists but cannot be decoded.
    UnreadableImage,
    /// The file stem is not valid UTF-8, so no sample key can be derived.
    InvalidFileName,
    /// Another image with the same stem was processed first.
    DuplicateStem,
    /// The label file exists but cannot be read.
    UnreadableLabels,
    /// A label line cannot be parsed.
    MalformedRecord,
    /// A DOTA object names a category outside the class table.
    UnknownClass,
    /// An output file cannot be written.
    WriteFailed,
}

/// One skipped input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skip {
    pub path: PathBuf,
    /// One-based line number for line-level skips.
    pub line: Option<usize>,
    pub reason: SkipReason,
    pub detail: String,
}

/// Skip counts by reason plus a bounded list of skip records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Skips {
    counts: IndexMap<SkipReason, usize>,
    records: Vec<Skip>,
}

impl Skips {
    pub fn record(
        &mut self,
        path: &Path,
        line: Option<usize>,
        reason: SkipReason,
        detail: impl fmt::Display,
    ) {
        let detail = detail.to_string();
        match line {
            Some(line) => warn!(
                "skip line {} of '{}' ({}): {}",
                line,
                path.display(),
                reason,
                detail
            ),
            None => warn!("skip '{}' ({}): {}", path.display(), reason, detail),
        }

        *self.counts.entry(reason).or_insert(0) += 1;
        if self.records.len() < MAX_SKIP_RECORDS {
            self.records.push(Skip {
                path: path.to_owned(),
                line,
                reason,
                detail,
            });
        }
    }

    pub fn count(&self, reason: SkipReason) -> usize {
        self.counts.get(&reason).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn counts(&self) -> impl Iterator<Item = (SkipReason, usize)> + '_ {
        self.counts.iter().map(|(&reason, &count)| (reason, count))
    }

    pub fn records(&self) -> &[Skip] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn merge(&mut self, other: Skips) {
        for (reason, count) in other.counts {
            *self.counts.entry(reason).or_insert(0) += count;
        }
        let room = MAX_SKIP_RECORDS.saturating_sub(self.records.len());
        self.records.extend(other.records.into_iter().take(room));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_by_reason() {
        let mut skips = Skips::default();
        let path = Path::new("a.txt");
        skips.record(path, Some(1), SkipReason::MalformedRecord, "bad");
        skips.record(path, Some(4), SkipReason::MalformedRecord, "bad");
        skips.record(path, None, SkipReason::MissingImage, "gone");

        assert_eq!(skips.count(SkipReason::MalformedRecord), 2);
        assert_eq!(skips.count(SkipReason::MissingImage), 1);
        assert_eq!(skips.count(SkipReason::WriteFailed), 0);
        assert_eq!(skips.total(), 3);
        assert_eq!(skips.records()[1].line, Some(4));
        assert_eq!(SkipReason::MalformedRecord.as_ref(), "malformed_record");
    }

    #[test]
    fn bound_records_but_not_counts() {
        let mut lhs = Skips::default();
        let mut rhs = Skips::default();
        for line in 0..MAX_SKIP_RECORDS {
            lhs.record(Path::new("a"), Some(line), SkipReason::MalformedRecord, "");
            rhs.record(Path::new("b"), Some(line), SkipReason::MalformedRecord, "");
        }
        lhs.merge(rhs);

        assert_eq!(lhs.count(SkipReason::MalformedRecord), 2 * MAX_SKIP_RECORDS);
        assert_eq!(lhs.records().len(), MAX_SKIP_RECORDS);
    }
}
