//! The DOTA oriented annotation line format.
//!
//! ```text
//! x1 y1 x2 y2 x3 y3 x4 y4 class_name difficult
//! ```
//!
//! Label files may start with metadata lines such as `imagesource:GoogleEarth`
//! or `gsd:0.146`, which carry fewer fields than an object line.

use crate::yolo::parse_finite;
use anyhow::{Context, Result};
use bbox::Quad;

/// Minimum number of whitespace separated fields of an object line.
pub const MIN_FIELDS: usize = 10;

/// One oriented object in a DOTA label file.
#[derive(Debug, Clone, PartialEq)]
pub struct DotaObject {
    pub quad: Quad<f64>,
    pub class_name: String,
    pub difficult: bool,
}

impl DotaObject {
    /// Parse one line of a DOTA label file.
    ///
    /// Returns `Ok(None)` for lines too short to be an object, such as blank
    /// lines and metadata headers. Object lines with bad numbers are errors.
    pub fn parse_line(line: &str) -> Result<Option<Self>> {
        let fields: Vec<_> = line.split_whitespace().collect();
        if fields.len() < MIN_FIELDS {
            return Ok(None);
        }

        let mut coords = [0f64; 8];
        for (coord, text) in coords.iter_mut().zip(&fields[..8]) {
            *coord = parse_finite(text)?;
        }
        let class_name = fields[8].to_owned();
        let difficult: u8 = fields[9]
            .parse()
            .with_context(|| format!("invalid difficult flag '{}'", fields[9]))?;

        Ok(Some(Self {
            quad: Quad::from_coords(coords),
            class_name,
            difficult: difficult == 1,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbox::prelude::*;

    #[test]
    fn parse_object_line() {
        let object = DotaObject::parse_line(
            "2753.0 2408.0 2861.0 2385.0 2888.0 2468.0 2805.0 2502.0 plane 0",
        )
        .unwrap()
        .unwrap();
        assert_eq!(object.class_name, "plane");
        assert!(!object.difficult);
        assert_eq!(
            object.quad.to_xyxy().xyxy(),
            [2753.0, 2385.0, 2888.0, 2502.0]
        );
    }

    #[test]
    fn difficult_flag() {
        let object = DotaObject::parse_line("0 0 4 0 4 4 0 4 small-vehicle 1")
            .unwrap()
            .unwrap();
        assert!(object.difficult);
    }

    #[test]
    fn skip_headers_and_blank_lines() {
        assert!(DotaObject::parse_line("imagesource:GoogleEarth")
            .unwrap()
            .is_none());
        assert!(DotaObject::parse_line("gsd:0.146").unwrap().is_none());
        assert!(DotaObject::parse_line("").unwrap().is_none());
    }

    #[test]
    fn reject_bad_numbers() {
        assert!(DotaObject::parse_line("0 0 4 0 4 four 0 4 ship 0").is_err());
        assert!(DotaObject::parse_line("0 0 4 0 4 4 0 4 ship x").is_err());
    }
}
