//! The `class xc yc w h` text line format.
//!
//! Coordinates are normalized to the owning frame and written with six
//! fraction digits.

use crate::Label;
use anyhow::{ensure, Context, Error, Result};
use bbox::{prelude::*, CxCyWH, CxCyWH_};
use std::{fmt, str::FromStr};

/// Normalized box with an integer class index.
pub type YoloLabel = Label<CxCyWH<f64>, usize>;

impl FromStr for Label<CxCyWH<f64>, usize> {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<_> = line.split_whitespace().collect();
        ensure!(
            fields.len() == 5,
            "expect 5 fields, but get {}",
            fields.len()
        );

        let class: usize = fields[0]
            .parse()
            .with_context(|| format!("invalid class index '{}'", fields[0]))?;
        let mut coords = [0f64; 4];
        for (coord, text) in coords.iter_mut().zip(&fields[1..]) {
            *coord = parse_finite(text)?;
        }
        let [cx, cy, w, h] = coords;
        let rect = CxCyWH_ { cx, cy, w, h }.try_into()?;

        Ok(Label { rect, class })
    }
}

impl<C> fmt::Display for Label<CxCyWH<f64>, C>
where
    C: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [cx, cy, w, h] = self.rect.cxcywh();
        write!(f, "{} {:.6} {:.6} {:.6} {:.6}", self.class, cx, cy, w, h)
    }
}

pub(crate) fn parse_finite(text: &str) -> Result<f64> {
    let value: f64 = text
        .parse()
        .with_context(|| format!("invalid number '{}'", text))?;
    ensure!(value.is_finite(), "'{}' is not a finite number", text);
    Ok(value)
}
