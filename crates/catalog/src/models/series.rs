use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// A book's position within a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPosition {
    /// Series name
    pub name: String,
    /// Position in series; Calibre allows fractional positions (e.g. `1.5`)
    pub index: f64,
}
impl SeriesPosition {
    pub fn new(name: impl Into<String>, index: f64) -> Self {
        Self { name: name.into(), index }
    }

    /// Orders by case-insensitive series name, then by position.
    pub(crate) fn compare(&self, other: &Self) -> Ordering {
        self.name
            .to_lowercase()
            .cmp(&other.name.to_lowercase())
            .then_with(|| self.index.total_cmp(&other.index))
    }
}

impl Display for SeriesPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        // Whole-numbered positions are by far the most common; don't print "1.0".
        if self.index.fract() == 0.0 {
            write!(f, "{} #{}", self.name, self.index as i64)
        } else {
            write!(f, "{} #{}", self.name, self.index)
        }
    }
}
