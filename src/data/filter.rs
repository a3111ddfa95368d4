use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::model::{SeriesKey, SessionDataset};

// ---------------------------------------------------------------------------
// Bounds predicate: which observations are on screen
// ---------------------------------------------------------------------------

/// Closed display rectangle `[0, width] × [0, height]` in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayBounds {
    pub width: i64,
    pub height: i64,
}

impl Default for DisplayBounds {
    fn default() -> Self {
        DisplayBounds {
            width: 1920,
            height: 1080,
        }
    }
}

impl DisplayBounds {
    pub fn new(width: i64, height: i64) -> Self {
        DisplayBounds { width, height }
    }

    /// Inclusive on both edges: `x == width` is still on screen.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        (0..=self.width).contains(&x) && (0..=self.height).contains(&y)
    }
}

// ---------------------------------------------------------------------------
// Series selection for the viewer
// ---------------------------------------------------------------------------

/// Series the user has hidden in the viewer. Empty means everything is shown.
pub type HiddenSeries = BTreeSet<SeriesKey>;

/// Return the series keys that should be drawn, in legend order.
pub fn visible_series<'a>(dataset: &'a SessionDataset, hidden: &HiddenSeries) -> Vec<&'a SeriesKey> {
    dataset
        .series
        .keys()
        .filter(|key| !hidden.contains(*key))
        .collect()
}
