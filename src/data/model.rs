use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Column – positional fields of an input row
// ---------------------------------------------------------------------------

/// Positional columns of a session CSV row (0-indexed, no header guaranteed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Label = 0,
    Subject = 1,
    Tracker = 2,
    Timestamp = 3,
    TargetId = 4,
    TargetX = 5,
    TargetY = 6,
    CursorX = 7,
    CursorY = 8,
    ActualX = 9,
    ActualY = 10,
}

impl Column {
    /// Index of this column within a row.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Header name as written by the tracker validation tool.
    pub fn name(self) -> &'static str {
        match self {
            Column::Label => "Label",
            Column::Subject => "Subject",
            Column::Tracker => "Tracker",
            Column::Timestamp => "Timestamp",
            Column::TargetId => "Target-ID",
            Column::TargetX => "Target-X",
            Column::TargetY => "Target-Y",
            Column::CursorX => "Cursor-X",
            Column::CursorY => "Cursor-Y",
            Column::ActualX => "Actual-X",
            Column::ActualY => "Actual-Y",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Position / Target
// ---------------------------------------------------------------------------

/// Integer screen position in pixels (origin top-left, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub fn new(x: i64, y: i64) -> Self {
        Position { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Target identifier as recorded in the `Target-ID` column.
pub type TargetId = i64;

// ---------------------------------------------------------------------------
// SeriesKey / Observation
// ---------------------------------------------------------------------------

/// Identity of one plotted series: rows sharing tracker and label belong together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SeriesKey {
    pub tracker: String,
    pub label: String,
}

impl SeriesKey {
    pub fn new(tracker: impl Into<String>, label: impl Into<String>) -> Self {
        SeriesKey {
            tracker: tracker.into(),
            label: label.into(),
        }
    }
}

/// Legend text, `"<tracker> :: <label>"`.
impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} :: {}", self.tracker, self.label)
    }
}

/// One accepted sample: where the subject actually was for a given target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Observation {
    pub target_id: TargetId,
    pub x: i64,
    pub y: i64,
}

impl Observation {
    pub fn new(target_id: TargetId, x: i64, y: i64) -> Self {
        Observation { target_id, x, y }
    }
}

// ---------------------------------------------------------------------------
// IngestStats – non-fatal tallies
// ---------------------------------------------------------------------------

/// Counts of rows seen during one ingestion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    /// Rows classified as data (including the ones later dropped).
    pub data_rows: usize,
    /// Rows discarded by the header heuristic.
    pub header_rows: usize,
    /// Data rows whose actual position fell outside the display bounds.
    pub out_of_bounds_rows: usize,
}

impl IngestStats {
    /// Data rows that contributed an observation.
    pub fn kept_rows(&self) -> usize {
        self.data_rows - self.out_of_bounds_rows
    }
}

// ---------------------------------------------------------------------------
// SessionDataset – validated, grouped result
// ---------------------------------------------------------------------------

/// The validated session handed to the renderers. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionDataset {
    /// Single subject of the session; `None` when no data row was seen.
    pub subject: Option<String>,
    /// Canonical target positions in order of first sighting.
    pub targets: IndexMap<TargetId, Position>,
    /// Observations per series, series in order of first sighting.
    #[serde(serialize_with = "serialize_series")]
    pub series: IndexMap<SeriesKey, Vec<Observation>>,
    pub stats: IngestStats,
}

impl SessionDataset {
    /// Subject name for titles; placeholder when the session had no data rows.
    pub fn subject_label(&self) -> &str {
        self.subject.as_deref().unwrap_or("<none>")
    }

    /// Total number of accepted observations across all series.
    pub fn observation_count(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }

    /// Number of observations dropped by the bounds filter.
    pub fn dropped_count(&self) -> usize {
        self.stats.out_of_bounds_rows
    }

    /// Whether the session produced no observations at all.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// JSON objects need string keys, so series are written as a list of entries.
fn serialize_series<S>(
    series: &IndexMap<SeriesKey, Vec<Observation>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    #[derive(Serialize)]
    struct Entry<'a> {
        tracker: &'a str,
        label: &'a str,
        observations: &'a [Observation],
    }

    serializer.collect_seq(series.iter().map(|(key, obs)| Entry {
        tracker: &key.tracker,
        label: &key.label,
        observations: obs,
    }))
}
