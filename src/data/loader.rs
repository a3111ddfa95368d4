use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use indexmap::map::Entry;

use super::error::SessionError;
use super::filter::DisplayBounds;
use super::model::{Column, Observation, Position, SeriesKey, SessionDataset, TargetId};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read a session CSV into memory and ingest it with `loader`.
///
/// The file is comma-delimited and may or may not contain header rows; they
/// are recognised row by row (see [`SessionLoader::classify_row`]).
///
/// Blank lines are skipped by the CSV reader. They are neither counted as
/// header rows nor as rows, so `MalformedRow::row` indexes non-blank records.
pub fn load_file(path: &Path, loader: &SessionLoader) -> Result<SessionDataset> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;

    let rows = reader
        .records()
        .collect::<Result<Vec<StringRecord>, _>>()
        .context("reading CSV rows")?;

    let dataset = loader
        .ingest(&rows)
        .with_context(|| format!("validating {}", path.display()))?;
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Row classification
// ---------------------------------------------------------------------------

/// Whether a raw row carries data or is a header to be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Header,
    Data,
}

// ---------------------------------------------------------------------------
// SessionLoader
// ---------------------------------------------------------------------------

/// Turns raw rows into a validated [`SessionDataset`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionLoader {
    pub bounds: DisplayBounds,
}

impl SessionLoader {
    pub fn new(bounds: DisplayBounds) -> Self {
        SessionLoader { bounds }
    }

    /// A row is data iff its last field parses as an integer.
    ///
    /// This is a fixed heuristic. A data row whose last field is damaged is
    /// indistinguishable from a header and is dropped as one; the warning
    /// emitted by [`ingest`](Self::ingest) and the `header_rows` tally are the
    /// only trace of it.
    pub fn classify_row(row: &StringRecord) -> RowKind {
        match row.iter().last() {
            Some(last) if parse_int(last).is_some() => RowKind::Data,
            _ => RowKind::Header,
        }
    }

    /// Validate and group all rows in order.
    ///
    /// Per data row: the subject is checked, then the target position, then
    /// the actual position is bounds-filtered, and only then is the
    /// observation appended to its `(tracker, label)` series. Rows that fall
    /// out of bounds still take part in the subject and target checks.
    ///
    /// Fails on the first fatal condition; nothing is returned in that case.
    pub fn ingest<'a, I>(&self, rows: I) -> Result<SessionDataset, SessionError>
    where
        I: IntoIterator<Item = &'a StringRecord>,
    {
        let mut ds = SessionDataset::default();

        for (index, row) in rows.into_iter().enumerate() {
            if Self::classify_row(row) == RowKind::Header {
                log::warn!("Ignoring header row {index}: {:?}", row.iter().collect::<Vec<_>>());
                ds.stats.header_rows += 1;
                continue;
            }
            ds.stats.data_rows += 1;

            let subject = text_field(row, index, Column::Subject)?;
            match &ds.subject {
                None => {
                    log::info!("Subject: {subject}");
                    ds.subject = Some(subject.to_string());
                }
                Some(first) if first != subject => {
                    return Err(SessionError::MultiSubject {
                        first: first.clone(),
                        second: subject.to_string(),
                    });
                }
                Some(_) => {}
            }

            let target_id: TargetId = int_field(row, index, Column::TargetId)?;
            let target = Position::new(
                int_field(row, index, Column::TargetX)?,
                int_field(row, index, Column::TargetY)?,
            );
            match ds.targets.entry(target_id) {
                Entry::Occupied(recorded) if *recorded.get() != target => {
                    return Err(SessionError::TargetConsistency {
                        target_id,
                        recorded: *recorded.get(),
                        found: target,
                    });
                }
                Entry::Occupied(_) => {}
                Entry::Vacant(slot) => {
                    slot.insert(target);
                }
            }

            let x = int_field(row, index, Column::ActualX)?;
            let y = int_field(row, index, Column::ActualY)?;
            if !self.bounds.contains(x, y) {
                log::warn!("Ignoring out-of-bounds data in row {index}: target {target_id} at ({x}, {y})");
                ds.stats.out_of_bounds_rows += 1;
                continue;
            }

            let key = SeriesKey::new(
                text_field(row, index, Column::Tracker)?,
                text_field(row, index, Column::Label)?,
            );
            ds.series
                .entry(key)
                .or_default()
                .push(Observation::new(target_id, x, y));
        }

        log::info!(
            "{} data rows kept, {} target locations, {} series, {} dropped out of bounds, {} header rows",
            ds.stats.kept_rows(),
            ds.targets.len(),
            ds.series.len(),
            ds.stats.out_of_bounds_rows,
            ds.stats.header_rows
        );
        log::debug!("Targets: {:?}", ds.targets);
        for (key, obs) in &ds.series {
            log::debug!("Series {key}: {} observations", obs.len());
        }

        Ok(ds)
    }
}

// -- field helpers --

/// Integer parse that tolerates surrounding whitespace and a leading sign.
fn parse_int(s: &str) -> Option<i64> {
    s.trim().parse::<i64>().ok()
}

fn text_field<'r>(row: &'r StringRecord, index: usize, field: Column) -> Result<&'r str, SessionError> {
    row.get(field.index()).ok_or(SessionError::MalformedRow {
        row: index,
        field,
        value: None,
    })
}

fn int_field(row: &StringRecord, index: usize, field: Column) -> Result<i64, SessionError> {
    let raw = text_field(row, index, field)?;
    parse_int(raw).ok_or_else(|| SessionError::MalformedRow {
        row: index,
        field,
        value: Some(raw.to_string()),
    })
}
