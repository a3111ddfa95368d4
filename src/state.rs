use std::path::Path;

use crate::color::ColorMap;
use crate::config::SessionConfig;
use crate::data::filter::{visible_series, HiddenSeries};
use crate::data::loader::{load_file, SessionLoader};
use crate::data::model::{SeriesKey, SessionDataset};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full viewer state, independent of rendering.
pub struct AppState {
    /// Validated session (None until a file has been loaded).
    pub dataset: Option<SessionDataset>,

    /// Bounds and plot style; also drives the loader for File → Open.
    pub config: SessionConfig,

    /// Series the user switched off.
    pub hidden: HiddenSeries,

    /// Whether the target markers are drawn.
    pub show_targets: bool,

    /// Colours per series of the current dataset.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl AppState {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            dataset: None,
            config,
            hidden: HiddenSeries::new(),
            show_targets: true,
            color_map: None,
            status_message: None,
        }
    }

    /// Install a newly validated dataset and reset the series selection.
    pub fn set_dataset(&mut self, dataset: SessionDataset) {
        self.color_map = Some(ColorMap::new(&dataset));
        self.hidden.clear();
        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Load another session file. On failure the current dataset is kept and
    /// the error is shown in the status line.
    pub fn open(&mut self, path: &Path) {
        let loader = SessionLoader::new(self.config.bounds);
        match load_file(path, &loader) {
            Ok(dataset) => {
                log::info!(
                    "Loaded subject {} with {} observations in {} series",
                    dataset.subject_label(),
                    dataset.observation_count(),
                    dataset.series.len()
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Series to draw, in legend order.
    pub fn visible(&self) -> Vec<&SeriesKey> {
        match &self.dataset {
            Some(ds) => visible_series(ds, &self.hidden),
            None => Vec::new(),
        }
    }

    pub fn is_visible(&self, key: &SeriesKey) -> bool {
        !self.hidden.contains(key)
    }

    /// Toggle a single series on or off.
    pub fn toggle_series(&mut self, key: &SeriesKey) {
        if !self.hidden.remove(key) {
            self.hidden.insert(key.clone());
        }
    }

    pub fn show_all(&mut self) {
        self.hidden.clear();
    }

    pub fn hide_all(&mut self) {
        if let Some(ds) = &self.dataset {
            self.hidden = ds.series.keys().cloned().collect();
        }
    }
}
