//! Command-line surface: argument parsing and the load → validate → render run.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use eframe::egui;

use crate::app::TrackerViewerApp;
use crate::color::ColorMap;
use crate::config::SessionConfig;
use crate::data::{load_file, SessionLoader};
use crate::prompt::confirm_overwrite;
use crate::render::write_plot;
use crate::state::AppState;

#[derive(Parser, Debug, Default)]
#[command(name = "tracker-viewer")]
#[command(about = "Plot a single-subject tracker validation session")]
pub struct Args {
    /// Session CSV recorded by the tracker validation tool
    pub data_csv: PathBuf,

    /// Write the plot to this image (.png, .jpg, .bmp) instead of opening a window
    pub graph_output: Option<PathBuf>,

    /// JSON config with display bounds and plot style
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Display width in pixels (overrides the config)
    #[arg(long)]
    pub width: Option<i64>,

    /// Display height in pixels (overrides the config)
    #[arg(long)]
    pub height: Option<i64>,

    /// Save the effective config (after overrides) to this JSON file
    #[arg(long)]
    pub write_config: Option<PathBuf>,

    /// Overwrite an existing output file without asking
    #[arg(short, long)]
    pub force: bool,

    /// Print the validated session as JSON
    #[arg(short, long)]
    pub summary: bool,
}

/// How a run ended when no fatal error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// The user refused to overwrite the existing output file.
    Declined,
}

/// Execute one run. `input`/`output` carry the overwrite prompt and the
/// `--summary` JSON.
pub fn run<R: BufRead, W: Write>(args: &Args, input: &mut R, output: &mut W) -> Result<Outcome> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::from_json(path)?,
        None => SessionConfig::default(),
    };
    if let Some(w) = args.width {
        config.bounds.width = w;
    }
    if let Some(h) = args.height {
        config.bounds.height = h;
    }
    config.validate().context("invalid display bounds")?;

    if let Some(path) = &args.write_config {
        config.to_json(path)?;
        log::info!("Saved config to {}", path.display());
    }

    if let Some(out) = &args.graph_output {
        if out.exists() && !args.force {
            let confirmed =
                confirm_overwrite(out, input, output).context("reading overwrite confirmation")?;
            if !confirmed {
                writeln!(output, "Exiting")?;
                return Ok(Outcome::Declined);
            }
            writeln!(output, "File will be overwritten")?;
        }
    }

    if !args.data_csv.exists() {
        bail!("data file does not exist: {}", args.data_csv.display());
    }
    log::info!("Using input file: {}", args.data_csv.display());

    let loader = SessionLoader::new(config.bounds);
    let dataset = load_file(&args.data_csv, &loader)?;

    if args.summary {
        let json = serde_json::to_string_pretty(&dataset).context("serializing summary")?;
        writeln!(output, "{json}")?;
    }

    match &args.graph_output {
        Some(out) => {
            let colors = ColorMap::new(&dataset);
            write_plot(&dataset, &colors, &config, out)?;
        }
        None => {
            log::info!("Displaying output on screen");
            let mut state = AppState::new(config);
            state.set_dataset(dataset);
            run_viewer(state)?;
        }
    }

    log::info!("Finished");
    Ok(Outcome::Completed)
}

fn run_viewer(state: AppState) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Tracker Viewer – Single Subject",
        options,
        Box::new(|_cc| Ok(Box::new(TrackerViewerApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const SESSION: &str = "L1,P01,T1,0,1,100,100,0,0,102,98\nL1,P01,T1,16,2,900,500,0,0,905,497\n";

    fn args(data_csv: &Path, graph_output: Option<PathBuf>) -> Args {
        Args {
            data_csv: data_csv.to_path_buf(),
            graph_output,
            ..Args::default()
        }
    }

    fn run_with(args: &Args, answers: &str) -> (Result<Outcome>, String) {
        let mut input = answers.as_bytes();
        let mut output = Vec::new();
        let outcome = run(args, &mut input, &mut output);
        (outcome, String::from_utf8(output).unwrap())
    }

    #[test]
    fn missing_input_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("plot.png");
        let (outcome, _) = run_with(&args(&dir.path().join("absent.csv"), Some(out.clone())), "");

        let err = outcome.unwrap_err();
        assert!(err.to_string().contains("data file does not exist"));
        assert!(!out.exists());
    }

    #[test]
    fn declined_overwrite_stops_before_loading() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("plot.png");
        std::fs::write(&out, b"old").unwrap();

        // the input file does not exist either: the prompt must come first
        let (outcome, printed) = run_with(&args(&dir.path().join("absent.csv"), Some(out.clone())), "n\n");

        assert_eq!(outcome.unwrap(), Outcome::Declined);
        assert!(printed.ends_with("Exiting\n"));
        assert_eq!(std::fs::read(&out).unwrap(), b"old");
    }

    #[test]
    fn accepted_overwrite_replaces_output() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("session.csv");
        std::fs::write(&csv, SESSION).unwrap();
        let out = dir.path().join("plot.png");
        std::fs::write(&out, b"old").unwrap();

        let (outcome, printed) = run_with(&args(&csv, Some(out.clone())), "y\n");

        assert_eq!(outcome.unwrap(), Outcome::Completed);
        assert!(printed.contains("File will be overwritten"));
        assert!(image::open(&out).is_ok());
    }

    #[test]
    fn summary_is_printed_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("session.csv");
        std::fs::write(&csv, SESSION).unwrap();
        let mut a = args(&csv, Some(dir.path().join("plot.png")));
        a.summary = true;

        let (outcome, printed) = run_with(&a, "");
        assert_eq!(outcome.unwrap(), Outcome::Completed);
        let json: serde_json::Value = serde_json::from_str(&printed).unwrap();
        assert_eq!(json["subject"], "P01");
        assert_eq!(json["series"][0]["observations"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn effective_config_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("session.csv");
        std::fs::write(&csv, SESSION).unwrap();
        let cfg_path = dir.path().join("effective.json");
        let mut a = args(&csv, Some(dir.path().join("plot.png")));
        a.width = Some(2560);
        a.height = Some(1440);
        a.write_config = Some(cfg_path.clone());

        let (outcome, _) = run_with(&a, "");
        outcome.unwrap();

        let saved = SessionConfig::from_json(&cfg_path).unwrap();
        assert_eq!((saved.bounds.width, saved.bounds.height), (2560, 1440));
    }

    #[test]
    fn validation_error_surfaces() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("session.csv");
        std::fs::write(&csv, "L,P01,T,0,1,10,10,0,0,10,10\nL,P02,T,0,1,10,10,0,0,10,10\n").unwrap();

        let (outcome, _) = run_with(&args(&csv, Some(dir.path().join("plot.png"))), "");
        let err = outcome.unwrap_err();
        assert!(format!("{err:#}").contains("multiple subjects found in dataset: P01 and P02"));
    }
}
