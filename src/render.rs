//! Raster output: draws a validated session as a chart image.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_backend::DrawingErrorKind;

use crate::color::ColorMap;
use crate::config::SessionConfig;
use crate::data::model::SessionDataset;

/// Formats the `image` crate is built with in this crate.
const SUPPORTED_FORMATS: [ImageFormat; 3] = [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Bmp];

/// Render `dataset` into an RGB image of `config.plot.image_width × image_height`.
///
/// Axes span the closed display bounds with y growing downward. Targets are
/// drawn as translucent crosses, each series as filled dots in its legend
/// colour, with a `"<tracker> :: <label>"` legend and the subject as caption.
///
/// When no font can be loaded the chart is redrawn without any text.
pub fn render_image(dataset: &SessionDataset, colors: &ColorMap, config: &SessionConfig) -> Result<RgbImage> {
    config.validate().context("invalid plot configuration")?;
    let (w, h) = (config.plot.image_width, config.plot.image_height);
    let len = (w as usize)
        .checked_mul(h as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or_else(|| anyhow!("image size {w}x{h} is too large"))?;

    let mut buf = vec![0u8; len];
    let drawn = draw_into(&mut buf, (w, h), dataset, colors, config, true);
    if let Err(e) = drawn {
        if !is_font_error(&e) {
            return Err(anyhow!("plotting error: {e}"));
        }
        log::warn!("No usable font, drawing chart without text: {e}");
        buf.fill(0);
        draw_into(&mut buf, (w, h), dataset, colors, config, false)
            .map_err(|e| anyhow!("plotting error: {e}"))?;
    }

    RgbImage::from_raw(w, h, buf).context("chart buffer does not match image size")
}

/// Render and write the chart. The format follows the file extension.
pub fn write_plot(
    dataset: &SessionDataset,
    colors: &ColorMap,
    config: &SessionConfig,
    path: &Path,
) -> Result<()> {
    let format = ImageFormat::from_path(path)
        .ok()
        .filter(|f| SUPPORTED_FORMATS.contains(f))
        .with_context(|| {
            format!(
                "Unsupported output format for {}: expected .png, .jpg or .bmp",
                path.display()
            )
        })?;

    let img = render_image(dataset, colors, config)?;
    img.save_with_format(path, format)
        .with_context(|| format!("writing plot to {}", path.display()))?;
    log::info!("Wrote plot to {}", path.display());
    Ok(())
}

fn is_font_error<E: std::error::Error + Send + Sync>(e: &DrawingAreaErrorKind<E>) -> bool {
    matches!(e, DrawingAreaErrorKind::BackendError(DrawingErrorKind::FontError(_)))
}

fn draw_into(
    buf: &mut [u8],
    size: (u32, u32),
    dataset: &SessionDataset,
    colors: &ColorMap,
    config: &SessionConfig,
    with_text: bool,
) -> Result<(), DrawingAreaErrorKind<<BitMapBackend<'static> as DrawingBackend>::ErrorType>> {
    let root = BitMapBackend::with_buffer(buf, size).into_drawing_area();
    draw_chart(&root, dataset, colors, config, with_text)?;
    root.present()
}

fn draw_chart<DB>(
    root: &DrawingArea<DB, Shift>,
    dataset: &SessionDataset,
    colors: &ColorMap,
    config: &SessionConfig,
    with_text: bool,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let w = config.bounds.width as f64;
    let h = config.bounds.height as f64;
    let label_area = if with_text { 50 } else { 0 };

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, label_area)
        .set_label_area_size(LabelAreaPosition::Bottom, label_area);
    if with_text {
        builder.caption(
            format!("Subject: {}", dataset.subject_label()),
            ("sans-serif", 30),
        );
    }
    // y is negated so that screen y grows downward on the chart
    let mut chart = builder.build_cartesian_2d(0.0..w, -h..0.0)?;

    let y_label = |v: &f64| format!("{:.0}", -v + 0.0);
    let mut mesh = chart.configure_mesh();
    mesh.light_line_style(BLACK.mix(0.05))
        .y_label_formatter(&y_label);
    if !with_text {
        mesh.x_labels(0).y_labels(0);
    }
    mesh.draw()?;

    let target_style = BLACK.mix(config.plot.target_alpha as f64).stroke_width(3);
    let half = config.plot.target_half_size.round() as i32;
    let targets = chart.draw_series(
        dataset
            .targets
            .values()
            .map(|p| Cross::new((p.x as f64, -(p.y as f64)), half, target_style)),
    )?;
    if with_text {
        targets
            .label("Targets")
            .legend(move |(x, y)| Cross::new((x, y), 6, target_style));
    }

    let radius = config.plot.observation_radius.round().max(1.0) as i32;
    for (key, observations) in &dataset.series {
        let [r, g, b, _] = colors.color_for(key).to_array();
        let color = RGBColor(r, g, b);
        let series = chart.draw_series(
            observations
                .iter()
                .map(|o| Circle::new((o.x as f64, -(o.y as f64)), radius, color.filled())),
        )?;
        if with_text {
            series
                .label(key.to_string())
                .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
        }
    }

    if with_text {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK.mix(0.3))
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::DisplayBounds;
    use crate::data::model::{Observation, Position, SeriesKey};

    fn small_config() -> SessionConfig {
        let mut cfg = SessionConfig::default();
        cfg.bounds = DisplayBounds::new(400, 300);
        cfg.plot.image_width = 400;
        cfg.plot.image_height = 300;
        cfg.plot.target_half_size = 5.0;
        cfg.plot.observation_radius = 3.0;
        cfg
    }

    fn one_series() -> SessionDataset {
        let mut ds = SessionDataset::default();
        ds.subject = Some("P01".into());
        ds.targets.insert(1, Position::new(100, 100));
        ds.series
            .insert(SeriesKey::new("T1", "L1"), vec![Observation::new(1, 300, 200)]);
        ds
    }

    #[test]
    fn image_has_configured_size() {
        let ds = one_series();
        let img = render_image(&ds, &ColorMap::new(&ds), &small_config()).unwrap();
        assert_eq!(img.dimensions(), (400, 300));
    }

    #[test]
    fn series_colour_appears_in_image() {
        let ds = one_series();
        let cm = ColorMap::new(&ds);
        let img = render_image(&ds, &cm, &small_config()).unwrap();

        let [r, g, b, _] = cm.color_for(&SeriesKey::new("T1", "L1")).to_array();
        assert!(img.pixels().any(|p| p.0 == [r, g, b]));
        assert!(img.pixels().any(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn oversized_bounds_fail_instead_of_panicking() {
        let ds = one_series();
        let mut cfg = small_config();
        cfg.bounds.width = u32::MAX as i64;
        let err = render_image(&ds, &ColorMap::new(&ds), &cfg).unwrap_err();
        assert!(format!("{err:#}").contains("bounds.width"));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let ds = one_series();
        let dir = tempfile::tempdir().unwrap();
        let err = write_plot(&ds, &ColorMap::new(&ds), &small_config(), &dir.path().join("plot.xyz"))
            .unwrap_err();
        assert!(err.to_string().contains("Unsupported output format"));
    }

    #[test]
    fn format_follows_extension() {
        let ds = one_series();
        let cm = ColorMap::new(&ds);
        let dir = tempfile::tempdir().unwrap();
        for name in ["plot.PNG", "plot.jpg", "plot.bmp"] {
            let path = dir.path().join(name);
            write_plot(&ds, &cm, &small_config(), &path).unwrap();
            let written = image::open(&path).expect("written image must decode");
            assert_eq!((written.width(), written.height()), (400, 300), "{name}");
        }
    }
}
