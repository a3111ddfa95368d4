use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, MarkerShape, Plot, PlotPoints, Points};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Session plot (central panel)
// ---------------------------------------------------------------------------

/// Render targets and observation series in screen coordinates.
///
/// egui_plot's y axis points up, so y values are negated on the way in and
/// the axis labels and hover text negate them back.
pub fn session_plot(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a session to view it  (File → Open…)");
            });
            return;
        }
    };

    let bounds = state.config.bounds;
    let style = &state.config.plot;
    let (w, h) = (bounds.width as f64, bounds.height as f64);

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(format!("Subject: {}", dataset.subject_label()));
    });

    Plot::new("session_plot")
        .legend(Legend::default())
        .data_aspect(1.0)
        .include_x(0.0)
        .include_x(w)
        .include_y(0.0)
        .include_y(-h)
        .y_axis_formatter(|mark, _range| format!("{}", -mark.value + 0.0))
        .label_formatter(|name, value| {
            let point = format!("({:.0}, {:.0})", value.x, -value.y + 0.0);
            if name.is_empty() {
                point
            } else {
                format!("{name}\n{point}")
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let frame = PlotPoints::from(vec![[0.0, 0.0], [w, 0.0], [w, -h], [0.0, -h], [0.0, 0.0]]);
            plot_ui.line(Line::new(frame).color(Color32::DARK_GRAY).width(1.0));

            if state.show_targets {
                let targets: PlotPoints = dataset
                    .targets
                    .values()
                    .map(|p| [p.x as f64, -(p.y as f64)])
                    .collect();
                plot_ui.points(
                    Points::new(targets)
                        .name("Targets")
                        .shape(MarkerShape::Cross)
                        .radius(style.target_half_size)
                        .color(Color32::from_black_alpha((style.target_alpha * 255.0) as u8)),
                );
            }

            for key in state.visible() {
                let Some(observations) = dataset.series.get(key) else {
                    continue;
                };
                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(key))
                    .unwrap_or(Color32::LIGHT_BLUE);

                let points: PlotPoints = observations
                    .iter()
                    .map(|o| [o.x as f64, -(o.y as f64)])
                    .collect();

                plot_ui.points(
                    Points::new(points)
                        .name(key.to_string())
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(style.observation_radius)
                        .color(color),
                );
            }
        });
}
