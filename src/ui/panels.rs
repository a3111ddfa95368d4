use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Right side panel – legend and series toggles
// ---------------------------------------------------------------------------

/// Render the legend: one checkbox per series in its plot colour.
pub fn legend_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Legend");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No session loaded.");
            return;
        }
    };

    ui.label(RichText::new(format!("Subject: {}", dataset.subject_label())).strong());
    ui.label(format!(
        "{} targets, {} observations",
        dataset.targets.len(),
        dataset.observation_count()
    ));
    if dataset.dropped_count() > 0 {
        ui.label(
            RichText::new(format!("{} out of bounds, not shown", dataset.dropped_count()))
                .color(Color32::DARK_GRAY),
        );
    }
    ui.separator();

    // Clone what we need so we can mutate state inside the loop.
    let keys: Vec<_> = dataset.series.keys().cloned().collect();

    ui.checkbox(&mut state.show_targets, "Targets");
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.show_all();
        }
        if ui.small_button("None").clicked() {
            state.hide_all();
        }
    });

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for key in &keys {
                let mut text = RichText::new(key.to_string());
                if let Some(cm) = &state.color_map {
                    text = text.color(cm.color_for(key));
                }

                let mut checked = state.is_visible(key);
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_series(key);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} series, {} visible",
                ds.series.len(),
                state.visible().len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open session data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
