use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AppState, View};

// ---------------------------------------------------------------------------
// Left side panel – dataset, target and fold selection
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Dataset");
    ui.separator();

    let Some(registry) = &state.registry else {
        ui.label("No data folder opened.");
        return;
    };

    // Clone what we need so we can mutate state inside the closures.
    let names = registry.list();
    let current = state.selected.clone().unwrap_or_default();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Dataset selector ----
            egui::ComboBox::from_id_salt("dataset")
                .selected_text(&current)
                .show_ui(ui, |ui: &mut Ui| {
                    for name in &names {
                        if ui.selectable_label(current == *name, name).clicked() {
                            state.select_dataset(name);
                        }
                    }
                });

            let Some(dataset) = &state.dataset else {
                return;
            };
            let targets = dataset.dataset.target_columns();
            let n_samples = dataset.len();
            let n_features = dataset.dataset.feature_columns().len();
            let has_coords = dataset.has_coordinates();

            ui.label(format!("{n_samples} samples, {n_features} features"));
            if !has_coords {
                ui.label(RichText::new("No coordinates (omitted for privacy)").italics());
            }
            ui.separator();

            // ---- Target selector ----
            ui.strong("Target");
            let current_target = state.target.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt("target")
                .selected_text(&current_target)
                .show_ui(ui, |ui: &mut Ui| {
                    for t in &targets {
                        if ui.selectable_label(current_target == *t, t).clicked() {
                            state.set_target(t.clone());
                        }
                    }
                });
            ui.separator();

            // ---- Test fold ----
            ui.strong("Test fold");
            let mut fold = state.test_fold;
            let max_fold = state.n_folds as i64;
            if ui
                .add(egui::Slider::new(&mut fold, 1..=max_fold))
                .changed()
            {
                state.set_test_fold(fold);
            }

            if let Some(summary) = &state.fold_summary {
                ui.label(format!(
                    "{} train / {} test rows",
                    summary.n_train, summary.n_test
                ));
                ui.label(format!(
                    "Mean baseline: R² {:.3}, RMSE {:.3}",
                    summary.baseline.r2, summary.baseline.rmse
                ));
            }
            ui.separator();

            // ---- Cross-validation over all folds ----
            if let Some(cv) = &state.cv_report {
                egui::CollapsingHeader::new(RichText::new("Cross-validation (baseline)").strong())
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        ui.label(format!("R²   {:.3} ± {:.3}", cv.mean_r2, cv.std_r2));
                        ui.label(format!("RMSE {:.3} ± {:.3}", cv.mean_rmse, cv.std_rmse));
                        for f in &cv.folds {
                            ui.label(format!(
                                "fold {:>2}: n={:<3} R² {:.3}  RMSE {:.3}",
                                f.fold, f.n_test, f.performance.r2, f.performance.rmse
                            ));
                        }
                    });
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
            if ui.button("Open folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(registry) = &state.registry {
            ui.label(format!("{} datasets", registry.len()));
        }
        if let Some(name) = &state.selected {
            ui.label(RichText::new(name).strong());
        }

        ui.separator();

        if ui
            .selectable_label(state.view == View::Map, "Map")
            .clicked()
        {
            state.view = View::Map;
        }
        if ui
            .selectable_label(state.view == View::Statistics, "Statistics")
            .clicked()
        {
            state.view = View::Statistics;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open LimeSoDa data folder")
        .pick_folder();

    if let Some(path) = folder {
        state.open_dir(&path);
    }
}
