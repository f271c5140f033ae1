use eframe::egui::{Color32, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoints, Points};
use limesoda::viz::color::Rgb8;

use crate::state::AppState;

pub fn to_color32(c: Rgb8) -> Color32 {
    Color32::from_rgb(c.red, c.green, c.blue)
}

// ---------------------------------------------------------------------------
// Soil map (central panel)
// ---------------------------------------------------------------------------

/// Render the current target on its sample coordinates; test-fold
/// samples get a red ring.
pub fn soil_map_plot(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a data folder and pick a dataset  (File → Open folder…)");
        });
        return;
    }
    let Some(map) = &state.soil_map else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("This dataset has no coordinates to map.");
        });
        return;
    };

    let test_rows = state
        .fold_summary
        .as_ref()
        .map(|s| s.test_rows.as_slice())
        .unwrap_or(&[]);

    ui.heading(&map.title);
    Plot::new("soil_map")
        .legend(Legend::default())
        .x_axis_label(map.x_column.as_str())
        .y_axis_label(map.y_column.as_str())
        .data_aspect(1.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            // Rings first so the coloured markers sit on top.
            let ring: PlotPoints = test_rows
                .iter()
                .filter_map(|&i| map.markers.get(i))
                .map(|m| [m.x, m.y])
                .collect();
            plot_ui.points(
                Points::new(ring)
                    .name(format!("test fold {}", state.test_fold))
                    .shape(MarkerShape::Circle)
                    .color(Color32::RED)
                    .radius(7.0)
                    .filled(true),
            );

            for m in &map.markers {
                plot_ui.points(
                    Points::new(PlotPoints::new(vec![[m.x, m.y]]))
                        .shape(MarkerShape::Circle)
                        .color(to_color32(m.color))
                        .radius(4.5)
                        .filled(true),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Column statistics (central panel)
// ---------------------------------------------------------------------------

pub fn statistics_table(ui: &mut Ui, state: &AppState) {
    if state.column_stats.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No dataset loaded.");
        });
        return;
    }

    let headers = ["Column", "n", "mean", "std", "min", "25th", "median", "75th", "max"];
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(140.0))
        .columns(Column::auto().at_least(60.0), headers.len() - 1)
        .header(20.0, |mut header| {
            for h in headers {
                header.col(|ui| {
                    ui.strong(h);
                });
            }
        })
        .body(|mut body| {
            for s in &state.column_stats {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(&s.column);
                    });
                    row.col(|ui| {
                        ui.label(s.count.to_string());
                    });
                    for v in [s.mean, s.std, s.min, s.q25, s.median, s.q75, s.max] {
                        row.col(|ui| {
                            ui.label(format!("{v:.3}"));
                        });
                    }
                });
            }
        });
}
