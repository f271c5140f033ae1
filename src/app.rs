use eframe::egui;

use crate::state::{AppState, View};
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct LimeSodaApp {
    pub state: AppState,
}

impl eframe::App for LimeSodaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: dataset / target / fold ----
        egui::SidePanel::left("selection_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: map or statistics ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            View::Map => plot::soil_map_plot(ui, &self.state),
            View::Statistics => plot::statistics_table(ui, &self.state),
        });
    }
}
