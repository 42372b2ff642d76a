use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{dashboard, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DataHubApp {
    pub state: AppState,
}

impl Default for DataHubApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl eframe::App for DataHubApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: toolbar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: footer ----
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            panels::footer(ui, &self.state);
        });

        // ---- Left side panel: ingestion ----
        egui::SidePanel::left("ingestion_panel")
            .default_width(230.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: dashboards ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.state.active_tab, Tab::Catalog, "🎬 Media Catalog");
                ui.selectable_value(
                    &mut self.state.active_tab,
                    Tab::Wellbeing,
                    "🧠 Student Well-being",
                );
            });
            ui.separator();
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match self.state.active_tab {
                    Tab::Catalog => dashboard::catalog_tab(ui, &mut self.state),
                    Tab::Wellbeing => dashboard::wellbeing_tab(ui, &mut self.state),
                });
        });
    }
}
