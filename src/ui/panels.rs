use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::color;
use crate::engine::Frame;
use crate::state::{AppState, StatusMessage};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top toolbar: title, loaded tables, theme switch, status line.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.label(RichText::new("Data Analytics Hub").strong());
        ui.separator();

        let tables = state.namespace.table_names();
        if tables.is_empty() {
            ui.label(RichText::new("no tables loaded").weak());
        } else {
            ui.label(format!("tables: {}", tables.join(", ")));
        }

        ui.separator();
        egui::widgets::global_theme_preference_switch(ui);

        if let Some(msg) = &state.status {
            let color = if msg.is_error {
                Color32::RED
            } else {
                color::GREEN
            };
            ui.separator();
            ui.label(RichText::new(&msg.text).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – ingestion
// ---------------------------------------------------------------------------

/// Render the ingestion panel: the two CSV loaders, reset, session info.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Ingestion");
    ui.separator();
    ui.label("Load the two CSV datasets to activate the dashboards.");
    ui.add_space(8.0);

    ui.strong("Media catalog");
    if ui.button("Load catalog CSV…").clicked() {
        if let Some(path) = pick_csv("Open media catalog CSV") {
            state.load_catalog(&path);
        }
    }
    match &state.catalog {
        Some(cat) => {
            ui.label(
                RichText::new(format!("ready · {} release years", cat.years.len()))
                    .small()
                    .color(color::GREEN),
            );
        }
        None => {
            ui.label(RichText::new("not loaded").small().weak());
        }
    }

    ui.add_space(10.0);
    ui.strong("Well-being survey");
    if ui.button("Load survey CSV…").clicked() {
        if let Some(path) = pick_csv("Open well-being survey CSV") {
            state.load_survey(&path);
        }
    }
    match &state.wellbeing {
        Some(wb) => {
            ui.label(
                RichText::new(format!("ready · {} respondents", wb.view.kpis.respondents))
                    .small()
                    .color(color::GREEN),
            );
        }
        None => {
            ui.label(RichText::new("not loaded").small().weak());
        }
    }

    ui.add_space(14.0);
    ui.separator();
    if ui.button("🗑 Reset data").clicked() {
        state.reset();
    }

    ui.add_space(14.0);
    ui.separator();
    ui.label(
        RichText::new(format!("Session started {}", state.session_start))
            .small()
            .weak(),
    );
}

// ---------------------------------------------------------------------------
// Footer
// ---------------------------------------------------------------------------

pub fn footer(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(
            RichText::new(format!(
                "Data Analytics Hub v{} · powered by egui & DataFusion · session {}",
                env!("CARGO_PKG_VERSION"),
                state.session_start
            ))
            .small()
            .weak(),
        );
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

fn pick_csv(title: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter("CSV", &["csv"])
        .pick_file()
}

/// Ask for a destination and write the frame as CSV. Returns the status to
/// show, or `None` when the user cancelled the dialog.
pub fn save_frame_csv(frame: &Frame, suggested_name: &str) -> Option<StatusMessage> {
    let path = rfd::FileDialog::new()
        .set_title("Export CSV")
        .set_file_name(suggested_name)
        .add_filter("CSV", &["csv"])
        .save_file()?;

    let result = crate::export::write_frame_csv(frame)
        .and_then(|bytes| std::fs::write(&path, bytes).map_err(anyhow::Error::from));
    match result {
        Ok(()) => {
            log::info!("exported {} rows to {}", frame.len(), path.display());
            Some(StatusMessage::info(format!("Exported {} rows", frame.len())))
        }
        Err(e) => {
            log::error!("export failed: {e:#}");
            Some(StatusMessage::error(format!("Export failed: {e:#}")))
        }
    }
}
