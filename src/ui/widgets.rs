use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::engine::Frame;

// ---------------------------------------------------------------------------
// KPI cards
// ---------------------------------------------------------------------------

/// A single summarized indicator: small title, large value, optional
/// accented subtext.
pub fn kpi_card(ui: &mut Ui, title: &str, value: &str, subtext: Option<(&str, Color32)>) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        ui.vertical(|ui| {
            ui.label(RichText::new(title.to_uppercase()).small().weak());
            ui.label(RichText::new(value).size(24.0).strong());
            if let Some((text, color)) = subtext {
                ui.label(RichText::new(text).small().color(color));
            }
        });
    });
}

/// A rate indicator rendered as a labelled progress meter.
pub fn gauge(ui: &mut Ui, label: &str, pct: i64, color: Color32) {
    ui.vertical(|ui| {
        ui.label(RichText::new(label).small().weak());
        let fraction = (pct as f32 / 100.0).clamp(0.0, 1.0);
        ui.add(
            egui::ProgressBar::new(fraction)
                .fill(color)
                .text(format!("{pct}%")),
        );
    });
}

// ---------------------------------------------------------------------------
// Result tables
// ---------------------------------------------------------------------------

/// Render a frame as a scrollable striped table.
pub fn frame_table(ui: &mut Ui, id_salt: &str, frame: &Frame, height: f32) {
    if frame.columns.is_empty() {
        ui.label(RichText::new("No rows.").weak());
        return;
    }
    ui.push_id(id_salt, |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .columns(Column::auto().at_least(70.0), frame.columns.len())
            .max_scroll_height(height)
            .header(20.0, |mut header| {
                for col in &frame.columns {
                    header.col(|ui| {
                        ui.label(RichText::new(col).strong());
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, frame.len(), |mut row| {
                    let cells = &frame.rows[row.index()];
                    for cell in cells {
                        row.col(|ui| {
                            ui.label(cell.to_string());
                        });
                    }
                });
            });
    });
}
