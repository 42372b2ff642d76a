use std::collections::BTreeMap;

use eframe::egui::{pos2, vec2, Align2, Color32, CornerRadius, FontId, Rect, RichText, Sense, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use crate::color::SeriesColors;
use crate::dashboards::PivotCounts;

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Ranked categories as horizontal bars, first entry on top.
pub fn horizontal_bar(ui: &mut Ui, id: &str, entries: &[(String, i64)], color: Color32, height: f32) {
    if entries.is_empty() {
        empty_note(ui);
        return;
    }
    let n = entries.len();
    let bars: Vec<Bar> = entries
        .iter()
        .enumerate()
        .map(|(i, (label, count))| {
            Bar::new((n - 1 - i) as f64, *count as f64)
                .width(0.6)
                .name(label)
        })
        .collect();
    let chart = BarChart::new(bars).horizontal().color(color);

    // Bar at position p carries the label of entry n-1-p.
    let labels: Vec<String> = entries.iter().rev().map(|(l, _)| truncate(l, 24)).collect();
    Plot::new(id.to_string())
        .height(height)
        .allow_scroll(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .y_axis_formatter(move |mark, _range| axis_label(&labels, mark.value))
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

/// One bar group per category, one bar per series within the group.
pub fn grouped_bars(
    ui: &mut Ui,
    id: &str,
    pivot: &PivotCounts,
    colors: &SeriesColors,
    height: f32,
) {
    if pivot.is_empty() {
        empty_note(ui);
        return;
    }
    let group_width = 0.8;
    let bar_width = group_width / pivot.series.len() as f64;

    let mut charts = Vec::new();
    for (s, series_label) in pivot.series.iter().enumerate() {
        let bars: Vec<Bar> = pivot
            .categories
            .iter()
            .enumerate()
            .map(|(c, _)| {
                let x = c as f64 - group_width / 2.0 + bar_width * (s as f64 + 0.5);
                Bar::new(x, pivot.values[s][c] as f64).width(bar_width * 0.9)
            })
            .collect();
        charts.push(
            BarChart::new(bars)
                .name(series_label)
                .color(colors.color_for(series_label)),
        );
    }

    let labels: Vec<String> = pivot.categories.iter().map(|c| truncate(c, 16)).collect();
    Plot::new(id.to_string())
        .height(height)
        .legend(Legend::default())
        .allow_scroll(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(move |mark, _range| axis_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Trend lines
// ---------------------------------------------------------------------------

/// One filled line per series over a numeric x axis (years).
pub fn trend_lines(
    ui: &mut Ui,
    id: &str,
    series: &BTreeMap<String, Vec<[f64; 2]>>,
    colors: &SeriesColors,
    height: f32,
) {
    if series.values().all(|points| points.is_empty()) {
        empty_note(ui);
        return;
    }
    Plot::new(id.to_string())
        .height(height)
        .legend(Legend::default())
        .allow_scroll(false)
        .x_axis_formatter(|mark, _range| {
            if mark.value.fract().abs() < 1e-6 {
                format!("{}", mark.value as i64)
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            for (label, points) in series {
                let line = Line::new(PlotPoints::from(points.clone()))
                    .name(label)
                    .color(colors.color_for(label))
                    .width(2.0)
                    .fill(0.0);
                plot_ui.line(line);
            }
        });
}

// ---------------------------------------------------------------------------
// Heat grid
// ---------------------------------------------------------------------------

/// Painted grid of counts: categories on x, series on y, cell intensity
/// scaled to the largest count.
pub fn heat_grid(ui: &mut Ui, pivot: &PivotCounts, accent: Color32, height: f32) {
    if pivot.is_empty() {
        empty_note(ui);
        return;
    }
    let max = pivot.max_value().max(1) as f32;
    let label_w = 80.0;
    let label_h = 26.0;

    let (response, painter) = ui.allocate_painter(vec2(ui.available_width(), height), Sense::hover());
    let rect = response.rect;
    let grid = Rect::from_min_max(
        pos2(rect.min.x + label_w, rect.min.y),
        pos2(rect.max.x, rect.max.y - label_h),
    );
    let cell_w = grid.width() / pivot.categories.len() as f32;
    let cell_h = grid.height() / pivot.series.len() as f32;

    let base = ui.visuals().extreme_bg_color;
    let text_color = ui.visuals().text_color();
    let font = FontId::proportional(11.0);

    for (s, series_label) in pivot.series.iter().enumerate() {
        let y = grid.min.y + cell_h * (s as f32 + 0.5);
        painter.text(
            pos2(rect.min.x + 4.0, y),
            Align2::LEFT_CENTER,
            truncate(series_label, 12),
            font.clone(),
            text_color,
        );
        for (c, _) in pivot.categories.iter().enumerate() {
            let value = pivot.values[s][c];
            let t = value as f32 / max;
            let cell = Rect::from_min_size(
                pos2(grid.min.x + cell_w * c as f32, grid.min.y + cell_h * s as f32),
                vec2(cell_w, cell_h),
            )
            .shrink(1.0);
            painter.rect_filled(cell, CornerRadius::same(2), lerp_color(base, accent, t));
            let count_color = if t > 0.55 { Color32::WHITE } else { text_color };
            painter.text(
                cell.center(),
                Align2::CENTER_CENTER,
                value.to_string(),
                font.clone(),
                count_color,
            );
        }
    }
    for (c, category) in pivot.categories.iter().enumerate() {
        painter.text(
            pos2(grid.min.x + cell_w * (c as f32 + 0.5), rect.max.y - label_h / 2.0),
            Align2::CENTER_CENTER,
            truncate(category, 14),
            font.clone(),
            text_color,
        );
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn empty_note(ui: &mut Ui) {
    ui.label(RichText::new("No data for this selection.").weak());
}

/// Label for integer axis positions, blank elsewhere.
fn axis_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 0.25 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Color32::from_rgb(mix(a.r(), b.r()), mix(a.g(), b.g()), mix(a.b(), b.b()))
}
