use std::collections::BTreeMap;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::color::{self, yes_no_colors, SeriesColors};
use crate::dashboards::{catalog, pivot_counts};
use crate::state::{AppState, CatalogState, StatusMessage, WellbeingState};
use crate::ui::{charts, panels, widgets};

// ---------------------------------------------------------------------------
// Catalog tab
// ---------------------------------------------------------------------------

enum CatalogAction {
    SetYear(i64),
    ExportYear,
}

pub fn catalog_tab(ui: &mut Ui, state: &mut AppState) {
    let mut actions: Vec<CatalogAction> = Vec::new();
    if let Some(cat) = &state.catalog {
        render_catalog(ui, cat, &mut actions);
    } else {
        placeholder(ui, "Load the media catalog CSV to activate this view.");
        return;
    }

    for action in actions {
        match action {
            CatalogAction::SetYear(year) => state.set_year(year),
            CatalogAction::ExportYear => {
                let Some(year) = state.catalog.as_ref().map(|c| c.selected_year) else {
                    continue;
                };
                match catalog::export_rows(&state.namespace, year) {
                    Ok(frame) => {
                        if let Some(msg) =
                            panels::save_frame_csv(&frame, &format!("amazon_{year}.csv"))
                        {
                            state.status = Some(msg);
                        }
                    }
                    Err(e) => {
                        log::error!("export failed: {e}");
                        state.status = Some(StatusMessage::error(format!("Export failed: {e}")));
                    }
                }
            }
        }
    }
}

fn render_catalog(ui: &mut Ui, cat: &CatalogState, actions: &mut Vec<CatalogAction>) {
    let view = &cat.view;

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Analysis year");
        egui::ComboBox::from_id_salt("catalog_year")
            .selected_text(cat.selected_year.to_string())
            .show_ui(ui, |ui: &mut Ui| {
                for year in &cat.years {
                    if ui
                        .selectable_label(*year == cat.selected_year, year.to_string())
                        .clicked()
                    {
                        actions.push(CatalogAction::SetYear(*year));
                    }
                }
            });
        if ui.button("📥 Export year data").clicked() {
            actions.push(CatalogAction::ExportYear);
        }
    });
    ui.add_space(6.0);

    ui.columns(4, |cols: &mut [Ui]| {
        widgets::kpi_card(
            &mut cols[0],
            "Total titles",
            &view.kpis.total_titles.to_string(),
            Some((&format!("in {}", view.year), Color32::GRAY)),
        );
        widgets::kpi_card(
            &mut cols[1],
            "Movies",
            &view.kpis.movies.to_string(),
            Some((&format!("{}% of catalog", view.kpis.movie_pct), color::BLUE)),
        );
        widgets::kpi_card(
            &mut cols[2],
            "TV shows",
            &view.kpis.tv_shows.to_string(),
            Some((&format!("{}% of catalog", view.kpis.tv_pct), color::ORANGE)),
        );
        widgets::kpi_card(
            &mut cols[3],
            "Dominant rating",
            view.kpis.dominant_rating.as_deref().unwrap_or("N/A"),
            Some(("most frequent rating", color::PURPLE)),
        );
    });

    ui.add_space(10.0);
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].label(RichText::new("Top 10 genres").strong());
        charts::horizontal_bar(&mut cols[0], "top_genres", &view.top_genres, color::BLUE, 320.0);

        cols[1].label(RichText::new("Ratings by type").strong());
        let by_rating: Vec<(String, String, i64)> = view
            .rating_breakdown
            .iter()
            .map(|(kind, rating, n)| (rating.clone(), kind.clone(), *n))
            .collect();
        let pivot = pivot_counts(&by_rating);
        let colors = SeriesColors::new(&pivot.series);
        charts::grouped_bars(&mut cols[1], "rating_by_type", &pivot, &colors, 320.0);
    });

    ui.add_space(10.0);
    ui.label(
        RichText::new(format!(
            "Production trend ({}-{})",
            view.year - catalog::TREND_SPAN_YEARS,
            view.year
        ))
        .strong(),
    );
    let mut trend_series: BTreeMap<String, Vec<[f64; 2]>> = BTreeMap::new();
    for (year, kind, count) in &view.trend {
        trend_series
            .entry(kind.clone())
            .or_default()
            .push([*year as f64, *count as f64]);
    }
    let trend_colors = SeriesColors::new(trend_series.keys());
    charts::trend_lines(ui, "catalog_trend", &trend_series, &trend_colors, 240.0);

    ui.add_space(10.0);
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].label(RichText::new("Top 5 directors").strong());
        widgets::frame_table(&mut cols[0], "top_directors", &view.top_directors, 170.0);
        cols[1].label(RichText::new("Top 5 producing countries").strong());
        widgets::frame_table(&mut cols[1], "top_countries", &view.top_countries, 170.0);
    });
}

// ---------------------------------------------------------------------------
// Well-being tab
// ---------------------------------------------------------------------------

enum WellbeingAction {
    ToggleCourse(String),
    ClearCourses,
    ExportExplorer,
}

pub fn wellbeing_tab(ui: &mut Ui, state: &mut AppState) {
    let mut actions: Vec<WellbeingAction> = Vec::new();
    if let Some(wb) = &state.wellbeing {
        render_wellbeing(ui, wb, &mut actions);
    } else {
        placeholder(ui, "Load the well-being survey CSV to activate this view.");
        return;
    }

    for action in actions {
        match action {
            WellbeingAction::ToggleCourse(course) => state.toggle_course(&course),
            WellbeingAction::ClearCourses => state.clear_courses(),
            WellbeingAction::ExportExplorer => {
                let Some(frame) = state.wellbeing.as_ref().map(|wb| wb.explorer.clone()) else {
                    continue;
                };
                if let Some(msg) = panels::save_frame_csv(&frame, "mental_health_export.csv") {
                    state.status = Some(msg);
                }
            }
        }
    }
}

fn render_wellbeing(ui: &mut Ui, wb: &WellbeingState, actions: &mut Vec<WellbeingAction>) {
    let view = &wb.view;

    ui.columns(4, |cols: &mut [Ui]| {
        widgets::kpi_card(
            &mut cols[0],
            "Student panel",
            &view.kpis.respondents.to_string(),
            Some(("respondents", Color32::GRAY)),
        );
        widgets::kpi_card(
            &mut cols[1],
            "Depression",
            &format!("{}%", view.kpis.depression_pct),
            Some(("declared rate", color::RED)),
        );
        widgets::kpi_card(
            &mut cols[2],
            "Anxiety",
            &format!("{}%", view.kpis.anxiety_pct),
            Some(("declared rate", color::ORANGE)),
        );
        widgets::kpi_card(
            &mut cols[3],
            "Panic attacks",
            &format!("{}%", view.kpis.panic_pct),
            Some(("declared rate", color::PURPLE)),
        );
    });

    ui.add_space(10.0);
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].label(RichText::new("Anxiety by study year").strong());
        let anxiety = pivot_counts(&view.anxiety_by_study_year);
        charts::grouped_bars(
            &mut cols[0],
            "anxiety_by_year",
            &anxiety,
            &yes_no_colors(&anxiety.series),
            300.0,
        );

        cols[1].label(RichText::new("Depression by gender").strong());
        let depression = pivot_counts(&view.depression_by_gender);
        charts::grouped_bars(
            &mut cols[1],
            "depression_by_gender",
            &depression,
            &yes_no_colors(&depression.series),
            300.0,
        );
    });

    ui.add_space(10.0);
    ui.label(RichText::new("Visual indicators").strong());
    ui.columns(3, |cols: &mut [Ui]| {
        widgets::gauge(&mut cols[0], "Depression", view.kpis.depression_pct, color::RED);
        widgets::gauge(&mut cols[1], "Anxiety", view.kpis.anxiety_pct, color::ORANGE);
        widgets::gauge(&mut cols[2], "Panic attacks", view.kpis.panic_pct, color::PURPLE);
    });

    ui.add_space(10.0);
    ui.label(RichText::new("CGPA × depression heat map").strong());
    charts::heat_grid(ui, &pivot_counts(&view.cgpa_depression), color::RED, 190.0);

    ui.add_space(10.0);
    egui::CollapsingHeader::new(RichText::new("Data explorer").strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal_wrapped(|ui: &mut Ui| {
                ui.label("Filter by course:");
                for course in &wb.courses {
                    let mut checked = wb.selected_courses.contains(course);
                    if ui.checkbox(&mut checked, course).changed() {
                        actions.push(WellbeingAction::ToggleCourse(course.clone()));
                    }
                }
                if !wb.selected_courses.is_empty() && ui.small_button("Clear").clicked() {
                    actions.push(WellbeingAction::ClearCourses);
                }
            });
            ui.label(
                RichText::new(format!("{} rows", wb.explorer.len()))
                    .small()
                    .weak(),
            );
            widgets::frame_table(ui, "explorer", &wb.explorer, 280.0);
            if ui.button("📥 Export this view").clicked() {
                actions.push(WellbeingAction::ExportExplorer);
            }
        });
}

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

fn placeholder(ui: &mut Ui, msg: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading(RichText::new(msg).weak());
    });
}
