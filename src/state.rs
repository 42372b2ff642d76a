use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};

use crate::dashboards::catalog::{self, CatalogView};
use crate::dashboards::wellbeing::{self, WellbeingView};
use crate::engine::{ingest, Frame, HubError, QueryNamespace};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Catalog,
    Wellbeing,
}

/// Status line shown in the top bar.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        StatusMessage {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        StatusMessage {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Cached catalog dashboard: the enumerated year list plus the view composed
/// for the current selection.
pub struct CatalogState {
    pub years: Vec<i64>,
    pub selected_year: i64,
    pub view: CatalogView,
}

/// Cached well-being dashboard, including the explorer's course filter.
pub struct WellbeingState {
    pub view: WellbeingView,
    pub courses: Vec<String>,
    pub selected_courses: BTreeSet<String>,
    pub explorer: Frame,
}

/// The full UI state, independent of rendering. Views are recomputed on
/// ingestion or selection changes and cached between repaints.
pub struct AppState {
    /// Session-scoped table registry; dropped wholesale on reset.
    pub namespace: QueryNamespace,
    pub active_tab: Tab,
    pub catalog: Option<CatalogState>,
    pub wellbeing: Option<WellbeingState>,
    pub status: Option<StatusMessage>,
    pub session_start: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            namespace: QueryNamespace::new(),
            active_tab: Tab::Catalog,
            catalog: None,
            wellbeing: None,
            status: None,
            session_start: chrono::Local::now().format("%d/%m/%Y %H:%M").to_string(),
        }
    }
}

impl AppState {
    /// Ingest the media catalog CSV and rebuild its dashboard.
    pub fn load_catalog(&mut self, path: &Path) {
        match self.ingest_file(path, catalog::TABLE) {
            Ok(rows) => {
                log::info!("registered `{}` with {rows} rows", catalog::TABLE);
                self.rebuild_catalog();
                if self.catalog.is_some() {
                    self.status = Some(StatusMessage::info(format!("Catalog ready ({rows} rows)")));
                }
            }
            Err(e) => {
                log::error!("failed to load catalog: {e:#}");
                self.status = Some(StatusMessage::error(format!("Error: {e:#}")));
            }
        }
    }

    /// Ingest the survey CSV and rebuild its dashboard.
    pub fn load_survey(&mut self, path: &Path) {
        match self.ingest_file(path, wellbeing::TABLE) {
            Ok(rows) => {
                log::info!("registered `{}` with {rows} rows", wellbeing::TABLE);
                self.rebuild_wellbeing();
                if self.wellbeing.is_some() {
                    self.status = Some(StatusMessage::info(format!(
                        "Survey ready ({rows} respondents)"
                    )));
                }
            }
            Err(e) => {
                log::error!("failed to load survey: {e:#}");
                self.status = Some(StatusMessage::error(format!("Error: {e:#}")));
            }
        }
    }

    /// Change the catalog's analysis year. Years outside the enumerated list
    /// are ignored.
    pub fn set_year(&mut self, year: i64) {
        let valid = self
            .catalog
            .as_ref()
            .is_some_and(|c| c.years.contains(&year));
        if !valid {
            return;
        }
        match catalog::view(&self.namespace, year) {
            Ok(view) => {
                if let Some(cat) = &mut self.catalog {
                    cat.selected_year = year;
                    cat.view = view;
                }
            }
            Err(e) => self.engine_error("refreshing catalog view", e),
        }
    }

    /// Toggle one course in the explorer filter and refresh its rows.
    /// Courses outside the enumerated list are ignored.
    pub fn toggle_course(&mut self, course: &str) {
        let selected: Vec<String> = {
            let Some(wb) = &mut self.wellbeing else {
                return;
            };
            if !wb.courses.iter().any(|c| c == course) {
                return;
            }
            if !wb.selected_courses.remove(course) {
                wb.selected_courses.insert(course.to_string());
            }
            wb.selected_courses.iter().cloned().collect()
        };
        self.refresh_explorer(&selected);
    }

    /// Drop the course filter (show every respondent).
    pub fn clear_courses(&mut self) {
        let Some(wb) = &mut self.wellbeing else {
            return;
        };
        if wb.selected_courses.is_empty() {
            return;
        }
        wb.selected_courses.clear();
        self.refresh_explorer(&[]);
    }

    /// Clear the namespace and every cached view, back to the empty initial
    /// state. The session stamp survives.
    pub fn reset(&mut self) {
        self.namespace.reset();
        self.catalog = None;
        self.wellbeing = None;
        self.status = Some(StatusMessage::info("All data cleared"));
        log::info!("namespace reset");
    }

    // -- internals --

    fn ingest_file(&mut self, path: &Path, table: &str) -> Result<usize> {
        let bytes =
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let batch = ingest::ingest_csv(&bytes)?;
        let rows = batch.num_rows();
        self.namespace.register(table, batch)?;
        Ok(rows)
    }

    fn rebuild_catalog(&mut self) {
        let previous = self.catalog.as_ref().map(|c| c.selected_year);
        let built = catalog::release_years(&self.namespace).and_then(|years| {
            // Default to the third-newest year when the prior selection is gone.
            let selected = previous
                .filter(|y| years.contains(y))
                .or_else(|| years.get(2).copied())
                .or_else(|| years.first().copied());
            match selected {
                Some(year) => Ok(Some(CatalogState {
                    view: catalog::view(&self.namespace, year)?,
                    years,
                    selected_year: year,
                })),
                None => Ok(None),
            }
        });
        match built {
            Ok(state) => self.catalog = state,
            Err(e) => self.engine_error("building catalog view", e),
        }
    }

    fn rebuild_wellbeing(&mut self) {
        let built = wellbeing::view(&self.namespace).and_then(|view| {
            let courses = wellbeing::courses(&self.namespace)?;
            let explorer = wellbeing::explorer(&self.namespace, &[])?;
            Ok(WellbeingState {
                view,
                courses,
                selected_courses: BTreeSet::new(),
                explorer,
            })
        });
        match built {
            Ok(state) => self.wellbeing = Some(state),
            Err(e) => self.engine_error("building well-being view", e),
        }
    }

    fn refresh_explorer(&mut self, selected: &[String]) {
        match wellbeing::explorer(&self.namespace, selected) {
            Ok(frame) => {
                if let Some(wb) = &mut self.wellbeing {
                    wb.explorer = frame;
                }
            }
            Err(e) => self.engine_error("filtering explorer", e),
        }
    }

    fn engine_error(&mut self, what: &str, err: HubError) {
        log::error!("{what}: {err}");
        self.status = Some(StatusMessage::error(format!("Error {what}: {err}")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CATALOG_CSV: &str = "\
Type,Release Year,Rating,Listed In,Director,Country
Movie,2022,PG,Drama,Alice,USA
Movie,2021,PG,Comedy,Alice,USA
TV Show,2020,TV-MA,Drama,Bob,Canada
Movie,2019,R,Action,Bob,USA
";

    fn temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_catalog_defaults_to_third_newest_year() {
        let mut state = AppState::default();
        let file = temp_csv(CATALOG_CSV);
        state.load_catalog(file.path());

        let cat = state.catalog.as_ref().expect("catalog state");
        assert_eq!(cat.years, vec![2022, 2021, 2020, 2019]);
        assert_eq!(cat.selected_year, 2020);
        assert!(!state.status.as_ref().unwrap().is_error);
    }

    #[test]
    fn set_year_rejects_values_outside_the_list() {
        let mut state = AppState::default();
        let file = temp_csv(CATALOG_CSV);
        state.load_catalog(file.path());

        state.set_year(1234);
        assert_eq!(state.catalog.as_ref().unwrap().selected_year, 2020);

        state.set_year(2022);
        assert_eq!(state.catalog.as_ref().unwrap().selected_year, 2022);
        assert_eq!(state.catalog.as_ref().unwrap().view.year, 2022);
    }

    #[test]
    fn failed_ingestion_keeps_prior_state() {
        let mut state = AppState::default();
        let good = temp_csv(CATALOG_CSV);
        state.load_catalog(good.path());
        assert!(state.catalog.is_some());

        let bad = temp_csv("a,b\n1,2,3\n");
        state.load_catalog(bad.path());

        assert!(state.status.as_ref().unwrap().is_error);
        // The previously registered table and its view are untouched.
        assert!(state.namespace.has_table(catalog::TABLE));
        assert_eq!(state.catalog.as_ref().unwrap().selected_year, 2020);
    }

    #[test]
    fn reset_returns_to_empty_initial_state() {
        let mut state = AppState::default();
        let file = temp_csv(CATALOG_CSV);
        state.load_catalog(file.path());

        state.reset();
        assert!(state.catalog.is_none());
        assert!(state.wellbeing.is_none());
        assert!(!state.namespace.has_table(catalog::TABLE));
    }

    #[test]
    fn toggle_course_filters_and_clears() {
        let mut state = AppState::default();
        let survey = temp_csv(
            "What is your course?,Do you have Depression?,Do you have Anxiety?,\
Do you have Panic attack?,Your current year of study,Choose your gender,What is your CGPA?\n\
Engineering,Yes,No,No,year 1,Female,3.00 - 3.49\n\
BIT,No,Yes,No,year 2,Male,3.50 - 4.00\n",
        );
        state.load_survey(survey.path());

        assert_eq!(state.wellbeing.as_ref().unwrap().explorer.len(), 2);
        state.toggle_course("Engineering");
        assert_eq!(state.wellbeing.as_ref().unwrap().explorer.len(), 1);
        state.toggle_course("not a course");
        assert_eq!(state.wellbeing.as_ref().unwrap().explorer.len(), 1);
        state.clear_courses();
        assert_eq!(state.wellbeing.as_ref().unwrap().explorer.len(), 2);
    }
}
