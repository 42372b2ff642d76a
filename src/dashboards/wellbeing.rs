use datafusion::scalar::ScalarValue;

use super::percentage;
use crate::engine::{Frame, HubError, QueryNamespace, Value};

/// Registered name of the student mental-health survey dataset.
pub const TABLE: &str = "mental";

// ---------------------------------------------------------------------------
// View structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct WellbeingKpis {
    pub respondents: i64,
    /// Declared rates as integer percentages of the whole panel.
    pub depression_pct: i64,
    pub anxiety_pct: i64,
    pub panic_pct: i64,
}

/// Everything the well-being tab renders, minus the explorer table which has
/// its own course filter.
#[derive(Debug, Clone)]
pub struct WellbeingView {
    pub kpis: WellbeingKpis,
    /// (study year, anxiety answer, respondent count).
    pub anxiety_by_study_year: Vec<(String, String, i64)>,
    /// (gender, depression answer, respondent count).
    pub depression_by_gender: Vec<(String, String, i64)>,
    /// (CGPA band, depression answer, respondent count).
    pub cgpa_depression: Vec<(String, String, i64)>,
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

fn ensure_loaded(ns: &QueryNamespace) -> Result<(), HubError> {
    if ns.has_table(TABLE) {
        Ok(())
    } else {
        Err(HubError::MissingTable(TABLE.to_string()))
    }
}

pub fn view(ns: &QueryNamespace) -> Result<WellbeingView, HubError> {
    ensure_loaded(ns)?;

    let stats = ns.execute(
        "SELECT count(*), \
                sum(CASE WHEN lower(do_you_have_depression) = 'yes' THEN 1 ELSE 0 END), \
                sum(CASE WHEN lower(do_you_have_anxiety) = 'yes' THEN 1 ELSE 0 END), \
                sum(CASE WHEN lower(do_you_have_panic_attack) = 'yes' THEN 1 ELSE 0 END) \
         FROM mental",
    )?;
    let stat = |i: usize| -> i64 {
        stats
            .rows
            .first()
            .and_then(|r| r.get(i))
            .and_then(Value::as_i64)
            .unwrap_or(0)
    };
    let respondents = stat(0);
    let kpis = WellbeingKpis {
        respondents,
        depression_pct: percentage(stat(1), respondents),
        anxiety_pct: percentage(stat(2), respondents),
        panic_pct: percentage(stat(3), respondents),
    };

    // Study-year labels arrive with inconsistent casing ("year 1" / "Year 1"),
    // so grouping folds them to lowercase.
    let anxiety_by_study_year = grouped_counts(&ns.execute(
        "SELECT lower(your_current_year_of_study) AS study_year, \
                do_you_have_anxiety, count(*) AS students \
         FROM mental \
         GROUP BY lower(your_current_year_of_study), do_you_have_anxiety \
         ORDER BY study_year ASC, do_you_have_anxiety ASC",
    )?);

    let depression_by_gender = grouped_counts(&ns.execute(
        "SELECT choose_your_gender, do_you_have_depression, count(*) AS students \
         FROM mental \
         GROUP BY choose_your_gender, do_you_have_depression \
         ORDER BY choose_your_gender ASC, do_you_have_depression ASC",
    )?);

    let cgpa_depression = grouped_counts(&ns.execute(
        "SELECT what_is_your_cgpa, do_you_have_depression, count(*) AS students \
         FROM mental \
         WHERE what_is_your_cgpa IS NOT NULL \
         GROUP BY what_is_your_cgpa, do_you_have_depression \
         ORDER BY what_is_your_cgpa ASC, do_you_have_depression ASC",
    )?);

    Ok(WellbeingView {
        kpis,
        anxiety_by_study_year,
        depression_by_gender,
        cgpa_depression,
    })
}

/// The closed list of courses selectable in the explorer filter.
pub fn courses(ns: &QueryNamespace) -> Result<Vec<String>, HubError> {
    ensure_loaded(ns)?;
    let frame = ns.execute(
        "SELECT DISTINCT what_is_your_course FROM mental \
         WHERE what_is_your_course IS NOT NULL \
         ORDER BY what_is_your_course ASC",
    )?;
    Ok(frame
        .rows
        .iter()
        .filter_map(|r| r.first().and_then(Value::as_str).map(str::to_string))
        .collect())
}

/// Raw survey rows, optionally narrowed to the selected courses. Each course
/// is bound as its own parameter; an empty selection means no filter.
pub fn explorer(ns: &QueryNamespace, selected_courses: &[String]) -> Result<Frame, HubError> {
    ensure_loaded(ns)?;
    if selected_courses.is_empty() {
        return ns.execute("SELECT * FROM mental");
    }
    let clauses: Vec<String> = (1..=selected_courses.len())
        .map(|i| format!("what_is_your_course = ${i}"))
        .collect();
    let sql = format!("SELECT * FROM mental WHERE {}", clauses.join(" OR "));
    let params = selected_courses
        .iter()
        .map(|c| ScalarValue::Utf8(Some(c.clone())))
        .collect();
    ns.execute_with_params(&sql, params)
}

fn grouped_counts(frame: &Frame) -> Vec<(String, String, i64)> {
    frame
        .rows
        .iter()
        .map(|r| {
            (
                r.first().map(Value::label).unwrap_or_default(),
                r.get(1).map(Value::label).unwrap_or_default(),
                r.get(2).and_then(Value::as_i64).unwrap_or(0),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ingest::ingest_csv;

    const FIXTURE: &str = "\
Choose your gender,What is your course?,Your current year of study,What is your CGPA?,Do you have Depression?,Do you have Anxiety?,Do you have Panic attack?
Female,Engineering,year 1,3.00 - 3.49,Yes,No,Yes
Male,BIT,Year 2,3.50 - 4.00,No,Yes,No
Female,Engineering,year 1,3.00 - 3.49,Yes,Yes,No
";

    fn loaded_namespace() -> QueryNamespace {
        let ns = QueryNamespace::new();
        ns.register(TABLE, ingest_csv(FIXTURE.as_bytes()).unwrap())
            .unwrap();
        ns
    }

    #[test]
    fn view_without_table_reports_missing() {
        let ns = QueryNamespace::new();
        let err = view(&ns).unwrap_err();
        assert!(matches!(err, HubError::MissingTable(_)), "got {err:?}");
    }

    #[test]
    fn kpi_rates_are_case_insensitive_percentages() {
        let ns = loaded_namespace();
        let v = view(&ns).unwrap();
        assert_eq!(v.kpis.respondents, 3);
        assert_eq!(v.kpis.depression_pct, 67);
        assert_eq!(v.kpis.anxiety_pct, 67);
        assert_eq!(v.kpis.panic_pct, 33);
    }

    #[test]
    fn empty_panel_reports_zero_rates() {
        let ns = QueryNamespace::new();
        let header_only = FIXTURE.lines().next().unwrap().to_string() + "\n";
        ns.register(TABLE, ingest_csv(header_only.as_bytes()).unwrap())
            .unwrap();
        let v = view(&ns).unwrap();
        assert_eq!(v.kpis.respondents, 0);
        assert_eq!(v.kpis.depression_pct, 0);
        assert_eq!(v.kpis.anxiety_pct, 0);
        assert_eq!(v.kpis.panic_pct, 0);
    }

    #[test]
    fn study_year_grouping_folds_case() {
        let ns = loaded_namespace();
        let v = view(&ns).unwrap();
        assert!(v
            .anxiety_by_study_year
            .iter()
            .all(|(year, _, _)| year == &year.to_lowercase()));
        assert!(v
            .anxiety_by_study_year
            .contains(&("year 2".to_string(), "Yes".to_string(), 1)));
    }

    #[test]
    fn courses_are_distinct_and_sorted() {
        let ns = loaded_namespace();
        assert_eq!(courses(&ns).unwrap(), vec!["BIT", "Engineering"]);
    }

    #[test]
    fn explorer_without_selection_returns_all_rows() {
        let ns = loaded_namespace();
        let frame = explorer(&ns, &[]).unwrap();
        assert_eq!(frame.len(), 3);
    }

    #[test]
    fn explorer_filters_by_selected_courses() {
        let ns = loaded_namespace();
        let frame = explorer(&ns, &["Engineering".to_string()]).unwrap();
        assert_eq!(frame.len(), 2);
        let both = explorer(&ns, &["Engineering".to_string(), "BIT".to_string()]).unwrap();
        assert_eq!(both.len(), 3);
        let none = explorer(&ns, &["History".to_string()]).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn cgpa_counts_pair_band_with_answer() {
        let ns = loaded_namespace();
        let v = view(&ns).unwrap();
        assert!(v
            .cgpa_depression
            .contains(&("3.00 - 3.49".to_string(), "Yes".to_string(), 2)));
        assert!(v
            .cgpa_depression
            .contains(&("3.50 - 4.00".to_string(), "No".to_string(), 1)));
    }
}
