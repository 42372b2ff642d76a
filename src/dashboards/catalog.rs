use datafusion::scalar::ScalarValue;

use super::percentage;
use crate::engine::{Frame, HubError, QueryNamespace, Value};

/// Registered name of the media catalog dataset.
pub const TABLE: &str = "amazon";

/// How far back the production trend looks from the selected year.
pub const TREND_SPAN_YEARS: i64 = 10;

// ---------------------------------------------------------------------------
// View structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CatalogKpis {
    pub total_titles: i64,
    pub movies: i64,
    pub movie_pct: i64,
    pub tv_shows: i64,
    pub tv_pct: i64,
    /// Most frequent rating for the year, `None` when the year has no rated
    /// titles. Ties resolve to the lexicographically smallest rating.
    pub dominant_rating: Option<String>,
}

/// Everything the catalog tab renders for one selected year.
#[derive(Debug, Clone)]
pub struct CatalogView {
    pub year: i64,
    pub kpis: CatalogKpis,
    /// (genre, title count), descending, top 10.
    pub top_genres: Vec<(String, i64)>,
    /// (type, rating, title count) for rated titles of the year.
    pub rating_breakdown: Vec<(String, String, i64)>,
    /// (release year, type, title count) over the trailing trend window.
    pub trend: Vec<(i64, String, i64)>,
    pub top_directors: Frame,
    pub top_countries: Frame,
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

/// The closed list of selectable years, newest first.
pub fn release_years(ns: &QueryNamespace) -> Result<Vec<i64>, HubError> {
    ensure_loaded(ns)?;
    let frame = ns.execute(
        "SELECT DISTINCT release_year FROM amazon \
         WHERE release_year IS NOT NULL \
         ORDER BY release_year DESC",
    )?;
    Ok(frame
        .rows
        .iter()
        .filter_map(|r| r.first().and_then(Value::as_i64))
        .collect())
}

/// Compose the full catalog view for `year`. The year must come from
/// [`release_years`]; it is bound as a query parameter, never spliced into
/// the SQL text.
pub fn view(ns: &QueryNamespace, year: i64) -> Result<CatalogView, HubError> {
    ensure_loaded(ns)?;
    let year_param = || vec![ScalarValue::Int64(Some(year))];

    let total_titles = ns
        .execute_with_params(
            "SELECT count(*) FROM amazon WHERE release_year = $1",
            year_param(),
        )?
        .scalar_i64();
    let movies = ns
        .execute_with_params(
            "SELECT count(*) FROM amazon WHERE release_year = $1 AND \"type\" = 'Movie'",
            year_param(),
        )?
        .scalar_i64();
    let tv_shows = ns
        .execute_with_params(
            "SELECT count(*) FROM amazon WHERE release_year = $1 AND \"type\" = 'TV Show'",
            year_param(),
        )?
        .scalar_i64();
    let dominant_rating = ns
        .execute_with_params(
            "SELECT rating, count(*) AS titles FROM amazon \
             WHERE release_year = $1 AND rating IS NOT NULL \
             GROUP BY rating \
             ORDER BY titles DESC, rating ASC \
             LIMIT 1",
            year_param(),
        )?
        .scalar()
        .and_then(Value::as_str)
        .map(str::to_string);

    let top_genres = label_counts(&ns.execute_with_params(
        "SELECT listed_in, count(*) AS titles FROM amazon \
         WHERE release_year = $1 \
         GROUP BY listed_in \
         ORDER BY titles DESC, listed_in ASC \
         LIMIT 10",
        year_param(),
    )?);

    let rating_breakdown = grouped_counts(&ns.execute_with_params(
        "SELECT \"type\", rating, count(*) AS titles FROM amazon \
         WHERE release_year = $1 AND rating IS NOT NULL \
         GROUP BY \"type\", rating \
         ORDER BY \"type\" ASC, rating ASC",
        year_param(),
    )?);

    let trend_frame = ns.execute_with_params(
        "SELECT release_year, \"type\", count(*) AS titles FROM amazon \
         WHERE release_year >= $1 AND release_year <= $2 \
         GROUP BY release_year, \"type\" \
         ORDER BY release_year ASC, \"type\" ASC",
        vec![
            ScalarValue::Int64(Some(year - TREND_SPAN_YEARS)),
            ScalarValue::Int64(Some(year)),
        ],
    )?;
    let trend = trend_frame
        .rows
        .iter()
        .map(|r| {
            (
                r.first().and_then(Value::as_i64).unwrap_or(0),
                r.get(1).map(Value::label).unwrap_or_default(),
                r.get(2).and_then(Value::as_i64).unwrap_or(0),
            )
        })
        .collect();

    let top_directors = ns.execute_with_params(
        "SELECT director, count(*) AS titles FROM amazon \
         WHERE release_year = $1 AND director IS NOT NULL AND director != '' \
         GROUP BY director \
         ORDER BY titles DESC, director ASC \
         LIMIT 5",
        year_param(),
    )?;
    let top_countries = ns.execute_with_params(
        "SELECT country, count(*) AS titles FROM amazon \
         WHERE release_year = $1 AND country IS NOT NULL AND country != '' \
         GROUP BY country \
         ORDER BY titles DESC, country ASC \
         LIMIT 5",
        year_param(),
    )?;

    Ok(CatalogView {
        year,
        kpis: CatalogKpis {
            total_titles,
            movies,
            movie_pct: percentage(movies, total_titles),
            tv_shows,
            tv_pct: percentage(tv_shows, total_titles),
            dominant_rating,
        },
        top_genres,
        rating_breakdown,
        trend,
        top_directors,
        top_countries,
    })
}

/// All catalog rows for the selected year, for the download action.
pub fn export_rows(ns: &QueryNamespace, year: i64) -> Result<Frame, HubError> {
    ensure_loaded(ns)?;
    ns.execute_with_params(
        "SELECT * FROM amazon WHERE release_year = $1",
        vec![ScalarValue::Int64(Some(year))],
    )
}

fn label_counts(frame: &Frame) -> Vec<(String, i64)> {
    frame
        .rows
        .iter()
        .map(|r| {
            (
                r.first().map(Value::label).unwrap_or_default(),
                r.get(1).and_then(Value::as_i64).unwrap_or(0),
            )
        })
        .collect()
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
Type,Release Year,Rating,Listed In,Director,Country
Movie,2020,PG,Drama,Alice,USA
Movie,2020,PG,Comedy,Alice,USA
TV Show,2020,TV-MA,Drama,,Canada
Movie,2019,R,Action,Bob,USA
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
        let err = view(&ns, 2020).unwrap_err();
        assert!(matches!(err, HubError::MissingTable(_)), "got {err:?}");
    }

    #[test]
    fn view_after_reset_reports_missing() {
        let mut ns = loaded_namespace();
        assert!(view(&ns, 2020).is_ok());
        ns.reset();
        let err = view(&ns, 2020).unwrap_err();
        assert!(matches!(err, HubError::MissingTable(_)), "got {err:?}");
    }

    #[test]
    fn release_years_are_distinct_and_newest_first() {
        let ns = loaded_namespace();
        assert_eq!(release_years(&ns).unwrap(), vec![2020, 2019]);
    }

    #[test]
    fn kpis_count_and_percentage() {
        let ns = loaded_namespace();
        let v = view(&ns, 2020).unwrap();
        assert_eq!(v.kpis.total_titles, 3);
        assert_eq!(v.kpis.movies, 2);
        assert_eq!(v.kpis.movie_pct, 67);
        assert_eq!(v.kpis.tv_shows, 1);
        assert_eq!(v.kpis.tv_pct, 33);
        assert_eq!(v.kpis.dominant_rating.as_deref(), Some("PG"));
    }

    #[test]
    fn dominant_rating_ties_break_lexicographically() {
        let ns = QueryNamespace::new();
        let csv = "Type,Release Year,Rating,Listed In,Director,Country\n\
                   Movie,2020,PG,Drama,A,USA\n\
                   Movie,2020,G,Drama,A,USA\n";
        ns.register(TABLE, ingest_csv(csv.as_bytes()).unwrap())
            .unwrap();
        let v = view(&ns, 2020).unwrap();
        assert_eq!(v.kpis.dominant_rating.as_deref(), Some("G"));
    }

    #[test]
    fn top_genres_are_ordered_by_count_then_name() {
        let ns = loaded_namespace();
        let v = view(&ns, 2020).unwrap();
        assert_eq!(
            v.top_genres,
            vec![("Drama".to_string(), 2), ("Comedy".to_string(), 1)]
        );
    }

    #[test]
    fn trend_spans_prior_years() {
        let ns = loaded_namespace();
        let v = view(&ns, 2020).unwrap();
        assert!(v.trend.contains(&(2019, "Movie".to_string(), 1)));
        assert!(v.trend.contains(&(2020, "Movie".to_string(), 2)));
        assert!(v.trend.contains(&(2020, "TV Show".to_string(), 1)));
    }

    #[test]
    fn top_directors_skip_blank_entries() {
        let ns = loaded_namespace();
        let v = view(&ns, 2020).unwrap();
        assert_eq!(v.top_directors.len(), 1);
        assert_eq!(
            v.top_directors.rows[0][0],
            Value::Text("Alice".to_string())
        );
        assert_eq!(v.top_directors.rows[0][1], Value::Integer(2));
    }

    #[test]
    fn export_rows_filters_by_year() {
        let ns = loaded_namespace();
        let frame = export_rows(&ns, 2019).unwrap();
        assert_eq!(frame.len(), 1);
        let type_idx = frame.column_index("type").unwrap();
        assert_eq!(frame.rows[0][type_idx], Value::Text("Movie".to_string()));
    }

    #[test]
    fn empty_year_yields_zeroed_kpis() {
        let ns = loaded_namespace();
        let v = view(&ns, 1999).unwrap();
        assert_eq!(v.kpis.total_titles, 0);
        assert_eq!(v.kpis.movie_pct, 0);
        assert_eq!(v.kpis.dominant_rating, None);
        assert!(v.top_genres.is_empty());
    }
}
