/// Dashboard layer: composes parameterized queries against the namespace and
/// shapes the results into render-ready view structs. Pure with respect to
/// the UI: `(namespace, selection) -> view`, recomputed on interaction.

pub mod catalog;
pub mod wellbeing;

/// Integer percentage of `part` over `total`. A zero denominator reports 0
/// rather than failing.
pub fn percentage(part: i64, total: i64) -> i64 {
    if total == 0 {
        0
    } else {
        ((part as f64 / total as f64) * 100.0).round() as i64
    }
}

// ---------------------------------------------------------------------------
// PivotCounts – (category, series, count) rows → a dense grid
// ---------------------------------------------------------------------------

/// Grouped counts pivoted for charting: `values[series][category]`.
/// Category and series order follow first appearance in the input, which the
/// dashboard queries already sort deterministically.
#[derive(Debug, Clone, Default)]
pub struct PivotCounts {
    pub categories: Vec<String>,
    pub series: Vec<String>,
    pub values: Vec<Vec<i64>>,
}

impl PivotCounts {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() || self.series.is_empty()
    }

    pub fn max_value(&self) -> i64 {
        self.values.iter().flatten().copied().max().unwrap_or(0)
    }
}

pub fn pivot_counts(rows: &[(String, String, i64)]) -> PivotCounts {
    let mut categories: Vec<String> = Vec::new();
    let mut series: Vec<String> = Vec::new();
    for (cat, ser, _) in rows {
        if !categories.contains(cat) {
            categories.push(cat.clone());
        }
        if !series.contains(ser) {
            series.push(ser.clone());
        }
    }

    let mut values = vec![vec![0i64; categories.len()]; series.len()];
    for (cat, ser, n) in rows {
        let c = categories.iter().position(|x| x == cat).unwrap();
        let s = series.iter().position(|x| x == ser).unwrap();
        values[s][c] += n;
    }

    PivotCounts {
        categories,
        series,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_of_zero_total_is_zero() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(5, 0), 0);
    }

    #[test]
    fn percentage_rounds_to_nearest_integer() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 2), 50);
        assert_eq!(percentage(3, 3), 100);
    }

    #[test]
    fn pivot_preserves_first_seen_order_and_fills_gaps() {
        let rows = vec![
            ("year 1".to_string(), "Yes".to_string(), 2),
            ("year 1".to_string(), "No".to_string(), 1),
            ("year 2".to_string(), "Yes".to_string(), 3),
        ];
        let pivot = pivot_counts(&rows);
        assert_eq!(pivot.categories, vec!["year 1", "year 2"]);
        assert_eq!(pivot.series, vec!["Yes", "No"]);
        assert_eq!(pivot.values, vec![vec![2, 3], vec![1, 0]]);
        assert_eq!(pivot.max_value(), 3);
    }

    #[test]
    fn pivot_of_no_rows_is_empty() {
        let pivot = pivot_counts(&[]);
        assert!(pivot.is_empty());
        assert_eq!(pivot.max_value(), 0);
    }
}
