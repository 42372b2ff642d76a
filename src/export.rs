use anyhow::{Context, Result};

use crate::engine::Frame;

/// Serialize a frame as UTF-8 CSV with a header row.
///
/// Cell formatting must survive re-ingestion: integers in decimal, floats in
/// their shortest round-trip form, nulls as empty fields. Quoting is left to
/// the writer.
pub fn write_frame_csv(frame: &Frame) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&frame.columns)
        .context("writing CSV header")?;
    for row in &frame.rows {
        writer
            .write_record(row.iter().map(|v| v.to_string()))
            .context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV writer")?;
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("finalizing CSV writer: {}", e.error()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ingest::ingest_csv;
    use crate::engine::QueryNamespace;

    const FIXTURE: &str = "\
name,year,score,flag
\"Drama, Comedy\",2020,3.5,true
Action,,1.25,false
";

    fn select_all(ns: &QueryNamespace, table: &str) -> Frame {
        ns.execute(&format!("SELECT * FROM {table}")).unwrap()
    }

    #[test]
    fn export_round_trips_through_ingestion() {
        let ns = QueryNamespace::new();
        ns.register("t1", ingest_csv(FIXTURE.as_bytes()).unwrap())
            .unwrap();
        let original = select_all(&ns, "t1");

        let bytes = write_frame_csv(&original).unwrap();
        ns.register("t2", ingest_csv(&bytes).unwrap()).unwrap();
        let round_tripped = select_all(&ns, "t2");

        assert_eq!(original.columns, round_tripped.columns);
        let mut a = original.rows.clone();
        let mut b = round_tripped.rows.clone();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn header_is_first_line() {
        let ns = QueryNamespace::new();
        ns.register("t", ingest_csv(FIXTURE.as_bytes()).unwrap())
            .unwrap();
        let bytes = write_frame_csv(&select_all(&ns, "t")).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().next(), Some("name,year,score,flag"));
    }

    #[test]
    fn empty_frame_exports_nothing_but_structure() {
        let bytes = write_frame_csv(&Frame::empty()).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap().trim(), "");
    }
}
