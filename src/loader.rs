use crate::error::Result;
use crate::types::{RawRow, Record};
use crate::util::{parse_date_safe, parse_f64_safe};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
    pub missing_brand: usize,
    pub missing_dates: usize,
}

/// Load already-normalized market records from a CSV file.
pub fn load_records(path: impl AsRef<Path>) -> Result<(Vec<Record>, LoadReport)> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let (records, report) = read_records(file)?;
    info!(
        path = %path.display(),
        total = report.total_rows,
        loaded = report.loaded_rows,
        parse_errors = report.parse_errors,
        "loaded market records"
    );
    Ok((records, report))
}

/// Read records from any CSV source with a header row.
///
/// Rows that cannot be deserialized or carry no brand are skipped and
/// counted; bad cells inside a good row just become `None`.
pub fn read_records<R: Read>(reader: R) -> Result<(Vec<Record>, LoadReport)> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut report = LoadReport::default();
    let mut records = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(row = report.total_rows, error = %e, "skipping unreadable row");
                report.parse_errors += 1;
                continue;
            }
        };

        let brand = clean_text(row.brand);
        if brand.is_empty() {
            report.missing_brand += 1;
            continue;
        }
        let date = parse_date_safe(row.date.as_deref());
        if date.is_none() {
            report.missing_dates += 1;
        }

        records.push(Record {
            date,
            brand,
            province: clean_text(row.province),
            channel: clean_text(row.channel),
            sales_value: parse_f64_safe(row.sales_value.as_deref()),
            sales_volume: parse_f64_safe(row.sales_volume.as_deref()),
            share_value_pct: parse_f64_safe(row.share_value_pct.as_deref()),
            wdist_pct: parse_f64_safe(row.wdist_pct.as_deref()),
            ndist_pct: parse_f64_safe(row.ndist_pct.as_deref()),
        });
    }

    report.loaded_rows = records.len();
    Ok((records, report))
}

fn clean_text(s: Option<String>) -> String {
    s.map(|v| v.trim().to_string()).unwrap_or_default()
}
