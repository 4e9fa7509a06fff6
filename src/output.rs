use crate::calendar::quarter_label;
use crate::error::Result;
use crate::types::{Decomposition, InsightPayload};
use crate::util::format_opt;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// File-name-safe form of a brand; keeps letters and digits of any script.
pub fn file_stem(brand: &str) -> String {
    brand
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Write `insight_<brand>.json` plus one CSV attribution table per
/// non-empty drilldown. Returns the paths written.
pub fn write_insight(dir: &Path, payload: &InsightPayload) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let stem = file_stem(&payload.brand);
    let mut written = Vec::new();

    let json_path = dir.join(format!("insight_{}.json", stem));
    write_json(&json_path, payload)?;
    written.push(json_path);

    for d in [&payload.province_drilldown, &payload.channel_drilldown] {
        if d.table.is_empty() {
            continue;
        }
        let path = dir.join(format!("insight_{}_{}.csv", stem, d.dimension));
        write_csv(&path, &d.table)?;
        written.push(path);
    }
    info!(brand = %payload.brand, files = written.len(), "wrote insight outputs");
    Ok(written)
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

fn preview_decomposition(d: &Decomposition, max_rows: usize) {
    println!(
        "By {} (latest quarter {})",
        d.dimension,
        quarter_label(d.latest_quarter)
    );
    if d.is_empty() {
        println!("(no comparable prior-year quarter)\n");
        return;
    }
    println!("Top gainers:");
    preview_table_rows(&d.top_gainers, max_rows);
    println!("Top decliners:");
    preview_table_rows(&d.top_decliners, max_rows);
}

pub fn preview_payload(payload: &InsightPayload, max_rows: usize) {
    let o = &payload.overview;
    let period = match payload.latest_fiscal_year {
        Some(fy) => format!("FY{} {}", fy, quarter_label(payload.latest_fiscal_quarter)),
        None => "no dated records".to_string(),
    };
    println!("Brand: {} ({})", payload.brand, period);
    println!(
        "Sales {} | Share {}% | Share YoY {}pp | Brand YoY {}% | Category YoY {}%",
        format_opt(o.latest_quarter_sales_value, 2),
        format_opt(o.latest_quarter_share_value_pct, 2),
        format_opt(o.share_yoy_pp, 2),
        format_opt(o.brand_sales_yoy_pct, 2),
        format_opt(o.category_sales_yoy_pct, 2),
    );
    println!("{}\n", o.share_story);
    preview_decomposition(&payload.province_drilldown, max_rows);
    preview_decomposition(&payload.channel_drilldown, max_rows);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems_keep_unicode_letters() {
        assert_eq!(file_stem("Brand A/B"), "Brand_A_B");
        assert_eq!(file_stem(" 农夫山泉 "), "农夫山泉");
    }
}
