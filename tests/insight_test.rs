use chrono::NaiveDate;
use share_insight::loader::load_records;
use share_insight::output::write_insight;
use share_insight::{
    build_all_insights, build_insight, logging, FiscalQuarter, RankLimits, Record, ShareStory,
};
use std::io::Write;

fn rec(
    date: (i32, u32),
    brand: &str,
    province: &str,
    channel: &str,
    sales: f64,
    share: f64,
    wdist: f64,
) -> Record {
    Record {
        date: NaiveDate::from_ymd_opt(date.0, date.1, 15),
        brand: brand.to_string(),
        province: province.to_string(),
        channel: channel.to_string(),
        sales_value: Some(sales),
        sales_volume: Some(sales / 8.0),
        share_value_pct: Some(share),
        wdist_pct: Some(wdist),
        ndist_pct: Some(wdist * 0.8),
    }
}

/// National, province and channel rows for brand X across FY2024 and FY2025.
fn market() -> Vec<Record> {
    let mut rows = vec![
        rec((2025, 7), "X", "", "", 1000.0, 20.0, 50.0),
        rec((2024, 7), "X", "", "", 800.0, 25.0, 40.0),
        rec((2025, 7), "Y", "", "", 4000.0, 80.0, 90.0),
    ];
    let provinces = [
        ("Anhui", 300.0, 12.0, 260.0, 10.0),
        ("Jiangsu", 500.0, 18.0, 520.0, 22.0),
        ("Zhejiang", 200.0, 9.0, 150.0, 8.0),
        ("Hubei", 120.0, 6.0, 130.0, 7.5),
    ];
    for (p, cur_sales, cur_share, last_sales, last_share) in provinces {
        rows.push(rec((2025, 7), "X", p, "", cur_sales, cur_share, 60.0));
        rows.push(rec((2024, 7), "X", p, "", last_sales, last_share, 55.0));
    }
    rows.push(rec((2025, 7), "X", "", "KA", 600.0, 30.0, 70.0));
    rows.push(rec((2024, 7), "X", "", "KA", 500.0, 28.0, 65.0));
    rows.push(rec((2025, 7), "X", "", "CVS", 100.0, 5.0, 20.0));
    rows.push(rec((2024, 7), "X", "", "CVS", 120.0, 6.0, 25.0));
    // Province-and-channel rows belong to the province view only.
    rows.push(rec((2025, 7), "X", "Anhui", "KA", 50.0, 40.0, 10.0));
    rows
}

#[test]
fn full_payload_for_brand() {
    logging::init_test();
    let p = build_insight(&market(), "X", RankLimits::default());

    assert_eq!(p.latest_fiscal_year, Some(2025));
    assert_eq!(p.latest_fiscal_quarter, Some(FiscalQuarter::Q3));
    assert!(p.overview.share_yoy_pp.is_some());
    assert_ne!(p.overview.share_story, ShareStory::CannotDetermine);

    let prov = &p.province_drilldown;
    assert_eq!(prov.latest_quarter, Some(FiscalQuarter::Q3));
    let up: Vec<_> = prov.top_gainers.iter().map(|r| r.dimension_value.as_str()).collect();
    let down: Vec<_> = prov.top_decliners.iter().map(|r| r.dimension_value.as_str()).collect();
    assert_eq!(up.len(), 3);
    assert_eq!(down.len(), 3);
    assert_eq!(up[0], "Anhui");
    assert_eq!(down[0], "Jiangsu");
    for w in prov.top_gainers.windows(2) {
        assert!(w[0].share_pp.unwrap() >= w[1].share_pp.unwrap());
    }
    for w in prov.top_decliners.windows(2) {
        assert!(w[0].share_pp.unwrap() <= w[1].share_pp.unwrap());
    }
    for r in &prov.table {
        let expected = r.current_share.unwrap() - r.prior_share.unwrap();
        assert!((r.share_pp.unwrap() - expected).abs() < 1e-9);
    }
    let by_sales: Vec<_> = prov.table.iter().map(|r| r.dimension_value.as_str()).collect();
    assert_eq!(by_sales, vec!["Jiangsu", "Anhui", "Zhejiang", "Hubei"]);

    let ch: Vec<_> = p
        .channel_drilldown
        .table
        .iter()
        .map(|r| r.dimension_value.as_str())
        .collect();
    assert_eq!(ch, vec!["KA", "CVS"]);
}

#[test]
fn brand_without_prior_year_has_empty_drilldowns() {
    let p = build_insight(&market(), "Y", RankLimits::default());
    assert_eq!(p.latest_fiscal_year, Some(2025));
    assert_eq!(p.overview.latest_quarter_sales_value, Some(4000.0));
    assert_eq!(p.overview.share_story, ShareStory::CannotDetermine);
    assert!(p.province_drilldown.is_empty());
    assert!(p.channel_drilldown.is_empty());
}

#[test]
fn unknown_brand_gives_null_payload() {
    let p = build_insight(&market(), "Nobody", RankLimits::default());
    assert_eq!(p.latest_fiscal_year, None);
    assert_eq!(p.latest_fiscal_quarter, None);
    assert!(p.monthly_trend.is_empty());
    assert!(p.province_drilldown.is_empty());
}

#[test]
fn payload_is_reproducible_and_plain_json() {
    let a = build_all_insights(&market(), RankLimits::default());
    let b = build_all_insights(&market(), RankLimits::default());
    assert_eq!(a, b);

    let json = serde_json::to_value(&a[0]).unwrap();
    assert_eq!(json["brand"], "X");
    assert_eq!(json["latest_fiscal_quarter"], "Q3");
    assert_eq!(json["province_drilldown"]["dimension"], "province");
    assert!(json["overview"]["share_story"].is_string());
    assert!(json["metric_definitions"]["share_decompose"].is_string());
    assert_eq!(json["monthly_trend"][0]["month"], "2024-07");
}

#[test]
fn csv_to_files_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("market.csv");
    let mut f = std::fs::File::create(&csv_path).unwrap();
    writeln!(
        f,
        "date,brand,province,channel,sales_value,sales_volume,share_value_pct,wdist_pct,ndist_pct"
    )
    .unwrap();
    writeln!(f, "2025-07-01,X,,,1000,125,20,50,40").unwrap();
    writeln!(f, "2024-07-01,X,,,800,100,25,40,30").unwrap();
    writeln!(f, "2025-07-01,X,Anhui,,400,50,16,60,50").unwrap();
    writeln!(f, "2024-07-01,X,Anhui,,300,40,15,55,45").unwrap();
    drop(f);

    let (records, report) = load_records(&csv_path).unwrap();
    assert_eq!(report.loaded_rows, 4);
    let p = build_insight(&records, "X", RankLimits::default());
    // national plus province rows: 1400 vs 1100 brand, 7500 vs 5200 category
    let brand_growth = 300.0 / 1100.0 * 100.0;
    let category_growth = 2300.0 / 5200.0 * 100.0;
    assert!((p.overview.brand_sales_yoy_pct.unwrap() - brand_growth).abs() < 1e-9);
    assert!((p.overview.category_sales_yoy_pct.unwrap() - category_growth).abs() < 1e-9);
    assert_eq!(p.overview.share_story, ShareStory::LossGrowingSlower);

    let out_dir = dir.path().join("out");
    let files = write_insight(&out_dir, &p).unwrap();
    assert_eq!(files.len(), 2);
    let body = std::fs::read_to_string(&files[0]).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(parsed["province_drilldown"]["table"][0]["province"].is_null());
    assert_eq!(parsed["province_drilldown"]["table"][0]["dimension_value"], "Anhui");
    assert!(files[1].to_string_lossy().ends_with("insight_X_province.csv"));
}
