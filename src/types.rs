use crate::calendar::FiscalQuarter;
use crate::classify::ShareStory;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tabled::Tabled;

/// One CSV row as exported by the upstream normalizer. Every cell is kept as
/// text so that a single bad cell never rejects the whole row.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    pub date: Option<String>,
    pub brand: Option<String>,
    pub province: Option<String>,
    pub channel: Option<String>,
    pub sales_value: Option<String>,
    pub sales_volume: Option<String>,
    pub share_value_pct: Option<String>,
    pub wdist_pct: Option<String>,
    pub ndist_pct: Option<String>,
}

/// A cleaned market-measurement record. `province` and `channel` are empty
/// strings when the row is not broken down along that dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub date: Option<NaiveDate>,
    pub brand: String,
    pub province: String,
    pub channel: String,
    pub sales_value: Option<f64>,
    pub sales_volume: Option<f64>,
    pub share_value_pct: Option<f64>,
    pub wdist_pct: Option<f64>,
    pub ndist_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub record: Record,
    pub fiscal_year: Option<i32>,
    pub fiscal_quarter: Option<FiscalQuarter>,
    pub month_key: Option<String>,
    pub category_sales_value: Option<f64>,
}

/// A field a record set can be grouped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Brand,
    Province,
    Channel,
}

impl Dimension {
    pub fn value_of<'a>(&self, record: &'a Record) -> &'a str {
        match self {
            Dimension::Brand => &record.brand,
            Dimension::Province => &record.province,
            Dimension::Channel => &record.channel,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Brand => "brand",
            Dimension::Province => "province",
            Dimension::Channel => "channel",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Values of the grouping dimensions for one aggregate. Dimensions that were
/// not part of the group-by stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub brand: Option<String>,
    pub province: Option<String>,
    pub channel: Option<String>,
}

impl GroupKey {
    pub fn from_record(record: &Record, dims: &[Dimension]) -> Self {
        let mut key = GroupKey::default();
        for dim in dims {
            let value = Some(dim.value_of(record).to_string());
            match dim {
                Dimension::Brand => key.brand = value,
                Dimension::Province => key.province = value,
                Dimension::Channel => key.channel = value,
            }
        }
        key
    }

    pub fn get(&self, dim: Dimension) -> Option<&str> {
        match dim {
            Dimension::Brand => self.brand.as_deref(),
            Dimension::Province => self.province.as_deref(),
            Dimension::Channel => self.channel.as_deref(),
        }
    }
}

/// One row per distinct (group key, period) combination.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub key: GroupKey,
    pub fiscal_year: Option<i32>,
    pub fiscal_quarter: Option<FiscalQuarter>,
    pub month: Option<String>,
    pub row_count: usize,
    pub sales_value: f64,
    pub sales_volume: f64,
    pub category_sales_value: f64,
    pub wdist_pct: Option<f64>,
    pub ndist_pct: Option<f64>,
    pub share_value_pct: Option<f64>,
    pub price: Option<f64>,
    pub velocity_value: Option<f64>,
}

fn display_opt(v: &Option<f64>) -> String {
    match v {
        Some(x) => crate::util::format_number(*x, 2),
        None => "-".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct DecompositionRow {
    #[tabled(rename = "Value")]
    pub dimension_value: String,
    #[tabled(rename = "SalesValue", display_with = "display_opt")]
    pub current_sales_value: Option<f64>,
    #[tabled(rename = "Share", display_with = "display_opt")]
    pub current_share: Option<f64>,
    #[tabled(rename = "PriorShare", display_with = "display_opt")]
    pub prior_share: Option<f64>,
    #[tabled(rename = "SharePP", display_with = "display_opt")]
    pub share_pp: Option<f64>,
    #[tabled(rename = "WDist", display_with = "display_opt")]
    pub current_wdist: Option<f64>,
    #[tabled(rename = "WDistPP", display_with = "display_opt")]
    pub wdist_pp: Option<f64>,
    #[tabled(rename = "VelSharePP", display_with = "display_opt")]
    pub vel_share_pp: Option<f64>,
    #[tabled(rename = "Price", display_with = "display_opt")]
    pub current_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decomposition {
    pub dimension: Dimension,
    pub latest_quarter: Option<FiscalQuarter>,
    pub top_gainers: Vec<DecompositionRow>,
    pub top_decliners: Vec<DecompositionRow>,
    pub table: Vec<DecompositionRow>,
}

impl Decomposition {
    pub fn empty(dimension: Dimension, latest_quarter: Option<FiscalQuarter>) -> Self {
        Self {
            dimension,
            latest_quarter,
            top_gainers: Vec::new(),
            top_decliners: Vec::new(),
            table: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top_gainers.is_empty() && self.top_decliners.is_empty() && self.table.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub latest_quarter_sales_value: Option<f64>,
    pub latest_quarter_share_value_pct: Option<f64>,
    pub share_yoy_pp: Option<f64>,
    pub brand_sales_yoy_pct: Option<f64>,
    pub category_sales_yoy_pct: Option<f64>,
    pub share_story: ShareStory,
}

impl Default for Overview {
    fn default() -> Self {
        Self {
            latest_quarter_sales_value: None,
            latest_quarter_share_value_pct: None,
            share_yoy_pp: None,
            brand_sales_yoy_pct: None,
            category_sales_yoy_pct: None,
            share_story: ShareStory::CannotDetermine,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub month: String,
    pub sales_value: f64,
    pub share_value_pct: Option<f64>,
}

/// Plain-language meaning of each metric, shipped with every payload so the
/// downstream reader does not need to know the formulas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricDefinitions {
    pub sales_value: &'static str,
    pub sales_volume: &'static str,
    pub price: &'static str,
    pub wdist_pct: &'static str,
    pub ndist_pct: &'static str,
    pub velocity_value: &'static str,
    pub share_value_pct: &'static str,
    pub share_decompose: &'static str,
}

impl Default for MetricDefinitions {
    fn default() -> Self {
        Self {
            sales_value: "sales value",
            sales_volume: "sales volume",
            price: "unit price = sales value / sales volume",
            wdist_pct: "weighted distribution %",
            ndist_pct: "numeric distribution %",
            velocity_value: "velocity = sales value / weighted distribution (per point)",
            share_value_pct: "value share %",
            share_decompose: "value share = velocity share x weighted distribution (approximate)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightPayload {
    pub brand: String,
    pub latest_fiscal_year: Option<i32>,
    pub latest_fiscal_quarter: Option<FiscalQuarter>,
    pub overview: Overview,
    pub monthly_trend: Vec<TrendPoint>,
    pub province_drilldown: Decomposition,
    pub channel_drilldown: Decomposition,
    pub metric_definitions: MetricDefinitions,
}
