// Assemble the per-brand insight payload from cleaned records.
//
// Pipeline: fiscal enrichment -> implied category sales -> brand-level
// quarterly and monthly aggregates -> overview against the prior-year
// quarter -> monthly trend -> province and channel decompositions.
use crate::aggregate::{aggregate_period, PeriodGrain};
use crate::calendar::{add_time_fields, FiscalQuarter};
use crate::category::with_category_sales;
use crate::classify::classify_share_move;
use crate::decompose::{decompose_share_change, RankLimits};
use crate::types::{
    AggregateRow, Decomposition, Dimension, EnrichedRecord, InsightPayload, MetricDefinitions,
    Overview, Record, TrendPoint,
};
use crate::util::{opt_sub, pct_change};
use std::collections::BTreeSet;
use tracing::debug;

/// Build the payload for a single brand.
pub fn build_insight(records: &[Record], brand: &str, limits: RankLimits) -> InsightPayload {
    BrandAggregates::from_records(records).assemble(brand, limits)
}

/// Build one payload per distinct non-empty brand, in brand order. The
/// aggregates are computed once and shared by every brand.
pub fn build_all_insights(records: &[Record], limits: RankLimits) -> Vec<InsightPayload> {
    let aggregates = BrandAggregates::from_records(records);
    brands(records)
        .iter()
        .map(|b| aggregates.assemble(b, limits))
        .collect()
}

pub fn brands(records: &[Record]) -> Vec<String> {
    let set: BTreeSet<&str> = records
        .iter()
        .map(|r| r.brand.as_str())
        .filter(|b| !b.trim().is_empty())
        .collect();
    set.into_iter().map(str::to_string).collect()
}

/// Quarter and month aggregates for every brand, plus the province and
/// channel drilldown aggregates. Grouping always includes the brand, so one
/// set serves any number of payloads.
struct BrandAggregates {
    by_quarter: Vec<AggregateRow>,
    by_month: Vec<AggregateRow>,
    by_province: Vec<AggregateRow>,
    by_channel: Vec<AggregateRow>,
}

impl BrandAggregates {
    fn from_records(records: &[Record]) -> Self {
        let enriched = with_category_sales(add_time_fields(records));
        let provinces: Vec<EnrichedRecord> = enriched
            .iter()
            .filter(|r| has_value(&r.record.province))
            .cloned()
            .collect();
        let channels: Vec<EnrichedRecord> = enriched
            .iter()
            .filter(|r| has_value(&r.record.channel) && !has_value(&r.record.province))
            .cloned()
            .collect();
        let aggregates = Self {
            by_quarter: aggregate_period(&enriched, &[Dimension::Brand], PeriodGrain::FiscalQuarter),
            by_month: aggregate_period(&enriched, &[Dimension::Brand], PeriodGrain::Month),
            by_province: aggregate_period(
                &provinces,
                &[Dimension::Brand, Dimension::Province],
                PeriodGrain::FiscalQuarter,
            ),
            by_channel: aggregate_period(
                &channels,
                &[Dimension::Brand, Dimension::Channel],
                PeriodGrain::FiscalQuarter,
            ),
        };
        debug!(
            records = records.len(),
            quarters = aggregates.by_quarter.len(),
            months = aggregates.by_month.len(),
            provinces = aggregates.by_province.len(),
            channels = aggregates.by_channel.len(),
            "built brand aggregates"
        );
        aggregates
    }

    fn assemble(&self, brand: &str, limits: RankLimits) -> InsightPayload {
        let brand_quarters: Vec<&AggregateRow> = self
            .by_quarter
            .iter()
            .filter(|r| r.key.brand.as_deref() == Some(brand))
            .filter(|r| r.fiscal_year.is_some() && r.fiscal_quarter.is_some())
            .collect();
        let latest = latest_period(&brand_quarters);
        debug!(brand, quarters = brand_quarters.len(), ?latest, "resolved latest period");

        let overview = match latest {
            Some((fy, fq)) => overview(&brand_quarters, fy, fq),
            None => Overview::default(),
        };
        let monthly_trend = monthly_trend(&self.by_month, brand);

        let (province_drilldown, channel_drilldown) = match latest {
            Some((fy, _)) => (
                decompose_share_change(&self.by_province, Dimension::Province, brand, fy, limits),
                decompose_share_change(&self.by_channel, Dimension::Channel, brand, fy, limits),
            ),
            None => (
                Decomposition::empty(Dimension::Province, None),
                Decomposition::empty(Dimension::Channel, None),
            ),
        };

        InsightPayload {
            brand: brand.to_string(),
            latest_fiscal_year: latest.map(|(fy, _)| fy),
            latest_fiscal_quarter: latest.map(|(_, fq)| fq),
            overview,
            monthly_trend,
            province_drilldown,
            channel_drilldown,
            metric_definitions: MetricDefinitions::default(),
        }
    }
}

fn has_value(s: &str) -> bool {
    !s.trim().is_empty()
}

/// Highest fiscal year, then the highest quarter within it.
fn latest_period(rows: &[&AggregateRow]) -> Option<(i32, FiscalQuarter)> {
    let fy = rows.iter().filter_map(|r| r.fiscal_year).max()?;
    let fq = rows
        .iter()
        .filter(|r| r.fiscal_year == Some(fy))
        .filter_map(|r| r.fiscal_quarter)
        .max()?;
    Some((fy, fq))
}

fn find<'a>(rows: &[&'a AggregateRow], fy: i32, fq: FiscalQuarter) -> Option<&'a AggregateRow> {
    rows.iter()
        .find(|r| r.fiscal_year == Some(fy) && r.fiscal_quarter == Some(fq))
        .copied()
}

fn overview(rows: &[&AggregateRow], fy: i32, fq: FiscalQuarter) -> Overview {
    let Some(cur) = find(rows, fy, fq) else {
        return Overview::default();
    };
    let mut out = Overview {
        latest_quarter_sales_value: Some(cur.sales_value),
        latest_quarter_share_value_pct: cur.share_value_pct,
        ..Overview::default()
    };
    if let Some(last) = find(rows, fy - 1, fq) {
        let brand_growth = pct_change(cur.sales_value, last.sales_value);
        let category_growth = pct_change(cur.category_sales_value, last.category_sales_value);
        out.share_yoy_pp = opt_sub(cur.share_value_pct, last.share_value_pct);
        out.brand_sales_yoy_pct = brand_growth;
        out.category_sales_yoy_pct = category_growth;
        out.share_story = classify_share_move(brand_growth, category_growth);
    }
    out
}

fn monthly_trend(rows: &[AggregateRow], brand: &str) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = rows
        .iter()
        .filter(|r| r.key.brand.as_deref() == Some(brand))
        .filter_map(|r| {
            Some(TrendPoint {
                month: r.month.clone()?,
                sales_value: r.sales_value,
                share_value_pct: r.share_value_pct,
            })
        })
        .collect();
    points.sort_by(|a, b| a.month.cmp(&b.month));
    points
}
