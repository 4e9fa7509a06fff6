use crate::calendar::FiscalQuarter;
use crate::types::{AggregateRow, Dimension, EnrichedRecord, GroupKey};
use crate::util::{mean, positive_div};
use std::collections::BTreeMap;

/// Time granularity of an aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodGrain {
    /// Fiscal quarter qualified by its fiscal year.
    FiscalQuarter,
    /// Calendar month (`YYYY-MM`).
    Month,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum PeriodKey {
    Quarter(Option<i32>, Option<FiscalQuarter>),
    Month(Option<String>),
}

impl PeriodKey {
    fn of(record: &EnrichedRecord, grain: PeriodGrain) -> Self {
        match grain {
            PeriodGrain::FiscalQuarter => {
                PeriodKey::Quarter(record.fiscal_year, record.fiscal_quarter)
            }
            PeriodGrain::Month => PeriodKey::Month(record.month_key.clone()),
        }
    }
}

#[derive(Default)]
struct Acc {
    rows: usize,
    sales_value: f64,
    sales_volume: f64,
    category_sales_value: f64,
    wdist: Vec<f64>,
    ndist: Vec<f64>,
}

impl Acc {
    fn push(&mut self, r: &EnrichedRecord) {
        self.rows += 1;
        self.sales_value += r.record.sales_value.unwrap_or(0.0);
        self.sales_volume += r.record.sales_volume.unwrap_or(0.0);
        self.category_sales_value += r.category_sales_value.unwrap_or(0.0);
        self.wdist.extend(r.record.wdist_pct);
        self.ndist.extend(r.record.ndist_pct);
    }

    fn finish(self, key: GroupKey, period: PeriodKey) -> AggregateRow {
        let (fiscal_year, fiscal_quarter, month) = match period {
            PeriodKey::Quarter(fy, fq) => (fy, fq, None),
            PeriodKey::Month(m) => (None, None, m),
        };
        let wdist_pct = mean(&self.wdist);
        let ndist_pct = mean(&self.ndist);
        AggregateRow {
            key,
            fiscal_year,
            fiscal_quarter,
            month,
            row_count: self.rows,
            sales_value: self.sales_value,
            sales_volume: self.sales_volume,
            category_sales_value: self.category_sales_value,
            wdist_pct,
            ndist_pct,
            share_value_pct: positive_div(self.sales_value, self.category_sales_value)
                .map(|s| s * 100.0),
            price: positive_div(self.sales_value, self.sales_volume),
            velocity_value: wdist_pct.and_then(|w| positive_div(self.sales_value, w)),
        }
    }
}

/// Group `records` by the values of `keys` plus the period implied by
/// `grain`, one output row per combination present in the input.
///
/// Records without a period form their own group rather than being dropped.
/// Sums ignore absent values; distribution is averaged over the rows that
/// report it. Share, price and velocity are recomputed from the group totals.
/// Rows come out ordered by group key, then period.
pub fn aggregate_period(
    records: &[EnrichedRecord],
    keys: &[Dimension],
    grain: PeriodGrain,
) -> Vec<AggregateRow> {
    let mut groups: BTreeMap<(GroupKey, PeriodKey), Acc> = BTreeMap::new();
    for r in records {
        let key = GroupKey::from_record(&r.record, keys);
        let period = PeriodKey::of(r, grain);
        groups.entry((key, period)).or_default().push(r);
    }
    groups
        .into_iter()
        .map(|((key, period), acc)| acc.finish(key, period))
        .collect()
}
