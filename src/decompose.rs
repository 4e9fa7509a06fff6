// Year-over-year share attribution for one brand along one dimension.
//
// Value share is read as velocity share x weighted distribution:
//   category_velocity = category_sales / wdist
//   brand_velocity    = brand_sales / wdist
//   velocity_share    = brand_velocity / category_velocity
// The change is reported additively in points, which is an approximation of
// the multiplicative split and is kept that way on purpose.
use crate::calendar::FiscalQuarter;
use crate::types::{AggregateRow, Decomposition, DecompositionRow, Dimension};
use crate::util::{finite, opt_sub, positive_div};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// How many entries each ranking keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankLimits {
    pub top_n: usize,
    pub table_limit: usize,
}

impl Default for RankLimits {
    fn default() -> Self {
        Self {
            top_n: 3,
            table_limit: 30,
        }
    }
}

/// Compare the latest fiscal quarter of `fiscal_year` for `brand` against the
/// same quarter one fiscal year earlier, entry by entry along `dimension`.
///
/// `rows` must be a quarter-grain aggregate grouped by brand and `dimension`.
/// Returns an empty result unless both the current and the prior slice exist.
pub fn decompose_share_change(
    rows: &[AggregateRow],
    dimension: Dimension,
    brand: &str,
    fiscal_year: i32,
    limits: RankLimits,
) -> Decomposition {
    let is_brand = |r: &&AggregateRow| r.key.brand.as_deref() == Some(brand);

    let latest_quarter = rows
        .iter()
        .filter(is_brand)
        .filter(|r| r.fiscal_year == Some(fiscal_year))
        .filter_map(|r| r.fiscal_quarter)
        .max();
    let Some(quarter) = latest_quarter else {
        return Decomposition::empty(dimension, None);
    };

    let current = slice(rows, brand, fiscal_year, quarter, dimension);
    let prior = slice(rows, brand, fiscal_year - 1, quarter, dimension);
    tracing::debug!(
        brand,
        %dimension,
        fiscal_year,
        %quarter,
        current = current.len(),
        prior = prior.len(),
        "decomposing share change"
    );
    if current.is_empty() || prior.is_empty() {
        return Decomposition::empty(dimension, Some(quarter));
    }

    let values: BTreeSet<&str> = current.keys().chain(prior.keys()).copied().collect();
    let entries: Vec<DecompositionRow> = values
        .into_iter()
        .map(|v| compare(v, current.get(v).copied(), prior.get(v).copied()))
        .collect();

    let mut top_gainers = entries.clone();
    rank_by(&mut top_gainers, |r| r.share_pp, true);
    top_gainers.truncate(limits.top_n);

    let mut top_decliners = entries.clone();
    rank_by(&mut top_decliners, |r| r.share_pp, false);
    top_decliners.truncate(limits.top_n);

    let mut table = entries;
    rank_by(&mut table, |r| r.current_sales_value, true);
    table.truncate(limits.table_limit);

    Decomposition {
        dimension,
        latest_quarter: Some(quarter),
        top_gainers,
        top_decliners,
        table,
    }
}

fn slice<'a>(
    rows: &'a [AggregateRow],
    brand: &str,
    fiscal_year: i32,
    quarter: FiscalQuarter,
    dimension: Dimension,
) -> BTreeMap<&'a str, &'a AggregateRow> {
    rows.iter()
        .filter(|r| {
            r.key.brand.as_deref() == Some(brand)
                && r.fiscal_year == Some(fiscal_year)
                && r.fiscal_quarter == Some(quarter)
        })
        .map(|r| (r.key.get(dimension).unwrap_or(""), r))
        .collect()
}

fn velocity_share(row: &AggregateRow) -> Option<f64> {
    let wdist = row.wdist_pct?;
    let brand_velocity = positive_div(row.sales_value, wdist)?;
    let category_velocity = positive_div(row.category_sales_value, wdist)?;
    positive_div(brand_velocity, category_velocity)
}

fn compare(
    value: &str,
    current: Option<&AggregateRow>,
    prior: Option<&AggregateRow>,
) -> DecompositionRow {
    let current_share = current.and_then(|r| r.share_value_pct);
    let prior_share = prior.and_then(|r| r.share_value_pct);
    let current_wdist = current.and_then(|r| r.wdist_pct);
    let prior_wdist = prior.and_then(|r| r.wdist_pct);
    let vel_share_pp = opt_sub(
        current.and_then(velocity_share),
        prior.and_then(velocity_share),
    )
    .and_then(|d| finite(d * 100.0));

    DecompositionRow {
        dimension_value: value.to_string(),
        current_sales_value: current.and_then(|r| finite(r.sales_value)),
        current_share,
        prior_share,
        share_pp: opt_sub(current_share, prior_share),
        current_wdist,
        wdist_pp: opt_sub(current_wdist, prior_wdist),
        vel_share_pp,
        current_price: current.and_then(|r| r.price),
    }
}

/// Sort by `key`, unknown keys last in either direction, ties broken by
/// dimension value so the order is total.
fn rank_by<F>(rows: &mut [DecompositionRow], key: F, descending: bool)
where
    F: Fn(&DecompositionRow) -> Option<f64>,
{
    rows.sort_by(|a, b| {
        let ord = match (key(a), key(b)) {
            (Some(x), Some(y)) => {
                let o = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
                if descending {
                    o.reverse()
                } else {
                    o
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        ord.then_with(|| a.dimension_value.cmp(&b.dimension_value))
    });
}
