use crate::types::EnrichedRecord;
use crate::util::positive_div;

/// Implied total-market sales from a brand's sales and its value share
/// (0-100 scale): `sales_value / (share / 100)`.
///
/// `None` when either input is missing or the share is not positive.
pub fn estimate_category_sales(sales_value: Option<f64>, share_value_pct: Option<f64>) -> Option<f64> {
    positive_div(sales_value?, share_value_pct? / 100.0)
}

pub fn with_category_sales(mut records: Vec<EnrichedRecord>) -> Vec<EnrichedRecord> {
    for r in &mut records {
        r.category_sales_value =
            estimate_category_sales(r.record.sales_value, r.record.share_value_pct);
    }
    records
}
