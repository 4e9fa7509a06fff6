// Fiscal calendar used throughout the analysis.
//
// The fiscal year runs December through November and is named after the
// calendar year in which it ends, so December 2024 belongs to FY2025.
use crate::types::{EnrichedRecord, Record};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Fiscal quarter. The derived ordering is chronological within a fiscal year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FiscalQuarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl FiscalQuarter {
    /// Dec-Feb is Q1, Mar-May Q2, Jun-Aug Q3, Sep-Nov Q4.
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => FiscalQuarter::Q1,
            3..=5 => FiscalQuarter::Q2,
            6..=8 => FiscalQuarter::Q3,
            _ => FiscalQuarter::Q4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FiscalQuarter::Q1 => "Q1",
            FiscalQuarter::Q2 => "Q2",
            FiscalQuarter::Q3 => "Q3",
            FiscalQuarter::Q4 => "Q4",
        }
    }
}

impl fmt::Display for FiscalQuarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn fiscal_year(date: Option<NaiveDate>) -> Option<i32> {
    let date = date?;
    if date.month() == 12 {
        Some(date.year() + 1)
    } else {
        Some(date.year())
    }
}

pub fn fiscal_quarter(date: Option<NaiveDate>) -> Option<FiscalQuarter> {
    date.map(|d| FiscalQuarter::from_month(d.month()))
}

/// Label used in reports; empty when the quarter is unknown.
pub fn quarter_label(quarter: Option<FiscalQuarter>) -> &'static str {
    quarter.map(|q| q.label()).unwrap_or("")
}

/// Calendar year-month (`YYYY-MM`), independent of the fiscal year.
pub fn month_key(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| format!("{:04}-{:02}", d.year(), d.month()))
}

/// Copy every record and attach its fiscal year, fiscal quarter and month.
pub fn add_time_fields(records: &[Record]) -> Vec<EnrichedRecord> {
    records
        .iter()
        .map(|r| EnrichedRecord {
            record: r.clone(),
            fiscal_year: fiscal_year(r.date),
            fiscal_quarter: fiscal_quarter(r.date),
            month_key: month_key(r.date),
            category_sales_value: None,
        })
        .collect()
}
