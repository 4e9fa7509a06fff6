//! Market-share insight engine.
//!
//! Turns periodic retail-measurement records into a per-brand payload that
//! explains year-over-year value-share movement on a Dec-Nov fiscal
//! calendar, with province and channel attribution.
pub mod aggregate;
pub mod calendar;
pub mod category;
pub mod classify;
pub mod config;
pub mod decompose;
pub mod error;
pub mod insight;
pub mod loader;
pub mod logging;
pub mod output;
pub mod types;
pub mod util;

pub use aggregate::{aggregate_period, PeriodGrain};
pub use calendar::{fiscal_quarter, fiscal_year, FiscalQuarter};
pub use category::estimate_category_sales;
pub use classify::{classify_share_move, ShareStory};
pub use config::Config;
pub use decompose::{decompose_share_change, RankLimits};
pub use error::{InsightError, Result};
pub use insight::{build_all_insights, build_insight};
pub use types::{
    AggregateRow, Decomposition, DecompositionRow, Dimension, InsightPayload, Overview, Record,
};
