use crate::decompose::RankLimits;
use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Runtime settings for the binary. Every flag can also be set through its
/// `SHARE_INSIGHT_*` environment variable; the flag wins when both are given.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    name = "share-insight",
    version,
    about = "Explain year-over-year value-share moves per brand on a Dec-Nov fiscal calendar"
)]
pub struct Config {
    /// Cleaned market-measurement CSV
    #[arg(long, env = "SHARE_INSIGHT_INPUT", default_value = "data/nielsen.csv")]
    pub input: PathBuf,

    /// Directory for the JSON payloads and drilldown tables
    #[arg(long, env = "SHARE_INSIGHT_OUTPUT_DIR", default_value = "outputs")]
    pub output_dir: PathBuf,

    /// Build a single brand; every brand in the input when omitted
    #[arg(long, env = "SHARE_INSIGHT_BRAND")]
    pub brand: Option<String>,

    /// Entries listed as top gainers and top decliners
    #[arg(long, env = "SHARE_INSIGHT_TOP_N", default_value = "3")]
    pub top_n: NonZeroUsize,

    /// Rows kept in each drilldown sales table
    #[arg(long, env = "SHARE_INSIGHT_TABLE_LIMIT", default_value = "30")]
    pub table_limit: NonZeroUsize,
}

impl Config {
    /// Brand filter with surrounding blanks removed. A blank value means
    /// "every brand".
    pub fn brand(&self) -> Option<&str> {
        self.brand.as_deref().map(str::trim).filter(|b| !b.is_empty())
    }

    pub fn limits(&self) -> RankLimits {
        RankLimits {
            top_n: self.top_n.get(),
            table_limit: self.table_limit.get(),
        }
    }
}
