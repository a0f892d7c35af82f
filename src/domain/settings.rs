//! Resolved run settings and their defaults.

use crate::domain::symbol::Symbol;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DIRECTORY_SOURCE: &str =
    "https://raw.githubusercontent.com/datasets/s-and-p-500-companies/main/data/constituents.csv";
pub const DEFAULT_SYMBOL_COLUMN: &str = "Symbol";
pub const DEFAULT_NAME_COLUMN: &str = "Security";
pub const DEFAULT_CACHE_TTL_SECS: i64 = 86_400;
pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_TIMEOUT_SECS: i64 = 30;
pub const DEFAULT_REPORT_OUTPUT: &str = "dashboard.html";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq)]
pub struct DirectorySettings {
    /// HTTP(S) URL or local file path of the constituents table.
    pub source: String,
    pub symbol_column: String,
    /// `None` when the table has no usable name column.
    pub name_column: Option<String>,
    pub cache_ttl: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PriceProvider {
    Yahoo { base_url: String },
    Csv { data_dir: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// `None` disables the ticker directory; labels fall back to symbols.
    pub directory: Option<DirectorySettings>,
    pub prices: PriceProvider,
    pub timeout: Duration,
    pub symbols: Vec<Symbol>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub report_output: PathBuf,
    /// Custom HTML template; `None` uses the built-in one.
    pub report_template: Option<PathBuf>,
}
