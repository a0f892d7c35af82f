//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod directory_cache;
pub mod file_config_adapter;
pub mod html_report;
pub mod table_directory_adapter;
pub mod yahoo_adapter;

use std::time::Duration;

const USER_AGENT: &str = concat!("Mozilla/5.0 (compatible; stockboard/", env!("CARGO_PKG_VERSION"), ")");

/// Blocking HTTP client shared by the network adapters.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::blocking::Client, String> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| format!("failed to build HTTP client: {}", e))
}
