//! Ticker directory loaded from a constituents CSV table.
//!
//! The source is either an HTTP(S) URL fetched with a blocking client or a
//! local file path.

use crate::adapters::http_client;
use crate::domain::directory::SymbolDirectory;
use crate::domain::error::StockboardError;
use crate::domain::settings::DirectorySettings;
use crate::domain::symbol::Symbol;
use crate::ports::directory_port::DirectoryPort;
use std::fs;
use std::time::Duration;

pub struct TableDirectoryAdapter {
    source: String,
    symbol_column: String,
    name_column: Option<String>,
    timeout: Duration,
}

impl TableDirectoryAdapter {
    pub fn new(settings: &DirectorySettings, timeout: Duration) -> Self {
        Self {
            source: settings.source.clone(),
            symbol_column: settings.symbol_column.clone(),
            name_column: settings.name_column.clone(),
            timeout,
        }
    }

    fn is_remote(&self) -> bool {
        self.source.starts_with("http://") || self.source.starts_with("https://")
    }

    fn unavailable(&self, reason: impl Into<String>) -> StockboardError {
        StockboardError::SourceUnavailable {
            source_name: self.source.clone(),
            reason: reason.into(),
        }
    }

    fn read_body(&self) -> Result<String, StockboardError> {
        if !self.is_remote() {
            return fs::read_to_string(&self.source)
                .map_err(|e| self.unavailable(format!("failed to read file: {}", e)));
        }

        tracing::debug!(url = %self.source, "fetching ticker directory");
        let client = http_client(self.timeout).map_err(|e| self.unavailable(e))?;
        let resp = client
            .get(&self.source)
            .send()
            .map_err(|e| self.unavailable(format!("request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(self.unavailable(format!("HTTP {}", status)));
        }
        resp.text()
            .map_err(|e| self.unavailable(format!("failed to read body: {}", e)))
    }
}

impl DirectoryPort for TableDirectoryAdapter {
    fn list_symbols(&self) -> Result<SymbolDirectory, StockboardError> {
        let body = self.read_body()?;
        let directory = parse_directory_csv(&body, &self.symbol_column, self.name_column.as_deref())
            .map_err(|reason| self.unavailable(reason))?;
        tracing::info!(source = %self.source, symbols = directory.len(), "loaded ticker directory");
        Ok(directory)
    }

    fn source_name(&self) -> String {
        self.source.clone()
    }
}

/// Build a directory from CSV text. Column names match case-insensitively.
/// A configured name column that the table lacks is ignored.
pub fn parse_directory_csv(
    body: &str,
    symbol_column: &str,
    name_column: Option<&str>,
) -> Result<SymbolDirectory, String> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| format!("CSV header error: {}", e))?
        .clone();
    let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

    let symbol_idx =
        find(symbol_column).ok_or_else(|| format!("table has no '{}' column", symbol_column))?;
    let name_idx = match name_column {
        Some(column) => {
            let idx = find(column);
            if idx.is_none() {
                tracing::warn!(column, "name column not found, entries will have no names");
            }
            idx
        }
        None => None,
    };

    let mut directory = SymbolDirectory::new();
    for result in rdr.records() {
        let record = result.map_err(|e| format!("CSV parse error: {}", e))?;
        let Some(symbol) = record.get(symbol_idx).and_then(Symbol::normalize) else {
            continue;
        };
        let name = name_idx
            .and_then(|i| record.get(i))
            .map(str::to_string);
        if !directory.insert(symbol.clone(), name) {
            tracing::debug!(%symbol, "duplicate directory row ignored");
        }
    }

    if directory.is_empty() {
        return Err("table contains no symbols".to_string());
    }
    Ok(directory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settings::{DEFAULT_NAME_COLUMN, DEFAULT_SYMBOL_COLUMN};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TABLE: &str = "Symbol,Security,GICS Sector\n\
        MMM,3M,Industrials\n\
        BRK.B,Berkshire Hathaway,Financials\n\
        ,Blank Row,Nothing\n\
        AAPL,Apple Inc.,Information Technology\n\
        aapl,Apple Duplicate,Information Technology\n";

    fn sym(s: &str) -> Symbol {
        s.parse().unwrap()
    }

    #[test]
    fn parses_symbols_and_names() {
        let dir = parse_directory_csv(TABLE, "Symbol", Some("Security")).unwrap();
        assert_eq!(dir.len(), 3);
        assert_eq!(dir.display_name(&sym("MMM")).as_deref(), Some("3M (MMM)"));
        assert_eq!(dir.name(&sym("AAPL")), Some("Apple Inc."));
    }

    #[test]
    fn normalizes_reserved_characters() {
        let dir = parse_directory_csv(TABLE, "Symbol", Some("Security")).unwrap();
        assert!(dir.contains(&sym("BRK-B")));
        assert_eq!(
            dir.display_name(&sym("BRK-B")).as_deref(),
            Some("Berkshire Hathaway (BRK-B)")
        );
    }

    #[test]
    fn header_match_is_case_insensitive() {
        let dir = parse_directory_csv(TABLE, "symbol", Some("SECURITY")).unwrap();
        assert_eq!(dir.name(&sym("MMM")), Some("3M"));
    }

    #[test]
    fn missing_symbol_column_is_error() {
        let err = parse_directory_csv(TABLE, "Ticker", None).unwrap_err();
        assert!(err.contains("Ticker"));
    }

    #[test]
    fn missing_name_column_gives_unnamed_entries() {
        let dir = parse_directory_csv(TABLE, "Symbol", Some("Company")).unwrap();
        assert_eq!(dir.name(&sym("MMM")), None);
        assert_eq!(dir.label(&sym("MMM")), "MMM");
    }

    #[test]
    fn empty_table_is_error() {
        assert!(parse_directory_csv("Symbol,Security\n", "Symbol", None).is_err());
    }

    #[test]
    fn reads_local_file_source() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", TABLE).unwrap();

        let settings = DirectorySettings {
            source: file.path().display().to_string(),
            symbol_column: DEFAULT_SYMBOL_COLUMN.to_string(),
            name_column: Some(DEFAULT_NAME_COLUMN.to_string()),
            cache_ttl: Duration::from_secs(60),
        };
        let adapter = TableDirectoryAdapter::new(&settings, Duration::from_secs(5));
        let dir = adapter.list_symbols().unwrap();
        assert_eq!(dir.len(), 3);
    }

    #[test]
    fn unreadable_file_is_source_unavailable() {
        let settings = DirectorySettings {
            source: "/nonexistent/constituents.csv".to_string(),
            symbol_column: DEFAULT_SYMBOL_COLUMN.to_string(),
            name_column: None,
            cache_ttl: Duration::from_secs(60),
        };
        let adapter = TableDirectoryAdapter::new(&settings, Duration::from_secs(5));
        assert!(matches!(
            adapter.list_symbols(),
            Err(StockboardError::SourceUnavailable { .. })
        ));
    }

    #[test]
    #[ignore] // Requires network access
    fn fetches_default_constituents() {
        let settings = DirectorySettings {
            source: crate::domain::settings::DEFAULT_DIRECTORY_SOURCE.to_string(),
            symbol_column: DEFAULT_SYMBOL_COLUMN.to_string(),
            name_column: Some(DEFAULT_NAME_COLUMN.to_string()),
            cache_ttl: Duration::from_secs(60),
        };
        let adapter = TableDirectoryAdapter::new(&settings, Duration::from_secs(30));
        let dir = adapter.list_symbols().unwrap();
        assert!(dir.len() > 400);
        assert!(dir.contains(&sym("AAPL")));
    }
}
