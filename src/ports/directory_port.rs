//! Ticker directory port.

use crate::domain::directory::SymbolDirectory;
use crate::domain::error::StockboardError;

pub trait DirectoryPort {
    /// Fails with `SourceUnavailable` when the table cannot be retrieved or
    /// lacks the expected columns.
    fn list_symbols(&self) -> Result<SymbolDirectory, StockboardError>;

    /// Human-readable description of where the directory comes from.
    fn source_name(&self) -> String;
}
