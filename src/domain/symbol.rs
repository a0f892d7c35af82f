//! Ticker symbols and user selections.
//!
//! Symbols are normalized to the price source's syntax on construction, so a
//! `Symbol` can be passed to any adapter as-is.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Characters reserved by the price source's query syntax, with the
/// substitute it accepts (`BRK.B` is requested as `BRK-B`).
const RESERVED_SUBSTITUTES: &[(char, char)] = &[('.', '-')];

/// Default selection when neither the command line nor the config names one.
pub const DEFAULT_SYMBOLS: &[&str] = &["AAPL", "TSLA", "MSFT"];

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(String);

impl Symbol {
    /// Trim, upper-case and substitute reserved characters. Returns `None`
    /// for blank input.
    pub fn normalize(raw: &str) -> Option<Symbol> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let normalized = trimmed
            .chars()
            .map(|c| {
                RESERVED_SUBSTITUTES
                    .iter()
                    .find(|(reserved, _)| *reserved == c)
                    .map(|(_, substitute)| *substitute)
                    .unwrap_or(c)
            })
            .collect::<String>()
            .to_uppercase();
        Some(Symbol(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Symbol {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symbol::normalize(s).ok_or(SelectionError::EmptyToken)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectionError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
}

/// Parse a comma-separated symbol list. Blank input is an empty selection.
pub fn parse_symbols(input: &str) -> Result<Vec<Symbol>, SelectionError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let symbol: Symbol = token.parse()?;
        if !seen.insert(symbol.clone()) {
            return Err(SelectionError::DuplicateSymbol(symbol.0));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

pub fn default_symbols() -> Vec<Symbol> {
    DEFAULT_SYMBOLS
        .iter()
        .filter_map(|s| Symbol::normalize(s))
        .collect()
}
