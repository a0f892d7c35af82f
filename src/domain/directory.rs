//! Symbol directory: the universe of selectable symbols and company names.

use crate::domain::symbol::Symbol;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolDirectory {
    entries: BTreeMap<Symbol, Option<String>>,
}

impl SymbolDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry. The first name seen for a symbol wins.
    pub fn insert(&mut self, symbol: Symbol, name: Option<String>) -> bool {
        if self.entries.contains_key(&symbol) {
            return false;
        }
        let name = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        self.entries.insert(symbol, name);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.entries.contains_key(symbol)
    }

    pub fn name(&self, symbol: &Symbol) -> Option<&str> {
        self.entries.get(symbol).and_then(|n| n.as_deref())
    }

    /// `"<Company> (<SYMBOL>)"` when the company name is known.
    pub fn display_name(&self, symbol: &Symbol) -> Option<String> {
        self.name(symbol).map(|name| format!("{} ({})", name, symbol))
    }

    /// Display name, falling back to the bare symbol.
    pub fn label(&self, symbol: &Symbol) -> String {
        self.display_name(symbol)
            .unwrap_or_else(|| symbol.to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, Option<&str>)> {
        self.entries.iter().map(|(s, n)| (s, n.as_deref()))
    }

    /// Case-insensitive substring match on symbol or company name.
    pub fn search(&self, query: &str) -> Vec<&Symbol> {
        let needle = query.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|(symbol, name)| {
                needle.is_empty()
                    || symbol.as_str().to_lowercase().contains(&needle)
                    || name
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&needle))
            })
            .map(|(symbol, _)| symbol)
            .collect()
    }

    /// Resolve user input that is either a symbol or a full display name.
    pub fn resolve(&self, input: &str) -> Option<Symbol> {
        let trimmed = input.trim();
        if let Some(symbol) = Symbol::normalize(trimmed).filter(|s| self.contains(s)) {
            return Some(symbol);
        }
        self.entries
            .keys()
            .find(|symbol| self.display_name(symbol).as_deref() == Some(trimmed))
            .cloned()
    }
}

/// Outcome of checking a selection against the directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSelection {
    pub symbols: Vec<Symbol>,
    pub unknown: Vec<Symbol>,
}

/// Keep selected symbols the directory knows; report the rest.
pub fn resolve_selection(selection: &[Symbol], directory: &SymbolDirectory) -> ResolvedSelection {
    let (symbols, unknown): (Vec<Symbol>, Vec<Symbol>) = selection
        .iter()
        .cloned()
        .partition(|s| directory.contains(s));

    for symbol in &unknown {
        tracing::warn!(%symbol, "skipping symbol not in ticker directory");
    }

    ResolvedSelection { symbols, unknown }
}
