//! Interactive session state.
//!
//! Holds the user's current selection and date range. Each state-changing
//! command asks the caller to rerun the pipeline; the latest state always
//! wins.

use crate::domain::date_range::{min_start_date, parse_date, DateRange};
use crate::domain::directory::SymbolDirectory;
use crate::domain::error::StockboardError;
use crate::domain::symbol::{parse_symbols, Symbol};
use chrono::NaiveDate;

pub const HELP: &str = "\
commands:
  symbols A,B,C    replace the selection
  add <symbol|name> add one symbol (or a directory display name)
  remove <symbol>  drop one symbol
  start YYYY-MM-DD set the start date
  end YYYY-MM-DD   set the end date
  run              rerun with the current inputs
  refresh          refetch the ticker directory and rerun
  show             print the current inputs
  help             this text
  quit             leave";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    SetSymbols(String),
    Add(String),
    Remove(String),
    Start(NaiveDate),
    End(NaiveDate),
    Run,
    Refresh,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("unknown command: {0} (try 'help')")]
    UnknownCommand(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

impl SessionCommand {
    /// Blank lines parse to `None`.
    pub fn parse(line: &str) -> Result<Option<SessionCommand>, SessionError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_lowercase().as_str() {
            "symbols" => SessionCommand::SetSymbols(rest.to_string()),
            "add" => SessionCommand::Add(require(rest, "add")?.to_string()),
            "remove" | "rm" => SessionCommand::Remove(require(rest, "remove")?.to_string()),
            "start" => SessionCommand::Start(date_arg(require(rest, "start")?)?),
            "end" => SessionCommand::End(date_arg(require(rest, "end")?)?),
            "run" => SessionCommand::Run,
            "refresh" => SessionCommand::Refresh,
            "show" => SessionCommand::Show,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" | "q" => SessionCommand::Quit,
            other => return Err(SessionError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn require<'a>(rest: &'a str, verb: &'static str) -> Result<&'a str, SessionError> {
    if rest.is_empty() {
        Err(SessionError::MissingArgument(verb))
    } else {
        Ok(rest)
    }
}

fn date_arg(value: &str) -> Result<NaiveDate, SessionError> {
    parse_date(value).ok_or_else(|| SessionError::InvalidDate(value.to_string()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    selection: Vec<Symbol>,
    start: NaiveDate,
    end: NaiveDate,
}

impl Session {
    /// Initial dates go through the same clamping as `set_start`/`set_end`.
    pub fn new(selection: Vec<Symbol>, start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Self {
        let mut session = Self {
            selection,
            start,
            end,
        };
        session.set_start(start, today);
        session.set_end(end, today);
        session
    }

    pub fn selection(&self) -> &[Symbol] {
        &self.selection
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn range(&self, today: NaiveDate) -> Result<DateRange, StockboardError> {
        DateRange::new(self.start, self.end, today)
    }

    /// Replace the whole selection.
    pub fn set_symbols(&mut self, input: &str) -> Result<(), StockboardError> {
        self.selection = parse_symbols(input)?;
        Ok(())
    }

    /// Add a symbol, resolving display names through the directory when
    /// one is loaded. Returns false if nothing changed.
    pub fn add(&mut self, input: &str, directory: Option<&SymbolDirectory>) -> bool {
        let symbol = match directory {
            Some(dir) => dir.resolve(input),
            None => Symbol::normalize(input),
        };
        match symbol {
            Some(s) if !self.selection.contains(&s) => {
                self.selection.push(s);
                true
            }
            _ => false,
        }
    }

    pub fn remove(&mut self, input: &str) -> bool {
        let Some(symbol) = Symbol::normalize(input) else {
            return false;
        };
        let before = self.selection.len();
        self.selection.retain(|s| *s != symbol);
        self.selection.len() != before
    }

    /// Clamp to `[min_start_date(), today]`; the end date follows if it
    /// would fall before the new start.
    pub fn set_start(&mut self, date: NaiveDate, today: NaiveDate) {
        self.start = date.clamp(min_start_date(), today);
        if self.end < self.start {
            self.end = self.start;
        }
    }

    /// Clamp to `[start, today]`.
    pub fn set_end(&mut self, date: NaiveDate, today: NaiveDate) {
        self.end = date.clamp(self.start, today.max(self.start));
    }
}
