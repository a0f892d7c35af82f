//! Core domain types and logic.

pub mod config_validation;
pub mod date_range;
pub mod directory;
pub mod error;
pub mod pipeline;
pub mod price_table;
pub mod recommendation;
pub mod returns;
pub mod session;
pub mod settings;
pub mod symbol;
