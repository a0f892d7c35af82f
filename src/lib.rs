//! stockboard: stock return and risk dashboard.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`]. [`cli`] wires them together.

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod logging;
pub mod ports;
