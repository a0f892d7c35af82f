//! Port traits: the seams between the domain and its adapters.

pub mod config_port;
pub mod directory_port;
pub mod price_port;
pub mod report_port;
