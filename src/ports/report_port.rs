//! Report generation port.

use crate::domain::error::StockboardError;
use crate::domain::pipeline::DashboardData;
use std::path::Path;

/// Port for rendering a computed dashboard.
pub trait ReportPort {
    fn write(&self, dashboard: &DashboardData, output_path: &Path) -> Result<(), StockboardError>;
}
