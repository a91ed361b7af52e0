//! Staffing Dashboard - technology staffing plan metrics from Excel
//!
//! This library reads the staffing workbook (a summary sheet of technology
//! areas and a detailed sheet of individual requisitions), normalizes the
//! loosely-typed cells, and derives the headline metrics the dashboard shows.
//!
//! # Features
//!
//! - Tolerant import of the staffing workbook (.xlsx)
//! - Summary and per-area metrics (fill rate, cost per role)
//! - Status / technology area / team filtering of requisitions
//! - Styled Excel re-exports of both sheets
//! - Snapshot cache with a refresh interval for long-running servers
//!
//! # Example
//!
//! ```no_run
//! use staffing_dashboard::config::SheetLayout;
//! use staffing_dashboard::StaffingSnapshot;
//! use std::path::Path;
//!
//! let snapshot = StaffingSnapshot::load(Path::new("staffing.xlsx"), &SheetLayout::default())?;
//!
//! println!("Total roles: {}", snapshot.metrics.total_roles);
//! println!("Fill rate: {:.1}%", snapshot.metrics.fill_rate);
//! # Ok::<(), staffing_dashboard::error::StaffingError>(())
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod report;
pub mod snapshot;
pub mod types;

// Re-export commonly used types
pub use error::{StaffingError, StaffingResult};
pub use snapshot::StaffingSnapshot;
pub use types::{
    AggregateMetrics, AreaBreakdown, CountSource, DateField, DetailedRoleRow, RoleCounts,
    SummaryRow,
};
