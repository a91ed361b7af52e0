//! Excel import/export for the staffing workbook
//!
//! - Import: staffing workbook (.xlsx) → raw summary and detailed sheets
//! - Export: normalized rows → styled .xlsx re-exports

mod exporter;
mod importer;

pub use exporter::{
    detailed_file_name, summary_file_name, ExcelExporter, DETAILED_SHEET, HIDDEN_COLUMNS,
    SUMMARY_SHEET,
};
pub use importer::ExcelImporter;
