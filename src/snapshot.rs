//! One immutable load of the staffing workbook

use crate::config::SheetLayout;
use crate::core::metrics::{area_breakdown, compute_metrics};
use crate::core::normalize::{detailed_columns, normalize_detailed, normalize_summary, summary_columns};
use crate::core::raw::RawWorkbook;
use crate::error::StaffingResult;
use crate::excel::ExcelImporter;
use crate::types::{AggregateMetrics, AreaBreakdown, DetailedRoleRow, SummaryRow};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Normalized rows plus the metrics derived from them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffingSnapshot {
    pub source: PathBuf,
    pub summary: Vec<SummaryRow>,
    pub detailed: Vec<DetailedRoleRow>,
    pub metrics: AggregateMetrics,
}

impl StaffingSnapshot {
    /// Read, normalize and aggregate the workbook at `path`
    pub fn load(path: &Path, layout: &SheetLayout) -> StaffingResult<Self> {
        let raw = ExcelImporter::new(path).with_layout(layout.clone()).import()?;
        Ok(Self::from_raw(path, &raw))
    }

    pub fn from_raw(source: impl Into<PathBuf>, raw: &RawWorkbook) -> Self {
        let missing = raw.summary.missing_columns(summary_columns::ALL);
        if !missing.is_empty() {
            warn!(sheet = %raw.summary.name, ?missing, "summary sheet is missing columns");
        }

        let detailed = match &raw.detailed {
            Some(sheet) => {
                let missing = sheet.missing_columns(detailed_columns::REQUIRED);
                if !missing.is_empty() {
                    warn!(sheet = %sheet.name, ?missing, "detailed sheet is missing columns");
                }
                normalize_detailed(&sheet.rows)
            }
            None => Vec::new(),
        };

        let summary = normalize_summary(&raw.summary.rows);
        for row in summary.iter().filter(|r| r.has_count_mismatch()) {
            debug!(
                area = %row.technology_area,
                new = row.new_roles_count,
                open = row.open_roles_count,
                closed = row.closed_roles_count,
                "open + closed differs from new roles"
            );
        }

        Self::from_rows(source, summary, detailed)
    }

    pub fn from_rows(
        source: impl Into<PathBuf>,
        summary: Vec<SummaryRow>,
        detailed: Vec<DetailedRoleRow>,
    ) -> Self {
        let metrics = compute_metrics(&summary, &detailed);
        Self {
            source: source.into(),
            summary,
            detailed,
            metrics,
        }
    }

    pub fn area_breakdown(&self) -> Vec<AreaBreakdown> {
        area_breakdown(&self.summary)
    }
}
