use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Status value that marks a requisition as filled
pub const CLOSED_STATUS: &str = "Closed";

//==============================================================================
// Summary sheet
//==============================================================================

/// One technology area from the summary sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// The `#` column; rows without one never survive normalization
    pub sequence_number: Option<i64>,
    pub technology_area: String,
    pub leader: String,
    pub new_roles_count: u64,
    pub estimated_investment: f64,
    pub open_roles_count: u64,
    pub closed_roles_count: u64,
}

impl SummaryRow {
    /// Closed roles as a percentage of new roles (0 when there are none)
    pub fn close_rate(&self) -> f64 {
        ratio(self.closed_roles_count as f64, self.new_roles_count as f64) * 100.0
    }

    /// Estimated investment per new role (0 when there are none)
    pub fn avg_cost_per_role(&self) -> f64 {
        ratio(self.estimated_investment, self.new_roles_count as f64)
    }

    /// True when open + closed does not add up to the declared role count.
    /// The source sheet does not guarantee consistency; this is informational.
    pub fn has_count_mismatch(&self) -> bool {
        self.open_roles_count.saturating_add(self.closed_roles_count) != self.new_roles_count
    }
}

//==============================================================================
// Detailed sheet
//==============================================================================

/// A date-like cell after normalization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DateField {
    /// Blank cell
    #[default]
    Missing,
    Date(NaiveDate),
    /// Cell had content that could not be read as a date
    NotADate(String),
}

impl DateField {
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            DateField::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// `mm/dd/yyyy`, empty for anything that is not a date
    pub fn display(&self) -> String {
        match self {
            DateField::Date(d) => d.format("%m/%d/%Y").to_string(),
            _ => String::new(),
        }
    }
}

/// One requisition from the detailed sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailedRoleRow {
    pub technology_area: String,
    pub team_name: String,
    pub worker_type: String,
    pub req_id: String,
    pub recruitment_status: String,
    pub location: String,
    pub senior_leader: String,
    pub hiring_manager: String,
    pub target_start_date: DateField,
    pub target_end_date: DateField,
    pub actual_start_date: DateField,
    pub actual_end_date: DateField,
    pub status: String,
    pub comment: String,
    /// Columns without a dedicated field, keyed by header text
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl DetailedRoleRow {
    pub fn is_closed(&self) -> bool {
        self.status == CLOSED_STATUS
    }

    pub fn is_open(&self) -> bool {
        !self.is_closed()
    }
}

//==============================================================================
// Aggregates
//==============================================================================

/// Which collection the role counts were taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountSource {
    Detailed,
    Summary,
}

/// Headline numbers shared by every chart and card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateMetrics {
    pub total_roles: u64,
    pub total_investment: f64,
    pub open_roles: u64,
    pub closed_roles: u64,
    pub fill_rate: f64,
    pub avg_cost_per_role: f64,
    pub source: CountSource,
}

/// Per-area figures for the comparison charts and the investment table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaBreakdown {
    pub technology_area: String,
    pub leader: String,
    pub new_roles: u64,
    pub open_roles: u64,
    pub closed_roles: u64,
    pub estimated_investment: f64,
    pub close_rate: f64,
    pub avg_cost_per_role: f64,
}

/// Total/open/closed over a set of requisitions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCounts {
    pub total: u64,
    pub open: u64,
    pub closed: u64,
}

impl RoleCounts {
    pub fn from_rows(rows: &[DetailedRoleRow]) -> Self {
        let closed = rows.iter().filter(|r| r.is_closed()).count() as u64;
        let total = rows.len() as u64;
        Self {
            total,
            open: total - closed,
            closed,
        }
    }
}

/// Division that yields 0 for a zero denominator
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
