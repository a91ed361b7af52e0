//! Schema mapping: untyped worksheet rows → typed staffing records
//!
//! This is the only place that addresses cells by column name. Malformed cells
//! never fail a load: numbers fall back to 0, dates to `DateField::NotADate`.

use super::raw::{RawCell, RawRow};
use crate::types::{DetailedRoleRow, SummaryRow};
use std::collections::BTreeMap;

/// The summary sheet holds exactly this many technology areas; anything after
/// them is subtotal/footer content.
pub const SUMMARY_ROW_LIMIT: usize = 6;

/// Summary sheet column names
pub mod summary_columns {
    pub const SEQUENCE: &str = "#";
    pub const TECHNOLOGY_AREA: &str = "Technology Area";
    pub const LEADERS: &str = "Leaders";
    pub const NEW_ROLES: &str = "# of New Roles";
    pub const EST_INVESTMENT: &str = "Est. Investment";
    pub const OPEN_ROLES: &str = "Open Roles";
    pub const CLOSED_ROLES: &str = "Closed Roles";

    pub const ALL: &[&str] = &[
        SEQUENCE,
        TECHNOLOGY_AREA,
        LEADERS,
        NEW_ROLES,
        EST_INVESTMENT,
        OPEN_ROLES,
        CLOSED_ROLES,
    ];
}

/// Detailed sheet column names (after header whitespace normalization)
pub mod detailed_columns {
    pub const TECHNOLOGY_AREA: &str = "Technology Area";
    pub const TEAM_NAME: &str = "TEAM NAME";
    pub const WORKER_TYPE: &str = "Worker Type";
    pub const REQ_ID: &str = "Req ID";
    pub const RECRUITMENT_STATUS: &str = "Recruitment Status";
    pub const LOCATION: &str = "Location";
    pub const SENIOR_LEADER: &str = "Senior Leader";
    pub const HIRING_MANAGER: &str = "Hiring Manager";
    pub const TARGET_START: &str = "Target Start Date";
    pub const TARGET_END: &str = "Target End Date";
    pub const ACTUAL_START: &str = "Actual Start";
    pub const ACTUAL_END: &str = "Actual End Date";
    pub const STATUS: &str = "Status";
    pub const COMMENT: &str = "Comment";

    /// Columns the dashboard depends on; the rest are descriptive
    pub const REQUIRED: &[&str] = &[TECHNOLOGY_AREA, TEAM_NAME, STATUS];

    pub const ALL: &[&str] = &[
        TECHNOLOGY_AREA,
        TEAM_NAME,
        WORKER_TYPE,
        REQ_ID,
        RECRUITMENT_STATUS,
        LOCATION,
        SENIOR_LEADER,
        HIRING_MANAGER,
        TARGET_START,
        TARGET_END,
        ACTUAL_START,
        ACTUAL_END,
        STATUS,
        COMMENT,
    ];
}

/// Map summary-sheet rows to `SummaryRow`s.
///
/// Rows without a readable `#` are footers and are dropped; only the first
/// [`SUMMARY_ROW_LIMIT`] valid rows are kept, in sheet order.
pub fn normalize_summary(raw_rows: &[RawRow]) -> Vec<SummaryRow> {
    use summary_columns::*;

    raw_rows
        .iter()
        .filter_map(|row| {
            let sequence_number = sequence_number(row.get(SEQUENCE))?;
            Some(SummaryRow {
                sequence_number: Some(sequence_number),
                technology_area: row.get(TECHNOLOGY_AREA).as_text().trim().to_string(),
                leader: row.get(LEADERS).as_text().trim().to_string(),
                new_roles_count: count(row.get(NEW_ROLES)),
                estimated_investment: amount(row.get(EST_INVESTMENT)),
                open_roles_count: count(row.get(OPEN_ROLES)),
                closed_roles_count: count(row.get(CLOSED_ROLES)),
            })
        })
        .take(SUMMARY_ROW_LIMIT)
        .collect()
}

/// Map detailed-sheet rows to `DetailedRoleRow`s, dropping padding rows that
/// have no technology area.
pub fn normalize_detailed(raw_rows: &[RawRow]) -> Vec<DetailedRoleRow> {
    use detailed_columns::*;

    raw_rows
        .iter()
        .filter(|row| !row.get(TECHNOLOGY_AREA).is_blank())
        .map(|row| {
            let extra: BTreeMap<String, String> = row
                .iter()
                .filter(|(header, _)| !header.is_empty() && !ALL.contains(header))
                .map(|(header, cell)| (header.to_string(), cell.as_text()))
                .collect();

            DetailedRoleRow {
                technology_area: text(row, TECHNOLOGY_AREA),
                team_name: text(row, TEAM_NAME),
                worker_type: text(row, WORKER_TYPE),
                req_id: text(row, REQ_ID),
                recruitment_status: text(row, RECRUITMENT_STATUS),
                location: text(row, LOCATION),
                senior_leader: text(row, SENIOR_LEADER),
                hiring_manager: text(row, HIRING_MANAGER),
                target_start_date: row.get(TARGET_START).as_date(),
                target_end_date: row.get(TARGET_END).as_date(),
                actual_start_date: row.get(ACTUAL_START).as_date(),
                actual_end_date: row.get(ACTUAL_END).as_date(),
                status: text(row, STATUS),
                comment: text(row, COMMENT),
                extra,
            }
        })
        .collect()
}

fn text(row: &RawRow, column: &str) -> String {
    row.get(column).as_text()
}

fn sequence_number(cell: &RawCell) -> Option<i64> {
    if cell.is_blank() {
        return None;
    }
    match cell {
        RawCell::Bool(_) => None,
        other => other.as_number().map(|n| n.trunc() as i64),
    }
}

/// Role counts: unreadable, negative or non-finite cells count as 0
fn count(cell: &RawCell) -> u64 {
    match cell.as_number() {
        Some(n) if n > 0.0 => n.round() as u64,
        _ => 0,
    }
}

fn amount(cell: &RawCell) -> f64 {
    match cell.as_number() {
        Some(n) if n > 0.0 => n,
        _ => 0.0,
    }
}
