//! Aggregate metrics over normalized staffing rows

use crate::types::{
    ratio, AggregateMetrics, AreaBreakdown, CountSource, DetailedRoleRow, RoleCounts, SummaryRow,
};

/// Compute the headline metrics.
///
/// Role counts come from the detailed sheet when it has rows, since it carries
/// the current status of every requisition; otherwise they are summed from the
/// summary sheet. Investment always comes from the summary sheet.
pub fn compute_metrics(
    summary_rows: &[SummaryRow],
    detailed_rows: &[DetailedRoleRow],
) -> AggregateMetrics {
    let (counts, source) = if detailed_rows.is_empty() {
        (summary_counts(summary_rows), CountSource::Summary)
    } else {
        (RoleCounts::from_rows(detailed_rows), CountSource::Detailed)
    };

    let total_investment: f64 = summary_rows.iter().map(|r| r.estimated_investment).sum();
    let total = counts.total as f64;

    AggregateMetrics {
        total_roles: counts.total,
        total_investment,
        open_roles: counts.open,
        closed_roles: counts.closed,
        fill_rate: ratio(counts.closed as f64, total) * 100.0,
        avg_cost_per_role: ratio(total_investment, total),
        source,
    }
}

fn summary_counts(rows: &[SummaryRow]) -> RoleCounts {
    rows.iter().fold(RoleCounts::default(), |acc, row| RoleCounts {
        total: acc.total.saturating_add(row.new_roles_count),
        open: acc.open.saturating_add(row.open_roles_count),
        closed: acc.closed.saturating_add(row.closed_roles_count),
    })
}

/// Per-area close rate and cost per role, in summary-sheet order
pub fn area_breakdown(summary_rows: &[SummaryRow]) -> Vec<AreaBreakdown> {
    summary_rows
        .iter()
        .map(|row| AreaBreakdown {
            technology_area: row.technology_area.clone(),
            leader: row.leader.clone(),
            new_roles: row.new_roles_count,
            open_roles: row.open_roles_count,
            closed_roles: row.closed_roles_count,
            estimated_investment: row.estimated_investment,
            close_rate: row.close_rate(),
            avg_cost_per_role: row.avg_cost_per_role(),
        })
        .collect()
}
