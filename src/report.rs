//! Number formatting and the plain-text summary report

use crate::snapshot::StaffingSnapshot;

/// `$1.23M`
pub fn format_millions(amount: f64) -> String {
    format!("${:.2}M", amount / 1_000_000.0)
}

/// `$100K`
pub fn format_thousands(amount: f64) -> String {
    format!("${:.0}K", amount / 1_000.0)
}

/// `$1,234,567` (rounded to whole dollars)
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}${}", sign, group_thousands(rounded.abs() as u64))
}

/// `60.0%`
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Summary statistics as plain text, one figure per line
pub fn summary_report(snapshot: &StaffingSnapshot) -> String {
    let m = &snapshot.metrics;
    [
        format!("Total Technology Areas: {}", snapshot.summary.len()),
        format!("Total New Roles: {}", m.total_roles),
        format!("Total Investment: {}", format_currency(m.total_investment)),
        format!(
            "Average Investment per Role: {}",
            format_currency(m.avg_cost_per_role)
        ),
        format!("Overall Close Rate: {}", format_percent(m.fill_rate)),
        format!("Roles Still Open: {}", m.open_roles),
    ]
    .join("\n")
}
