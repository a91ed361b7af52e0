use crate::config::DashboardConfig;
use crate::core::filter::{FilterSet, RoleFilter};
use crate::error::{StaffingError, StaffingResult};
use crate::excel::ExcelExporter;
use crate::report::{
    format_currency, format_millions, format_percent, format_thousands, summary_report,
};
use crate::snapshot::StaffingSnapshot;
use crate::types::{AggregateMetrics, AreaBreakdown, CountSource, DetailedRoleRow, RoleCounts};
use clap::ValueEnum;
use colored::Colorize;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;

/// Output format for data commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// Serialized form of the `metrics` command
#[derive(Debug, Serialize)]
pub struct MetricsOutput<'a> {
    pub source: &'a Path,
    pub metrics: &'a AggregateMetrics,
    pub areas: Vec<AreaBreakdown>,
}

/// Serialized form of the `roles` command
#[derive(Debug, Serialize)]
pub struct RolesOutput {
    pub counts: RoleCounts,
    pub roles: Vec<DetailedRoleRow>,
}

fn load(workbook: &Path, config: &DashboardConfig, verbose: bool) -> StaffingResult<StaffingSnapshot> {
    if verbose {
        println!("{}", "📖 Reading workbook...".cyan());
    }
    let snapshot = StaffingSnapshot::load(workbook, &config.layout)?;
    if verbose {
        println!(
            "   Found {} technology areas, {} detailed roles\n",
            snapshot.summary.len(),
            snapshot.detailed.len()
        );
    }
    Ok(snapshot)
}

fn emit<T: Serialize>(value: &T, format: OutputFormat) -> StaffingResult<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
        OutputFormat::Text => {}
    }
    Ok(())
}

/// Execute the metrics command
pub fn metrics(
    workbook: PathBuf,
    config: &DashboardConfig,
    format: OutputFormat,
    verbose: bool,
) -> StaffingResult<()> {
    if format != OutputFormat::Text {
        let snapshot = StaffingSnapshot::load(&workbook, &config.layout)?;
        let output = MetricsOutput {
            source: &snapshot.source,
            metrics: &snapshot.metrics,
            areas: snapshot.area_breakdown(),
        };
        return emit(&output, format);
    }

    println!("{}", "📊 Staffing Dashboard - Overall Metrics".bold().green());
    println!("   Workbook: {}\n", workbook.display());

    let snapshot = load(&workbook, config, verbose)?;
    print_metrics(&snapshot);
    println!();
    print_areas(&snapshot.area_breakdown());
    Ok(())
}

fn print_metrics(snapshot: &StaffingSnapshot) {
    let m = &snapshot.metrics;
    println!("   {:<18} {}", "Total New Roles:", m.total_roles.to_string().bold());
    println!(
        "   {:<18} {}",
        "Total Investment:",
        format_millions(m.total_investment).bold()
    );
    println!("   {:<18} {}", "Open Roles:", m.open_roles.to_string().yellow());
    println!(
        "   {:<18} {} ({})",
        "Closed Roles:",
        m.closed_roles.to_string().green(),
        format_percent(m.fill_rate)
    );
    println!(
        "   {:<18} {}",
        "Avg Cost/Role:",
        format_thousands(m.avg_cost_per_role).bold()
    );
    if m.source == CountSource::Summary {
        println!("   {}", "(counts from summary sheet)".dimmed());
    }
}

fn print_areas(areas: &[AreaBreakdown]) {
    println!("{}", "🎯 Technology Areas:".bold().cyan());
    println!(
        "   {:<28} {:<20} {:>6} {:>6} {:>7} {:>14} {:>12} {:>8}",
        "Area", "Leader", "Roles", "Open", "Closed", "Investment", "Avg/Role", "Close %"
    );
    for a in areas {
        println!(
            "   {:<28} {:<20} {:>6} {:>6} {:>7} {:>14} {:>12} {:>8}",
            truncate(&a.technology_area, 28),
            truncate(&a.leader, 20),
            a.new_roles,
            a.open_roles,
            a.closed_roles,
            format_currency(a.estimated_investment),
            format_currency(a.avg_cost_per_role),
            format_percent(a.close_rate)
        );
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

/// Execute the roles command
pub fn roles(
    workbook: PathBuf,
    config: &DashboardConfig,
    filter: RoleFilter,
    format: OutputFormat,
    verbose: bool,
) -> StaffingResult<()> {
    if format != OutputFormat::Text {
        let snapshot = StaffingSnapshot::load(&workbook, &config.layout)?;
        let roles = filter.apply(&snapshot.detailed);
        let output = RolesOutput {
            counts: RoleCounts::from_rows(&roles),
            roles,
        };
        return emit(&output, format);
    }

    println!("{}", "📋 Staffing Dashboard - Detailed Roles".bold().green());
    println!("   Workbook: {}\n", workbook.display());

    let snapshot = load(&workbook, config, verbose)?;
    if snapshot.detailed.is_empty() {
        println!("{}", "No detailed roles data available.".yellow());
        return Ok(());
    }

    let roles = filter.apply(&snapshot.detailed);
    let counts = RoleCounts::from_rows(&roles);

    println!(
        "   Filtered Roles: {}   Open: {}   Closed: {}\n",
        counts.total.to_string().bold(),
        counts.open.to_string().yellow(),
        counts.closed.to_string().green()
    );
    println!(
        "   {:<24} {:<22} {:<10} {:<12} {:<12} {:<20}",
        "Technology Area", "Team", "Status", "Target Start", "Actual Start", "Hiring Manager"
    );
    for r in &roles {
        let status = if r.is_closed() {
            r.status.green()
        } else {
            r.status.normal()
        };
        println!(
            "   {:<24} {:<22} {:<10} {:<12} {:<12} {:<20}",
            truncate(&r.technology_area, 24),
            truncate(&r.team_name, 22),
            status,
            r.target_start_date.display(),
            r.actual_start_date.display(),
            truncate(&r.hiring_manager, 20)
        );
    }
    Ok(())
}

/// Build a role filter from repeated/comma-separated CLI selections
pub fn role_filter(status: Vec<String>, tech: Vec<String>, team: Vec<String>) -> RoleFilter {
    RoleFilter {
        status: FilterSet::from_selection(status),
        technology_area: FilterSet::from_selection(tech),
        team: FilterSet::from_selection(team),
    }
}

/// Execute the snapshot command: write normalized rows and metrics for
/// presentation tooling (.json or .yaml, chosen by extension)
pub fn snapshot(workbook: PathBuf, config: &DashboardConfig, output: PathBuf) -> StaffingResult<()> {
    println!("{}", "💾 Staffing Dashboard - Snapshot".bold().green());
    println!("   Input:  {}", workbook.display());
    println!("   Output: {}\n", output.display());

    let extension = output
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let json = match extension.as_deref() {
        Some("json") => true,
        Some("yaml") | Some("yml") => false,
        _ => {
            return Err(StaffingError::Validation(format!(
                "Unsupported snapshot format for {} (use .json or .yaml)",
                output.display()
            )))
        }
    };

    let snapshot = StaffingSnapshot::load(&workbook, &config.layout)?;
    let content = if json {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        serde_yaml::to_string(&snapshot)?
    };
    fs::write(&output, content)?;

    println!("{}", "✅ Snapshot written".bold().green());
    Ok(())
}

/// Execute the export command
pub fn export(
    workbook: PathBuf,
    config: &DashboardConfig,
    out_dir: PathBuf,
    verbose: bool,
) -> StaffingResult<()> {
    println!("{}", "📥 Staffing Dashboard - Excel Export".bold().green());
    println!("   Input:  {}", workbook.display());
    println!("   Output: {}\n", out_dir.display());

    let snapshot = load(&workbook, config, verbose)?;

    if !out_dir.exists() {
        fs::create_dir_all(&out_dir)?;
    }

    let today = chrono::Local::now().date_naive();
    let written = ExcelExporter::new(&snapshot).export_all(&out_dir, today)?;

    println!("{}", "✅ Export Complete!".bold().green());
    for path in &written {
        println!("   {}", path.display());
    }
    if snapshot.detailed.is_empty() {
        println!("{}", "   (no detailed roles to export)".yellow());
    }
    Ok(())
}

/// Execute the report command
pub fn report(workbook: PathBuf, config: &DashboardConfig, verbose: bool) -> StaffingResult<()> {
    println!("{}", "📄 Staffing Dashboard - Summary Report".bold().green());
    println!("   Workbook: {}\n", workbook.display());

    let snapshot = load(&workbook, config, verbose)?;
    for line in summary_report(&snapshot).lines() {
        println!("   - {}", line);
    }
    Ok(())
}

/// Execute the watch command
pub fn watch(workbook: PathBuf, config: &DashboardConfig, verbose: bool) -> StaffingResult<()> {
    println!("{}", "👁️  Staffing Dashboard - Watch Mode".bold().green());
    println!("   Watching: {}", workbook.display());
    println!("   Press {} to stop\n", "Ctrl+C".bold().yellow());

    if !workbook.exists() {
        return Err(StaffingError::Validation(format!(
            "File not found: {}",
            workbook.display()
        )));
    }

    let canonical_path = workbook.canonicalize()?;
    let parent_dir = canonical_path
        .parent()
        .ok_or_else(|| StaffingError::Validation("Cannot determine parent directory".to_string()))?;

    let (tx, rx) = channel();

    // Excel writes through temp files; wait for the save to settle
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)
        .map_err(|e| StaffingError::Validation(format!("Failed to create file watcher: {}", e)))?;

    debouncer
        .watcher()
        .watch(parent_dir, RecursiveMode::NonRecursive)
        .map_err(|e| StaffingError::Validation(format!("Failed to watch directory: {}", e)))?;

    if verbose {
        println!("   {} {}", "Watching directory:".cyan(), parent_dir.display());
    }

    println!("{}", "🔄 Initial load...".cyan());
    run_watch_action(&workbook, config);
    println!();

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events.iter().any(|event| {
                    event.kind == DebouncedEventKind::Any
                        && event.path.file_name() == canonical_path.file_name()
                });

                if relevant {
                    println!(
                        "\n{} {}",
                        "🔄 Change detected at".cyan(),
                        chrono::Local::now().format("%H:%M:%S").to_string().cyan()
                    );
                    run_watch_action(&workbook, config);
                    println!();
                }
            }
            Ok(Err(error)) => {
                eprintln!("{} Watch error: {}", "❌".red(), error);
            }
            Err(e) => {
                eprintln!("{} Channel error: {}", "❌".red(), e);
                break;
            }
        }
    }

    Ok(())
}

/// Reload and print metrics; failures are reported and watching continues
fn run_watch_action(workbook: &Path, config: &DashboardConfig) {
    match StaffingSnapshot::load(workbook, &config.layout) {
        Ok(snapshot) => print_metrics(&snapshot),
        Err(e) => {
            println!("{} {}", "❌ Load failed:".bold().red(), e);
            if let Some(hint) = e.hint() {
                println!("   {}", hint.yellow());
            }
        }
    }
}
