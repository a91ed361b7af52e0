//! Excel import/export tests against workbooks built on disk

mod common;

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use staffing_dashboard::config::SheetLayout;
use staffing_dashboard::error::StaffingError;
use staffing_dashboard::excel::{
    detailed_file_name, summary_file_name, ExcelExporter, ExcelImporter, DETAILED_SHEET,
    SUMMARY_SHEET,
};
use staffing_dashboard::{CountSource, DateField, StaffingSnapshot};
use tempfile::TempDir;

fn load(dir: &TempDir) -> StaffingSnapshot {
    let path = common::write_staffing_workbook(dir.path());
    StaffingSnapshot::load(&path, &SheetLayout::default()).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// IMPORTER
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_import_reads_headers_at_layout_offsets() {
    let dir = TempDir::new().unwrap();
    let path = common::write_staffing_workbook(dir.path());

    let raw = ExcelImporter::new(&path).import().unwrap();
    assert_eq!(raw.summary.headers[0], "#");
    assert_eq!(raw.summary.headers.len(), 7);

    let detailed = raw.detailed.expect("detailed sheet present");
    assert!(detailed.headers.contains(&"TEAM NAME".to_string()));
    assert!(detailed.missing_columns(&["Technology Area", "TEAM NAME", "Status"]).is_empty());
}

#[test]
fn test_import_missing_file() {
    let result = ExcelImporter::new("/nonexistent/staffing.xlsx").import();
    assert!(matches!(result, Err(StaffingError::Workbook(_))));
}

#[test]
fn test_import_missing_summary_sheet() {
    let dir = TempDir::new().unwrap();
    let path = common::write_unrelated_workbook(dir.path());

    match ExcelImporter::new(&path).import() {
        Err(StaffingError::MissingSheet(name)) => assert_eq!(name, common::SUMMARY_SHEET),
        other => panic!("expected MissingSheet, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_import_custom_layout_sheet_name() {
    let dir = TempDir::new().unwrap();
    let path = common::write_unrelated_workbook(dir.path());
    let layout = SheetLayout {
        summary_sheet: "Budget".to_string(),
        ..Default::default()
    };

    let raw = ExcelImporter::new(&path).with_layout(layout).import().unwrap();
    assert_eq!(raw.summary.name, "Budget");
    assert!(raw.detailed.is_none());
}

// ═══════════════════════════════════════════════════════════════════════════
// SNAPSHOT LOAD
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_load_summary_rows() {
    let dir = TempDir::new().unwrap();
    let snapshot = load(&dir);

    // Footer row without "#" is dropped
    assert_eq!(snapshot.summary.len(), 2);
    let cloud = &snapshot.summary[0];
    assert_eq!(cloud.sequence_number, Some(1));
    assert_eq!(cloud.technology_area, "Cloud");
    assert_eq!(cloud.leader, "Alice");
    assert_eq!(cloud.new_roles_count, 10);
    assert_eq!(cloud.estimated_investment, 1_000_000.0);

    // "N/A" investment coerces to 0
    assert_eq!(snapshot.summary[1].estimated_investment, 0.0);
}

#[test]
fn test_load_detailed_rows() {
    let dir = TempDir::new().unwrap();
    let snapshot = load(&dir);

    // Padding row without a technology area is dropped
    assert_eq!(snapshot.detailed.len(), 4);

    let r1 = &snapshot.detailed[0];
    assert_eq!(r1.req_id, "R-1");
    assert_eq!(r1.team_name, "Platform");
    assert_eq!(
        r1.target_start_date,
        DateField::Date(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap())
    );
    assert_eq!(
        r1.actual_start_date,
        DateField::Date(NaiveDate::from_ymd_opt(2026, 1, 20).unwrap())
    );
    assert_eq!(r1.target_end_date, DateField::Missing);
    assert_eq!(r1.extra.get("Est. Forecast").map(String::as_str), Some("120000"));

    assert_eq!(
        snapshot.detailed[1].target_start_date,
        DateField::NotADate("TBD".to_string())
    );
    assert_eq!(
        snapshot.detailed[2].target_start_date,
        DateField::Date(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap())
    );
}

#[test]
fn test_load_metrics_from_detailed_sheet() {
    let dir = TempDir::new().unwrap();
    let m = load(&dir).metrics;

    assert_eq!(m.source, CountSource::Detailed);
    assert_eq!(m.total_roles, 4);
    // Blank status counts as open
    assert_eq!(m.open_roles, 3);
    assert_eq!(m.closed_roles, 1);
    assert_eq!(m.total_investment, 1_000_000.0);
    assert_eq!(m.fill_rate, 25.0);
    assert_eq!(m.avg_cost_per_role, 250_000.0);
}

#[test]
fn test_load_without_detailed_sheet_uses_summary_counts() {
    let dir = TempDir::new().unwrap();
    let path = common::write_summary_only_workbook(dir.path());
    let snapshot = StaffingSnapshot::load(&path, &SheetLayout::default()).unwrap();

    assert!(snapshot.detailed.is_empty());
    let m = &snapshot.metrics;
    assert_eq!(m.source, CountSource::Summary);
    assert_eq!(m.total_roles, 15);
    assert_eq!(m.open_roles, 7);
    assert_eq!(m.closed_roles, 8);
}

#[test]
fn test_load_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = common::write_staffing_workbook(dir.path());
    let first = StaffingSnapshot::load(&path, &SheetLayout::default()).unwrap();
    let second = StaffingSnapshot::load(&path, &SheetLayout::default()).unwrap();
    assert_eq!(first, second);
}

// ═══════════════════════════════════════════════════════════════════════════
// EXPORTER
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_file_names_are_dated() {
    let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
    assert_eq!(summary_file_name(date), "tech_staffing_summary_20260105.xlsx");
    assert_eq!(detailed_file_name(date), "tech_staffing_detailed_20260105.xlsx");
}

#[test]
fn test_export_all_writes_both_files() {
    let dir = TempDir::new().unwrap();
    let snapshot = load(&dir);
    let out = dir.path().join("out");
    std::fs::create_dir(&out).unwrap();

    let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
    let written = ExcelExporter::new(&snapshot).export_all(&out, date).unwrap();

    assert_eq!(written.len(), 2);
    assert!(written.iter().all(|p| p.exists()));
}

#[test]
fn test_export_all_skips_empty_detailed() {
    let dir = TempDir::new().unwrap();
    let path = common::write_summary_only_workbook(dir.path());
    let snapshot = StaffingSnapshot::load(&path, &SheetLayout::default()).unwrap();

    let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
    let written = ExcelExporter::new(&snapshot)
        .export_all(dir.path(), date)
        .unwrap();

    assert_eq!(written, vec![dir.path().join(summary_file_name(date))]);
}

#[test]
fn test_exported_summary_is_readable() {
    let dir = TempDir::new().unwrap();
    let snapshot = load(&dir);
    let out = dir.path().join("summary.xlsx");
    ExcelExporter::new(&snapshot).export_summary(&out).unwrap();

    let mut workbook: Xlsx<_> = open_workbook(&out).unwrap();
    assert_eq!(workbook.sheet_names(), vec![SUMMARY_SHEET.to_string()]);

    let range = workbook.worksheet_range(SUMMARY_SHEET).unwrap();
    assert_eq!(range.get_value((0, 1)), Some(&Data::String("Technology Area".to_string())));
    assert_eq!(range.get_value((1, 1)), Some(&Data::String("Cloud".to_string())));
    assert_eq!(range.get_value((1, 4)), Some(&Data::Float(1_000_000.0)));
    // Header + two areas
    assert_eq!(range.height(), 3);
}

#[test]
fn test_exported_detailed_drops_hidden_columns() {
    let dir = TempDir::new().unwrap();
    let snapshot = load(&dir);
    let out = dir.path().join("detailed.xlsx");
    ExcelExporter::new(&snapshot).export_detailed(&out).unwrap();

    let mut workbook: Xlsx<_> = open_workbook(&out).unwrap();
    let range = workbook.worksheet_range(DETAILED_SHEET).unwrap();

    let headers: Vec<String> = range
        .rows()
        .next()
        .unwrap()
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert!(headers.contains(&"TEAM NAME".to_string()));
    assert!(!headers.contains(&"Est. Forecast".to_string()));
    assert_eq!(range.height(), 5);
}

#[test]
fn test_export_bytes_match_xlsx_signature() {
    let dir = TempDir::new().unwrap();
    let snapshot = load(&dir);
    let bytes = ExcelExporter::new(&snapshot).summary_bytes().unwrap();
    // xlsx is a zip archive
    assert_eq!(&bytes[..2], b"PK");
}
