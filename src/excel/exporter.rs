//! Excel exporter implementation - normalized rows → styled .xlsx

use crate::core::normalize::{detailed_columns as dc, summary_columns as sc};
use crate::error::{StaffingError, StaffingResult};
use crate::snapshot::StaffingSnapshot;
use crate::types::{DateField, DetailedRoleRow, SummaryRow};
use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Brand green used for header fills
const HEADER_FILL: u32 = 0x00A84F;
const MAX_COLUMN_WIDTH: usize = 50;

/// Columns kept out of every export
pub const HIDDEN_COLUMNS: &[&str] = &["Est. Blended Hourly Rate", "Est. Forecast"];

pub const SUMMARY_SHEET: &str = "Summary";
pub const DETAILED_SHEET: &str = "Detailed Roles";

/// A single exported cell
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Blank,
    Text(String),
    Number(f64),
    Currency(f64),
    Date(NaiveDate),
}

impl Cell {
    fn display_len(&self) -> usize {
        match self {
            Cell::Blank => 0,
            Cell::Text(s) => s.chars().count(),
            Cell::Number(n) => n.to_string().len(),
            Cell::Currency(n) => format!("${:.0}", n).len(),
            // mm/dd/yyyy
            Cell::Date(_) => 10,
        }
    }
}

fn date_cell(field: &DateField) -> Cell {
    match field {
        DateField::Date(d) => Cell::Date(*d),
        DateField::Missing => Cell::Blank,
        DateField::NotADate(s) => Cell::Text(s.clone()),
    }
}

/// A sheet ready to be written: header row plus data rows
struct Table {
    name: &'static str,
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    fn summary(rows: &[SummaryRow]) -> Self {
        let headers = sc::ALL.iter().map(|s| s.to_string()).collect();
        let rows = rows
            .iter()
            .map(|r| {
                vec![
                    r.sequence_number
                        .map(|n| Cell::Number(n as f64))
                        .unwrap_or(Cell::Blank),
                    Cell::Text(r.technology_area.clone()),
                    Cell::Text(r.leader.clone()),
                    Cell::Number(r.new_roles_count as f64),
                    Cell::Currency(r.estimated_investment),
                    Cell::Number(r.open_roles_count as f64),
                    Cell::Number(r.closed_roles_count as f64),
                ]
            })
            .collect();
        Self {
            name: SUMMARY_SHEET,
            headers,
            rows,
        }
    }

    fn detailed(rows: &[DetailedRoleRow]) -> Self {
        let extra_columns: BTreeSet<&str> = rows
            .iter()
            .flat_map(|r| r.extra.keys().map(String::as_str))
            .filter(|k| !HIDDEN_COLUMNS.contains(k))
            .collect();

        let headers = dc::ALL
            .iter()
            .copied()
            .chain(extra_columns.iter().copied())
            .map(str::to_string)
            .collect();

        let rows = rows
            .iter()
            .map(|r| {
                let mut cells = vec![
                    Cell::Text(r.technology_area.clone()),
                    Cell::Text(r.team_name.clone()),
                    Cell::Text(r.worker_type.clone()),
                    Cell::Text(r.req_id.clone()),
                    Cell::Text(r.recruitment_status.clone()),
                    Cell::Text(r.location.clone()),
                    Cell::Text(r.senior_leader.clone()),
                    Cell::Text(r.hiring_manager.clone()),
                    date_cell(&r.target_start_date),
                    date_cell(&r.target_end_date),
                    date_cell(&r.actual_start_date),
                    date_cell(&r.actual_end_date),
                    Cell::Text(r.status.clone()),
                    Cell::Text(r.comment.clone()),
                ];
                cells.extend(extra_columns.iter().map(|col| {
                    r.extra
                        .get(*col)
                        .map(|v| Cell::Text(v.clone()))
                        .unwrap_or(Cell::Blank)
                }));
                cells
            })
            .collect();

        Self {
            name: DETAILED_SHEET,
            headers,
            rows,
        }
    }

    /// Widest entry per column plus padding, capped
    fn column_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let longest = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(Cell::display_len)
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0);
                (longest + 2).min(MAX_COLUMN_WIDTH)
            })
            .collect()
    }
}

struct Formats {
    header: Format,
    text: Format,
    number: Format,
    currency: Format,
    date: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_font_size(12)
                .set_font_color(0xFFFFFF)
                .set_background_color(HEADER_FILL)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin),
            text: Format::new().set_border(FormatBorder::Thin),
            number: Format::new().set_border(FormatBorder::Thin),
            currency: Format::new()
                .set_num_format("$#,##0")
                .set_border(FormatBorder::Thin),
            date: Format::new()
                .set_num_format("mm/dd/yyyy")
                .set_border(FormatBorder::Thin),
        }
    }
}

/// Styled spreadsheet re-export of a snapshot
pub struct ExcelExporter<'a> {
    snapshot: &'a StaffingSnapshot,
}

impl<'a> ExcelExporter<'a> {
    pub fn new(snapshot: &'a StaffingSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn summary_workbook(&self) -> StaffingResult<Workbook> {
        build_workbook(&Table::summary(&self.snapshot.summary))
    }

    pub fn detailed_workbook(&self) -> StaffingResult<Workbook> {
        build_workbook(&Table::detailed(&self.snapshot.detailed))
    }

    pub fn export_summary(&self, output_path: &Path) -> StaffingResult<()> {
        save(self.summary_workbook()?, output_path)
    }

    pub fn export_detailed(&self, output_path: &Path) -> StaffingResult<()> {
        save(self.detailed_workbook()?, output_path)
    }

    /// Summary workbook as bytes (for downloads)
    pub fn summary_bytes(&self) -> StaffingResult<Vec<u8>> {
        to_bytes(self.summary_workbook()?)
    }

    pub fn detailed_bytes(&self) -> StaffingResult<Vec<u8>> {
        to_bytes(self.detailed_workbook()?)
    }

    /// Write both exports into `out_dir` with dated default names. The
    /// detailed export is skipped when the snapshot has no detailed rows.
    pub fn export_all(&self, out_dir: &Path, date: NaiveDate) -> StaffingResult<Vec<PathBuf>> {
        let mut written = Vec::new();

        let summary_path = out_dir.join(summary_file_name(date));
        self.export_summary(&summary_path)?;
        written.push(summary_path);

        if !self.snapshot.detailed.is_empty() {
            let detailed_path = out_dir.join(detailed_file_name(date));
            self.export_detailed(&detailed_path)?;
            written.push(detailed_path);
        }

        Ok(written)
    }
}

pub fn summary_file_name(date: NaiveDate) -> String {
    format!("tech_staffing_summary_{}.xlsx", date.format("%Y%m%d"))
}

pub fn detailed_file_name(date: NaiveDate) -> String {
    format!("tech_staffing_detailed_{}.xlsx", date.format("%Y%m%d"))
}

fn save(mut workbook: Workbook, output_path: &Path) -> StaffingResult<()> {
    workbook
        .save(output_path)
        .map_err(|e| StaffingError::Export(format!("Failed to save Excel file: {}", e)))
}

fn to_bytes(mut workbook: Workbook) -> StaffingResult<Vec<u8>> {
    workbook
        .save_to_buffer()
        .map_err(|e| StaffingError::Export(format!("Failed to build Excel file: {}", e)))
}

fn build_workbook(table: &Table) -> StaffingResult<Workbook> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(table.name)
        .map_err(|e| StaffingError::Export(format!("Failed to set worksheet name: {}", e)))?;
    write_table(worksheet, table)?;
    Ok(workbook)
}

fn write_table(worksheet: &mut Worksheet, table: &Table) -> StaffingResult<()> {
    let formats = Formats::new();

    for (col, header) in table.headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, header, &formats.header)
            .map_err(|e| StaffingError::Export(format!("Failed to write header: {}", e)))?;
    }

    for (idx, row) in table.rows.iter().enumerate() {
        let excel_row = (idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            write_cell(worksheet, excel_row, col as u16, cell, &formats)?;
        }
    }

    if !table.headers.is_empty() {
        let last_col = (table.headers.len() - 1) as u16;
        worksheet
            .autofilter(0, 0, table.rows.len() as u32, last_col)
            .map_err(|e| StaffingError::Export(format!("Failed to set autofilter: {}", e)))?;
    }

    for (col, width) in table.column_widths().into_iter().enumerate() {
        worksheet
            .set_column_width(col as u16, width as f64)
            .map_err(|e| StaffingError::Export(format!("Failed to set column width: {}", e)))?;
    }

    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    formats: &Formats,
) -> StaffingResult<()> {
    let result = match cell {
        Cell::Blank => worksheet.write_blank(row, col, &formats.text),
        Cell::Text(s) => worksheet.write_string_with_format(row, col, s, &formats.text),
        Cell::Number(n) => worksheet.write_number_with_format(row, col, *n, &formats.number),
        Cell::Currency(n) => worksheet.write_number_with_format(row, col, *n, &formats.currency),
        Cell::Date(d) => match excel_date(*d) {
            Some(datetime) => worksheet.write_datetime_with_format(row, col, &datetime, &formats.date),
            // Outside Excel's 1900-9999 range; keep the value readable
            None => worksheet.write_string_with_format(
                row,
                col,
                d.format("%m/%d/%Y").to_string(),
                &formats.text,
            ),
        },
    };
    result
        .map(|_| ())
        .map_err(|e| StaffingError::Export(format!("Failed to write cell ({}, {}): {}", row, col, e)))
}

fn excel_date(date: NaiveDate) -> Option<ExcelDateTime> {
    let year = u16::try_from(date.year()).ok()?;
    ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn role_with_extra() -> DetailedRoleRow {
        let mut extra = BTreeMap::new();
        extra.insert("Est. Forecast".to_string(), "1200".to_string());
        extra.insert("Cost Center".to_string(), "CC-42".to_string());
        DetailedRoleRow {
            technology_area: "Cloud".to_string(),
            status: "Open".to_string(),
            target_start_date: DateField::Date(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()),
            extra,
            ..Default::default()
        }
    }

    #[test]
    fn test_detailed_table_drops_hidden_columns() {
        let table = Table::detailed(&[role_with_extra()]);
        assert!(table.headers.contains(&"Cost Center".to_string()));
        assert!(!table.headers.iter().any(|h| h == "Est. Forecast"));
        assert_eq!(table.headers.len(), table.rows[0].len());
    }

    #[test]
    fn test_date_cells() {
        let table = Table::detailed(&[role_with_extra()]);
        let idx = table
            .headers
            .iter()
            .position(|h| h == "Target Start Date")
            .unwrap();
        assert_eq!(
            table.rows[0][idx],
            Cell::Date(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap())
        );
    }

    #[test]
    fn test_excel_date_range() {
        assert!(excel_date(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()).is_some());
        assert!(excel_date(NaiveDate::from_ymd_opt(226, 3, 1).unwrap()).is_none());
    }

    #[test]
    fn test_out_of_range_date_does_not_fail_export() {
        let mut typo = role_with_extra();
        typo.target_start_date = DateField::Date(NaiveDate::from_ymd_opt(226, 3, 1).unwrap());
        let snapshot = StaffingSnapshot::from_rows("plan.xlsx", vec![], vec![typo]);

        let bytes = ExcelExporter::new(&snapshot).detailed_bytes().unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_column_width_is_capped() {
        let table = Table {
            name: SUMMARY_SHEET,
            headers: vec!["Comment".to_string(), "#".to_string()],
            rows: vec![vec![Cell::Text("x".repeat(200)), Cell::Number(1.0)]],
        };
        assert_eq!(table.column_widths(), vec![50, 3]);
    }

    #[test]
    fn test_file_names() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 12).unwrap();
        assert_eq!(summary_file_name(date), "tech_staffing_summary_20260112.xlsx");
        assert_eq!(detailed_file_name(date), "tech_staffing_detailed_20260112.xlsx");
    }
}
