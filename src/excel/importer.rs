//! Excel importer implementation - staffing workbook (.xlsx) → raw sheets

use crate::config::SheetLayout;
use crate::core::raw::{normalize_header, RawCell, RawRow, RawSheet, RawWorkbook};
use crate::error::{StaffingError, StaffingResult};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use chrono::{NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Reads the summary and detailed sheets of a staffing workbook
pub struct ExcelImporter {
    path: PathBuf,
    layout: SheetLayout,
}

impl ExcelImporter {
    /// Create an importer using the default sheet layout
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            layout: SheetLayout::default(),
        }
    }

    pub fn with_layout(mut self, layout: SheetLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Open the workbook and read both sheets at their header offsets.
    ///
    /// Fails when the file cannot be opened or has no summary sheet. A missing
    /// detailed sheet is tolerated: metrics then come from the summary sheet.
    pub fn import(&self) -> StaffingResult<RawWorkbook> {
        let mut workbook: Xlsx<_> = open_workbook(&self.path).map_err(|e| {
            StaffingError::Workbook(format!("{}: {}", self.path.display(), e))
        })?;

        let sheet_names = workbook.sheet_names().to_vec();
        debug!(path = %self.path.display(), sheets = ?sheet_names, "workbook opened");

        let summary_name = &self.layout.summary_sheet;
        if !sheet_names.iter().any(|s| s == summary_name) {
            return Err(StaffingError::MissingSheet(summary_name.clone()));
        }
        let range = workbook
            .worksheet_range(summary_name)
            .map_err(|e| StaffingError::Workbook(format!("{}: {}", summary_name, e)))?;
        let summary = read_sheet(summary_name, &range, self.layout.summary_header_row);

        let detailed_name = &self.layout.detailed_sheet;
        let detailed = if sheet_names.iter().any(|s| s == detailed_name) {
            let range = workbook
                .worksheet_range(detailed_name)
                .map_err(|e| StaffingError::Workbook(format!("{}: {}", detailed_name, e)))?;
            Some(read_sheet(detailed_name, &range, self.layout.detailed_header_row))
        } else {
            warn!(sheet = %detailed_name, "detailed sheet not found; using summary counts");
            None
        };

        Ok(RawWorkbook { summary, detailed })
    }
}

/// Read one sheet whose header sits on absolute row `header_row`.
///
/// Columns with a blank header are ignored, as are rows with no content.
fn read_sheet(name: &str, range: &Range<Data>, header_row: u32) -> RawSheet {
    let mut sheet = RawSheet {
        name: name.to_string(),
        ..Default::default()
    };

    let (Some((_, start_col)), Some((end_row, end_col))) = (range.start(), range.end()) else {
        return sheet;
    };

    let columns: Vec<(u32, String)> = (start_col..=end_col)
        .filter_map(|col| {
            let header = range
                .get_value((header_row, col))
                .map(|cell| normalize_header(&to_raw_cell(cell).as_text()))
                .unwrap_or_default();
            (!header.is_empty()).then_some((col, header))
        })
        .collect();
    sheet.headers = columns.iter().map(|(_, h)| h.clone()).collect();

    for row_idx in header_row.saturating_add(1)..=end_row {
        let mut row = RawRow::new();
        for (col, header) in &columns {
            let cell = range
                .get_value((row_idx, *col))
                .map(to_raw_cell)
                .unwrap_or(RawCell::Empty);
            row.insert(header, cell);
        }
        if !row.is_empty() {
            sheet.rows.push(row);
        }
    }

    debug!(sheet = name, columns = sheet.headers.len(), rows = sheet.rows.len(), "sheet read");
    sheet
}

/// Convert a calamine cell to a raw cell
fn to_raw_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Float(f) => RawCell::Number(*f),
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Bool(b) => RawCell::Bool(*b),
        // Honours the workbook's 1900/1904 date system
        Data::DateTime(dt) if !dt.is_duration() => dt
            .as_datetime()
            .map(RawCell::DateTime)
            .unwrap_or(RawCell::Number(dt.as_f64())),
        Data::DateTime(dt) => RawCell::Number(dt.as_f64()),
        Data::DateTimeIso(s) => parse_iso(s)
            .map(RawCell::DateTime)
            .unwrap_or_else(|| RawCell::Text(s.clone())),
        Data::DurationIso(s) => RawCell::Text(s.clone()),
        // Error cells (#N/A, #DIV/0!) carry no value
        Data::Error(_) | Data::Empty => RawCell::Empty,
    }
}

fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{CellErrorType, ExcelDateTime, ExcelDateTimeType};

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    #[test]
    fn test_to_raw_cell() {
        assert_eq!(to_raw_cell(&Data::Int(3)), RawCell::Number(3.0));
        assert_eq!(to_raw_cell(&Data::Float(2.5)), RawCell::Number(2.5));
        assert_eq!(to_raw_cell(&text("Cloud")), RawCell::Text("Cloud".to_string()));
        assert_eq!(to_raw_cell(&Data::Bool(true)), RawCell::Bool(true));
        assert_eq!(to_raw_cell(&Data::Empty), RawCell::Empty);
        assert_eq!(to_raw_cell(&Data::Error(CellErrorType::NA)), RawCell::Empty);
    }

    #[test]
    fn test_iso_datetime_cell() {
        let cell = to_raw_cell(&Data::DateTimeIso("2026-04-15T00:00:00".to_string()));
        match cell {
            RawCell::DateTime(dt) => {
                assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2026, 4, 15).unwrap())
            }
            other => panic!("Expected DateTime, got {:?}", other),
        }
    }

    fn date_of(cell: RawCell) -> NaiveDate {
        match cell {
            RawCell::DateTime(dt) => dt.date(),
            other => panic!("Expected DateTime, got {:?}", other),
        }
    }

    #[test]
    fn test_serial_datetime_cell_1900_system() {
        let serial = ExcelDateTime::new(46023.0, ExcelDateTimeType::DateTime, false);
        assert_eq!(
            date_of(to_raw_cell(&Data::DateTime(serial))),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_serial_datetime_cell_1904_system() {
        // 1904-based serials are 1462 days smaller for the same date
        let serial = ExcelDateTime::new(44561.0, ExcelDateTimeType::DateTime, true);
        assert_eq!(
            date_of(to_raw_cell(&Data::DateTime(serial))),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_duration_cell_stays_numeric() {
        let duration = ExcelDateTime::new(1.5, ExcelDateTimeType::TimeDelta, false);
        assert_eq!(to_raw_cell(&Data::DateTime(duration)), RawCell::Number(1.5));
    }

    #[test]
    fn test_read_sheet_uses_header_row() {
        // Row 0: title, row 1: header, rows 2-3: data, row 4: blank
        let mut range: Range<Data> = Range::new((0, 0), (4, 2));
        range.set_value((0, 0), text("Global Technology 2026"));
        range.set_value((1, 0), text("#"));
        range.set_value((1, 1), text("Technology \nArea"));
        range.set_value((2, 0), Data::Float(1.0));
        range.set_value((2, 1), text("Cloud"));
        range.set_value((3, 0), Data::Float(2.0));
        range.set_value((3, 1), text("Data"));

        let sheet = read_sheet("Summary", &range, 1);
        assert_eq!(sheet.headers, vec!["#", "Technology Area"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(
            sheet.rows[1].get("Technology Area"),
            &RawCell::Text("Data".to_string())
        );
    }

    #[test]
    fn test_read_sheet_header_beyond_range() {
        let mut range: Range<Data> = Range::new((0, 0), (0, 1));
        range.set_value((0, 0), text("only row"));
        let sheet = read_sheet("Tiny", &range, 5);
        assert!(sheet.headers.is_empty());
        assert!(sheet.rows.is_empty());
    }

    #[test]
    fn test_import_missing_file() {
        let importer = ExcelImporter::new("does/not/exist.xlsx");
        let result = importer.import();
        assert!(matches!(result, Err(StaffingError::Workbook(_))));
    }
}
