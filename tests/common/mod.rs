//! Shared fixtures: small staffing workbooks written with rust_xlsxwriter
//!
//! Layout mirrors the real workbook: a title row above the summary header,
//! and a title plus a note row above the detailed header.

#![allow(dead_code)]

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};
use std::path::{Path, PathBuf};

pub const SUMMARY_SHEET: &str = "Technology Staffing Summary";
pub const DETAILED_SHEET: &str = "Detailed 2026 Staffing Plans";

const DETAILED_HEADERS: &[&str] = &[
    "Technology Area",
    "TEAM  NAME", // double space, collapsed on import
    "Worker Type",
    "Req ID",
    "Recruitment Status",
    "Location",
    "Senior Leader",
    "Hiring Manager",
    "Target Start Date",
    "Target End Date",
    "Actual Start",
    "Actual End Date",
    "Status",
    "Comment",
    "Est. Forecast",
];

fn write_summary(sheet: &mut Worksheet) {
    sheet.set_name(SUMMARY_SHEET).unwrap();
    sheet.write_string(0, 0, "2026 Technology Staffing").unwrap();

    let headers = [
        "#",
        "Technology Area",
        "Leaders",
        "# of New Roles",
        "Est. Investment",
        "Open Roles",
        "Closed Roles",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(1, col as u16, *header).unwrap();
    }

    // 1 | Cloud | Alice | 10 | 1,000,000 | 4 | 6
    sheet.write_number(2, 0, 1).unwrap();
    sheet.write_string(2, 1, "Cloud").unwrap();
    sheet.write_string(2, 2, "Alice").unwrap();
    sheet.write_number(2, 3, 10).unwrap();
    sheet.write_number(2, 4, 1_000_000).unwrap();
    sheet.write_number(2, 5, 4).unwrap();
    sheet.write_number(2, 6, 6).unwrap();

    // 2 | Data | Bob | 5 | N/A | 3 | 2
    sheet.write_number(3, 0, 2).unwrap();
    sheet.write_string(3, 1, "Data").unwrap();
    sheet.write_string(3, 2, "Bob").unwrap();
    sheet.write_number(3, 3, 5).unwrap();
    sheet.write_string(3, 4, "N/A").unwrap();
    sheet.write_number(3, 5, 3).unwrap();
    sheet.write_number(3, 6, 2).unwrap();

    // Footer without a sequence number
    sheet.write_string(4, 1, "Total").unwrap();
    sheet.write_number(4, 3, 15).unwrap();
    sheet.write_number(4, 4, 1_000_000).unwrap();
}

fn write_detailed(sheet: &mut Worksheet) {
    sheet.set_name(DETAILED_SHEET).unwrap();
    sheet.write_string(0, 0, "Detailed 2026 Staffing Plans").unwrap();
    sheet.write_string(1, 0, "Updated weekly").unwrap();
    for (col, header) in DETAILED_HEADERS.iter().enumerate() {
        sheet.write_string(2, col as u16, *header).unwrap();
    }

    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let rows: [[&str; 15]; 5] = [
        [
            "Cloud", "Platform", "FTE", "R-1", "Offer Accepted", "Remote", "Alice", "Carol",
            "2026-02-01", "", "", "", "Closed", "Filled early", "120000",
        ],
        [
            "Cloud", "Platform", "Contractor", "R-2", "Sourcing", "NYC", "Alice", "Carol",
            "TBD", "", "", "", "Open", "", "95000",
        ],
        [
            "Data", "BI", "FTE", "R-3", "Interviewing", "Toronto", "Bob", "Dan",
            "03/15/2026", "", "", "", "Open", "", "",
        ],
        [
            "Data", "ML", "FTE", "R-4", "", "Remote", "Bob", "Erin", "", "", "", "", "", "", "",
        ],
        // Padding row without a technology area
        [
            "", "Orphan", "", "", "", "", "", "", "", "", "", "", "Closed", "", "",
        ],
    ];

    for (i, row) in rows.iter().enumerate() {
        let r = 3 + i as u32;
        for (col, value) in row.iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(r, col as u16, *value).unwrap();
            }
        }
    }

    // A real date cell for R-1's actual start
    let actual_start = ExcelDateTime::from_ymd(2026, 1, 20).unwrap();
    sheet
        .write_datetime_with_format(3, 10, &actual_start, &date_format)
        .unwrap();
}

/// Both sheets
pub fn write_staffing_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("staffing.xlsx");
    let mut workbook = Workbook::new();
    write_summary(workbook.add_worksheet());
    write_detailed(workbook.add_worksheet());
    workbook.save(&path).unwrap();
    path
}

/// Summary sheet only
pub fn write_summary_only_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("summary_only.xlsx");
    let mut workbook = Workbook::new();
    write_summary(workbook.add_worksheet());
    workbook.save(&path).unwrap();
    path
}

/// A workbook whose only sheet has the wrong name
pub fn write_unrelated_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("unrelated.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Budget").unwrap();
    sheet.write_string(0, 0, "nothing here").unwrap();
    workbook.save(&path).unwrap();
    path
}
