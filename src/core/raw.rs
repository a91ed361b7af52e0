//! Untyped rows as they come off a worksheet
//!
//! The importer produces these; `core::normalize` is the only consumer.

use crate::types::DateField;
use chrono::{NaiveDate, NaiveDateTime};

/// Date formats accepted for text cells, tried in order
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%m-%d-%Y",
    "%d-%b-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// A single worksheet cell before schema mapping
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl RawCell {
    /// Empty, or text that is only whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            RawCell::Number(n) => n.is_nan(),
            _ => false,
        }
    }

    /// Numeric reading of the cell, `None` when it cannot be read as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawCell::Number(n) if n.is_finite() => Some(*n),
            RawCell::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            RawCell::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Text reading of the cell; dates render as ISO, whole numbers without a fraction
    pub fn as_text(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Text(s) => s.clone(),
            RawCell::Number(n) => format_number(*n),
            RawCell::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            RawCell::DateTime(dt) => {
                if dt.time() == chrono::NaiveTime::MIN {
                    dt.date().format("%Y-%m-%d").to_string()
                } else {
                    dt.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
        }
    }

    pub fn as_date(&self) -> DateField {
        match self {
            _ if self.is_blank() => DateField::Missing,
            RawCell::DateTime(dt) => DateField::Date(dt.date()),
            RawCell::Text(s) => parse_date(s)
                .map(DateField::Date)
                .unwrap_or_else(|| DateField::NotADate(s.clone())),
            other => DateField::NotADate(other.as_text()),
        }
    }
}

/// Parse a date written as text; the time part of a timestamp is dropped
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    // "2025-12-09T15:45:19z" style stamps
    let text = text.trim_end_matches(['z', 'Z']);

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Collapse runs of whitespace (including line breaks) into single spaces
pub fn normalize_header(header: &str) -> String {
    header.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// One data row keyed by (normalized) header text, in sheet column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<(String, RawCell)>,
}

static EMPTY: RawCell = RawCell::Empty;

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, RawCell)>,
        K: AsRef<str>,
    {
        let mut row = Self::new();
        for (header, cell) in pairs {
            row.insert(header.as_ref(), cell);
        }
        row
    }

    /// Add a cell; the first occurrence of a header wins
    pub fn insert(&mut self, header: &str, cell: RawCell) {
        let header = normalize_header(header);
        if !self.cells.iter().any(|(h, _)| *h == header) {
            self.cells.push((header, cell));
        }
    }

    /// Cell for a column, `Empty` when the column is absent
    pub fn get(&self, header: &str) -> &RawCell {
        self.cells
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, c)| c)
            .unwrap_or(&EMPTY)
    }

    pub fn contains(&self, header: &str) -> bool {
        self.cells.iter().any(|(h, _)| h == header)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawCell)> {
        self.cells.iter().map(|(h, c)| (h.as_str(), c))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|(_, c)| c.is_blank())
    }
}

/// A worksheet read at its header offset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawSheet {
    /// Expected columns that the header row does not carry
    pub fn missing_columns<'a>(&self, expected: &[&'a str]) -> Vec<&'a str> {
        expected
            .iter()
            .copied()
            .filter(|col| !self.headers.iter().any(|h| h == col))
            .collect()
    }
}

/// Both sheets of the staffing workbook
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawWorkbook {
    pub summary: RawSheet,
    /// `None` when the workbook has no detailed sheet
    pub detailed: Option<RawSheet>,
}
