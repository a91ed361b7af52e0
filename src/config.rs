//! Dashboard configuration
//!
//! Everything has a default matching the standard staffing workbook, so a
//! config file is only needed when the workbook layout or server settings
//! differ. Example:
//!
//! ```yaml
//! workbook: plans/staffing_2026.xlsx
//! refresh_interval_secs: 600
//! layout:
//!   summary_sheet: Technology Staffing Summary
//!   summary_header_row: 1
//! server:
//!   port: 9000
//! ```

use crate::core::cache::DEFAULT_TTL_SECS;
use crate::error::{StaffingError, StaffingResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where the two sheets live and which (0-based, absolute) row holds each header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    pub summary_sheet: String,
    pub summary_header_row: u32,
    pub detailed_sheet: String,
    /// The first row of the sheet is skipped, then the header is the second
    /// remaining row, i.e. absolute row 2
    pub detailed_header_row: u32,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            summary_sheet: "Technology Staffing Summary".to_string(),
            summary_header_row: 1,
            detailed_sheet: "Detailed 2026 Staffing Plans".to_string(),
            detailed_header_row: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub workbook: Option<PathBuf>,
    pub refresh_interval_secs: u64,
    pub layout: SheetLayout,
    pub server: ServerConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            workbook: None,
            refresh_interval_secs: DEFAULT_TTL_SECS as u64,
            layout: SheetLayout::default(),
            server: ServerConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Load from a YAML file, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> StaffingResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> StaffingResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            StaffingError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> StaffingResult<Self> {
        let config: DashboardConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> StaffingResult<()> {
        if self.refresh_interval_secs == 0 {
            return Err(StaffingError::Config(
                "refresh_interval_secs must be greater than 0".to_string(),
            ));
        }
        if try_interval(self.refresh_interval_secs).is_none() {
            return Err(StaffingError::Config(format!(
                "refresh_interval_secs {} is out of range",
                self.refresh_interval_secs
            )));
        }
        if self.layout.summary_sheet.trim().is_empty() || self.layout.detailed_sheet.trim().is_empty()
        {
            return Err(StaffingError::Config("sheet names cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Out-of-range values (rejected by `validate`) saturate to the maximum
    pub fn refresh_interval(&self) -> chrono::Duration {
        try_interval(self.refresh_interval_secs).unwrap_or(chrono::Duration::MAX)
    }

    /// Workbook path: explicit argument first, then the config file
    pub fn resolve_workbook(&self, explicit: Option<PathBuf>) -> StaffingResult<PathBuf> {
        explicit.or_else(|| self.workbook.clone()).ok_or_else(|| {
            StaffingError::Config(
                "No workbook given; pass a path or set `workbook` in the config file".to_string(),
            )
        })
    }
}

fn try_interval(secs: u64) -> Option<chrono::Duration> {
    i64::try_from(secs).ok().and_then(chrono::Duration::try_seconds)
}
