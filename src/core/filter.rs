//! Filtering of detailed role rows for the roles table

use crate::types::DetailedRoleRow;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Selection value meaning "do not filter on this dimension"
pub const ALL: &str = "All";

/// Allowed values for one filter dimension
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterSet {
    #[default]
    All,
    Only(HashSet<String>),
}

impl FilterSet {
    /// Build from a user selection. An empty selection, or one that contains
    /// `"All"`, disables the filter.
    pub fn from_selection<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: HashSet<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() || values.contains(ALL) {
            FilterSet::All
        } else {
            FilterSet::Only(values)
        }
    }

    /// Parse a comma-separated selection such as `Open,On Hold`
    pub fn parse(list: &str) -> Self {
        Self::from_selection(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        )
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            FilterSet::All => true,
            FilterSet::Only(allowed) => allowed.contains(value),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, FilterSet::All)
    }
}

/// One filter per dimension of the roles table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleFilter {
    pub status: FilterSet,
    pub technology_area: FilterSet,
    pub team: FilterSet,
}

impl RoleFilter {
    pub fn matches(&self, row: &DetailedRoleRow) -> bool {
        self.status.matches(&row.status)
            && self.technology_area.matches(&row.technology_area)
            && self.team.matches(&row.team_name)
    }

    pub fn apply(&self, rows: &[DetailedRoleRow]) -> Vec<DetailedRoleRow> {
        filter_detailed(rows, &self.status, &self.technology_area, &self.team)
    }
}

/// Rows passing every filter dimension. The input is left untouched.
pub fn filter_detailed(
    rows: &[DetailedRoleRow],
    status_filter: &FilterSet,
    tech_filter: &FilterSet,
    team_filter: &FilterSet,
) -> Vec<DetailedRoleRow> {
    rows.iter()
        .filter(|row| {
            status_filter.matches(&row.status)
                && tech_filter.matches(&row.technology_area)
                && team_filter.matches(&row.team_name)
        })
        .cloned()
        .collect()
}

/// Choices offered by the roles-table filters, each list starting with "All"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub statuses: Vec<String>,
    pub technology_areas: Vec<String>,
    pub teams: Vec<String>,
}

pub fn filter_options(rows: &[DetailedRoleRow]) -> FilterOptions {
    FilterOptions {
        statuses: options(rows.iter().map(|r| r.status.as_str())),
        technology_areas: options(rows.iter().map(|r| r.technology_area.as_str())),
        teams: options(rows.iter().map(|r| r.team_name.as_str())),
    }
}

fn options<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let distinct: BTreeSet<&str> = values.filter(|v| !v.trim().is_empty()).collect();
    std::iter::once(ALL.to_string())
        .chain(distinct.into_iter().map(str::to_string))
        .collect()
}
