//! Staffing data engine: raw cells → normalized rows → metrics

pub mod cache;
pub mod filter;
pub mod metrics;
pub mod normalize;
pub mod raw;

pub use cache::{CachedSnapshot, SnapshotCache};
pub use filter::{filter_detailed, filter_options, FilterOptions, FilterSet, RoleFilter};
pub use metrics::{area_breakdown, compute_metrics};
pub use normalize::{normalize_detailed, normalize_summary};
pub use raw::{RawCell, RawRow, RawSheet, RawWorkbook};
