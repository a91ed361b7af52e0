//! Staffing API Server module
//!
//! Serves the dashboard data over HTTP for the presentation layer.
//! Run with `staffing-server`.

pub mod handlers;
pub mod server;

pub use server::{build_router, run_api_server, ApiConfig, AppState};
