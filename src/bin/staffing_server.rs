//! Staffing API Server binary
//!
//! HTTP REST API over the staffing workbook.
//! Provides metrics, summary, roles, filters, refresh and export endpoints.

use clap::Parser;
use staffing_dashboard::api::{run_api_server, ApiConfig};
use staffing_dashboard::config::DashboardConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "staffing-server")]
#[command(version)]
#[command(about = "Staffing API Server - HTTP REST API for technology staffing metrics")]
#[command(long_about = r#"
Staffing API Server - HTTP REST API

Provides RESTful endpoints over the staffing workbook:
  - GET  /api/v1/metrics          - Overall metrics
  - GET  /api/v1/summary          - Summary rows + per-area breakdown
  - GET  /api/v1/roles            - Detailed roles (?status=&tech=&team=)
  - GET  /api/v1/filters          - Filter choices
  - POST /api/v1/refresh          - Reload the workbook now
  - GET  /api/v1/export/summary   - Summary .xlsx download
  - GET  /api/v1/export/detailed  - Detailed roles .xlsx download

Additional endpoints:
  - GET  /health           - Health check
  - GET  /version          - Server version info
  - GET  /                 - API documentation

The workbook is cached and reloaded once the refresh interval
(default 15 minutes) has passed.

Example usage:
  staffing-server staffing.xlsx                  # Start on localhost:8080
  staffing-server staffing.xlsx --host 0.0.0.0 --port 3000

  curl http://localhost:8080/api/v1/roles?status=Open&tech=Cloud,Data
"#)]
struct Args {
    /// Path to the staffing workbook (.xlsx)
    #[arg(env = "STAFFING_WORKBOOK")]
    workbook: Option<PathBuf>,

    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, env = "STAFFING_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "STAFFING_PORT")]
    port: Option<u16>,

    /// Path to a YAML config file
    #[arg(short, long, env = "STAFFING_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let dashboard = DashboardConfig::load(args.config.as_deref())?;
    let workbook = dashboard.resolve_workbook(args.workbook)?;

    let mut config = ApiConfig::from_dashboard(&dashboard, workbook);
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    run_api_server(config).await
}
