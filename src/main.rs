use clap::{Parser, Subcommand};
use colored::Colorize;
use staffing_dashboard::cli::{self, OutputFormat};
use staffing_dashboard::config::DashboardConfig;
use staffing_dashboard::error::StaffingResult;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "staffing")]
#[command(about = "Technology staffing plan metrics from the staffing workbook")]
#[command(long_about = "Staffing Dashboard - metrics from the technology staffing workbook

Reads the 'Technology Staffing Summary' and 'Detailed 2026 Staffing Plans'
sheets, normalizes messy cells (blank rows, text in number columns, mixed
date formats) and reports the numbers leadership looks at.

COMMANDS:
  metrics   - Overall metrics and per-area breakdown
  roles     - Detailed requisitions with status/area/team filters
  snapshot  - Write normalized rows + metrics as JSON or YAML
  export    - Styled Excel re-exports of both sheets
  report    - Plain-text summary report
  watch     - Reload metrics whenever the workbook is saved

EXAMPLES:
  staffing metrics staffing.xlsx
  staffing roles staffing.xlsx --status Open --tech Cloud,Data
  staffing export staffing.xlsx --out-dir exports/
  staffing snapshot staffing.xlsx -o snapshot.json

The workbook argument may be omitted when STAFFING_WORKBOOK or the
config file's 'workbook' key is set.")]
#[command(version)]
struct Cli {
    /// Path to a YAML config file
    #[arg(short, long, global = true, env = "STAFFING_CONFIG")]
    config: Option<PathBuf>,

    /// Show verbose progress and debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show overall metrics and the per-area breakdown
    Metrics {
        /// Path to the staffing workbook (.xlsx)
        #[arg(env = "STAFFING_WORKBOOK")]
        workbook: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    #[command(long_about = "List detailed requisitions.

Each filter accepts repeated flags or comma-separated values. 'All' (or no
value) means no restriction on that field. Filters combine with AND.

  staffing roles plan.xlsx --status Open
  staffing roles plan.xlsx --tech Cloud --team \"Platform,BI\"")]
    /// List detailed roles with optional filters
    Roles {
        /// Path to the staffing workbook (.xlsx)
        #[arg(env = "STAFFING_WORKBOOK")]
        workbook: Option<PathBuf>,

        /// Status values to include
        #[arg(short, long, value_delimiter = ',')]
        status: Vec<String>,

        /// Technology areas to include
        #[arg(short, long, value_delimiter = ',')]
        tech: Vec<String>,

        /// Team names to include
        #[arg(long, value_delimiter = ',')]
        team: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Write normalized rows and metrics to a .json or .yaml file
    Snapshot {
        /// Path to the staffing workbook (.xlsx)
        #[arg(env = "STAFFING_WORKBOOK")]
        workbook: Option<PathBuf>,

        /// Output file (.json or .yaml)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Export styled summary and detailed workbooks
    Export {
        /// Path to the staffing workbook (.xlsx)
        #[arg(env = "STAFFING_WORKBOOK")]
        workbook: Option<PathBuf>,

        /// Directory for the dated export files
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Print the plain-text summary report
    Report {
        /// Path to the staffing workbook (.xlsx)
        #[arg(env = "STAFFING_WORKBOOK")]
        workbook: Option<PathBuf>,
    },

    /// Watch the workbook and reload metrics on every save
    Watch {
        /// Path to the staffing workbook (.xlsx)
        #[arg(env = "STAFFING_WORKBOOK")]
        workbook: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> StaffingResult<()> {
    let config = DashboardConfig::load(cli.config.as_deref())?;
    let verbose = cli.verbose;

    match cli.command {
        Commands::Metrics { workbook, format } => {
            cli::metrics(config.resolve_workbook(workbook)?, &config, format, verbose)
        }

        Commands::Roles {
            workbook,
            status,
            tech,
            team,
            format,
        } => cli::roles(
            config.resolve_workbook(workbook)?,
            &config,
            cli::role_filter(status, tech, team),
            format,
            verbose,
        ),

        Commands::Snapshot { workbook, output } => {
            cli::snapshot(config.resolve_workbook(workbook)?, &config, output)
        }

        Commands::Export { workbook, out_dir } => {
            cli::export(config.resolve_workbook(workbook)?, &config, out_dir, verbose)
        }

        Commands::Report { workbook } => {
            cli::report(config.resolve_workbook(workbook)?, &config, verbose)
        }

        Commands::Watch { workbook } => {
            cli::watch(config.resolve_workbook(workbook)?, &config, verbose)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "❌ Error:".bold().red(), e);
            if let Some(hint) = e.hint() {
                eprintln!("   {}", hint.yellow());
            }
            ExitCode::FAILURE
        }
    }
}
