//! CLI command handlers

pub mod commands;

pub use commands::{
    export, metrics, report, role_filter, roles, snapshot, watch, OutputFormat,
};
