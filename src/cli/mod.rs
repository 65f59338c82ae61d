//! CLI interface for taskr

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "taskr")]
#[command(version)]
#[command(about = "A small task list web app", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default taskr.toml configuration file
    Init,

    /// Create the database tables
    CreateDb,

    /// Create an administrator account
    CreateAdmin {
        /// Username
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (read from TASKR_ADMIN_PASSWORD when omitted)
        #[arg(short, long, env = "TASKR_ADMIN_PASSWORD")]
        password: String,
    },

    /// List registered users
    Users {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Start the web server
    Serve {
        /// Host to bind to (defaults to the configured host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
