use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "literacy-desk",
    version,
    about = "Digital literacy program dashboard"
)]
pub struct CliArgs {
    /// Print stats and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless stats as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override database path
    #[arg(long, value_name = "PATH")]
    pub db: Option<String>,

    /// Override export output directory
    #[arg(long = "export-dir", value_name = "PATH")]
    pub export_dir: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Attendance statistics, optionally scoped to a batch and date range
    Stats {
        #[arg(long, value_name = "ID")]
        batch: Option<i64>,

        /// First day included (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        from: Option<String>,

        /// Last day included (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        to: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Import students from a .xlsx, .xls, .ods or .csv file
    Import { path: PathBuf },

    /// Export all students to a workbook
    Export {
        /// Output file; defaults to the export directory
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,

        /// Write CSV instead of .xlsx
        #[arg(long)]
        csv: bool,
    },

    /// Load the sample data set into an empty database
    Seed,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(db) = &self.db {
            std::env::set_var("DATABASE_NAME", db);
        }
        if let Some(dir) = &self.export_dir {
            std::env::set_var("EXPORT_DIR", dir);
        }
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}
