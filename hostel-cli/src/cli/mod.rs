//! Command line interface

pub mod commands;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hostel-cli")]
#[command(
    author,
    version,
    about = "Import hostel office workbooks into the document database"
)]
pub struct Cli {
    /// Config file (default: <config dir>/hostel-cli/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List a workbook's sheets and preview what ingestion would derive
    Inspect {
        /// Workbook file (xlsx, xlsm, xlsb, xls, ods)
        file: PathBuf,
    },

    /// Read a workbook and write its records to the database
    #[command(subcommand)]
    Ingest(IngestCommands),

    /// Report on stored records
    #[command(subcommand)]
    Report(ReportCommands),
}

#[derive(Subcommand)]
pub enum IngestCommands {
    /// Reset and rewrite room occupancy from the room sheet
    Rooms(IngestArgs),
    /// Store a new monthly cost summary from the cost and staff sheets
    Costs(IngestArgs),
    /// Create student documents for unknown emails
    Students(IngestArgs),
    /// Create meal fee documents for every student row
    MealFees(IngestArgs),
}

impl IngestCommands {
    pub fn args(&self) -> &IngestArgs {
        match self {
            Self::Rooms(args) | Self::Costs(args) | Self::Students(args) | Self::MealFees(args) => args,
        }
    }
}

#[derive(Args)]
pub struct IngestArgs {
    /// Workbook file
    pub file: PathBuf,

    /// Read from the database but only log the writes
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Show monthly cost summaries
    Costs {
        /// Accounted month as Month-Year (default: current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Write the selected summaries to an xlsx file
        #[arg(short, long)]
        export: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ingest() {
        let cli = Cli::parse_from(["hostel-cli", "-v", "ingest", "meal-fees", "office.xlsx", "--dry-run"]);
        assert_eq!(cli.verbose, 1);
        let Commands::Ingest(command) = cli.command else {
            panic!("expected ingest");
        };
        assert!(matches!(command, IngestCommands::MealFees(_)));
        assert!(command.args().dry_run);
        assert_eq!(command.args().file, PathBuf::from("office.xlsx"));
    }

    #[test]
    fn test_parse_report() {
        let cli = Cli::parse_from([
            "hostel-cli",
            "report",
            "costs",
            "--month",
            "March-2023",
            "--no-color",
        ]);
        assert!(cli.no_color);
        let Commands::Report(ReportCommands::Costs { month, export }) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(month.as_deref(), Some("March-2023"));
        assert!(export.is_none());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
