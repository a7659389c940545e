// chuyenxe CLI - headless extraction and reconciliation

mod exit_codes;
mod extract;
mod vat;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_ERROR, EXIT_INVALID_CONFIG, EXIT_SUCCESS};

#[derive(Parser)]
#[command(name = "cxe")]
#[command(about = "Bus-line spreadsheet extraction and reconciliation (headless)")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  chuyenxe-engine ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and aggregate one dataset kind from a spreadsheet export
    #[command(after_help = "\
Examples:
  cxe extract --kind daily nhat-ky-6.xlsx --json
  cxe extract --kind phone khach-quen.csv --output phones.json
  cxe extract --kind daily nhat-ky-6.xlsx --append history/daily.json
  cxe extract --kind pricing gia-ve.xlsx --profile company.toml")]
    Extract(extract::ExtractArgs),

    /// Reconcile the revenue ledger against issued invoices
    Vat {
        #[command(subcommand)]
        command: vat::VatCommands,
    },

    /// Extraction profile utilities
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Validate a profile TOML file without running an extraction
    #[command(after_help = "\
Examples:
  cxe profile validate company.toml")]
    Validate {
        /// Path to the profile .toml file
        profile: PathBuf,
    },
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INVALID_CONFIG, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn cmd_profile(command: ProfileCommands) -> Result<(), CliError> {
    match command {
        ProfileCommands::Validate { profile } => {
            let content = std::fs::read_to_string(&profile)
                .map_err(|e| CliError::io(format!("cannot read {}: {e}", profile.display())))?;
            let parsed = chuyenxe_engine::Profile::from_toml(&content)
                .map_err(|e| CliError::config(e.to_string()))?;
            eprintln!(
                "valid: profile with scan windows daily={} self={} transit={} phone={} pricing={}",
                parsed.daily.header.scan_rows,
                parsed.self_report.header.scan_rows,
                parsed.transit.header.scan_rows,
                parsed.phone.header.scan_rows,
                parsed.pricing.header.scan_rows,
            );
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract(args) => extract::cmd_extract(args),
        Commands::Vat { command } => vat::cmd_vat(command),
        Commands::Profile { command } => cmd_profile(command),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(err.code)
        }
    }
}
