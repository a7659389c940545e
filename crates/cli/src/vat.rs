//! `cxe vat` — revenue vs invoice reconciliation.

use std::path::PathBuf;

use clap::Subcommand;

use chuyenxe_recon::VatConfig;

use crate::exit_codes::EXIT_VAT_DISCREPANCY;
use crate::CliError;

#[derive(Subcommand)]
pub enum VatCommands {
    /// Run the reconciliation over two ledger files
    #[command(after_help = "\
Examples:
  cxe vat run --real doanh-thu.xlsx --invoice hoa-don.xlsx
  cxe vat run --real real.csv --invoice inv.csv --json
  cxe vat run --real real.csv --invoice inv.csv --config vat.toml --output report.json")]
    Run {
        /// Actual revenue ledger
        #[arg(long)]
        real: PathBuf,

        /// Issued invoice ledger
        #[arg(long)]
        invoice: PathBuf,

        /// Reconciliation config TOML (built-in defaults when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output JSON to stdout instead of only the human summary
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate a reconciliation config without running
    #[command(after_help = "\
Examples:
  cxe vat validate vat.toml")]
    Validate {
        /// Path to the .toml config file
        config: PathBuf,
    },
}

pub fn cmd_vat(command: VatCommands) -> Result<(), CliError> {
    match command {
        VatCommands::Run { real, invoice, config, json, output } => {
            cmd_vat_run(real, invoice, config, json, output)
        }
        VatCommands::Validate { config } => cmd_vat_validate(config),
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<VatConfig, CliError> {
    match path {
        None => Ok(VatConfig::default()),
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| CliError::io(format!("cannot read {}: {e}", path.display())))?;
            VatConfig::from_toml(&content).map_err(|e| CliError::config(e.to_string()))
        }
    }
}

fn cmd_vat_run(
    real_path: PathBuf,
    invoice_path: PathBuf,
    config_path: Option<PathBuf>,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = load_config(config_path.as_deref())?;

    let real = chuyenxe_io::decode(&real_path)
        .map_err(|e| CliError::io(format!("cannot decode {}: {e}", real_path.display())))?;
    let invoice = chuyenxe_io::decode(&invoice_path)
        .map_err(|e| CliError::io(format!("cannot decode {}: {e}", invoice_path.display())))?;

    let report = chuyenxe_recon::run(&real, &invoice, &config);

    let json_str = serde_json::to_string_pretty(&report)
        .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::io(format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    // Human summary to stderr
    let s = &report.summary;
    eprintln!(
        "vat recon: {} ticket(s) — {} matched, {} price mismatches, {} missing invoices, {} extra invoices",
        s.total, s.matched, s.price_mismatches, s.missing_invoices, s.extra_invoices,
    );

    if s.discrepancies() > 0 {
        return Err(CliError {
            code: EXIT_VAT_DISCREPANCY,
            message: "discrepancies found".into(),
            hint: None,
        });
    }

    Ok(())
}

fn cmd_vat_validate(config_path: PathBuf) -> Result<(), CliError> {
    let content = std::fs::read_to_string(&config_path)
        .map_err(|e| CliError::io(format!("cannot read {}: {e}", config_path.display())))?;

    match VatConfig::from_toml(&content) {
        Ok(config) => {
            eprintln!(
                "valid: '{}' with tolerance {}",
                config.name, config.tolerance,
            );
            Ok(())
        }
        Err(e) => Err(CliError::config(e.to_string())),
    }
}
