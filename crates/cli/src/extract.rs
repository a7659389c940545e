//! `cxe extract` — decode a spreadsheet export and run one dataset extractor.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use serde::de::DeserializeOwned;
use serde::Serialize;

use chuyenxe_engine::aggregate::{
    merge_history, sort_daily, sort_phone, sort_pricing, sort_self, sort_transit, Keyed,
};
use chuyenxe_engine::extract::{
    extract_daily, extract_phone, extract_pricing, extract_self_report, extract_transit,
};
use chuyenxe_engine::matrix::RowsInput;
use chuyenxe_engine::Profile;

use crate::exit_codes::EXIT_NO_ROWS;
use crate::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    /// Daily trip log
    Daily,
    /// Self-reported driver manifest
    #[value(name = "self")]
    SelfReport,
    /// Transit-shuttle log
    Transit,
    /// Phone/loyalty log
    Phone,
    /// Ticket pricing sheet
    Pricing,
}

#[derive(Args)]
pub struct ExtractArgs {
    /// Spreadsheet export to read (.csv, .xlsx, .xls, .ods)
    pub file: PathBuf,

    /// Dataset kind to extract
    #[arg(long, value_enum)]
    pub kind: Kind,

    /// Extraction profile TOML (built-in dictionaries when omitted)
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Output JSON to stdout instead of only the human summary
    #[arg(long)]
    pub json: bool,

    /// Write JSON output to file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Merge into a saved JSON history file (new records win per key)
    #[arg(long)]
    pub append: Option<PathBuf>,
}

pub fn cmd_extract(args: ExtractArgs) -> Result<(), CliError> {
    let profile = load_profile(args.profile.as_deref())?;

    let matrix = chuyenxe_io::decode(&args.file)
        .map_err(|e| CliError::io(format!("cannot decode {}: {e}", args.file.display())))?;

    match args.kind {
        Kind::Daily => emit(extract_daily(&matrix, &profile.daily), &args, sort_daily),
        Kind::SelfReport => emit(
            extract_self_report(RowsInput::Matrix(matrix), &profile.self_report),
            &args,
            sort_self,
        ),
        Kind::Transit => emit(
            extract_transit(&matrix, &profile.transit),
            &args,
            sort_transit,
        ),
        Kind::Phone => emit(extract_phone(&matrix, &profile.phone), &args, sort_phone),
        Kind::Pricing => emit(
            extract_pricing(&matrix, &profile.pricing),
            &args,
            sort_pricing,
        ),
    }
}

fn load_profile(path: Option<&std::path::Path>) -> Result<Profile, CliError> {
    match path {
        None => Ok(Profile::default()),
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| CliError::io(format!("cannot read {}: {e}", path.display())))?;
            Profile::from_toml(&content).map_err(|e| CliError::config(e.to_string()))
        }
    }
}

/// Shared output path for every dataset kind: optional history merge, JSON
/// to file/stdout, one-line summary to stderr.
fn emit<T>(records: Vec<T>, args: &ExtractArgs, sort: fn(&mut [T])) -> Result<(), CliError>
where
    T: Serialize + DeserializeOwned + Keyed,
{
    let extracted = records.len();

    let mut records = records;
    if let Some(ref history_path) = args.append {
        let saved: Vec<T> = chuyenxe_io::json::load_records(history_path)
            .map_err(|e| CliError::io(format!("cannot load {}: {e}", history_path.display())))?;
        let saved_count = saved.len();

        records = merge_history(saved, records);
        sort(&mut records);

        chuyenxe_io::json::save_records(history_path, &records)
            .map_err(|e| CliError::io(format!("cannot write {}: {e}", history_path.display())))?;
        eprintln!(
            "merged {extracted} extracted into {saved_count} saved record(s) → {} total in {}",
            records.len(),
            history_path.display(),
        );
    }

    let json = serde_json::to_string_pretty(&records)
        .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &json)
            .map_err(|e| CliError::io(format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if args.json {
        println!("{json}");
    }

    eprintln!(
        "extracted {extracted} record(s) from {}",
        args.file.display(),
    );

    if extracted == 0 {
        return Err(CliError {
            code: EXIT_NO_ROWS,
            message: "no usable rows extracted".into(),
            hint: Some(
                "check that the file has a recognizable header row, or pass --profile with \
                 adjusted keywords"
                    .into(),
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chuyenxe_engine::model::DailyStat;
    use tempfile::tempdir;

    fn args() -> ExtractArgs {
        ExtractArgs {
            file: "log.csv".into(),
            kind: Kind::Daily,
            profile: None,
            json: false,
            output: None,
            append: None,
        }
    }

    fn stat(driver: &str, date: &str, customers: f64) -> DailyStat {
        DailyStat {
            driver: driver.into(),
            date: date.into(),
            customers,
            tickets: 0.0,
            trips: 1.0,
            workdays: 0.25,
            extra_trips: 0.0,
            plates: vec![],
            notes: String::new(),
        }
    }

    #[test]
    fn empty_extraction_exits_no_rows() {
        let err = emit(Vec::<DailyStat>::new(), &args(), sort_daily).unwrap_err();
        assert_eq!(err.code, EXIT_NO_ROWS);
    }

    #[test]
    fn output_file_written() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("daily.json");

        let mut a = args();
        a.output = Some(out.clone());
        emit(vec![stat("Trần B", "01/06/2024", 3.0)], &a, sort_daily).unwrap();

        let written: Vec<DailyStat> =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].driver, "Trần B");
    }

    #[test]
    fn append_merges_into_history_file() {
        let dir = tempdir().unwrap();
        let history = dir.path().join("history.json");
        chuyenxe_io::json::save_records(&history, &[stat("Nguyễn Văn A", "01/06/2024", 3.0)])
            .unwrap();

        let mut a = args();
        a.append = Some(history.clone());
        emit(
            vec![
                stat("Nguyen Van A", "01/06/2024", 9.0),
                stat("Trần B", "02/06/2024", 2.0),
            ],
            &a,
            sort_daily,
        )
        .unwrap();

        let merged: Vec<DailyStat> = chuyenxe_io::json::load_records(&history).unwrap();
        assert_eq!(merged.len(), 2);
        // the fresh extraction overwrote the saved record under the same key
        assert!(merged.iter().any(|s| s.customers == 9.0));
        assert!(!merged.iter().any(|s| s.customers == 3.0));
    }

    #[test]
    fn bad_profile_is_a_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "daily = 5").unwrap();

        let err = load_profile(Some(&path)).unwrap_err();
        assert_eq!(err.code, crate::exit_codes::EXIT_INVALID_CONFIG);
    }
}
