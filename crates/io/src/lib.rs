// File IO operations

pub mod csv;
pub mod json;
pub mod xlsx;

use std::path::Path;

use chuyenxe_engine::matrix::RawMatrix;

/// Decode a spreadsheet file to a matrix, dispatching on extension.
/// Unknown extensions are treated as CSV — delimiter sniffing copes with
/// most text exports.
pub fn decode(path: &Path) -> Result<RawMatrix, String> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("xlsx") | Some("xls") | Some("xlsb") | Some("ods") => xlsx::import(path),
        _ => csv::import(path),
    }
}
