// Excel import (xlsx, xls, xlsb, ods)
//
// One-way conversion to the engine's matrix model. Cell values stay as
// close to the file as possible: date/time cells keep their day serial,
// which the engine's date normalizer already understands.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};

use chuyenxe_engine::matrix::{CellValue, RawMatrix};

/// Import the first sheet of a workbook.
pub fn import(path: &Path) -> Result<RawMatrix, String> {
    let mut workbook = open_workbook_auto(path).map_err(|e| e.to_string())?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| format!("{}: workbook has no sheets", path.display()))?;

    import_sheet(&mut workbook, &sheet_name)
}

/// Import a named sheet of a workbook.
pub fn import_named(path: &Path, sheet: &str) -> Result<RawMatrix, String> {
    let mut workbook = open_workbook_auto(path).map_err(|e| e.to_string())?;
    import_sheet(&mut workbook, sheet)
}

fn import_sheet(
    workbook: &mut Sheets<std::io::BufReader<std::fs::File>>,
    sheet: &str,
) -> Result<RawMatrix, String> {
    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| format!("sheet '{sheet}': {e}"))?;

    let mut matrix = RawMatrix::new();
    for row in range.rows() {
        matrix.push_row(row.iter().map(convert_cell).collect());
    }

    Ok(matrix)
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from_input(s),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => CellValue::Text(format!("#{e:?}")),
        // Keep the serial; the engine's date normalizer interprets it.
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::from_input(s),
    }
}
