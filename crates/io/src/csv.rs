// CSV/TSV import

use std::io::Read;
use std::path::Path;

use chuyenxe_engine::matrix::{CellValue, RawMatrix};

pub fn import(path: &Path) -> Result<RawMatrix, String> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    import_from_string(&content, delimiter)
}

pub fn import_with_delimiter(path: &Path, delimiter: u8) -> Result<RawMatrix, String> {
    let content = read_file_as_utf8(path)?;
    import_from_string(&content, delimiter)
}

/// Detect the most likely field delimiter by checking consistency across the
/// first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line.
/// The delimiter that produces the most consistent field count (>1 field)
/// wins.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Must produce >1 field on the first line to be viable
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Score: (number of lines with same field count as line 1) * field_count
        // Higher field count breaks ties — more columns = more likely real delimiter
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path).map_err(|e| e.to_string())?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| e.to_string())?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            // Fall back to Windows-1252 (common for Excel-exported CSVs)
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

fn import_from_string(content: &str, delimiter: u8) -> Result<RawMatrix, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut matrix = RawMatrix::new();

    for result in reader.records() {
        let record = result.map_err(|e| e.to_string())?;
        matrix.push_row(record.iter().map(CellValue::from_input).collect());
    }

    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_sniff_semicolon_delimiter() {
        let content = "Ngày;Lái xe;Khách\n01/06/2024;An;3\n02/06/2024;Bình;5\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_sniff_comma_delimiter() {
        let content = "Ngày,Lái xe,Khách\n01/06/2024,An,3\n02/06/2024,Bình,5\n";
        assert_eq!(sniff_delimiter(content), b',');
    }

    #[test]
    fn test_sniff_tab_delimiter() {
        let content = "Ngày\tLái xe\tKhách\n01/06/2024\tAn\t3\n";
        assert_eq!(sniff_delimiter(content), b'\t');
    }

    #[test]
    fn test_sniff_semicolon_with_commas_in_values() {
        let content = "Lái xe;Ghi chú\n\"An, ca sáng\";\"đổi xe, nghỉ trưa\"\nBình;\"tăng cường\"\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_import_coerces_cells() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.csv");
        fs::write(&path, "Ngày,Lái xe,Khách\n01/06/2024,Nguyễn Văn A,12\n").unwrap();

        let matrix = import(&path).unwrap();
        assert_eq!(matrix.row_count(), 2);
        assert_eq!(matrix.cell(0, 0), &CellValue::Text("Ngày".into()));
        assert_eq!(matrix.cell(1, 2), &CellValue::Number(12.0));
    }

    #[test]
    fn test_import_ragged_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ragged.csv");
        fs::write(&path, "a,b,c\nd\n").unwrap();

        let matrix = import(&path).unwrap();
        assert_eq!(matrix.row(0).len(), 3);
        assert_eq!(matrix.row(1).len(), 1);
        assert_eq!(matrix.cell(1, 2), &CellValue::Empty);
    }

    #[test]
    fn test_windows_1252_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("legacy.csv");
        // "café" with é encoded as Windows-1252 0xE9
        fs::write(&path, [b'c', b'a', b'f', 0xE9, b',', b'1']).unwrap();

        let matrix = import(&path).unwrap();
        assert_eq!(matrix.cell(0, 0), &CellValue::Text("café".into()));
    }
}
