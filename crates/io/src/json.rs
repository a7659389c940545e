// JSON persistence of record arrays.
//
// The engine never touches storage; the caller saves extraction results and
// re-merges them with later runs (same composite keys, new entries win).

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Write a record array as pretty-printed JSON.
pub fn save_records<T: Serialize>(path: &Path, records: &[T]) -> Result<(), String> {
    let json = serde_json::to_string_pretty(records).map_err(|e| e.to_string())?;
    std::fs::write(path, json).map_err(|e| e.to_string())
}

/// Load a previously saved record array. A missing file is an empty history,
/// not an error — first runs have nothing to merge with.
pub fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, String> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&content).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chuyenxe_engine::model::DailyStat;
    use tempfile::tempdir;

    fn stat(driver: &str, customers: f64) -> DailyStat {
        DailyStat {
            driver: driver.into(),
            date: "01/06/2024".into(),
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
    fn round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("daily.json");

        let records = vec![stat("Nguyễn Văn A", 12.0), stat("Trần B", 3.0)];
        save_records(&path, &records).unwrap();

        let loaded: Vec<DailyStat> = load_records(&path).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn missing_file_is_empty_history() {
        let dir = tempdir().unwrap();
        let loaded: Vec<DailyStat> = load_records(&dir.path().join("none.json")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn merge_with_history_uses_same_keys() {
        use chuyenxe_engine::aggregate::merge_history;

        let dir = tempdir().unwrap();
        let path = dir.path().join("daily.json");
        save_records(&path, &[stat("Nguyễn Văn A", 12.0)]).unwrap();

        let saved: Vec<DailyStat> = load_records(&path).unwrap();
        // diacritic-variant spelling still lands on the saved record's key
        let merged = merge_history(saved, vec![stat("Nguyen Van A", 20.0)]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].customers, 20.0);
    }
}
