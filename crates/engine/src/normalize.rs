//! Value normalizers: dates, numbers, phones, license plates, identity keys.
//!
//! Every function here is pure and total — bad input yields `None` or a
//! neutral value, never a guess. Aggregated totals depend on that: a wrongly
//! guessed date or phone would corrupt downstream numbers undetectably.

use chrono::{Datelike, Duration, NaiveDate};
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::matrix::CellValue;

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// How string date parsing anchors its pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateParse {
    /// The `D/M/YYYY` pattern must span the whole trimmed string.
    Strict,
    /// The pattern may appear anywhere in the string.
    Lenient,
}

/// Accepted calendar window. Serials and parsed strings outside it are noise.
const MIN_YEAR: i32 = 2000;
const MAX_YEAR: i32 = 2100;

/// Excel 1900-system day serials land in this open range for 1954–2064.
const SERIAL_MIN: f64 = 20000.0;
const SERIAL_MAX: f64 = 60000.0;

/// Interpret a cell as a calendar date.
///
/// Native dates pass through, numeric cells are treated as spreadsheet day
/// serials (days since 1899-12-30), text is pattern-matched per `mode`.
/// Anything that does not resolve to a valid in-window date is `None`.
pub fn date_from_cell(value: &CellValue, mode: DateParse) -> Option<NaiveDate> {
    match value {
        CellValue::Date(d) => in_window(*d),
        CellValue::Number(n) => date_from_serial(*n),
        CellValue::Text(s) => date_from_str(s, mode),
        CellValue::Empty => None,
    }
}

/// Convert a spreadsheet day serial to a date. Serials outside the open
/// range (20000, 60000) are rejected — small integers are counts, huge ones
/// are ids or timestamps.
pub fn date_from_serial(serial: f64) -> Option<NaiveDate> {
    if serial <= SERIAL_MIN || serial >= SERIAL_MAX {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    in_window(base + Duration::days(serial.trunc() as i64))
}

/// Parse `D{1,2}[/-]M{1,2}[/-]YYYY` out of a string.
pub fn date_from_str(s: &str, mode: DateParse) -> Option<NaiveDate> {
    let pattern = match mode {
        DateParse::Strict => r"^(\d{1,2})[/-](\d{1,2})[/-](\d{4})$",
        DateParse::Lenient => r"(\d{1,2})[/-](\d{1,2})[/-](\d{4})",
    };
    let re = Regex::new(pattern).unwrap();
    let caps = re.captures(s.trim())?;

    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;

    // from_ymd_opt rejects month 0/13+ and day overflow per month length.
    in_window(NaiveDate::from_ymd_opt(year, month, day)?)
}

fn in_window(d: NaiveDate) -> Option<NaiveDate> {
    if (MIN_YEAR..=MAX_YEAR).contains(&d.year()) {
        Some(d)
    } else {
        None
    }
}

/// Canonical display form: `DD/MM/YYYY`, zero-padded.
pub fn format_date(d: NaiveDate) -> String {
    d.format("%d/%m/%Y").to_string()
}

/// Sortable `YYYYMMDD` key from a canonical `DD/MM/YYYY` string.
/// Empty/unparseable strings key as 0 and sort last under date-descending.
pub fn date_sort_key(date: &str) -> u32 {
    match date_from_str(date, DateParse::Strict) {
        Some(d) => d.year() as u32 * 10_000 + d.month() * 100 + d.day(),
        None => 0,
    }
}

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

/// Best-effort numeric reading of a cell. Numbers pass through; text loses
/// thousands commas and yields its first signed int/decimal run ("5 khách"
/// → 5). Nothing numeric → 0.
pub fn number_from_cell(value: &CellValue) -> f64 {
    match value {
        CellValue::Number(n) => *n,
        CellValue::Text(s) => number_from_str(s),
        _ => 0.0,
    }
}

pub fn number_from_str(s: &str) -> f64 {
    let cleaned = s.replace(',', "");
    let re = Regex::new(r"-?\d+(?:\.\d+)?").unwrap();
    re.find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Phone numbers
// ---------------------------------------------------------------------------

/// Canonicalize a Vietnamese phone number to `0xxxxxxxxx`.
///
/// Strips every non-digit, folds the `84` country prefix to a leading `0`,
/// and accepts only 9–11 digit results.
pub fn normalize_phone(s: &str) -> Option<String> {
    let digits: String = s.chars().filter(char::is_ascii_digit).collect();

    let digits = if let Some(rest) = digits.strip_prefix("84") {
        format!("0{rest}")
    } else {
        digits
    };

    if (9..=11).contains(&digits.len()) {
        Some(digits)
    } else {
        None
    }
}

/// Find a 9–11 digit run anywhere in a string (whole-row phone fallback).
pub fn scan_phone(s: &str) -> Option<String> {
    let re = Regex::new(r"[\d][\d\s.\-]{7,14}[\d]").unwrap();
    for m in re.find_iter(s) {
        if let Some(phone) = normalize_phone(m.as_str()) {
            return Some(phone);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// License plates
// ---------------------------------------------------------------------------

/// Extract a Vietnamese license plate as `PREFIX-SUFFIX` (e.g. `20B-12345`).
///
/// Falls back to accepting any short alphanumeric token containing both a
/// letter and a digit, with only separator characters stripped.
pub fn extract_plate(s: &str) -> Option<String> {
    let upper = s.trim().to_uppercase();
    if upper.is_empty() {
        return None;
    }

    let re = Regex::new(r"(\d{2}[A-Z]{1,2})[\s.\-]*(\d{3,4}\.?\d{0,2})").unwrap();
    if let Some(caps) = re.captures(&upper) {
        let prefix = &caps[1];
        let suffix: String = caps[2].chars().filter(char::is_ascii_digit).collect();
        return Some(format!("{prefix}-{suffix}"));
    }

    if upper.len() < 15
        && !upper.contains(' ')
        && upper.chars().any(|c| c.is_ascii_alphabetic())
        && upper.chars().any(|c| c.is_ascii_digit())
    {
        let stripped: String = upper.chars().filter(|c| !matches!(c, '.' | '-')).collect();
        return Some(stripped);
    }

    None
}

// ---------------------------------------------------------------------------
// Identity keys and display casing
// ---------------------------------------------------------------------------

/// Diacritic- and case-insensitive merge key for names and ids.
///
/// Lowercase, `đ` → `d`, canonical decomposition with combining marks
/// stripped, then every non-alphanumeric dropped. "Nguyễn Văn  A" and
/// "nguyen van a" collapse to the same key. Never used for display.
pub fn identity_key(s: &str) -> String {
    s.to_lowercase()
        .replace('đ', "d")
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// True if the string carries Vietnamese diacritics (combining marks after
/// decomposition, or the bare `đ`).
pub fn has_diacritics(s: &str) -> bool {
    s.to_lowercase().contains('đ') || s.nfd().any(is_combining_mark)
}

/// Title-case for display names: capitalize each letter following the start
/// or a whitespace run, lowercase the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Pick the richer of two display spellings of the same name: diacritics
/// beat none, then the longer string wins.
pub fn richer_name<'a>(current: &'a str, candidate: &'a str) -> &'a str {
    match (has_diacritics(current), has_diacritics(candidate)) {
        (true, false) => current,
        (false, true) => candidate,
        _ => {
            if candidate.chars().count() > current.chars().count() {
                candidate
            } else {
                current
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn date_string_strict_round_trip() {
        let d = date_from_str("01/06/2024", DateParse::Strict).unwrap();
        assert_eq!(format_date(d), "01/06/2024");

        let d = date_from_str("7-6-2024", DateParse::Strict).unwrap();
        assert_eq!(format_date(d), "07/06/2024");
    }

    #[test]
    fn date_string_strict_rejects_embedded() {
        assert_eq!(date_from_str("chuyến 01/06/2024 sáng", DateParse::Strict), None);
        assert!(date_from_str("chuyến 01/06/2024 sáng", DateParse::Lenient).is_some());
    }

    #[test]
    fn date_rejects_invalid_calendar_days() {
        assert_eq!(date_from_str("31/02/2024", DateParse::Strict), None);
        assert_eq!(date_from_str("00/06/2024", DateParse::Strict), None);
        assert_eq!(date_from_str("01/13/2024", DateParse::Strict), None);
        assert_eq!(date_from_str("01/06/1998", DateParse::Strict), None);
    }

    #[test]
    fn date_serial_window() {
        // 45444 = 01/06/2024 in the 1900 system
        let d = date_from_serial(45444.0).unwrap();
        assert_eq!(format_date(d), "01/06/2024");

        assert_eq!(date_from_serial(12.0), None);
        assert_eq!(date_from_serial(20000.0), None);
        assert_eq!(date_from_serial(60000.0), None);
    }

    #[test]
    fn date_from_native_cell() {
        let d = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(
            date_from_cell(&CellValue::Date(d), DateParse::Strict),
            Some(d)
        );
        let old = NaiveDate::from_ymd_opt(1997, 1, 1).unwrap();
        assert_eq!(date_from_cell(&CellValue::Date(old), DateParse::Strict), None);
    }

    #[test]
    fn date_sort_key_orders() {
        assert_eq!(date_sort_key("01/06/2024"), 20240601);
        assert!(date_sort_key("02/06/2024") > date_sort_key("31/05/2024"));
        assert_eq!(date_sort_key(""), 0);
    }

    #[test]
    fn number_extraction() {
        assert_eq!(number_from_cell(&CellValue::Number(7.0)), 7.0);
        assert_eq!(number_from_str("5 khách"), 5.0);
        assert_eq!(number_from_str("1,200,000 đ"), 1_200_000.0);
        assert_eq!(number_from_str("-3.5kg"), -3.5);
        assert_eq!(number_from_str("không"), 0.0);
    }

    #[test]
    fn phone_normalization() {
        assert_eq!(normalize_phone("0912.345.678").as_deref(), Some("0912345678"));
        assert_eq!(normalize_phone("+84 912 345 678").as_deref(), Some("0912345678"));
        assert_eq!(normalize_phone("12345"), None);
        assert_eq!(normalize_phone("091234567890123"), None);
    }

    #[test]
    fn phone_scan_in_free_text() {
        assert_eq!(
            scan_phone("Liên hệ: 0912.345.678 (Anh Hùng)").as_deref(),
            Some("0912345678")
        );
        assert_eq!(scan_phone("không có số"), None);
    }

    #[test]
    fn plate_extraction() {
        assert_eq!(extract_plate("20B-123.45").as_deref(), Some("20B-12345"));
        assert_eq!(extract_plate("xe 20b 1234").as_deref(), Some("20B-1234"));
        assert_eq!(extract_plate("BKS 97H012.34").as_deref(), Some("97H-01234"));
        // fallback token: letter + digit, no spaces
        assert_eq!(extract_plate("XE123A").as_deref(), Some("XE123A"));
        assert_eq!(extract_plate("chưa rõ"), None);
    }

    #[test]
    fn identity_key_folds_diacritics() {
        assert_eq!(identity_key("Nguyễn Văn A"), "nguyenvana");
        assert_eq!(identity_key("nguyen  van a"), "nguyenvana");
        assert_eq!(identity_key("Đỗ Thị Hà"), "dothiha");
        assert_eq!(identity_key("Hoàng-Anh (lái)"), "hoanganhlai");
    }

    #[test]
    fn richer_name_prefers_diacritics_then_length() {
        assert_eq!(richer_name("Nguyen Van A", "Nguyễn Văn A"), "Nguyễn Văn A");
        assert_eq!(richer_name("Nguyễn Văn A", "Nguyen Van Anh"), "Nguyễn Văn A");
        assert_eq!(richer_name("Nguyen A", "Nguyen Van A"), "Nguyen Van A");
    }

    #[test]
    fn title_case_display() {
        assert_eq!(title_case("nguyễn văn a"), "Nguyễn Văn A");
        assert_eq!(title_case("TRẦN  BÌNH"), "Trần  Bình");
    }

    proptest! {
        #[test]
        fn identity_key_is_idempotent(s in "\\PC{0,40}") {
            let once = identity_key(&s);
            prop_assert_eq!(identity_key(&once), once);
        }

        #[test]
        fn valid_dates_round_trip(y in 2000i32..=2100, m in 1u32..=12, d in 1u32..=28) {
            let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
            let s = format_date(date);
            prop_assert_eq!(date_from_str(&s, DateParse::Strict), Some(date));
        }
    }
}
