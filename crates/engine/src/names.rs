//! Free-text driver-name cleaning.
//!
//! Manifest cells mix the actual name with role labels ("Lái xe:", "KH LXE",
//! chat shorthand "e"/"a"/"c") and trailing vehicle/phone/route noise. The
//! cleaner strips a known prefix, cuts at the first stop token, and
//! title-cases what survives. Vocabularies come from the extraction profile
//! so dataset kinds can differ without touching this algorithm.

use serde::Deserialize;

use crate::normalize::title_case;

/// Prefix and stop vocabularies for one dataset kind.
///
/// `prefixes` are role labels stripped from the front (matched
/// case-insensitively, must be followed by whitespace, punctuation, or
/// end-of-string). `stops` are noise words that terminate the name.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct NameVocab {
    #[serde(default)]
    pub prefixes: Vec<String>,
    #[serde(default)]
    pub stops: Vec<String>,
}

/// Clean a raw name-bearing token down to a display name.
///
/// Returns an empty string when nothing name-like survives; callers treat
/// results shorter than 2 characters as garbage.
pub fn clean_name(raw: &str, vocab: &NameVocab) -> String {
    let mut text = raw.trim();

    // Strip role labels; repeat so "KH LXE Lái xe: An" loses both.
    loop {
        let mut stripped = false;
        for prefix in &vocab.prefixes {
            if let Some(rest) = strip_label(text, prefix) {
                text = rest.trim_start_matches([' ', ':', '-', '.', ',']).trim_start();
                stripped = true;
                break;
            }
        }
        if !stripped {
            break;
        }
    }

    // Cut at the first stop token. Work on the lowercased string so stop
    // offsets always index the string being sliced; title_case re-cases.
    let lower = text.to_lowercase();
    let cut = first_stop(&lower, &vocab.stops);
    let kept =
        lower[..cut].trim_end_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace());

    let cased = title_case(kept.trim());
    if cased.chars().count() < 2 {
        String::new()
    } else {
        cased
    }
}

/// Case-insensitive label strip. The label must be followed by whitespace,
/// punctuation, or end-of-string so "e" does not eat the front of "Em Hà"
/// while still matching "e Hà".
fn strip_label<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    if label.is_empty() {
        return None;
    }
    let mut chars = text.char_indices();
    for want in label.chars() {
        let (_, got) = chars.next()?;
        if !got.to_lowercase().eq(want.to_lowercase()) {
            return None;
        }
    }
    match chars.next() {
        None => Some(""),
        Some((idx, next)) if next.is_whitespace() || next.is_ascii_punctuation() => {
            Some(&text[idx..])
        }
        Some(_) => None,
    }
}

/// Byte offset of the first stop token in an already-lowercased string: a
/// digit, a punctuation cluster, or a vocabulary stop word on a word
/// boundary.
fn first_stop(lower: &str, stops: &[String]) -> usize {
    let mut cut = lower.len();

    for (idx, c) in lower.char_indices() {
        if c.is_ascii_digit() || matches!(c, ',' | ';' | ':' | '(' | ')' | '/' | '\\' | '|' | '+') {
            cut = idx;
            break;
        }
    }

    for stop in stops {
        let stop = stop.to_lowercase();
        let mut from = 0;
        while let Some(pos) = lower[from..].find(&stop) {
            let at = from + pos;
            if on_word_boundary(lower, at, stop.len()) && at < cut {
                cut = at;
                break;
            }
            from = at + stop.len();
        }
    }

    cut
}

fn on_word_boundary(s: &str, at: usize, len: usize) -> bool {
    let before_ok = at == 0
        || s[..at]
            .chars()
            .next_back()
            .is_some_and(|c| !c.is_alphanumeric());
    let after_ok = at + len >= s.len()
        || s[at + len..]
            .chars()
            .next()
            .is_some_and(|c| !c.is_alphanumeric());
    before_ok && after_ok
}
