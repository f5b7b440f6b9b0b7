//! Cleanup helpers for noisy OCR text

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Default similarity needed for [`fuzzy_match`] to accept a candidate
pub const FUZZY_THRESHOLD: f64 = 0.7;

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\s]").expect("Non-alphanumeric regex pattern is valid and should compile"));
static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\d.]+").expect("Number regex pattern is valid and should compile"));

/// Words the recognizer reliably gets wrong on patta scans
const CORRECTIONS: &[(&str, &str)] = &[
    ("basty", "Bastu"),
    ("khativan", "Khatiyan"),
    ("movia", "Mouja"),
    ("pattano", "Patta Number"),
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y/%m/%d",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
];

/// Lowercase, drop everything but ASCII letters, digits and whitespace, trim.
pub fn normalize_text(text: &str) -> String {
    NON_ALPHANUMERIC
        .replace_all(&text.to_lowercase(), "")
        .trim()
        .to_string()
}

/// Sørensen–Dice coefficient over character bigrams, whitespace ignored.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().filter(|c| !c.is_whitespace()).collect();
    let b: Vec<char> = b.chars().filter(|c| !c.is_whitespace()).collect();

    if a == b {
        return 1.0;
    }
    if a.len() < 2 || b.len() < 2 {
        return 0.0;
    }

    let mut bigrams: HashMap<(char, char), usize> = HashMap::new();
    for pair in a.windows(2) {
        *bigrams.entry((pair[0], pair[1])).or_default() += 1;
    }

    let mut shared = 0usize;
    for pair in b.windows(2) {
        if let Some(count) = bigrams.get_mut(&(pair[0], pair[1])) {
            if *count > 0 {
                *count -= 1;
                shared += 1;
            }
        }
    }

    (2 * shared) as f64 / (a.len() + b.len() - 2) as f64
}

/// Snap `input` to the most similar candidate when it is at least
/// `threshold` alike, otherwise return it unchanged.
pub fn fuzzy_match_with(input: &str, candidates: &[&str], threshold: f64) -> String {
    let needle = normalize_text(input);
    if needle.is_empty() {
        return input.to_string();
    }

    candidates
        .iter()
        .map(|candidate| (candidate, similarity(&needle, &normalize_text(candidate))))
        .filter(|(_, score)| *score >= threshold)
        // First candidate wins ties
        .fold(None::<(&&str, f64)>, |best, (candidate, score)| match best {
            Some((_, best_score)) if best_score >= score => best,
            _ => Some((candidate, score)),
        })
        .map(|(candidate, _)| candidate.to_string())
        .unwrap_or_else(|| input.to_string())
}

pub fn fuzzy_match(input: &str, candidates: &[&str]) -> String {
    fuzzy_match_with(input, candidates, FUZZY_THRESHOLD)
}

/// Trim a captured value and fix known misreadings; missing values become empty.
pub fn clean_text(value: Option<&str>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    let trimmed = value.trim();
    let key = normalize_text(trimmed);

    CORRECTIONS
        .iter()
        .find(|(wrong, _)| *wrong == key)
        .map(|(_, right)| right.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// First run of digits and dots, parsed as a number; 0 when there is none.
pub fn parse_number(text: &str) -> f64 {
    NUMBER
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0.0)
}

/// Normalize a date to `YYYY-MM-DD`, falling back to today.
pub fn parse_date(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .and_then(parse_known_date)
        .unwrap_or_else(|| Utc::now().date_naive())
        .format("%Y-%m-%d")
        .to_string()
}

fn parse_known_date(text: &str) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  West-Tripura!! "), "westtripura");
        assert_eq!(normalize_text("Dukli, 2"), "dukli 2");
    }

    #[test]
    fn test_similarity() {
        assert_eq!(similarity("night", "night"), 1.0);
        assert_eq!(similarity("a", "ab"), 0.0);
        // ni ig gh ht vs na ac ch ht: one shared bigram
        assert_eq!(similarity("night", "nacht"), 0.25);
        assert_eq!(similarity("west tripura", "westtripura"), 1.0);
    }

    #[test]
    fn test_fuzzy_match() {
        let districts = ["West Tripura", "South Tripura", "North Tripura", "Dhalai"];
        assert_eq!(fuzzy_match("west tripra", &districts), "West Tripura");
        assert_eq!(fuzzy_match("Dhalal", &districts), "Dhalai");
        assert_eq!(fuzzy_match("Gomati", &districts), "Gomati");
        assert_eq!(fuzzy_match("", &districts), "");
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text(Some("  Khativan ")), "Khatiyan");
        assert_eq!(clean_text(Some(" basty")), "Bastu");
        assert_eq!(clean_text(Some(" 45/2 ")), "45/2");
        assert_eq!(clean_text(None), "");
    }

    #[test]
    fn test_clean_text_ignores_punctuation() {
        assert_eq!(clean_text(Some("Basty.")), "Bastu");
        assert_eq!(clean_text(Some("Khativan,")), "Khatiyan");
        assert_eq!(clean_text(Some(" Movia: ")), "Mouja");
        assert_eq!(clean_text(Some("Dukli.")), "Dukli.");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("Extent of land: 2.5 acres"), 2.5);
        assert_eq!(parse_number("no digits"), 0.0);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date(Some(" 15/01/2023")), "2023-01-15");
        assert_eq!(parse_date(Some("2023-03-10")), "2023-03-10");
        assert_eq!(parse_date(Some("20 February 2023")), "2023-02-20");

        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(parse_date(Some("soon")), today);
        assert_eq!(parse_date(None), today);
    }
}
