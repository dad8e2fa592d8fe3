//! Heuristic scorers for the semantic column types.
//!
//! Every scorer looks at a sample of stringified cells and returns the share
//! of non-empty cells that look like its type, in `[0.0, 1.0]`. Blank cells
//! are left out of the denominator; an all-blank sample scores `0.0`.

use std::{collections::HashSet, fmt, str::FromStr, sync::OnceLock};

use anyhow::{Error, anyhow};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::{
    reference::ReferenceData,
    text::{is_all_uppercase, normalize_words},
};

pub const PHONE_DIGIT_MIN: usize = 7;
pub const PHONE_DIGIT_MAX: usize = 15;
pub const DATE_MAX_CHARS: usize = 40;
pub const COMPANY_PARTIAL_CREDIT: f64 = 0.3;

/// Tried in order; the first format that parses wins.
pub const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d-%m-%Y",
    "%m-%d-%Y",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d-%b-%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%B %d, %Y",
];

const MONTH_ABBREVIATIONS: &str = "jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec";
const MONTH_NAMES: &str =
    "january|february|march|april|may|june|july|august|september|october|november|december";

static DATE_SHAPES: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();

/// Anchored pattern a value must fit before `format` is handed to chrono.
///
/// chrono accepts short years and skips whitespace before numeric fields, so
/// `%Y` is pinned to four digits and every field to its exact width here.
fn shape_pattern(format: &str) -> String {
    let mut pattern = String::from("(?i)^");
    let mut chars = format.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '%' => match chars.next() {
                Some('Y') => pattern.push_str("[0-9]{4}"),
                Some('m') | Some('d') => pattern.push_str("[0-9]{1,2}"),
                Some('b') => pattern.push_str(&format!("(?:{MONTH_ABBREVIATIONS})")),
                Some('B') => pattern.push_str(&format!("(?:{MONTH_NAMES})")),
                Some(other) => pattern.push_str(&regex::escape(&other.to_string())),
                None => {}
            },
            ch if ch.is_whitespace() => pattern.push_str(r"\s+"),
            other => pattern.push_str(&regex::escape(&other.to_string())),
        }
    }
    pattern.push('$');
    pattern
}

fn date_shapes() -> &'static [(&'static str, Regex)] {
    DATE_SHAPES.get_or_init(|| {
        DATE_FORMATS
            .iter()
            .map(|format| {
                let shape = Regex::new(&shape_pattern(format)).expect("date shape is valid");
                (*format, shape)
            })
            .collect()
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    PhoneNumber,
    CompanyName,
    Country,
    Date,
    Other,
}

impl SemanticType {
    /// Scored types in tie-break order.
    pub const SCORED: [SemanticType; 4] = [
        SemanticType::PhoneNumber,
        SemanticType::CompanyName,
        SemanticType::Country,
        SemanticType::Date,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::PhoneNumber => "PhoneNumber",
            SemanticType::CompanyName => "CompanyName",
            SemanticType::Country => "Country",
            SemanticType::Date => "Date",
            SemanticType::Other => "Other",
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &["PhoneNumber", "CompanyName", "Country", "Date", "Other"]
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SemanticType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PhoneNumber" => Ok(SemanticType::PhoneNumber),
            "CompanyName" => Ok(SemanticType::CompanyName),
            "Country" => Ok(SemanticType::Country),
            "Date" => Ok(SemanticType::Date),
            "Other" => Ok(SemanticType::Other),
            other => Err(anyhow!(
                "Unknown semantic type '{other}'. Expected one of: {}",
                Self::variants().join(", ")
            )),
        }
    }
}

impl Serialize for SemanticType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// The closed set of column scorers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldScorer {
    Phone,
    Company,
    Country,
    Date,
}

impl FieldScorer {
    pub const ALL: [FieldScorer; 4] = [
        FieldScorer::Phone,
        FieldScorer::Company,
        FieldScorer::Country,
        FieldScorer::Date,
    ];

    pub fn semantic_type(&self) -> SemanticType {
        match self {
            FieldScorer::Phone => SemanticType::PhoneNumber,
            FieldScorer::Company => SemanticType::CompanyName,
            FieldScorer::Country => SemanticType::Country,
            FieldScorer::Date => SemanticType::Date,
        }
    }

    pub fn score(&self, sample: &[String], reference: &ReferenceData) -> f64 {
        match self {
            FieldScorer::Phone => score_phone(sample),
            FieldScorer::Company => score_company(sample, &reference.legal_suffixes),
            FieldScorer::Country => score_country(sample, &reference.countries),
            FieldScorer::Date => score_date(sample),
        }
    }
}

/// Averages `weigh` over the non-blank cells of `values`.
fn score_cells<S, F>(values: &[S], mut weigh: F) -> f64
where
    S: AsRef<str>,
    F: FnMut(&str) -> f64,
{
    let mut total = 0usize;
    let mut hits = 0.0f64;
    for value in values {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        total += 1;
        hits += weigh(trimmed);
    }
    if total == 0 { 0.0 } else { hits / total as f64 }
}

fn hit(matched: bool) -> f64 {
    if matched { 1.0 } else { 0.0 }
}

pub fn is_phone_like(value: &str) -> bool {
    let cleaned = value
        .trim()
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '+')
        .collect::<String>();
    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    !digits.is_empty()
        && digits.chars().all(|ch| ch.is_ascii_digit())
        && (PHONE_DIGIT_MIN..=PHONE_DIGIT_MAX).contains(&digits.len())
}

pub fn score_phone<S: AsRef<str>>(values: &[S]) -> f64 {
    score_cells(values, |value| hit(is_phone_like(value)))
}

pub fn is_date_like(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.chars().count() > DATE_MAX_CHARS {
        return false;
    }
    date_shapes().iter().any(|(format, shape)| {
        shape.is_match(trimmed) && NaiveDate::parse_from_str(trimmed, format).is_ok()
    })
}

pub fn score_date<S: AsRef<str>>(values: &[S]) -> f64 {
    score_cells(values, |value| hit(is_date_like(value)))
}

/// True when `word` occurs in `text` with a space or the text edge on both sides.
fn contains_whole_words(text: &str, word: &str) -> bool {
    let Some(first) = word.chars().next() else {
        return false;
    };
    let mut start = 0;
    while let Some(offset) = text[start..].find(word) {
        let idx = start + offset;
        let end = idx + word.len();
        let open = idx == 0 || text[..idx].ends_with(' ');
        let close = end == text.len() || text[end..].starts_with(' ');
        if open && close {
            return true;
        }
        start = idx + first.len_utf8();
    }
    false
}

/// Exact match, or a country name bounded by word breaks inside the cell.
fn contains_country(normalized: &str, countries: &HashSet<String>) -> bool {
    countries.contains(normalized)
        || countries
            .iter()
            .any(|country| contains_whole_words(normalized, country))
}

pub fn score_country<S: AsRef<str>>(values: &[S], countries: &HashSet<String>) -> f64 {
    if countries.is_empty() {
        return 0.0;
    }
    score_cells(values, |value| {
        hit(contains_country(&normalize_words(value), countries))
    })
}

pub fn has_legal_suffix(normalized: &str, suffixes: &[String]) -> bool {
    suffixes.iter().any(|suffix| {
        normalized == suffix.as_str() || normalized.ends_with(&format!(" {suffix}"))
    })
}

/// Multi-word, not shouting, with at least one letter.
fn looks_like_proper_name(value: &str) -> bool {
    value.chars().any(char::is_alphabetic) && value.contains(' ') && !is_all_uppercase(value)
}

pub fn score_company<S: AsRef<str>>(values: &[S], legal_suffixes: &[String]) -> f64 {
    if legal_suffixes.is_empty() {
        return 0.0;
    }
    score_cells(values, |value| {
        if has_legal_suffix(&normalize_words(value), legal_suffixes) {
            1.0
        } else if looks_like_proper_name(value) {
            COMPANY_PARTIAL_CREDIT
        } else {
            0.0
        }
    })
}
