//! Text normalisation shared by the scorers and the company decomposer.

use std::{borrow::Cow, sync::OnceLock};

use regex::Regex;

static WORD_RE: OnceLock<Regex> = OnceLock::new();

fn word_regex() -> &'static Regex {
    WORD_RE.get_or_init(|| Regex::new(r"\w+").expect("word pattern is valid"))
}

/// Lower-cases `input` and rejoins its word tokens (`\w+` runs) with single spaces.
///
/// `"Paris, France"` becomes `"paris france"`.
pub fn normalize_words(input: &str) -> String {
    let lowered = lowercase(input);
    let mut out = String::with_capacity(lowered.len());
    for token in word_regex().find_iter(&lowered) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token.as_str());
    }
    out
}

/// Normalisation used when splitting company names.
///
/// Lower-cases, turns every character outside `[a-z0-9]` and whitespace into a
/// space, then collapses runs of whitespace. Unlike [`normalize_words`] this is
/// ASCII only, so accented letters act as separators.
pub fn normalize_company_text(input: &str) -> String {
    let lowered = lowercase(input);
    let replaced = lowered
        .chars()
        .map(|ch| {
            if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
                ch
            } else {
                ' '
            }
        })
        .collect::<String>();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True when `value` has at least one upper-case letter and no lower-case ones.
pub fn is_all_uppercase(value: &str) -> bool {
    let mut saw_upper = false;
    for ch in value.chars() {
        if ch.is_lowercase() {
            return false;
        }
        if ch.is_uppercase() {
            saw_upper = true;
        }
    }
    saw_upper
}

fn lowercase(input: &str) -> Cow<'_, str> {
    if input.chars().all(|ch| !ch.is_uppercase()) {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(input.to_lowercase())
    }
}
