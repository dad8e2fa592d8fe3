//! Splits phone numbers into a country label and the local number.

use itertools::Itertools;

/// Dialing-code prefixes and the country label reported for them.
pub const COUNTRY_CODES: &[(&str, &str)] = &[("1", "US"), ("44", "UK"), ("91", "India")];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhoneSplit {
    pub country: Option<String>,
    pub number: Option<String>,
}

impl PhoneSplit {
    fn new(country: Option<&str>, number: &str) -> Self {
        Self {
            country: country.map(str::to_string),
            number: (!number.is_empty()).then(|| number.to_string()),
        }
    }
}

/// Codes ordered longest first so `44` is tried before a hypothetical `4`.
fn codes_longest_first() -> impl Iterator<Item = &'static (&'static str, &'static str)> {
    COUNTRY_CODES
        .iter()
        .sorted_by(|a, b| b.0.len().cmp(&a.0.len()))
}

pub fn split_phone(raw: &str) -> PhoneSplit {
    let trimmed = raw.trim();
    let international = trimmed
        .chars()
        .find(|ch| ch.is_ascii_digit() || *ch == '+')
        .is_some_and(|ch| ch == '+');
    let digits = trimmed
        .chars()
        .filter(char::is_ascii_digit)
        .collect::<String>();
    if digits.is_empty() {
        return PhoneSplit::default();
    }
    if international {
        for (code, country) in codes_longest_first() {
            if let Some(rest) = digits.strip_prefix(code) {
                return PhoneSplit::new(Some(*country), rest);
            }
        }
    }
    PhoneSplit::new(None, &digits)
}

/// Splits every cell, returning the `Country` and `Number` columns.
pub fn parse_phone_column<S: AsRef<str>>(
    values: &[S],
) -> (Vec<Option<String>>, Vec<Option<String>>) {
    values
        .iter()
        .map(|value| {
            let split = split_phone(value.as_ref());
            (split.country, split.number)
        })
        .unzip()
}
