//! Splits company names into the bare name and its legal-form suffix.
//!
//! The suffix vocabulary holds single words (`gmbh`, `co`, `kg`). Multi-word
//! legal forms are rebuilt at split time by consuming trailing tokens that
//! each belong to the vocabulary, so `"Enno Roggemann GmbH & Co. KG"` yields
//! the suffix `"gmbh co kg"` without that phrase being listed anywhere.

use std::collections::HashSet;

use crate::{reference::ReferenceData, text::normalize_company_text};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanySplit {
    pub name: String,
    pub legal: String,
}

/// Lower-cased single-word vocabulary taken from the loaded suffix list.
pub fn legal_words(reference: &ReferenceData) -> HashSet<String> {
    reference
        .legal_suffixes
        .iter()
        .map(|suffix| suffix.to_lowercase())
        .collect()
}

/// Peels trailing legal words off an already normalised company name.
pub fn extract_dynamic_suffix(normalized: &str, legal_words: &HashSet<String>) -> CompanySplit {
    let tokens = normalized.split_whitespace().collect::<Vec<_>>();
    let suffix_len = tokens
        .iter()
        .rev()
        .take_while(|token| legal_words.contains(**token))
        .count();
    if suffix_len == 0 {
        return CompanySplit {
            name: normalized.to_string(),
            legal: String::new(),
        };
    }
    let (name, legal) = tokens.split_at(tokens.len() - suffix_len);
    CompanySplit {
        name: name.join(" "),
        legal: legal.join(" "),
    }
}

pub fn split_company(raw: &str, legal_words: &HashSet<String>) -> CompanySplit {
    if raw.trim().is_empty() {
        return CompanySplit::default();
    }
    extract_dynamic_suffix(&normalize_company_text(raw), legal_words)
}

/// Splits every cell, returning the `Name` and `Legal` columns.
pub fn parse_company_column<S: AsRef<str>>(
    values: &[S],
    legal_words: &HashSet<String>,
) -> (Vec<String>, Vec<String>) {
    values
        .iter()
        .map(|value| {
            let split = split_company(value.as_ref(), legal_words);
            (split.name, split.legal)
        })
        .unzip()
}
