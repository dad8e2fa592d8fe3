//! Column classification.
//!
//! A column is reduced to a bounded [`draw_sample`] of non-empty cells, each
//! [`FieldScorer`] rates the sample, and the best score wins when it clears
//! the threshold. Anything below the threshold is labelled
//! [`SemanticType::Other`].

use std::path::Path;

use anyhow::Result;
use log::debug;
use rand::{SeedableRng, rngs::StdRng, seq::index};
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    reference::{ReferenceCache, ReferenceData},
    scoring::{FieldScorer, SemanticType},
};

pub const DEFAULT_SAMPLE_SIZE: usize = 500;
pub const DEFAULT_SAMPLE_SEED: u64 = 42;
pub const DEFAULT_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierOptions {
    pub sample_size: usize,
    pub seed: u64,
    pub threshold: f64,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            seed: DEFAULT_SAMPLE_SEED,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Scores for the four scored types plus the derived `Other` flag.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreVector {
    pub phone_number: f64,
    pub company_name: f64,
    pub country: f64,
    pub date: f64,
    pub other: f64,
}

impl ScoreVector {
    pub fn get(&self, ty: SemanticType) -> f64 {
        match ty {
            SemanticType::PhoneNumber => self.phone_number,
            SemanticType::CompanyName => self.company_name,
            SemanticType::Country => self.country,
            SemanticType::Date => self.date,
            SemanticType::Other => self.other,
        }
    }

    fn set(&mut self, ty: SemanticType, score: f64) {
        match ty {
            SemanticType::PhoneNumber => self.phone_number = score,
            SemanticType::CompanyName => self.company_name = score,
            SemanticType::Country => self.country = score,
            SemanticType::Date => self.date = score,
            SemanticType::Other => self.other = score,
        }
    }

    /// Entries in output order: the scored types, then `Other`.
    pub fn iter(&self) -> impl Iterator<Item = (SemanticType, f64)> + '_ {
        SemanticType::SCORED
            .into_iter()
            .chain(std::iter::once(SemanticType::Other))
            .map(|ty| (ty, self.get(ty)))
    }
}

impl Serialize for ScoreVector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(5))?;
        for (ty, score) in self.iter() {
            map.serialize_entry(ty.as_str(), &score)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnClassification {
    pub label: SemanticType,
    pub scores: ScoreVector,
}

/// Non-empty cells of `values`, capped at `sample_size`.
///
/// Larger columns are subsampled with an RNG seeded by `seed`, so the same
/// input always yields the same sample. Drawn cells keep their column order.
pub fn draw_sample<S: AsRef<str>>(values: &[S], sample_size: usize, seed: u64) -> Vec<String> {
    let non_empty = values
        .iter()
        .map(AsRef::as_ref)
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>();
    if non_empty.len() <= sample_size {
        return non_empty.into_iter().map(str::to_string).collect();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut picked = index::sample(&mut rng, non_empty.len(), sample_size).into_vec();
    picked.sort_unstable();
    picked
        .into_iter()
        .map(|idx| non_empty[idx].to_string())
        .collect()
}

/// Scores `sample` with every scorer and picks the label.
pub fn classify_sample(
    sample: &[String],
    reference: &ReferenceData,
    threshold: f64,
) -> ColumnClassification {
    let mut scores = ScoreVector::default();
    let mut best: Option<(SemanticType, f64)> = None;
    for scorer in FieldScorer::ALL {
        let ty = scorer.semantic_type();
        let score = scorer.score(sample, reference);
        scores.set(ty, score);
        if best.is_none_or(|(_, current)| score > current) {
            best = Some((ty, score));
        }
    }
    let label = match best {
        Some((ty, score)) if score >= threshold => ty,
        _ => SemanticType::Other,
    };
    scores.other = if label == SemanticType::Other { 1.0 } else { 0.0 };
    ColumnClassification { label, scores }
}

/// Classifies columns against reference data loaded through its own cache.
#[derive(Debug, Default)]
pub struct Classifier {
    options: ClassifierOptions,
    cache: ReferenceCache,
}

impl Classifier {
    pub fn new(options: ClassifierOptions) -> Self {
        Self::with_cache(options, ReferenceCache::new())
    }

    pub fn with_cache(options: ClassifierOptions, cache: ReferenceCache) -> Self {
        Self { options, cache }
    }

    pub fn options(&self) -> &ClassifierOptions {
        &self.options
    }

    pub fn cache(&self) -> &ReferenceCache {
        &self.cache
    }

    pub fn classify_column<S: AsRef<str>>(
        &self,
        values: &[S],
        data_dir: &Path,
    ) -> Result<ColumnClassification> {
        let reference = self.cache.get(data_dir)?;
        let sample = draw_sample(values, self.options.sample_size, self.options.seed);
        let classification = classify_sample(&sample, &reference, self.options.threshold);
        debug!(
            "Classified {} sampled value(s) as {} ({:?})",
            sample.len(),
            classification.label,
            classification.scores
        );
        Ok(classification)
    }
}
