//! Reference data: country names and legal-entity suffixes.
//!
//! Both lists live as plain text files (`Countries.txt`, `legal.txt`) in a data
//! directory, one entry per line. A missing file is not an error; it yields an
//! empty collection and the scorer relying on it reports no signal.
//!
//! [`ReferenceCache`] memoises loaded data per directory so repeated column
//! classifications within one run read the disk once.

use std::{
    cmp::Reverse,
    collections::{HashMap, HashSet},
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result, anyhow};
use itertools::Itertools;
use log::debug;

pub const COUNTRIES_FILE: &str = "Countries.txt";
pub const LEGAL_SUFFIXES_FILE: &str = "legal.txt";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceData {
    pub countries: HashSet<String>,
    /// Sorted by descending word count so phrases are tried before single words.
    pub legal_suffixes: Vec<String>,
}

impl ReferenceData {
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            countries: load_countries(dir)?,
            legal_suffixes: load_legal_suffixes(dir)?,
        })
    }
}

pub fn load_countries(dir: &Path) -> Result<HashSet<String>> {
    let entries = read_entries(&dir.join(COUNTRIES_FILE))?;
    Ok(entries.into_iter().collect())
}

pub fn load_legal_suffixes(dir: &Path) -> Result<Vec<String>> {
    let entries = read_entries(&dir.join(LEGAL_SUFFIXES_FILE))?;
    Ok(entries
        .into_iter()
        .sorted_by_key(|suffix| Reverse(suffix.split_whitespace().count()))
        .collect())
}

fn read_entries(path: &Path) -> Result<Vec<String>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("Reference file {path:?} not found; using an empty list");
            return Ok(Vec::new());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("Reading reference file {path:?}"));
        }
    };
    Ok(contents
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty())
        .collect())
}

/// Reference data memoised per resolved directory path.
#[derive(Debug, Default)]
pub struct ReferenceCache {
    entries: Mutex<HashMap<PathBuf, Arc<ReferenceData>>>,
}

impl ReferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the data for `dir`, loading it on first use.
    pub fn get(&self, dir: &Path) -> Result<Arc<ReferenceData>> {
        let key = resolve_key(dir);
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("Reference cache lock poisoned"))?;
        if let Some(existing) = entries.get(&key) {
            return Ok(Arc::clone(existing));
        }
        let data = Arc::new(
            ReferenceData::load(&key)
                .with_context(|| format!("Loading reference data from {key:?}"))?,
        );
        debug!(
            "Loaded {} country name(s) and {} legal suffix(es) from {:?}",
            data.countries.len(),
            data.legal_suffixes.len(),
            key
        );
        entries.insert(key, Arc::clone(&data));
        Ok(data)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

fn resolve_key(dir: &Path) -> PathBuf {
    fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn suffixes_are_lowercased_and_sorted_by_word_count() {
        let dir = tempdir().expect("temp dir");
        fs::write(
            dir.path().join(LEGAL_SUFFIXES_FILE),
            "LTD\n\n  Pvt Ltd  \ngmbh\ngmbh & co kg\n",
        )
        .expect("write legal");
        let suffixes = load_legal_suffixes(dir.path()).expect("load");
        assert_eq!(suffixes, vec!["gmbh & co kg", "pvt ltd", "ltd", "gmbh"]);
    }

    #[test]
    fn missing_files_yield_empty_collections() {
        let dir = tempdir().expect("temp dir");
        let data = ReferenceData::load(dir.path()).expect("load");
        assert!(data.countries.is_empty());
        assert!(data.legal_suffixes.is_empty());
    }

    #[test]
    fn cache_loads_each_directory_once() {
        let dir = tempdir().expect("temp dir");
        fs::write(dir.path().join(COUNTRIES_FILE), "France\nGermany\n").expect("write");
        let cache = ReferenceCache::new();
        let first = cache.get(dir.path()).expect("first load");
        fs::write(dir.path().join(COUNTRIES_FILE), "Spain\n").expect("rewrite");
        let second = cache.get(dir.path()).expect("cached load");
        assert!(Arc::ptr_eq(&first, &second));
        assert!(second.countries.contains("germany"));
        assert_eq!(cache.len(), 1);

        cache.clear();
        let reloaded = cache.get(dir.path()).expect("reload");
        assert!(reloaded.countries.contains("spain"));
        assert!(!reloaded.countries.contains("france"));
    }
}
