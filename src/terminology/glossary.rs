//! Glossary store: TSV term mappings ordered longest-source-first

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use super::error::{GlossaryError, GlossaryResult};

/// A single `source -> target` mapping.
///
/// Both sides are trimmed on construction. The source keeps its original
/// casing for diagnostics; matching against it is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GlossaryEntry {
    source: String,
    target: String,
}

impl GlossaryEntry {
    /// Returns `None` when either side is empty after trimming.
    pub fn new(source: &str, target: &str) -> Option<Self> {
        let source = source.trim();
        let target = target.trim();
        if source.is_empty() || target.is_empty() {
            return None;
        }
        Some(Self {
            source: source.to_string(),
            target: target.to_string(),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Length of the source in characters, the sort key of the term set.
    pub fn source_len(&self) -> usize {
        self.source.chars().count()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GlossaryStatistics {
    pub total_terms: usize,
    pub longest_term: usize,
    pub shortest_term: usize,
}

/// A source term that maps to more than one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermConflict {
    pub source: String,
    pub targets: Vec<String>,
}

/// The active glossary: immutable once built, sorted by source length
/// descending with ties kept in load order.
#[derive(Debug, Clone, Default)]
pub struct GlossaryTermSet {
    entries: Vec<GlossaryEntry>,
}

impl GlossaryTermSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a term set, dropping repeated `(source, target)` pairs
    /// (first occurrence wins) and applying the longest-first order.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = GlossaryEntry>,
    {
        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut unique: Vec<GlossaryEntry> = entries
            .into_iter()
            .filter(|e| seen.insert((e.source.clone(), e.target.clone())))
            .collect();

        // Stable: equal lengths keep their input order.
        unique.sort_by(|a, b| b.source_len().cmp(&a.source_len()));

        Self { entries: unique }
    }

    /// Loads and merges every resource in order. Any missing path or
    /// malformed row aborts the whole load.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> GlossaryResult<Self> {
        let mut collected = Vec::new();

        for path in paths {
            let path = path.as_ref();
            if !path.exists() {
                return Err(GlossaryError::NotFound {
                    path: path.to_path_buf(),
                });
            }

            let content = fs::read_to_string(path).map_err(|source| GlossaryError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let rows = Self::parse(&content, path)?;
            tracing::debug!("Read {} glossary rows from {}", rows.len(), path.display());
            collected.extend(rows);
        }

        let set = Self::from_entries(collected);
        tracing::info!(
            "Loaded {} glossary terms from {} file(s)",
            set.len(),
            paths.len()
        );
        for conflict in set.conflicts() {
            tracing::warn!(
                "Glossary term '{}' has {} targets ({}); the first listed wins",
                conflict.source,
                conflict.targets.len(),
                conflict.targets.join(", ")
            );
        }

        Ok(set)
    }

    /// Parses tab-separated rows. `origin` is only used for error reporting.
    pub fn parse(content: &str, origin: &Path) -> GlossaryResult<Vec<GlossaryEntry>> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut entries = Vec::new();

        for (line_num, line) in content.lines().enumerate() {
            let fields: Vec<&str> = line.split('\t').collect();

            if fields.iter().all(|f| f.trim().is_empty()) {
                continue;
            }
            if fields[0].trim().starts_with('#') {
                continue;
            }
            if fields.len() < 2 {
                return Err(GlossaryError::MalformedEntry {
                    path: origin.to_path_buf(),
                    line: line_num + 1,
                    fields: fields.len(),
                });
            }

            match GlossaryEntry::new(fields[0], fields[1]) {
                Some(entry) => entries.push(entry),
                None => tracing::warn!(
                    "Skipping empty glossary entry at {}:{}",
                    origin.display(),
                    line_num + 1
                ),
            }
        }

        Ok(entries)
    }

    pub fn entries(&self) -> &[GlossaryEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GlossaryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn statistics(&self) -> GlossaryStatistics {
        GlossaryStatistics {
            total_terms: self.entries.len(),
            longest_term: self.entries.iter().map(|e| e.source_len()).max().unwrap_or(0),
            shortest_term: self.entries.iter().map(|e| e.source_len()).min().unwrap_or(0),
        }
    }

    /// Sources (compared case-insensitively) mapped to more than one target,
    /// in term-set order.
    pub fn conflicts(&self) -> Vec<TermConflict> {
        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, TermConflict> = HashMap::new();

        for entry in &self.entries {
            let key = entry.source.to_lowercase();
            let group = groups.entry(key.clone()).or_insert_with(|| {
                order.push(key);
                TermConflict {
                    source: entry.source.clone(),
                    targets: Vec::new(),
                }
            });
            if !group.targets.contains(&entry.target) {
                group.targets.push(entry.target.clone());
            }
        }

        order
            .into_iter()
            .filter_map(|key| groups.remove(&key))
            .filter(|c| c.targets.len() > 1)
            .collect()
    }
}

impl<'a> IntoIterator for &'a GlossaryTermSet {
    type Item = &'a GlossaryEntry;
    type IntoIter = std::slice::Iter<'a, GlossaryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
