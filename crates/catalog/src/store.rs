use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use crate::error::{LoadError, LoadResult};
use crate::source::{Source, SourceRecord};
use crate::qartod::QartodTest;
use crate::types::Entry;
use crate::vocabulary;

/// Outcome of loading one source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub records: usize,
    pub created: usize,
    pub overlaid: usize,
    /// Aliases hidden by a canonical name of the same spelling
    pub shadowed: usize,
}

/// Arena of entries in first-appearance order, plus exact-match indexes by
/// canonical name and by alias. Both indexes hold positions into `entries`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryStore {
    entries: Vec<Entry>,
    by_name: HashMap<String, usize>,
    by_alias: HashMap<String, usize>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge every record of `source` into the store, keyed by name.
    ///
    /// Records are applied one at a time. A failing record aborts the call
    /// with the records before it already applied.
    pub fn load(&mut self, source: &Source) -> LoadResult<LoadStats> {
        let mut stats = LoadStats {
            records: source.len(),
            ..LoadStats::default()
        };

        for (index, record) in source.records.iter().enumerate() {
            let name = record
                .key()
                .ok_or_else(|| LoadError::malformed(&source.origin, index))?;

            let aliases = clean_list(&record.aliases, Some(name));
            stats.shadowed += self.check_aliases(name, &aliases)?;

            let position = match self.by_name.get(name) {
                Some(&position) => {
                    stats.overlaid += 1;
                    position
                }
                None => {
                    if let Some(&owner) = self.by_alias.get(name) {
                        warn!(
                            "Standard '{name}' shadows the alias of the same name on '{}'",
                            self.entries[owner].name
                        );
                        stats.shadowed += 1;
                    }
                    stats.created += 1;
                    self.insert_entry(Entry::new(name))
                }
            };

            if !aliases.is_empty() {
                self.reindex_aliases(position, aliases);
            }
            overlay(&mut self.entries[position], record);

            if let Some(category) = record.ioos_category.as_deref() {
                if !category.trim().is_empty() && !vocabulary::is_known_category(category) {
                    warn!("{}: '{name}' uses unknown IOOS category '{category}'", source.origin);
                }
            }
        }

        debug!(
            "Loaded {} source {}: {} records, {} new, {} overlaid, {} aliases shadowed",
            source.kind,
            source.origin,
            stats.records,
            stats.created,
            stats.overlaid,
            stats.shadowed
        );
        Ok(stats)
    }

    /// All entries in first-appearance order
    pub fn all_entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn by_name(&self, name: &str) -> Option<&Entry> {
        self.by_name.get(name).map(|&position| &self.entries[position])
    }

    pub fn by_alias(&self, alias: &str) -> Option<&Entry> {
        self.by_alias.get(alias).map(|&position| &self.entries[position])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert_entry(&mut self, entry: Entry) -> usize {
        let position = self.entries.len();
        self.by_name.insert(entry.name.clone(), position);
        self.entries.push(entry);
        position
    }

    /// Fails on an alias owned by another standard. Returns how many of
    /// `aliases` are hidden by an existing canonical name.
    fn check_aliases(&self, name: &str, aliases: &[String]) -> LoadResult<usize> {
        let mut shadowed = 0;
        for alias in aliases {
            if let Some(&position) = self.by_alias.get(alias) {
                let existing = &self.entries[position].name;
                if existing != name {
                    return Err(LoadError::DuplicateAlias {
                        alias: alias.clone(),
                        existing_name: existing.clone(),
                        incoming_name: name.to_string(),
                    });
                }
            }
            if self.by_name.contains_key(alias) {
                warn!("Alias '{alias}' of '{name}' is shadowed by a standard with that name");
                shadowed += 1;
            }
        }
        Ok(shadowed)
    }

    fn reindex_aliases(&mut self, position: usize, aliases: Vec<String>) {
        for stale in &self.entries[position].aliases {
            self.by_alias.remove(stale);
        }
        for alias in &aliases {
            self.by_alias.insert(alias.clone(), position);
        }
        self.entries[position].aliases = aliases;
    }
}

fn overlay(entry: &mut Entry, record: &SourceRecord) {
    if let Some(unit) = non_blank(&record.unit) {
        entry.unit = unit.to_string();
    }
    if let Some(description) = non_blank(&record.description) {
        entry.description = description.to_string();
    }
    overlay_option(&mut entry.long_name, &record.long_name);
    overlay_option(&mut entry.ioos_category, &record.ioos_category);
    overlay_option(&mut entry.comments, &record.comments);

    overlay_list(&mut entry.common_variable_names, &record.common_variable_names);
    overlay_list(&mut entry.sibling_standards, &record.sibling_standards);
    overlay_list(&mut entry.related_standards, &record.related_standards);
    overlay_list(&mut entry.other_units, &record.other_units);

    entry.attrs.overlay(&record.attrs);

    if !record.qartod.is_empty() {
        entry.qartod = dedup_by_slug(&record.qartod);
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn overlay_option(slot: &mut Option<String>, incoming: &Option<String>) {
    if let Some(value) = non_blank(incoming) {
        *slot = Some(value.to_string());
    }
}

fn overlay_list(slot: &mut Vec<String>, incoming: &[String]) {
    let cleaned = clean_list(incoming, None);
    if !cleaned.is_empty() {
        *slot = cleaned;
    }
}

/// Trimmed, non-blank, first-occurrence-wins copy of `values`, skipping
/// `exclude` when given
fn clean_list(values: &[String], exclude: Option<&str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty() && Some(*value) != exclude)
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}

fn dedup_by_slug(tests: &[QartodTest]) -> Vec<QartodTest> {
    let mut seen = HashSet::new();
    tests
        .iter()
        .filter(|test| seen.insert(test.slug.as_str()))
        .cloned()
        .collect()
}
