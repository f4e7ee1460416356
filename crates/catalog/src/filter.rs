use std::fmt;

use crate::store::EntryStore;
use crate::types::Entry;

/// One narrowing criterion of a [`FilterView`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive match on common variable names, name or aliases
    VariableName(String),
    /// Exact IOOS category
    IoosCategory(String),
    /// Exact unit, or one of the other units
    Unit(String),
    /// At least one QARTOD test suite
    HasQartodTests,
    /// Case-insensitive substring of name, long name or description
    Search(String),
}

impl Predicate {
    pub fn matches(&self, entry: &Entry) -> bool {
        match self {
            Predicate::VariableName(text) => {
                let needle = text.to_lowercase();
                let same = |candidate: &String| candidate.to_lowercase() == needle;
                same(&entry.name)
                    || entry.aliases.iter().any(same)
                    || entry.common_variable_names.iter().any(same)
            }
            Predicate::IoosCategory(category) => {
                entry.ioos_category.as_deref() == Some(category.as_str())
            }
            Predicate::Unit(unit) => {
                entry.unit == *unit || entry.other_units.iter().any(|other| other == unit)
            }
            Predicate::HasQartodTests => entry.has_qartod_tests(),
            Predicate::Search(text) => {
                let needle = text.to_lowercase();
                let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);
                contains(entry.name.as_str())
                    || entry.long_name.as_deref().is_some_and(contains)
                    || contains(entry.description.as_str())
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::VariableName(text) => write!(f, "variable name = {text}"),
            Predicate::IoosCategory(category) => write!(f, "IOOS category = {category}"),
            Predicate::Unit(unit) => write!(f, "unit = {unit}"),
            Predicate::HasQartodTests => write!(f, "has QARTOD tests"),
            Predicate::Search(text) => write!(f, "search = {text}"),
        }
    }
}

/// Immutable, chainable narrowing of the catalog.
///
/// Every `by_*` call returns a new view holding the entries that satisfy all
/// predicates applied so far, in catalog order. The receiving view is left
/// untouched, so any intermediate view can be branched from. Blank criteria
/// do not narrow and are not recorded.
#[derive(Debug, Clone)]
pub struct FilterView<'a> {
    baseline: usize,
    candidates: Vec<&'a Entry>,
    predicates: Vec<Predicate>,
}

impl<'a> FilterView<'a> {
    pub(crate) fn new(store: &'a EntryStore) -> Self {
        Self {
            baseline: store.len(),
            candidates: store.all_entries().iter().collect(),
            predicates: Vec::new(),
        }
    }

    /// Standards commonly stored under `variable_name`
    pub fn by_variable_name(&self, variable_name: &str) -> Self {
        self.narrow_text(variable_name, Predicate::VariableName)
    }

    pub fn by_ioos_category(&self, category: &str) -> Self {
        self.narrow_text(category, Predicate::IoosCategory)
    }

    pub fn by_unit(&self, unit: &str) -> Self {
        self.narrow_text(unit, Predicate::Unit)
    }

    /// Keep only standards with QARTOD test suites. `false` is a no-op.
    pub fn has_qartod_tests(&self, flag: bool) -> Self {
        if flag {
            self.narrow(Predicate::HasQartodTests)
        } else {
            self.clone()
        }
    }

    pub fn search(&self, text: &str) -> Self {
        self.narrow_text(text, Predicate::Search)
    }

    /// Current candidates, in catalog order
    pub fn entries(&self) -> &[&'a Entry] {
        &self.candidates
    }

    pub fn names(&self) -> Vec<&'a str> {
        self.candidates.iter().map(|entry| entry.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// True until an effective predicate has been applied. A filter that
    /// happens to match every entry still counts as filtered.
    pub fn is_unfiltered(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Predicates applied so far, oldest first
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Number of entries in the catalog the view was rooted at
    pub fn baseline_len(&self) -> usize {
        self.baseline
    }

    /// Whitespace-only criteria are skipped. Anything else is matched as
    /// given, surrounding whitespace included.
    fn narrow_text(&self, criterion: &str, predicate: fn(String) -> Predicate) -> Self {
        if criterion.trim().is_empty() {
            return self.clone();
        }
        self.narrow(predicate(criterion.to_string()))
    }

    fn narrow(&self, predicate: Predicate) -> Self {
        let candidates = self
            .candidates
            .iter()
            .copied()
            .filter(|entry| predicate.matches(entry))
            .collect();
        let mut predicates = self.predicates.clone();
        predicates.push(predicate);

        Self {
            baseline: self.baseline,
            candidates,
            predicates,
        }
    }
}

impl<'v, 'a> IntoIterator for &'v FilterView<'a> {
    type Item = &'a Entry;
    type IntoIter = std::iter::Copied<std::slice::Iter<'v, &'a Entry>>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter().copied()
    }
}
