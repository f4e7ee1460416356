use std::collections::HashSet;
use std::path::Path;

use log::{debug, info};

use crate::bundled;
use crate::config::CatalogConfig;
use crate::error::{LoadResult, LookupResult};
use crate::filter::FilterView;
use crate::fuzzy::{Suggester, Suggestion};
use crate::lookup;
use crate::source::{Source, SourceKind};
use crate::store::{EntryStore, LoadStats};
use crate::types::Entry;

/// Load phase of a catalog. Holding `&mut` is the only way to add data, so
/// loads are serialized; [`CatalogBuilder::build`] freezes the result.
///
/// A builder whose `load` returned an error may be partially loaded and
/// should be dropped.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    store: EntryStore,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, source: &Source) -> LoadResult<LoadStats> {
        self.store.load(source)
    }

    pub fn load_file(&mut self, kind: SourceKind, path: &Path) -> LoadResult<LoadStats> {
        let source = Source::from_file(kind, path)?;
        self.load(&source)
    }

    /// Load the data set embedded in this crate
    pub fn load_bundled(&mut self) -> LoadResult<()> {
        for source in bundled::sources()? {
            self.load(&source)?;
        }
        Ok(())
    }

    /// Load everything `config` names, bundled data first
    pub fn load_config(&mut self, config: &CatalogConfig) -> LoadResult<()> {
        config.validate()?;
        if config.bundled {
            self.load_bundled()?;
        }
        for (kind, path) in config.sources() {
            self.load_file(kind, path)?;
        }
        Ok(())
    }

    pub fn build(self) -> Catalog {
        Catalog::freeze(self.store)
    }
}

/// Frozen, read-only catalog of standards. The only handle external callers
/// need: lookups, filter views and the category list.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    store: EntryStore,
    categories: Vec<String>,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// Catalog of the embedded data set
    pub fn bundled() -> LoadResult<Self> {
        let mut builder = Self::builder();
        builder.load_bundled()?;
        Ok(builder.build())
    }

    pub fn from_config(config: &CatalogConfig) -> LoadResult<Self> {
        let mut builder = Self::builder();
        builder.load_config(config)?;
        Ok(builder.build())
    }

    fn freeze(store: EntryStore) -> Self {
        let categories = first_seen_categories(&store);

        for entry in store.all_entries() {
            let dangling: Vec<&str> = entry
                .related_standards
                .iter()
                .chain(entry.sibling_standards.iter())
                .map(String::as_str)
                .filter(|name| store.by_name(name).is_none())
                .collect();
            if !dangling.is_empty() {
                debug!(
                    "{} links to standards outside the catalog: {}",
                    entry.name,
                    dangling.join(", ")
                );
            }
        }

        info!("Catalog ready with {} standards", store.len());
        Self { store, categories }
    }

    /// Look up a standard by canonical name, then by alias
    pub fn get(&self, name_or_alias: &str) -> LookupResult<&Entry> {
        lookup::resolve(&self.store, name_or_alias)
    }

    /// Unfiltered view over every entry
    pub fn filter(&self) -> FilterView<'_> {
        FilterView::new(&self.store)
    }

    /// Distinct IOOS categories in first-seen order
    pub fn known_ioos_categories(&self) -> &[String] {
        &self.categories
    }

    /// Fuzzy "did you mean" candidates for a name that did not resolve
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<Suggestion<'_>> {
        Suggester::new().suggest(query, &self.store, limit)
    }

    pub fn entries(&self) -> &[Entry] {
        self.store.all_entries()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

fn first_seen_categories(store: &EntryStore) -> Vec<String> {
    let mut seen = HashSet::new();
    store
        .all_entries()
        .iter()
        .filter_map(|entry| entry.ioos_category.as_deref())
        .filter(|category| seen.insert(*category))
        .map(str::to_string)
        .collect()
}
