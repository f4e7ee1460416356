use crate::error::{LookupError, LookupResult};
use crate::store::EntryStore;
use crate::types::Entry;

/// Resolve a user supplied name to exactly one entry.
///
/// Surrounding whitespace is trimmed, nothing else is normalized. Canonical
/// names are tried before aliases.
pub fn resolve<'a>(store: &'a EntryStore, query: &str) -> LookupResult<&'a Entry> {
    let query = query.trim();
    if query.is_empty() {
        return Err(LookupError::EmptyQuery);
    }

    store
        .by_name(query)
        .or_else(|| store.by_alias(query))
        .ok_or_else(|| LookupError::NotFound {
            query: query.to_string(),
        })
}
