use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Matcher, Utf32String};

use crate::store::EntryStore;
use crate::types::Entry;

/// A near miss for a name that failed to resolve
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion<'a> {
    pub entry: &'a Entry,
    /// Name or alias that scored best
    pub matched: &'a str,
    /// Normalized to 0-1 against the best suggestion
    pub score: f32,
}

/// "Did you mean" suggestions using nucleo-matcher.
///
/// This never participates in lookups; name resolution stays exact.
pub struct Suggester {
    matcher: Matcher,
}

impl Suggester {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(nucleo_matcher::Config::DEFAULT),
        }
    }

    /// Best matching entries by name or alias, highest score first and
    /// catalog order between equal scores
    pub fn suggest<'a>(
        &mut self,
        query: &str,
        store: &'a EntryStore,
        limit: usize,
    ) -> Vec<Suggestion<'a>> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }
        let pattern = Pattern::parse(query, CaseMatching::Smart, Normalization::Smart);

        let mut scored: Vec<(&'a Entry, &'a str, u32)> = store
            .all_entries()
            .iter()
            .filter_map(|entry| {
                std::iter::once(&entry.name)
                    .chain(entry.aliases.iter())
                    .filter_map(|candidate| {
                        let haystack = Utf32String::from(candidate.as_str());
                        pattern
                            .score(haystack.slice(..), &mut self.matcher)
                            .map(|score| (candidate.as_str(), score))
                    })
                    // Ties go to the canonical name, which comes first
                    .fold(None::<(&'a str, u32)>, |best, (candidate, score)| match best {
                        Some((_, best_score)) if best_score >= score => best,
                        _ => Some((candidate, score)),
                    })
                    .map(|(matched, score)| (entry, matched, score))
            })
            .collect();

        // Stable sort keeps catalog order for equal scores
        scored.sort_by(|a, b| b.2.cmp(&a.2));
        scored.truncate(limit);

        let max_score = scored.first().map(|(_, _, s)| *s as f32).unwrap_or(1.0);
        scored
            .into_iter()
            .map(|(entry, matched, score)| Suggestion {
                entry,
                matched,
                score: if max_score > 0.0 {
                    score as f32 / max_score
                } else {
                    0.0
                },
            })
            .collect()
    }
}

impl Default for Suggester {
    fn default() -> Self {
        Self::new()
    }
}
