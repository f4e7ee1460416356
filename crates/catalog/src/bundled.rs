use once_cell::sync::OnceCell;

use crate::catalog::Catalog;
use crate::error::LoadResult;
use crate::source::{Source, SourceKind};

const STANDARD_NAMES: &str = include_str!("../data/standard_names.toml");
const KNOWLEDGE: &str = include_str!("../data/knowledge.toml");
const QARTOD: &str = include_str!("../data/qartod.toml");

/// Embedded sources in load order
pub fn sources() -> LoadResult<Vec<Source>> {
    Ok(vec![
        Source::parse("bundled:standard_names", SourceKind::StandardNames, STANDARD_NAMES)?,
        Source::parse("bundled:knowledge", SourceKind::Knowledge, KNOWLEDGE)?,
        Source::parse("bundled:qartod", SourceKind::Qartod, QARTOD)?,
    ])
}

/// Process-wide catalog of the embedded data, loaded on first use
pub fn shared() -> LoadResult<&'static Catalog> {
    static SHARED: OnceCell<Catalog> = OnceCell::new();
    SHARED.get_or_try_init(Catalog::bundled)
}
