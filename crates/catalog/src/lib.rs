//! # Standards Catalog
//!
//! Queryable knowledge catalog for scientific measurement standards such as
//! CF standard names.
//!
//! ## Architecture
//!
//! ```text
//! Sources (standard names, knowledge, QARTOD)
//!     │
//!     ├──> CatalogBuilder::load (single writer, merged by name)
//!     │      └─ EntryStore: entries in load order + name/alias indexes
//!     │
//!     └──> Catalog (frozen, Send + Sync)
//!            ├─ get(name)      → exact name, then exact alias
//!            ├─ filter()       → FilterView, chainable AND of predicates
//!            ├─ known_ioos_categories()
//!            └─ Entry::qartod → QartodTest::scaffold → ioos_qc ConfigStream
//! ```
//!
//! ## Example
//!
//! ```rust
//! use standards_catalog::Catalog;
//!
//! let catalog = Catalog::bundled().unwrap();
//!
//! let pressure = catalog.get("air_pressure_at_sea_level").unwrap();
//! assert_eq!(pressure.name, "air_pressure_at_mean_sea_level");
//!
//! let view = catalog.filter().by_ioos_category("Temperature").search("sea");
//! for entry in view.entries() {
//!     println!("{} [{}]", entry.name, entry.unit);
//! }
//! ```

mod bundled;
mod catalog;
mod config;
mod error;
mod filter;
mod fuzzy;
mod lookup;
mod qartod;
mod source;
mod store;
mod types;
pub mod vocabulary;

pub use bundled::shared as shared_bundled;
pub use catalog::{Catalog, CatalogBuilder};
pub use config::CatalogConfig;
pub use error::{
    LoadError, LoadResult, LookupError, LookupResult, ScaffoldError, ScaffoldResult,
};
pub use filter::{FilterView, Predicate};
pub use fuzzy::{Suggester, Suggestion};
pub use source::{Source, SourceKind, SourceRecord};
pub use store::{EntryStore, LoadStats};
pub use qartod::{
    ArgumentType, ArgumentValue, Arguments, ConfigStream, FlatLineTest, Generator,
    GrossRangeTest, LocationTest, QartodConfig, QartodTest, QartodTestType, RateOfChangeTest,
    SpikeTest, TestArgument,
};
pub use types::{Attrs, Entry};
