use std::path::PathBuf;

use thiserror::Error;

use crate::qartod::ArgumentType;

/// Result type for catalog loading
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Result type for name/alias lookups
pub type LookupResult<T> = std::result::Result<T, LookupError>;

/// Result type for QARTOD config scaffolding
pub type ScaffoldResult<T> = std::result::Result<T, ScaffoldError>;

/// Errors raised while populating a catalog.
///
/// Every variant is fatal to the load call that produced it. Loading is not
/// transactional, so a catalog builder that returned one of these must be
/// discarded.
#[derive(Error, Debug)]
pub enum LoadError {
    /// A record is missing its `name`
    #[error("Malformed source {origin}: record {index} has no name")]
    MalformedSource { origin: String, index: usize },

    /// An alias would resolve to two different standards
    #[error("Duplicate alias '{alias}': already maps to '{existing_name}', cannot map to '{incoming_name}'")]
    DuplicateAlias {
        alias: String,
        existing_name: String,
        incoming_name: String,
    },

    /// Source or config file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source document is not valid JSON or TOML
    #[error("Failed to decode {origin}: {message}")]
    Decode { origin: String, message: String },

    /// Invalid catalog configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl LoadError {
    /// Create a malformed source error
    pub fn malformed(origin: impl Into<String>, index: usize) -> Self {
        Self::MalformedSource {
            origin: origin.into(),
            index,
        }
    }

    /// Create a decode error
    pub fn decode(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            origin: origin.into(),
            message: message.into(),
        }
    }

    /// Create an IO error for `path`
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised by [`crate::Catalog::get`]. Both are recoverable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Query was empty after trimming
    #[error("Empty query")]
    EmptyQuery,

    /// No standard has this name or alias
    #[error("Didn't find a standard matching: {query}")]
    NotFound { query: String },
}

/// Errors raised while turning a QARTOD test suite into an ioos_qc config
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScaffoldError {
    /// Argument was not written as `key=value`
    #[error("Invalid argument format: {0}")]
    MalformedArgument(String),

    /// Argument value does not parse as the declared type
    #[error("Invalid value for {name}: expected {expected}, got '{value}'")]
    InvalidArgument {
        name: String,
        expected: ArgumentType,
        value: String,
    },

    /// A required argument was not supplied
    #[error("Missing required argument: {name}")]
    MissingArgument { name: String },

    /// The suite has neither a generator nor a static config
    #[error("Test suite {slug} has no configuration to generate")]
    Unsupported { slug: String },
}

impl ScaffoldError {
    /// Create a missing argument error
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingArgument { name: name.into() }
    }
}
