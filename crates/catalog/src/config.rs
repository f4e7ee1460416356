use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, LoadResult};
use crate::source::SourceKind;

/// Which sources a catalog is built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Load the embedded data set before any configured file
    pub bundled: bool,

    /// Standard-name definition files
    pub standard_names: Vec<PathBuf>,

    /// Community knowledge files
    pub knowledge: Vec<PathBuf>,

    /// QARTOD test-suite files
    pub qartod: Vec<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            bundled: true,
            standard_names: Vec::new(),
            knowledge: Vec::new(),
            qartod: Vec::new(),
        }
    }
}

impl CatalogConfig {
    /// Read a JSON or TOML config file. Relative source paths are resolved
    /// against the directory holding the config.
    pub fn from_file(path: &Path) -> LoadResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|err| LoadError::io(path, err))?;
        let mut config = Self::parse(path.display().to_string(), &text)?;
        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        Ok(config)
    }

    /// JSON is tried first; TOML is the fallback
    pub fn parse(origin: impl Into<String>, text: &str) -> LoadResult<Self> {
        let origin = origin.into();
        let config: Self = match serde_json::from_str(text) {
            Ok(config) => config,
            Err(json_err) => toml::from_str(text).map_err(|toml_err| {
                LoadError::decode(
                    &origin,
                    format!("not valid JSON ({json_err}) or TOML ({toml_err})"),
                )
            })?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LoadResult<()> {
        if !self.bundled && self.sources().next().is_none() {
            return Err(LoadError::Config(
                "bundled data is disabled and no source files are configured".to_string(),
            ));
        }
        Ok(())
    }

    /// Configured files in load order: standard names, knowledge, QARTOD
    pub fn sources(&self) -> impl Iterator<Item = (SourceKind, &Path)> {
        tagged(SourceKind::StandardNames, &self.standard_names)
            .chain(tagged(SourceKind::Knowledge, &self.knowledge))
            .chain(tagged(SourceKind::Qartod, &self.qartod))
    }

    fn rebase(&mut self, base: &Path) {
        for path in self
            .standard_names
            .iter_mut()
            .chain(self.knowledge.iter_mut())
            .chain(self.qartod.iter_mut())
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

fn tagged(kind: SourceKind, paths: &[PathBuf]) -> impl Iterator<Item = (SourceKind, &Path)> {
    paths.iter().map(move |path| (kind, path.as_path()))
}
