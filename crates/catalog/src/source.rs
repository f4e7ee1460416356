use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::{LoadError, LoadResult};
use crate::qartod::QartodTest;
use crate::types::Attrs;

/// Which upstream collaborator a source stands in for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Standard-name definitions: unit, aliases, descriptions
    StandardNames,
    /// Community knowledge: variable names, cross-links, attrs
    Knowledge,
    /// QARTOD test-suite definitions
    Qartod,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::StandardNames => write!(f, "standard names"),
            SourceKind::Knowledge => write!(f, "knowledge"),
            SourceKind::Qartod => write!(f, "qartod"),
        }
    }
}

/// One record of a source. Only `name` is required; every other field is
/// overlaid onto the entry when non-empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceRecord {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub aliases: Vec<String>,
    pub long_name: Option<String>,
    pub description: Option<String>,
    pub ioos_category: Option<String>,
    pub common_variable_names: Vec<String>,
    pub sibling_standards: Vec<String>,
    pub related_standards: Vec<String>,
    pub other_units: Vec<String>,
    pub comments: Option<String>,
    pub attrs: Attrs,
    pub qartod: Vec<QartodTest>,
}

impl SourceRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// The record's key, if present and not blank
    pub fn key(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct SourceDocument {
    #[serde(default, alias = "standards")]
    standard: Vec<SourceRecord>,
}

/// A sequence of records from one collaborator, consumed by
/// [`crate::CatalogBuilder::load`]
#[derive(Debug, Clone)]
pub struct Source {
    /// Where the records came from, used in errors and logs
    pub origin: String,
    pub kind: SourceKind,
    pub records: Vec<SourceRecord>,
}

impl Source {
    pub fn new(origin: impl Into<String>, kind: SourceKind, records: Vec<SourceRecord>) -> Self {
        Self {
            origin: origin.into(),
            kind,
            records,
        }
    }

    /// Decode a JSON or TOML document with a top-level `standard` array.
    /// JSON is tried first; TOML is the fallback.
    pub fn parse(origin: impl Into<String>, kind: SourceKind, text: &str) -> LoadResult<Self> {
        let origin = origin.into();
        let document: SourceDocument = match serde_json::from_str(text) {
            Ok(document) => document,
            Err(json_err) => toml::from_str(text).map_err(|toml_err| {
                LoadError::decode(
                    &origin,
                    format!("not valid JSON ({json_err}) or TOML ({toml_err})"),
                )
            })?,
        };
        Ok(Self::new(origin, kind, document.standard))
    }

    pub fn from_file(kind: SourceKind, path: &Path) -> LoadResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|err| LoadError::io(path, err))?;
        Self::parse(path.display().to_string(), kind, &text)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qartod::QartodTestType;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_toml_records() {
        let text = r#"
            [[standard]]
            name = "air_temperature"
            unit = "K"
            aliases = ["AIRT"]
            ioos_category = "Temperature"

            [standard.attrs]
            coverage_content_type = "physicalMeasurement"
            ancillary_variables = "air_temperature_qc"

            [[standard]]
            name = "sea_water_salinity"

            [[standard.qartod]]
            name = "Estuary"
            slug = "estuary"
            description = "Gross range for estuaries"
            test_types = ["gross_range", "flat_line"]
        "#;

        let source = Source::parse("inline", SourceKind::StandardNames, text).expect("toml");
        assert_eq!(source.len(), 2);

        let air = &source.records[0];
        assert_eq!(air.key(), Some("air_temperature"));
        assert_eq!(air.aliases, vec!["AIRT".to_string()]);
        let keys: Vec<_> = air.attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["coverage_content_type", "ancillary_variables"]);

        let salinity = &source.records[1];
        assert_eq!(salinity.qartod.len(), 1);
        assert_eq!(
            salinity.qartod[0].test_types,
            vec![QartodTestType::GrossRange, QartodTestType::FlatLine]
        );
    }

    #[test]
    fn decodes_json_records() {
        let text = r#"{"standard": [{"name": "sea_water_temperature", "other_units": ["degC"]}]}"#;
        let source = Source::parse("inline", SourceKind::Knowledge, text).expect("json");
        assert_eq!(source.records[0].other_units, vec!["degC".to_string()]);
        assert_eq!(source.kind, SourceKind::Knowledge);
    }

    #[test]
    fn blank_names_have_no_key() {
        assert_eq!(SourceRecord::default().key(), None);
        assert_eq!(SourceRecord::named("   ").key(), None);
        assert_eq!(SourceRecord::named(" x ").key(), Some("x"));
    }

    #[test]
    fn rejects_garbage() {
        let err = Source::parse("bad.toml", SourceKind::Qartod, "[[standard]\nname=")
            .expect_err("garbage must fail");
        assert!(matches!(err, LoadError::Decode { ref origin, .. } if origin == "bad.toml"));
    }
}
