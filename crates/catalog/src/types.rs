use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::qartod::QartodTest;

/// A measurement standard (e.g. a CF standard name) and everything the
/// catalog knows about it
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Entry {
    /// Canonical standard name, unique across the catalog
    pub name: String,

    /// Canonical unit, empty for dimensionless or unspecified standards
    pub unit: String,

    /// Alternate names that resolve to this entry
    pub aliases: Vec<String>,

    /// Human readable name
    pub long_name: Option<String>,

    pub description: String,

    /// Usual IOOS category for the standard
    pub ioos_category: Option<String>,

    /// Variable/column names this standard is commonly stored under
    pub common_variable_names: Vec<String>,

    /// Standards that are usually used together
    pub sibling_standards: Vec<String>,

    /// Other standards to consider
    pub related_standards: Vec<String>,

    /// Other units that may be seen
    pub other_units: Vec<String>,

    /// Community comments on standard usage
    pub comments: Option<String>,

    /// Suggested metadata attributes, in insertion order
    pub attrs: Attrs,

    /// QARTOD test suites
    pub qartod: Vec<QartodTest>,
}

impl Entry {
    /// Create an entry holding only its canonical name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn has_qartod_tests(&self) -> bool {
        !self.qartod.is_empty()
    }

    /// Find a QARTOD test suite by its slug
    pub fn qartod_test(&self, slug: &str) -> Option<&QartodTest> {
        self.qartod.iter().find(|test| test.slug == slug)
    }

    /// Attributes usually written alongside this standard in Xarray or
    /// NetCDF metadata.
    ///
    /// `standard_name` always comes first, followed by `units`, `long_name`
    /// and `ioos_category` when they are set, then the entry's own `attrs`
    /// in insertion order. An `attrs` key that repeats one of the leading
    /// keys overrides its value in place.
    pub fn suggested_attrs(&self) -> Vec<(&str, &str)> {
        let mut attrs: Vec<(&str, &str)> = vec![("standard_name", self.name.as_str())];

        if !self.unit.is_empty() {
            attrs.push(("units", self.unit.as_str()));
        }
        if let Some(long_name) = self.long_name.as_deref().filter(|s| !s.is_empty()) {
            attrs.push(("long_name", long_name));
        }
        if let Some(category) = self.ioos_category.as_deref().filter(|s| !s.is_empty()) {
            attrs.push(("ioos_category", category));
        }

        for (key, value) in self.attrs.iter() {
            match attrs.iter_mut().find(|(existing, _)| *existing == key) {
                Some(slot) => slot.1 = value,
                None => attrs.push((key, value)),
            }
        }

        attrs
    }
}

/// Attribute key/value pairs with unique keys, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs(Vec<(String, String)>);

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Insert or replace a value. A replaced key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Key-wise overlay of `other` onto `self`
    pub fn overlay(&mut self, other: &Attrs) {
        for (key, value) in other.iter() {
            self.insert(key, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attrs::new();
        for (key, value) in iter {
            attrs.insert(key, value);
        }
        attrs
    }
}

impl Serialize for Attrs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Attrs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AttrsVisitor;

        impl<'de> Visitor<'de> for AttrsVisitor {
            type Value = Attrs;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of attribute names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Attrs, A::Error> {
                let mut attrs = Attrs::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    attrs.insert(key, value);
                }
                Ok(attrs)
            }
        }

        deserializer.deserialize_map(AttrsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qartod::QartodTestType;
    use pretty_assertions::assert_eq;

    fn salinity() -> Entry {
        Entry {
            name: "sea_water_practical_salinity".to_string(),
            unit: "1".to_string(),
            long_name: Some("Practical Salinity".to_string()),
            ioos_category: Some("Salinity".to_string()),
            attrs: [("coverage_content_type", "physicalMeasurement")]
                .into_iter()
                .collect(),
            ..Entry::default()
        }
    }

    #[test]
    fn suggested_attrs_lead_with_standard_name() {
        let entry = salinity();
        assert_eq!(
            entry.suggested_attrs(),
            vec![
                ("standard_name", "sea_water_practical_salinity"),
                ("units", "1"),
                ("long_name", "Practical Salinity"),
                ("ioos_category", "Salinity"),
                ("coverage_content_type", "physicalMeasurement"),
            ]
        );
    }

    #[test]
    fn suggested_attrs_skip_empty_unit_and_override_in_place() {
        let mut entry = Entry::new("region");
        entry.attrs.insert("units", "none");
        assert_eq!(
            entry.suggested_attrs(),
            vec![("standard_name", "region"), ("units", "none")]
        );

        let mut entry = salinity();
        entry.attrs.insert("long_name", "Salinity (PSU)");
        let attrs = entry.suggested_attrs();
        assert_eq!(attrs[2], ("long_name", "Salinity (PSU)"));
        assert_eq!(attrs.len(), 5);
    }

    #[test]
    fn attrs_keep_insertion_order_and_unique_keys() {
        let mut attrs = Attrs::new();
        attrs.insert("b", "1");
        attrs.insert("a", "2");
        attrs.insert("b", "3");

        let pairs: Vec<_> = attrs.iter().collect();
        assert_eq!(pairs, vec![("b", "3"), ("a", "2")]);
    }

    #[test]
    fn attrs_deserialize_in_document_order() {
        let attrs: Attrs = serde_json::from_str(r#"{"zeta": "1", "alpha": "2", "mid": "3"}"#)
            .expect("attrs parse");
        let keys: Vec<_> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn qartod_test_lookup_by_slug() {
        let mut entry = Entry::new("sea_surface_height_above_geopotential_datum");
        entry.qartod.push(QartodTest {
            name: "Gulf of Maine".to_string(),
            slug: "gulf_of_maine".to_string(),
            summary: Some("Water level gross range".to_string()),
            test_types: vec![QartodTestType::GrossRange, QartodTestType::Spike],
            ..QartodTest::default()
        });

        assert!(entry.has_qartod_tests());
        let test = entry.qartod_test("gulf_of_maine").expect("suite");
        assert_eq!(
            test.to_string(),
            "Gulf of Maine (gulf_of_maine): Water level gross range"
        );
        assert!(entry.qartod_test("missing").is_none());
        assert_eq!(QartodTestType::RateOfChange.to_string(), "Rate of Change");
    }
}
