//! QARTOD test suite descriptors and ioos_qc config scaffolding.
//!
//! A suite produces an `ioos_qc` config stream either from a built-in
//! [`Generator`] fed with site arguments, or from a static config carried in
//! the source data. See <https://ioos.github.io/ioos_qc/usage.html#config>.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ScaffoldError, ScaffoldResult};

const FEET_TO_METERS: f64 = 0.3048;

/// Descriptor of a QARTOD quality-control test suite
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QartodTest {
    /// Display label
    pub name: String,

    /// Stable identifier
    pub slug: String,

    #[serde(default)]
    pub description: String,

    /// One line summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// QARTOD tests exercised by the suite
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_types: Vec<QartodTestType>,

    /// Site specific values the generator needs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<TestArgument>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<Generator>,

    /// Static config stream, used when there is no generator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<ConfigStream>,
}

impl fmt::Display for QartodTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.slug)?;
        if let Some(summary) = &self.summary {
            write!(f, ": {summary}")?;
        }
        Ok(())
    }
}

impl QartodTest {
    /// Declared test types, or the ones present in the static config
    pub fn covered_test_types(&self) -> Vec<QartodTestType> {
        match &self.tests {
            Some(tests) if self.test_types.is_empty() => tests.test_types(),
            _ => self.test_types.clone(),
        }
    }

    pub fn argument(&self, name: &str) -> Option<&TestArgument> {
        self.arguments.iter().find(|argument| argument.name == name)
    }

    /// Parse `key=value` pairs, typed by the matching argument descriptor.
    /// Keys the suite does not declare are kept as strings.
    pub fn parse_arguments<S: AsRef<str>>(&self, pairs: &[S]) -> ScaffoldResult<Arguments> {
        let mut arguments = Arguments::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, raw) = pair
                .split_once('=')
                .filter(|(key, raw)| !key.trim().is_empty() && !raw.contains('='))
                .ok_or_else(|| ScaffoldError::MalformedArgument(pair.to_string()))?;
            let key = key.trim();
            let argument_type = self
                .argument(key)
                .map(|argument| argument.argument_type)
                .unwrap_or_default();
            arguments.insert(key, argument_type.parse(key, raw)?);
        }
        Ok(arguments)
    }

    /// Build the ioos_qc config stream for this suite
    pub fn scaffold(&self, arguments: &Arguments) -> ScaffoldResult<ConfigStream> {
        if let Some(missing) = self
            .arguments
            .iter()
            .find(|argument| argument.required && arguments.get(&argument.name).is_none())
        {
            return Err(ScaffoldError::missing(&missing.name));
        }

        match (self.generator, &self.tests) {
            (Some(generator), _) => generator.generate(arguments),
            (None, Some(tests)) => Ok(tests.clone()),
            (None, None) => Err(ScaffoldError::Unsupported {
                slug: self.slug.clone(),
            }),
        }
    }
}

/// Individual QARTOD test kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QartodTestType {
    Location,
    GrossRange,
    Climatology,
    Spike,
    RateOfChange,
    FlatLine,
    AttenuatedSignal,
    DensityInversion,
    NearestNeighbor,
}

impl fmt::Display for QartodTestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QartodTestType::Location => "Location",
            QartodTestType::GrossRange => "Gross Range",
            QartodTestType::Climatology => "Climatology",
            QartodTestType::Spike => "Spike",
            QartodTestType::RateOfChange => "Rate of Change",
            QartodTestType::FlatLine => "Flat Line",
            QartodTestType::AttenuatedSignal => "Attenuated Signal",
            QartodTestType::DensityInversion => "Density Inversion",
            QartodTestType::NearestNeighbor => "Nearest Neighbor",
        };
        f.write_str(label)
    }
}

/// A value a suite needs before it can generate its config
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestArgument {
    pub name: String,

    #[serde(default, rename = "type")]
    pub argument_type: ArgumentType,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentType {
    #[default]
    String,
    Bool,
    Int,
    Float,
}

impl ArgumentType {
    pub fn parse(self, name: &str, raw: &str) -> ScaffoldResult<ArgumentValue> {
        let invalid = || ScaffoldError::InvalidArgument {
            name: name.to_string(),
            expected: self,
            value: raw.to_string(),
        };
        let raw = raw.trim();
        Ok(match self {
            ArgumentType::String => ArgumentValue::String(raw.to_string()),
            ArgumentType::Bool => ArgumentValue::Bool(raw.parse().map_err(|_| invalid())?),
            ArgumentType::Int => ArgumentValue::Int(raw.parse().map_err(|_| invalid())?),
            ArgumentType::Float => ArgumentValue::Float(raw.parse().map_err(|_| invalid())?),
        })
    }
}

impl fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArgumentType::String => "string",
            ArgumentType::Bool => "bool",
            ArgumentType::Int => "int",
            ArgumentType::Float => "float",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    String(String),
    Bool(bool),
    Int(i64),
    Float(f64),
}

/// Parsed scaffold arguments by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(BTreeMap<String, ArgumentValue>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ArgumentValue) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ArgumentValue> {
        self.0.get(name)
    }

    /// Numeric argument as a float; integers widen
    pub fn float(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            ArgumentValue::Float(value) => Some(*value),
            ArgumentValue::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Built-in config generators for suites whose limits depend on the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Generator {
    /// Gulf of Maine water level limits from tidal datums (`mllw`, `mhhw`,
    /// NAVD 88 meters)
    GulfOfMaineWaterLevel,
}

impl Generator {
    pub fn generate(self, arguments: &Arguments) -> ScaffoldResult<ConfigStream> {
        match self {
            Generator::GulfOfMaineWaterLevel => {
                let mllw = required_float(arguments, "mllw")?;
                let mhhw = required_float(arguments, "mhhw")?;
                let span = [mllw - 4.5 * FEET_TO_METERS, mhhw + 6.0 * FEET_TO_METERS];

                Ok(ConfigStream {
                    qartod: QartodConfig {
                        gross_range_test: Some(GrossRangeTest {
                            suspect_span: span,
                            fail_span: span,
                        }),
                        rate_of_change_test: Some(RateOfChangeTest {
                            threshold: 0.75 * FEET_TO_METERS,
                        }),
                        spike_test: Some(SpikeTest {
                            suspect_threshold: 0.75 * FEET_TO_METERS,
                            fail_threshold: 1.5 * FEET_TO_METERS,
                        }),
                        flat_line_test: Some(FlatLineTest {
                            tolerance: 0.1 * FEET_TO_METERS,
                            suspect_threshold: 2 * 60 * 60,
                            fail_threshold: 3 * 60 * 60,
                        }),
                        ..QartodConfig::default()
                    },
                })
            }
        }
    }
}

fn required_float(arguments: &Arguments, name: &str) -> ScaffoldResult<f64> {
    arguments
        .float(name)
        .ok_or_else(|| ScaffoldError::missing(name))
}

/// One `ioos_qc` stream config
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigStream {
    #[serde(default)]
    pub qartod: QartodConfig,
}

impl ConfigStream {
    /// Test types configured in this stream, in ioos_qc order
    pub fn test_types(&self) -> Vec<QartodTestType> {
        let qartod = &self.qartod;
        [
            (qartod.location_test.is_some(), QartodTestType::Location),
            (qartod.gross_range_test.is_some(), QartodTestType::GrossRange),
            (qartod.spike_test.is_some(), QartodTestType::Spike),
            (qartod.rate_of_change_test.is_some(), QartodTestType::RateOfChange),
            (qartod.flat_line_test.is_some(), QartodTestType::FlatLine),
        ]
        .into_iter()
        .filter_map(|(present, test_type)| present.then_some(test_type))
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QartodConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross_range_test: Option<GrossRangeTest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_test: Option<LocationTest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_of_change_test: Option<RateOfChangeTest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spike_test: Option<SpikeTest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flat_line_test: Option<FlatLineTest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrossRangeTest {
    pub suspect_span: [f64; 2],
    pub fail_span: [f64; 2],
}

/// Bounding box as `[min_lon, min_lat, max_lon, max_lat]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationTest {
    pub bbox: [f64; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateOfChangeTest {
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpikeTest {
    pub suspect_threshold: f64,
    pub fail_threshold: f64,
}

/// Thresholds are durations in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatLineTest {
    pub tolerance: f64,
    pub suspect_threshold: i64,
    pub fail_threshold: i64,
}
