//! Text and JSON renderings of catalog data. Every function here is a pure
//! mapping from catalog values to a string.

use anyhow::Result;
use serde::Serialize;
use serde_json::{Map, Value};
use standards_catalog::{ConfigStream, Entry, FilterView, QartodTest, Suggestion};

pub fn short(entry: &Entry) -> String {
    match &entry.long_name {
        Some(long_name) => format!("{} - {} - {}", entry.name, long_name, entry.unit),
        None => format!("{} - {}", entry.name, entry.unit),
    }
}

pub fn full(entry: &Entry) -> Result<String> {
    let mut lines = vec![short(entry)];

    let mut push_list = |label: &str, values: &[String]| {
        if !values.is_empty() {
            lines.push(format!("  {label}: {}", values.join(", ")));
        }
    };
    push_list("Aliases", &entry.aliases);
    push_list("Common variables", &entry.common_variable_names);
    push_list("Related standards", &entry.related_standards);
    push_list("Sibling standards", &entry.sibling_standards);
    push_list("Other units", &entry.other_units);

    if let Some(category) = &entry.ioos_category {
        lines.push(format!("  IOOS Category: {category}"));
    }
    if !entry.attrs.is_empty() {
        lines.push(format!("  Suggested attributes:\n{}", indent(&xarray(entry)?, 4)));
    }

    let mut output = lines.join("\n");

    if !entry.qartod.is_empty() {
        let suites: Vec<String> = entry.qartod.iter().map(|test| format!("- {test}")).collect();
        output.push_str(&format!("\n\nQARTOD Test Suites:\n{}", suites.join("\n")));
    }
    if !entry.description.is_empty() {
        output.push_str(&format!("\n\n{}", entry.description));
    }
    if let Some(comments) = &entry.comments {
        output.push_str(&format!("\n\nComments: {comments}"));
    }

    Ok(output)
}

/// Suggested Xarray/NetCDF attributes as a JSON object, keys in order
pub fn xarray(entry: &Entry) -> Result<String> {
    json(&xarray_value(entry))
}

fn xarray_value(entry: &Entry) -> Value {
    let attrs: Map<String, Value> = entry
        .suggested_attrs()
        .into_iter()
        .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
        .collect();
    Value::Object(attrs)
}

pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Machine readable result of a filter run
#[derive(Serialize)]
pub struct FilterPayload<'a> {
    pub filters: Vec<String>,
    pub total: usize,
    pub standards: &'a [&'a Entry],
}

impl<'a> FilterPayload<'a> {
    pub fn new(view: &'a FilterView<'a>) -> Self {
        Self {
            filters: view.predicates().iter().map(ToString::to_string).collect(),
            total: view.baseline_len(),
            standards: view.entries(),
        }
    }
}

pub fn list_short(view: &FilterView<'_>) -> String {
    view.entries()
        .iter()
        .map(|entry| format!("- {}", short(entry)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn list_xarray(view: &FilterView<'_>) -> Result<String> {
    let values: Vec<Value> = view.entries().iter().map(|entry| xarray_value(entry)).collect();
    json(&values)
}

pub fn qartod_list(entry: &Entry) -> String {
    let suites: Vec<String> = entry.qartod.iter().map(|test| format!("- {test}")).collect();
    format!("QARTOD Test Suites for {}:\n{}", entry.name, suites.join("\n"))
}

pub fn qartod_details(test: &QartodTest) -> String {
    let mut output = format!("{} ({})", test.name, test.slug);
    if let Some(summary) = &test.summary {
        output.push_str(&format!("\n\n{summary}"));
    }
    let test_types = test.covered_test_types();
    if !test_types.is_empty() {
        output.push_str("\n\nTest types:");
        for test_type in &test_types {
            output.push_str(&format!("\n- {test_type}"));
        }
    }
    if !test.arguments.is_empty() {
        output.push_str("\n\nArguments:");
        let mut arguments: Vec<_> = test.arguments.iter().collect();
        arguments.sort_by(|a, b| a.name.cmp(&b.name));
        for argument in arguments {
            output.push_str(&format!("\n- {}: {}", argument.name, argument.description));
            if argument.required {
                output.push_str(" (required)");
            }
        }
    }
    if !test.description.is_empty() {
        output.push_str(&format!("\n\n{}", test.description));
    }
    output
}

/// Generated ioos_qc config stream as YAML, under a heading naming the suite
pub fn qartod_config_yaml(test: &QartodTest, config: &ConfigStream) -> Result<String> {
    let yaml = serde_yaml::to_string(config)?;
    Ok(format!(
        "Generated configuration for {}:\n{}",
        test.name,
        yaml.trim_end()
    ))
}

pub fn did_you_mean(suggestions: &[Suggestion<'_>]) -> Option<String> {
    if suggestions.is_empty() {
        return None;
    }
    let names: Vec<String> = suggestions
        .iter()
        .map(|s| {
            if s.matched == s.entry.name {
                format!("  {}", s.entry.name)
            } else {
                format!("  {} (alias of {})", s.matched, s.entry.name)
            }
        })
        .collect();
    Some(format!("Did you mean:\n{}", names.join("\n")))
}

fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| format!("{pad}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
