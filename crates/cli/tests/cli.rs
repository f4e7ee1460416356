use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

#[allow(deprecated)]
fn standards() -> Command {
    let mut cmd = Command::cargo_bin("standards").expect("binary");
    cmd.env_remove("STANDARDS_CATALOG_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn run_json(args: &[&str]) -> Value {
    let output = standards().args(args).output().expect("command run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid json")
}

#[test]
fn get_resolves_alias_to_canonical_entry() {
    standards()
        .args(["get", "air_pressure_at_sea_level", "--format", "short"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("air_pressure_at_mean_sea_level"));
}

#[test]
fn get_full_shows_qartod_suites() {
    standards()
        .args(["get", "sea_surface_height_above_geopotential_datum"])
        .assert()
        .success()
        .stdout(predicate::str::contains("QARTOD Test Suites:"))
        .stdout(predicate::str::contains("- Gulf of Maine (gulf_of_maine):"));
}

#[test]
fn get_unknown_name_suggests_and_exits_2() {
    standards()
        .args(["get", "sea_water_temprature"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "Didn't find a standard matching: sea_water_temprature",
        ))
        .stderr(predicate::str::contains("Did you mean:"))
        .stderr(predicate::str::contains("sea_water_temperature"));
}

#[test]
fn get_blank_name_is_an_empty_query() {
    standards()
        .args(["get", "  "])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Empty query"));
}

#[test]
fn get_xarray_prints_suggested_attributes() {
    let attrs = run_json(&["get", "sea_surface_temperature", "--format", "xarray"]);
    assert_eq!(attrs["standard_name"], "sea_surface_temperature");
    assert_eq!(attrs["units"], "K");
}

#[test]
fn filter_combines_criteria() {
    standards()
        .args(["filter", "--unit", "m", "-i", "Sea Level", "--qartod"])
        .assert()
        .success()
        .stdout("- sea_surface_height_above_geopotential_datum - Water Level (NAVD 88) - m\n");
}

#[test]
fn filter_json_reports_active_filters() {
    let body = run_json(&["filter", "--var", "SST", "--format", "json"]);
    assert_eq!(body["filters"], serde_json::json!(["variable name = SST"]));
    let names: Vec<&str> = body["standards"]
        .as_array()
        .expect("standards array")
        .iter()
        .filter_map(|entry| entry["name"].as_str())
        .collect();
    assert_eq!(names, vec!["sea_surface_temperature"]);
}

#[test]
fn filter_without_criteria_lists_everything() {
    let body = run_json(&["filter", "--format", "json"]);
    assert_eq!(body["filters"], serde_json::json!([]));
    assert_eq!(
        body["standards"].as_array().map(Vec::len),
        body["total"].as_u64().map(|total| total as usize)
    );
}

#[test]
fn filter_with_no_match_exits_2() {
    standards()
        .args(["filter", "--search", "__nothing_like_this__"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "No standards found matching the criteria.",
        ));
}

#[test]
fn categories_as_json() {
    let body = run_json(&["categories", "--json"]);
    let categories = body.as_array().expect("array");
    assert_eq!(categories.first(), Some(&Value::from("Temperature")));
    assert!(categories.contains(&Value::from("Salinity")));
}

#[test]
fn qc_list_and_get() {
    standards()
        .args(["qc", "list", "sea_surface_height_above_geopotential_datum"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gulf_of_maine"))
        .stdout(predicate::str::contains("long_island_sound"));

    standards()
        .args([
            "qc",
            "get",
            "sea_surface_height_above_geopotential_datum",
            "long_island_sound",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Long Island Sound (long_island_sound)",
        ))
        .stdout(predicate::str::contains("- Flat Line"))
        .stdout(predicate::str::contains(
            "Arguments:\n- mllw: Mean lower low water elevation in NAVD 88 meters (required)",
        ));

    standards()
        .args(["qc", "get", "sea_surface_height_above_sea_level", "gulf_of_maine"])
        .assert()
        .code(2);

    standards()
        .args(["qc", "list", "air_temperature"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("has no QARTOD test suites"));
}

const WATER_LEVEL: &str = "sea_surface_height_above_geopotential_datum";

#[test]
fn qc_config_generates_gulf_of_maine_stream() {
    standards()
        .args(["qc", "config", WATER_LEVEL, "gulf_of_maine", "mllw=0", "mhhw=1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Generated configuration for Gulf of Maine:\nqartod:\n",
        ))
        .stdout(predicate::str::contains("gross_range_test"))
        .stdout(predicate::str::contains("flat_line_test"))
        .stdout(predicate::str::contains("location_test").not());

    let body = run_json(&[
        "qc",
        "config",
        WATER_LEVEL,
        "gulf_of_maine",
        "mllw=0",
        "mhhw=1",
        "--format",
        "json",
    ]);
    assert_eq!(body["qartod"]["flat_line_test"]["suspect_threshold"], 7200);
    assert_eq!(body["qartod"]["flat_line_test"]["fail_threshold"], 10800);
}

#[test]
fn qc_config_rejects_bad_arguments() {
    standards()
        .args(["qc", "config", WATER_LEVEL, "gulf_of_maine", "mhhw=1"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Missing required argument: mllw"));

    standards()
        .args(["qc", "config", WATER_LEVEL, "gulf_of_maine", "mllw", "mhhw=1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid argument format: mllw"));

    standards()
        .args(["qc", "config", WATER_LEVEL, "gulf_of_maine", "mllw=low", "mhhw=1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid value for mllw"));

    standards()
        .args(["qc", "config", WATER_LEVEL, "long_island_sound", "mllw=0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("has no configuration to generate"));

    standards()
        .args(["qc", "config", WATER_LEVEL, "unknown_suite"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("has no QARTOD test suite unknown_suite"));
}

#[test]
fn filter_on_empty_catalog_is_not_a_miss() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("empty.toml"), "").unwrap();
    let config = dir.path().join("catalog.toml");
    fs::write(&config, "bundled = false\nstandard_names = [\"empty.toml\"]\n").unwrap();

    standards()
        .arg("--config")
        .arg(&config)
        .arg("filter")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("The catalog has no standards."))
        .stderr(predicate::str::contains("No standards found").not());

    standards()
        .arg("--config")
        .arg(&config)
        .args(["filter", "--unit", "K"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "No standards found matching the criteria.",
        ));
}

#[test]
fn config_file_replaces_bundled_data() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("local.toml"),
        r#"
            [[standard]]
            name = "tracer_concentration"
            unit = "1"
            aliases = ["dye"]
            ioos_category = "Other"
        "#,
    )
    .unwrap();
    let config = dir.path().join("catalog.toml");
    fs::write(&config, "bundled = false\nstandard_names = [\"local.toml\"]\n").unwrap();

    standards()
        .arg("--config")
        .arg(&config)
        .args(["get", "dye", "--format", "short"])
        .assert()
        .success()
        .stdout("tracer_concentration - 1\n");

    standards()
        .env("STANDARDS_CATALOG_CONFIG", &config)
        .args(["get", "air_temperature"])
        .assert()
        .code(2);
}

#[test]
fn no_bundled_without_sources_fails_to_load() {
    standards()
        .args(["--no-bundled", "categories"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load the standards catalog"));
}

#[test]
fn malformed_source_fails_to_load() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("bad.toml"), "[[standard]]\nunit = \"K\"\n").unwrap();
    let config = dir.path().join("catalog.json");
    fs::write(&config, r#"{"knowledge": ["bad.toml"]}"#).unwrap();

    standards()
        .arg("--config")
        .arg(&config)
        .args(["categories"])
        .assert()
        .code(1);
}
