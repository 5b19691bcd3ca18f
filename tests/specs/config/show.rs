//! Config command specs
//!
//! Verify configuration discovery and rendering.

use crate::prelude::*;

#[test]
fn default_config_is_printed_as_toml() {
    Project::empty()
        .jwatch()
        .args(&["config", "--default"])
        .passes()
        .stdout_has("# source: built-in defaults")
        .stdout_has("max_batch_bytes = 65536")
        .stdout_has("idle_delay = \"100ms\"")
        .stdout_has("[recovery]");
}

#[test]
fn no_config_file_uses_defaults() {
    Project::empty()
        .jwatch()
        .args(&["config"])
        .passes()
        .stdout_has("# source: built-in defaults");
}

#[test]
fn explicit_config_file_is_applied() {
    let temp = Project::empty();
    let path = temp.file("jwatch.toml", "volumes = [\"D:\"]\nmax_batch_bytes = 8192\n");

    temp.jwatch()
        .args(&["--config", path.to_str().unwrap(), "config"])
        .passes()
        .stdout_has("(--config)")
        .stdout_has("max_batch_bytes = 8192")
        .stdout_has("\"D:\"");
}

#[test]
fn environment_config_file_is_applied() {
    let temp = Project::empty();
    let path = temp.file("env.toml", "batch_delay = \"0s\"\n");

    temp.jwatch()
        .env("JWATCH_CONFIG", &path)
        .args(&["config"])
        .passes()
        .stdout_has("$JWATCH_CONFIG")
        .stdout_has("batch_delay = \"0s\"");
}

#[test]
fn invalid_config_file_fails_with_suggestion() {
    let temp = Project::empty();
    let path = temp.file("bad.toml", "[versions]\nmin = 1\nmax = 9\n");

    temp.jwatch()
        .args(&["--config", path.to_str().unwrap(), "config"])
        .fails()
        .code(1)
        .stderr_has("Invalid configuration")
        .stderr_has("jwatch config --default");
}

#[test]
fn unknown_config_key_fails() {
    let temp = Project::empty();
    let path = temp.file("typo.toml", "volume = [\"C:\"]\n");

    temp.jwatch()
        .args(&["--config", path.to_str().unwrap(), "config"])
        .fails()
        .stderr_has("volume");
}

#[test]
fn printed_defaults_load_back_unchanged() {
    let temp = Project::empty();
    let defaults = temp.jwatch().args(&["config", "--default"]).passes().stdout;
    let body = defaults.split_once('\n').unwrap().1.to_string();
    let path = temp.file("roundtrip.toml", &body);

    temp.jwatch()
        .args(&["--config", path.to_str().unwrap(), "config"])
        .passes()
        .stdout_eq(&format!("# source: {} (--config)\n{}", path.display(), body));
}
