//! Help output specs
//!
//! Verify every subcommand is discoverable.

use crate::prelude::*;

#[test]
fn help_lists_subcommands() {
    Project::empty()
        .jwatch()
        .args(&["--help"])
        .passes()
        .stdout_has("watch")
        .stdout_has("info")
        .stdout_has("config");
}

#[test]
fn watch_help_lists_flags() {
    Project::empty()
        .jwatch()
        .args(&["watch", "--help"])
        .passes()
        .stdout_has("--format")
        .stdout_has("--from-start")
        .stdout_has("--max-batch-bytes");
}

#[test]
fn version_flag_prints_version() {
    Project::empty()
        .jwatch()
        .args(&["--version"])
        .passes()
        .stdout_has("jwatch");
}
