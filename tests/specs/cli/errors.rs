//! CLI error specs
//!
//! Verify startup failures exit non-zero with actionable messages.

use crate::prelude::*;

#[test]
fn unknown_subcommand_fails() {
    Project::empty()
        .jwatch()
        .args(&["scan"])
        .fails()
        .stderr_has("scan");
}

#[test]
fn info_requires_volume() {
    Project::empty().jwatch().args(&["info"]).fails();
}

#[test]
fn invalid_format_is_rejected() {
    Project::empty()
        .jwatch()
        .args(&["watch", "--format", "xml"])
        .fails()
        .stderr_has("xml");
}

#[cfg(not(windows))]
#[test]
fn info_reports_unsupported_platform() {
    Project::empty()
        .jwatch()
        .args(&["info", "C:"])
        .fails()
        .code(1)
        .stderr_has("not supported on this platform");
}
