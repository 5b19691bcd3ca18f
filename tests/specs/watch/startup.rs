//! Watch startup specs
//!
//! Verify watch validates its inputs before touching any volume.

use crate::prelude::*;

#[test]
fn undersized_batch_buffer_is_rejected() {
    Project::empty()
        .jwatch()
        .args(&["watch", "C:", "--max-batch-bytes", "16"])
        .fails()
        .code(1)
        .stderr_has("max_batch_bytes 16");
}

#[cfg(not(windows))]
#[test]
fn watch_reports_unsupported_platform() {
    Project::empty()
        .jwatch()
        .args(&["watch", "C:"])
        .fails()
        .code(1)
        .stderr_has("not supported on this platform")
        .stderr_has("Run jwatch on Windows");
}

#[test]
fn log_file_is_created() {
    let temp = Project::empty();
    let log = temp.path().join("logs/jwatch.log");

    temp.jwatch()
        .env("RUST_LOG", "debug")
        .args(&["--log-file", log.to_str().unwrap(), "config"])
        .passes();

    assert!(log.is_file());
}
