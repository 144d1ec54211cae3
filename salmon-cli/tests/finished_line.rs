//! Termination behaviour of the `salmon` binary.

use std::process::Command;

use rstest::rstest;
use tempfile::TempDir;

#[rstest]
fn failed_runs_print_finished_and_exit_nonzero() {
    let dir = TempDir::new().expect("create temp dir");
    let output = Command::new(env!("CARGO_BIN_EXE_salmon"))
        .current_dir(dir.path())
        .args([
            "ingest",
            "absent.shp",
            "absent.yaml",
            "watershed",
            "absent.db",
        ])
        .env("RUST_LOG", "off")
        .output()
        .expect("run the salmon binary");

    assert_eq!(output.status.code(), Some(1));
    // The final line must survive even a fully silenced log filter.
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Finished"), "stdout was {stdout:?}");
    assert!(!dir.path().join("absent.db").exists());
}
