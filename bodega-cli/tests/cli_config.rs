//! Exit-code behavior for the configuration-validation phase. No storage
//! calls are made on any of these paths.

use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn bodega_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("bodega"));
    // An inherited environment (or a stray .env) must not leak configuration
    // into these tests.
    cmd.current_dir(dir.path());
    for var in [
        "OCI_BUCKET",
        "BASE_FOLDER",
        "MANIFEST_FILE",
        "BUCKET_PREFIX",
        "OCI_PROFILE",
        "OCI_CONFIG_FILE",
        "COL_ID",
        "COL_FOLDER",
        "COL_FILENAME",
        "COL_DISPLAY_NAME",
        "COL_STATUS",
        "SAVE_EVERY_N_ROWS",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn missing_bucket_aborts_with_hint() {
    let dir = TempDir::new().expect("tmp");
    bodega_cmd(&dir)
        .assert()
        .failure()
        .stderr(contains("OCI_BUCKET"));
}

#[test]
fn bucket_from_environment_passes_the_mandatory_check() {
    let dir = TempDir::new().expect("tmp");
    // Bucket is provided, so the failure must move past the mandatory check
    // to the next validation: the missing manifest file.
    bodega_cmd(&dir)
        .env("OCI_BUCKET", "DOCS")
        .assert()
        .failure()
        .stderr(contains("manifest file does not exist"));
}

#[test]
fn missing_manifest_aborts_before_connecting() {
    let dir = TempDir::new().expect("tmp");
    bodega_cmd(&dir)
        .args(["--bucket", "DOCS", "--manifest", "definitely_absent.xlsx"])
        .assert()
        .failure()
        .stderr(contains("definitely_absent.xlsx"));
}

#[test]
fn zero_column_number_is_rejected() {
    let dir = TempDir::new().expect("tmp");
    bodega_cmd(&dir)
        .args(["--bucket", "DOCS", "--col-id", "0"])
        .assert()
        .failure()
        .stderr(contains("1-indexed"));
}
