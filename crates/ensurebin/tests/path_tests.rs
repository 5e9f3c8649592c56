//! Integration tests for `ensurebin path` and `ensurebin platform`

#![allow(deprecated)]

mod common;

use assert_cmd::assert::OutputAssertExt;
use common::{NAME, Package, VERSION};
use ensurebin_core::PlatformArch;
use ensurebin_core::location::{BinarySource, write_location};
use ensurebin_testkit::{temp_dir_in_workspace, write_fake_binary};
use predicates::prelude::*;

#[test]
fn test_path_without_record_fails() {
    let temp = temp_dir_in_workspace();
    let pkg = Package::new(temp.path(), "http://127.0.0.1:9/unused");

    pkg.command()
        .arg("path")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("LOCATION_NOT_FOUND"));
}

#[test]
fn test_path_with_vanished_binary_fails() {
    let temp = temp_dir_in_workspace();
    let pkg = Package::new(temp.path(), "http://127.0.0.1:9/unused");
    write_location(
        &pkg.record_path(),
        &pkg.installed_binary(),
        &PlatformArch::host(),
        BinarySource::Download,
    )
    .unwrap();

    pkg.command()
        .arg("path")
        .assert()
        .failure()
        .stderr(predicate::str::contains("LOCATION_NOT_FOUND"));
}

#[test]
#[cfg(unix)]
fn test_path_prints_recorded_binary() {
    let temp = temp_dir_in_workspace();
    let pkg = Package::new(temp.path(), "http://127.0.0.1:9/unused");
    let binary = write_fake_binary(&pkg.root.join("lib").join("bin"), NAME, VERSION);
    write_location(
        &pkg.record_path(),
        &binary,
        &PlatformArch::host(),
        BinarySource::Download,
    )
    .unwrap();

    pkg.command()
        .arg("path")
        .assert()
        .success()
        .stdout(format!("{}\n", binary.display()));
}

#[test]
#[cfg(unix)]
fn test_path_json_includes_record_metadata() {
    let temp = temp_dir_in_workspace();
    let pkg = Package::new(temp.path(), "http://127.0.0.1:9/unused");
    let binary = write_fake_binary(&pkg.bin_dir, NAME, VERSION);
    write_location(
        &pkg.record_path(),
        &binary,
        &PlatformArch::host(),
        BinarySource::Path,
    )
    .unwrap();

    let output = pkg.command().args(["path", "--json"]).output().unwrap();
    assert!(output.status.success());

    let info: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let host = PlatformArch::host();
    assert_eq!(info["path"].as_str().unwrap(), binary.to_str().unwrap());
    assert_eq!(info["platform"], host.platform.as_str());
    assert_eq!(info["arch"], host.arch.as_str());
    assert_eq!(info["source"], "path");
}

#[test]
fn test_platform_json_for_supported_override() {
    let temp = temp_dir_in_workspace();
    let host = PlatformArch::host();
    let pkg = Package::new(temp.path(), "https://example.com/phantomjs");

    let output = pkg
        .command()
        .args(["platform", "--json"])
        .args(["--platform", host.platform.as_str()])
        .args(["--arch", host.arch.as_str()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["target"]["platform"], host.platform.as_str());
    assert_eq!(report["host"]["arch"], host.arch.as_str());
    assert_eq!(report["download"]["url"], "https://example.com/phantomjs");
    assert_eq!(report["download"]["checksum"].as_str().unwrap().len(), 64);
}

#[test]
fn test_platform_reports_unsupported_target() {
    let temp = temp_dir_in_workspace();
    let pkg = Package::new(temp.path(), "https://example.com/phantomjs");

    pkg.command()
        .args(["platform", "--platform", "sunos", "--arch", "sparc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Target: sunos/sparc"))
        .stdout(predicate::str::contains("unsupported"));

    let output = pkg
        .command()
        .env("ENSUREBIN_PLATFORM", "sunos")
        .args(["platform", "--json"])
        .output()
        .unwrap();
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["target"]["platform"], "sunos");
    assert!(report["download"].is_null());
}
