//! Test utilities for ensurebin
//!
//! Shared helpers used by the unit and integration tests across the
//! workspace: scratch directories, environment isolation, fake binaries,
//! manifests and a shared mock HTTP server.

use tempfile::TempDir;

pub mod env;
pub mod fixtures;
pub mod mock;

pub use env::{ENV_LOCK, OVERRIDE_VARS, env_lock, with_isolated_env};
pub use fixtures::{
    FakeDownload, fake_binary_body, sha256_hex, write_fake_binary, write_manifest,
    write_marker_wrapper, write_script,
};
pub use mock::get_shared_mock_server;

/// Creates a temporary directory within `.tmp/` at the project root
///
/// Keeps test scratch files in one gitignored place that is easy to clean
/// up by hand.
///
/// # Panics
///
/// Panics if the current directory is unknown or `.tmp/` cannot be created.
///
/// # Examples
///
/// ```rust
/// use ensurebin_testkit::temp_dir_in_workspace;
///
/// let temp = temp_dir_in_workspace();
/// let file_path = temp.path().join("test.txt");
/// std::fs::write(&file_path, "test data").unwrap();
/// ```
pub fn temp_dir_in_workspace() -> TempDir {
    try_temp_dir_in_workspace().expect("Failed to create temporary directory in .tmp/")
}

/// Same as [`temp_dir_in_workspace`], returning the error instead of panicking
pub fn try_temp_dir_in_workspace() -> std::io::Result<TempDir> {
    let workspace_root = std::env::current_dir()?;
    let tmp_base = workspace_root.join(".tmp");
    std::fs::create_dir_all(&tmp_base)?;
    TempDir::new_in(&tmp_base)
}
