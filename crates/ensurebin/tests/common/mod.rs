//! Shared helpers for the CLI integration tests

#![allow(deprecated)] // cargo_bin is deprecated in favour of cargo_bin! but still works
#![allow(dead_code)]

use assert_cmd::cargo::CommandCargoExt;
use ensurebin_core::PlatformArch;
use ensurebin_testkit::{
    FakeDownload, OVERRIDE_VARS, fake_binary_body, get_shared_mock_server, write_manifest,
};
use mockito::Mock;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const NAME: &str = "phantomjs";
pub const VERSION: &str = "2.1.1";

/// A package directory plus an isolated search path and staging dir
pub struct Package {
    pub root: PathBuf,
    pub bin_dir: PathBuf,
    pub tmp: PathBuf,
}

impl Package {
    /// Package under `base` whose manifest downloads from `url` for the host
    pub fn new(base: &Path, url: &str) -> Self {
        let host = PlatformArch::host();
        let root = base.join("pkg");
        write_manifest(
            &root,
            NAME,
            VERSION,
            &[FakeDownload::new(
                host.platform.as_str(),
                Some(host.arch.as_str()),
                url,
                &fake_binary_body(VERSION),
            )],
        );

        let bin_dir = base.join("path-bin");
        std::fs::create_dir_all(&bin_dir).unwrap();

        Self {
            root,
            bin_dir,
            tmp: base.join("tmp"),
        }
    }

    pub fn record_path(&self) -> PathBuf {
        self.root.join("lib").join("location.toml")
    }

    pub fn installed_binary(&self) -> PathBuf {
        self.root.join("lib").join("bin").join(NAME)
    }

    /// `ensurebin` with a clean environment pointing at this package
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("ensurebin").unwrap();
        for var in OVERRIDE_VARS {
            cmd.env_remove(var);
        }
        cmd.env("PATH", &self.bin_dir)
            .env("ENSUREBIN_TMP", &self.tmp)
            .arg("--package-dir")
            .arg(&self.root);
        cmd
    }
}

/// Mock serving the fake binary at a path unique to `scenario`
pub fn serve_binary(scenario: &str, hits: usize) -> (Mock, String) {
    let mut server = get_shared_mock_server();
    let path = format!("/cli/{scenario}/{NAME}");
    let mock = server
        .mock("GET", path.as_str())
        .with_status(200)
        .with_body(fake_binary_body(VERSION))
        .expect(hits)
        .create();
    (mock, format!("{}{}", server.url(), path))
}
