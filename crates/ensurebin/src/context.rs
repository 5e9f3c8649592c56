//! Package context shared by the commands

use anyhow::Result;
use ensurebin_core::PackageLayout;
use ensurebin_core::config::Manifest;
use std::path::PathBuf;

pub struct Context {
    pub root: PathBuf,
    pub manifest: Manifest,
    pub layout: PackageLayout,
}

impl Context {
    /// Loads the manifest of the package at `package_dir` (or the current directory)
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest is missing or invalid.
    pub fn load(package_dir: Option<PathBuf>) -> Result<Self> {
        let root = match package_dir {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };
        let root = std::path::absolute(&root)?;

        let manifest = Manifest::from_file(PackageLayout::manifest_path(&root))?;
        let layout = PackageLayout::new(&root, &manifest);

        Ok(Self {
            root,
            manifest,
            layout,
        })
    }
}
