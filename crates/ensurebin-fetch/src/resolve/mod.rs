//! The resolution ladder
//!
//! Phases run strictly in order and each one answers with a [`Step`]:
//! `Resolved` stops the ladder, `Continue` moves on to the next phase, and
//! `Failed` ends the run. Only the download phase can fail; the earlier
//! phases turn every problem into `Continue` with a reason that gets logged.

use ensurebin_core::config::consts::defaults;
use ensurebin_core::config::{Manifest, Overrides};
use ensurebin_core::location::write_location;
use ensurebin_core::lock::InstallLock;
use ensurebin_core::{EnsurebinError, PackageLayout, PlatformArch, Result};
use log::info;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::info::ResolvedBinary;
use crate::install::Fetch;
use crate::probe::VersionProbe;
use crate::search_path::SearchPath;

mod download;
mod local;
mod system;


/// Outcome of one ladder phase
#[derive(Debug)]
pub enum Step {
    /// A verified binary was found or installed
    Resolved(ResolvedBinary),
    /// Inconclusive; try the next phase
    Continue(String),
    /// Fatal
    Failed(EnsurebinError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    CheckLocal,
    CheckPath,
    Download,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::CheckLocal => write!(f, "recorded binary"),
            Phase::CheckPath => write!(f, "search path"),
            Phase::Download => write!(f, "download"),
        }
    }
}

/// Everything one install run needs to know, fixed up front
#[derive(Debug, Clone)]
pub struct InstallContext {
    pub manifest: Manifest,
    pub layout: PackageLayout,
    pub overrides: Overrides,
    pub target: PlatformArch,
    pub search_path: SearchPath,
    pub lock_timeout: Duration,
}

impl InstallContext {
    /// Context for the package at `root`, using the cleaned process `PATH`
    pub fn new(root: impl Into<PathBuf>, manifest: Manifest, overrides: Overrides) -> Self {
        let root = root.into();
        let root = std::path::absolute(&root).unwrap_or(root);
        let layout = PackageLayout::new(root, &manifest);
        let target = overrides.target();

        Self {
            manifest,
            layout,
            overrides,
            target,
            search_path: SearchPath::from_env_cleaned(),
            lock_timeout: Duration::from_secs(defaults::LOCK_TIMEOUT_SECS),
        }
    }

    pub fn with_search_path(mut self, search_path: SearchPath) -> Self {
        self.search_path = search_path;
        self
    }

    pub fn with_target(mut self, target: PlatformArch) -> Self {
        self.target = target;
        self
    }

    pub fn binary_name(&self) -> &str {
        &self.manifest.binary.name
    }

    pub fn probe(&self) -> VersionProbe {
        let binary = &self.manifest.binary;
        VersionProbe::new(
            &binary.version,
            &binary.version_flag,
            binary.probe_timeout(),
            self.search_path.clone(),
        )
    }
}

/// Drives the ladder for one context
pub struct Installer<'a, F> {
    context: &'a InstallContext,
    fetcher: F,
}

impl<'a, F: Fetch> Installer<'a, F> {
    pub fn new(context: &'a InstallContext, fetcher: F) -> Self {
        Self { context, fetcher }
    }

    /// Runs the ladder under the install lock and records the result
    ///
    /// # Errors
    ///
    /// Configuration, transport and filesystem failures from the download
    /// phase, lock timeouts, and failures writing the location record.
    pub fn run(&self) -> Result<ResolvedBinary> {
        let ctx = self.context;
        let _lock = InstallLock::acquire(&ctx.layout.lock_path(), &ctx.target, ctx.lock_timeout)?;

        match self.resolve() {
            Step::Resolved(binary) => {
                write_location(
                    &ctx.layout.record_path(),
                    &binary.path,
                    &ctx.target,
                    binary.source,
                )?;
                info!(
                    "Resolved {} at {} ({})",
                    ctx.binary_name(),
                    binary.path.display(),
                    binary.source
                );
                Ok(binary)
            }
            Step::Failed(err) => Err(err),
            Step::Continue(reason) => Err(EnsurebinError::Generic(format!(
                "resolution ended without a result: {reason}"
            ))),
        }
    }

    /// Runs the ladder without locking or writing the record
    pub fn resolve(&self) -> Step {
        let ctx = self.context;
        info!(
            "Ensuring {} {} for {}",
            ctx.binary_name(),
            ctx.manifest.binary.version,
            ctx.target
        );

        let probe = ctx.probe();
        for phase in [Phase::CheckLocal, Phase::CheckPath, Phase::Download] {
            let step = match phase {
                Phase::CheckLocal => local::check_local(ctx, &probe),
                Phase::CheckPath => system::check_path(ctx, &probe),
                Phase::Download => download::download(ctx, &self.fetcher),
            };

            match step {
                Step::Continue(reason) => info!("Skipping {}: {}", phase, reason),
                terminal => return terminal,
            }
        }

        Step::Continue("every phase was inconclusive".to_string())
    }
}
