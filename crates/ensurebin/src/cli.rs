//! CLI command structure using clap

use clap::{Args, Parser, Subcommand};
use ensurebin_core::config::Overrides;
use ensurebin_core::config::overrides::parse_bool;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ensurebin")]
#[command(version, about = "Make sure a package's platform binary is present", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Package root containing ensurebin.toml [default: current directory]
    #[arg(long, global = true, env = "ENSUREBIN_PACKAGE_DIR")]
    pub package_dir: Option<PathBuf>,

    /// Debug logging (ENSUREBIN_LOG still wins)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve, verify or download the binary and record where it is
    Install {
        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        network: NetworkArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the path of the recorded binary
    Path {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show target and host platform and the matching download
    Platform {
        #[command(flatten)]
        target: TargetArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a wrapper script that runs the recorded binary
    Shim {
        /// Directory for the wrapper [default: <package root>/bin]
        #[arg(long)]
        bin_dir: Option<PathBuf>,
    },

    /// Run the recorded binary with arguments (after --)
    Exec {
        #[arg(last = true)]
        args: Vec<String>,
    },
}

/// Target overrides (fall back to ENSUREBIN_PLATFORM / ENSUREBIN_ARCH)
#[derive(Args, Default)]
pub struct TargetArgs {
    /// Target platform (linux, darwin, openbsd, freebsd, win32, ...)
    #[arg(long)]
    pub platform: Option<String>,

    /// Target architecture (x64, ia32, ...)
    #[arg(long)]
    pub arch: Option<String>,
}

/// Download settings (fall back to the matching ENSUREBIN_* variables)
#[derive(Args, Default)]
pub struct NetworkArgs {
    /// Proxy URL for the download
    #[arg(long)]
    pub proxy: Option<String>,

    /// Verify TLS certificates [default: true]
    #[arg(long, value_name = "BOOL", value_parser = parse_strict_ssl)]
    pub strict_ssl: Option<bool>,

    /// Inline PEM certificate(s) to trust
    #[arg(long)]
    pub ca: Option<String>,

    /// PEM bundle file to trust
    #[arg(long)]
    pub cafile: Option<PathBuf>,

    /// Base directory for staging the download
    #[arg(long)]
    pub tmp: Option<PathBuf>,

    /// User agent for the download request
    #[arg(long)]
    pub user_agent: Option<String>,
}

fn parse_strict_ssl(value: &str) -> Result<bool, String> {
    parse_bool(value).ok_or_else(|| format!("expected true or false, got '{value}'"))
}

impl TargetArgs {
    pub fn into_overrides(self) -> Overrides {
        Overrides {
            platform: self.platform,
            arch: self.arch,
            ..Overrides::default()
        }
    }
}

impl NetworkArgs {
    /// Explicit overrides from both flag groups
    pub fn into_overrides(self, target: TargetArgs) -> Overrides {
        Overrides {
            proxy: self.proxy,
            strict_ssl: self.strict_ssl,
            ca: self.ca,
            cafile: self.cafile,
            tmp: self.tmp,
            user_agent: self.user_agent,
            ..target.into_overrides()
        }
    }
}
