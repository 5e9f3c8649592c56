//! Binary resolution and acquisition for ensurebin.
//!
//! Given a package manifest and a target platform, this crate makes sure a
//! verified copy of the declared binary exists and says where it is.
//!
//! # Modules
//!
//! - [`spec`]: platform table lookup
//! - [`checksum`]: streaming SHA-256 verification
//! - [`probe`]: `<binary> --version` probing with a timeout
//! - [`search_path`]: cleaned executable search path and marker detection
//! - [`http`]: HTTP client with proxy and CA configuration
//! - [`install`]: staging directory discovery and the downloader
//! - [`resolve`]: the resolution ladder
//!
//! # Resolution Flow
//!
//! ```text
//! Installer::run()
//!     ↓ (install lock held)
//! 1. CheckLocal
//!     → Read {lib_dir}/location.toml
//!     → Target must match, file must exist, version must match
//!     ↓ (inconclusive)
//! 2. CheckPath (host target only)
//!     → Search the cleaned PATH for {name}
//!     → Skip this package's own install
//!     → Marker wrapper: follow its nested location record
//!     → Plain binary: accept
//!     ↓ (inconclusive)
//! 3. Download
//!     → Look up the platform table (unsupported: fatal)
//!     → Stream to a staging dir, verify sha256
//!     → Install to {install_dir}/{name}
//!     ↓
//! 4. Write location record
//! ```
//!
//! # Example
//!
//! ```no_run
//! use ensurebin_core::config::{Manifest, Overrides};
//! use ensurebin_fetch::{HttpFetcher, InstallContext, Installer};
//! use std::path::Path;
//!
//! # fn main() -> ensurebin_core::Result<()> {
//! let root = Path::new(".");
//! let manifest = Manifest::from_file(root.join("ensurebin.toml"))?;
//! let overrides = Overrides::from_env();
//! let fetcher = HttpFetcher::from_overrides(&overrides);
//!
//! let context = InstallContext::new(root, manifest, overrides);
//! let resolved = Installer::new(&context, fetcher).run()?;
//! println!("{} ({})", resolved.path.display(), resolved.source);
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod checksum;
pub mod http;
pub mod info;
pub mod install;
pub mod probe;
pub mod resolve;
pub mod search_path;
pub mod spec;

// Re-export commonly used types
pub use http::HttpFetcher;
pub use info::ResolvedBinary;
pub use install::{DownloadError, Fetch};
pub use probe::VersionProbe;
pub use resolve::{InstallContext, Installer, Step};
pub use search_path::SearchPath;
pub use spec::{DownloadSpec, resolve_download_spec};

// Type alias for convenience
pub type Result<T> = ensurebin_core::Result<T>;
