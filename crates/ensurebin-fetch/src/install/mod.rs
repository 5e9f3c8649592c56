//! Acquiring the binary over the network
//!
//! - [`tempdir`]: choosing a writable staging directory
//! - [`download`]: the [`Fetch`] seam and the verified, atomic install

pub mod download;
pub mod error;
pub mod tempdir;

pub use download::{Fetch, download_binary};
pub use error::DownloadError;
pub use tempdir::{find_suitable_temp_dir, temp_dir_candidates};
