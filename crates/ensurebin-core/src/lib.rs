// Core modules
pub mod config;
pub mod error;
pub mod layout;
pub mod location;
pub mod lock;
pub mod path;
pub mod platform;

// Re-export commonly used types
pub use error::{EnsurebinError, ErrorKind, Result};
pub use layout::PackageLayout;
pub use platform::{Arch, Platform, PlatformArch};
