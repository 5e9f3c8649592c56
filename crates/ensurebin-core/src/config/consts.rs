//! File names, environment variable names and defaults shared across crates

/// Files that live inside the host package
pub mod files {
    /// Package manifest, at the package root
    pub const MANIFEST: &str = "ensurebin.toml";

    /// Location record, inside `layout.lib_dir`
    pub const LOCATION_RECORD: &str = "location.toml";

    /// Install lock, inside `layout.lib_dir`
    pub const INSTALL_LOCK: &str = ".ensurebin.lock";
}

/// Environment variables recognized as overrides
pub mod env {
    pub const PLATFORM: &str = "ENSUREBIN_PLATFORM";
    pub const ARCH: &str = "ENSUREBIN_ARCH";

    /// Proxy variables, highest precedence first
    pub const PROXY_CHAIN: [&str; 3] = [
        "ENSUREBIN_HTTPS_PROXY",
        "ENSUREBIN_HTTP_PROXY",
        "ENSUREBIN_PROXY",
    ];

    pub const STRICT_SSL: &str = "ENSUREBIN_STRICT_SSL";
    pub const CA: &str = "ENSUREBIN_CA";
    pub const CAFILE: &str = "ENSUREBIN_CAFILE";
    pub const TMP: &str = "ENSUREBIN_TMP";
    pub const USER_AGENT: &str = "ENSUREBIN_USER_AGENT";
    pub const PACKAGE_DIR: &str = "ENSUREBIN_PACKAGE_DIR";
    pub const LOG: &str = "ENSUREBIN_LOG";
}

/// Manifest defaults
pub mod defaults {
    pub const VERSION_FLAG: &str = "--version";
    pub const MARKER: &str = "ENSUREBIN_INSTALL_MARKER";
    pub const PROBE_TIMEOUT_MS: u64 = 10_000;
    pub const LIB_DIR: &str = "lib";
    pub const INSTALL_DIR: &str = "lib/bin";

    /// Seconds to wait for a concurrent install to release the lock
    pub const LOCK_TIMEOUT_SECS: u64 = 60;
}
