//! Environment isolation for tests
//!
//! Tests that touch `ENSUREBIN_*` variables (or `PATH`) serialize through
//! [`ENV_LOCK`] and get every override cleared for the duration of the test.

use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard};

/// Static mutex to serialize tests that modify environment variables
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Every `ENSUREBIN_*` override, cleared by [`with_isolated_env`]
pub const OVERRIDE_VARS: &[&str] = &[
    "ENSUREBIN_PLATFORM",
    "ENSUREBIN_ARCH",
    "ENSUREBIN_HTTPS_PROXY",
    "ENSUREBIN_HTTP_PROXY",
    "ENSUREBIN_PROXY",
    "ENSUREBIN_STRICT_SSL",
    "ENSUREBIN_CA",
    "ENSUREBIN_CAFILE",
    "ENSUREBIN_TMP",
    "ENSUREBIN_USER_AGENT",
    "ENSUREBIN_PACKAGE_DIR",
];

/// Locks [`ENV_LOCK`], recovering from a poisoned mutex
///
/// A panicking test leaves the environment valid; the lock only serializes
/// access.
pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Runs `f` with all ensurebin overrides removed, then `vars` applied
///
/// The previous values are restored once `f` returns.
///
/// ```no_run
/// use ensurebin_testkit::with_isolated_env;
///
/// with_isolated_env(&[("ENSUREBIN_PLATFORM", "sunos")], || {
///     assert_eq!(std::env::var("ENSUREBIN_PLATFORM").unwrap(), "sunos");
/// });
/// ```
pub fn with_isolated_env<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = env_lock();

    let mut touched: Vec<&str> = OVERRIDE_VARS.to_vec();
    for (key, _) in vars {
        if !touched.contains(key) {
            touched.push(*key);
        }
    }
    let saved: Vec<(&str, Option<OsString>)> = touched
        .iter()
        .map(|key| (*key, std::env::var_os(key)))
        .collect();

    // SAFETY: We hold ENV_LOCK, so no other test mutates the environment concurrently.
    unsafe {
        for key in OVERRIDE_VARS {
            std::env::remove_var(key);
        }
        for (key, value) in vars {
            std::env::set_var(key, value);
        }
    }

    let result = f();

    // SAFETY: Still holding ENV_LOCK.
    unsafe {
        for (key, value) in saved {
            match value {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
    }

    result
}
