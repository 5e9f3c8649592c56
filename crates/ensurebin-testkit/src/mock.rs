//! Shared mockito server
//!
//! One server for the whole test binary. Tests keep their mocks apart by
//! using unique paths and hold the lock only while creating mocks.

use lazy_static::lazy_static;
use mockito::{Server, ServerGuard};
use std::sync::{Mutex, MutexGuard};

lazy_static! {
    /// Global shared mockito server for all tests
    pub static ref SHARED_MOCK_SERVER: Mutex<ServerGuard> = Mutex::new(Server::new());
}

/// Get the shared mock server, recovering from a poisoned mutex
///
/// ```no_run
/// use ensurebin_testkit::get_shared_mock_server;
///
/// let (mock, url) = {
///     let mut server = get_shared_mock_server();
///     let mock = server
///         .mock("GET", "/unique-path/phantomjs")
///         .with_status(200)
///         .expect(1)
///         .create();
///     (mock, format!("{}/unique-path/phantomjs", server.url()))
/// };
/// // run the code under test against `url`, then
/// mock.assert();
/// ```
pub fn get_shared_mock_server() -> MutexGuard<'static, ServerGuard> {
    SHARED_MOCK_SERVER
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
