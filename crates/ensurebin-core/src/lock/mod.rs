//! Install lock
//!
//! Two installs running in the same package must not interleave their
//! downloads or location record writes. The whole ladder runs while holding
//! an exclusive fs2 lock on `<lib_dir>/.ensurebin.lock`.
//!
//! While held, the lock file carries one holder line, `<pid> <platform>/<arch>`,
//! so an install that has to wait can say what it is waiting for. The line
//! is cleared when the lock is released.

use fs2::FileExt;
use log::{debug, info};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::platform::PlatformArch;


const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(10);
const MAX_RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum LockError {
    #[error(
        "install for {target} still blocked by {holder} after {}s ({})",
        waited.as_secs(),
        path.display()
    )]
    Timeout {
        path: PathBuf,
        target: String,
        holder: String,
        waited: Duration,
    },

    #[error("failed to {operation} {}: {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Process recorded in a held lock file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockHolder {
    pub pid: u32,
    pub target: String,
}

impl LockHolder {
    fn current(target: &PlatformArch) -> Self {
        Self {
            pid: std::process::id(),
            target: target.to_string(),
        }
    }

    /// Parses a holder line; anything else (empty, truncated) is `None`
    pub fn parse(line: &str) -> Option<Self> {
        let (pid, target) = line.trim().split_once(' ')?;
        let target = target.trim();
        if target.is_empty() {
            return None;
        }
        Some(Self {
            pid: pid.parse().ok()?,
            target: target.to_string(),
        })
    }

    /// Holder named in the lock file at `lock_path`, if any
    pub fn read(lock_path: &Path) -> Option<Self> {
        fs::read_to_string(lock_path)
            .ok()
            .and_then(|content| Self::parse(&content))
    }
}

impl fmt::Display for LockHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "process {} installing for {}", self.pid, self.target)
    }
}

/// Held install lock; released on drop
#[derive(Debug)]
pub struct InstallLock {
    file: File,
}

impl InstallLock {
    /// Takes the lock at `lock_path` for an install targeting `target`
    ///
    /// The file and its parent directories are created if missing. Retries
    /// back off exponentially from 10ms up to 500ms until `timeout`.
    ///
    /// # Errors
    ///
    /// [`LockError::Timeout`] naming the current holder when the lock is
    /// still taken after `timeout`, [`LockError::Io`] when the lock file
    /// cannot be opened or written.
    pub fn acquire(
        lock_path: &Path,
        target: &PlatformArch,
        timeout: Duration,
    ) -> Result<Self, LockError> {
        let io_err = |operation: &'static str| {
            move |source: io::Error| LockError::Io {
                operation,
                path: lock_path.to_path_buf(),
                source,
            }
        };

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(io_err("create directory for"))?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)
            .map_err(io_err("open lock file"))?;

        let contended = fs2::lock_contended_error().raw_os_error();
        let start = Instant::now();
        let mut retry_delay = INITIAL_RETRY_DELAY;
        let mut announced: Option<Option<LockHolder>> = None;

        loop {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    let mut lock = Self { file };
                    lock.record_holder(&LockHolder::current(target))
                        .map_err(io_err("write holder to"))?;
                    debug!("Locked {} for {}", lock_path.display(), target);
                    return Ok(lock);
                }
                Err(e) if e.raw_os_error().is_some() && e.raw_os_error() == contended => {
                    let holder = LockHolder::read(lock_path);
                    if announced.as_ref() != Some(&holder) {
                        match &holder {
                            Some(holder) => info!("Waiting for {} to finish", holder),
                            None => info!("Waiting for another install to finish"),
                        }
                        announced = Some(holder.clone());
                    }

                    let waited = start.elapsed();
                    if waited >= timeout {
                        return Err(LockError::Timeout {
                            path: lock_path.to_path_buf(),
                            target: target.to_string(),
                            holder: holder
                                .map(|h| h.to_string())
                                .unwrap_or_else(|| "another install".to_string()),
                            waited,
                        });
                    }

                    thread::sleep(retry_delay.min(timeout - waited));
                    retry_delay = (retry_delay * 2).min(MAX_RETRY_DELAY);
                }
                Err(e) => return Err(io_err("lock")(e)),
            }
        }
    }

    fn record_holder(&mut self, holder: &LockHolder) -> io::Result<()> {
        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        writeln!(self.file, "{} {}", holder.pid, holder.target)?;
        self.file.sync_data()
    }
}

impl Drop for InstallLock {
    fn drop(&mut self) {
        // The fs2 lock goes away with the descriptor; only the holder line needs clearing
        if let Err(e) = self.file.set_len(0) {
            debug!("Could not clear install lock holder: {}", e);
        }
    }
}
