//! Version probing
//!
//! Runs `<binary> <flag>`, trims stdout and compares it byte-for-byte with
//! the expected version. Every failure mode (spawn error, non-zero exit,
//! timeout) is reported as "no match".

use log::{debug, warn};
use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::search_path::SearchPath;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Clone)]
pub struct VersionProbe {
    expected: String,
    flag: String,
    timeout: Duration,
    search_path: SearchPath,
}

impl VersionProbe {
    pub fn new(expected: &str, flag: &str, timeout: Duration, search_path: SearchPath) -> Self {
        Self {
            expected: expected.trim().to_string(),
            flag: flag.to_string(),
            timeout,
            search_path,
        }
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// True iff `path` runs and prints exactly the expected version
    pub fn probe(&self, path: &Path) -> bool {
        match self.version_output(path) {
            Ok(output) => {
                let actual = output.trim();
                if actual == self.expected {
                    true
                } else {
                    warn!(
                        "{} reports version {:?}, expected {:?}",
                        path.display(),
                        actual,
                        self.expected
                    );
                    false
                }
            }
            Err(e) => {
                debug!("Version probe of {} failed: {}", path.display(), e);
                false
            }
        }
    }

    /// Raw stdout of `<path> <flag>`
    pub fn version_output(&self, path: &Path) -> io::Result<String> {
        let mut child = Command::new(path)
            .arg(&self.flag)
            .env("PATH", self.search_path.to_os_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("child stdout was not captured"))?;
        let reader = thread::spawn(move || {
            let mut buf = Vec::new();
            stdout.read_to_end(&mut buf).map(|_| buf)
        });

        wait_with_timeout(&mut child, self.timeout)?;

        let bytes = reader
            .join()
            .map_err(|_| io::Error::other("stdout reader panicked"))??;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Waits for `child`, killing it once `timeout` has passed
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> io::Result<()> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            if status.success() {
                return Ok(());
            }
            return Err(io::Error::other(format!("exited with {status}")));
        }

        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("no answer within {}ms", timeout.as_millis()),
            ));
        }
        thread::sleep(POLL_INTERVAL);
    }
}
