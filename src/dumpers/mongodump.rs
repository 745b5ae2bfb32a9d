use super::dumper::{DumpError, Dumper};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{ChildStderr, Command};
use tracing::{debug, warn};

// Lines of stderr kept for the failure log. The rest only goes to debug.
const STDERR_TAIL_LINES: usize = 20;

/// Runs the `mongodump` executable as a child process.
pub struct MongodumpDumper {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl MongodumpDumper {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        MongodumpDumper {
            program: program.into(),
            args: Vec::new(),
            timeout,
        }
    }

    /// Arguments placed before the per-target `--uri`, `--archive` and `--gzip`.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    fn command(&self, uri: &str, archive: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(format!("--uri={}", uri))
            .arg(format!("--archive={}", archive.display()))
            .arg("--gzip")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

/// Log each stderr line at debug and keep the last few for a failure report.
async fn stderr_tail(stderr: Option<ChildStderr>) -> Vec<String> {
    let Some(stderr) = stderr else {
        return Vec::new();
    };

    let mut reader = BufReader::new(stderr);
    let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf).trim_end().to_string();
                debug!(line = %line, "mongodump");
                if tail.len() == STDERR_TAIL_LINES {
                    tail.pop_front();
                }
                tail.push_back(line);
            }
        }
    }
    tail.into()
}

#[async_trait]
impl Dumper for MongodumpDumper {
    async fn dump(&self, uri: &str, archive: &Path) -> Result<(), DumpError> {
        let mut child = self
            .command(uri, archive)
            .spawn()
            .map_err(|source| DumpError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        let stderr = tokio::spawn(stderr_tail(child.stderr.take()));

        // Returning early drops the child, which kills it.
        let status = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(result) => result.map_err(|source| DumpError::Spawn {
                program: self.program.clone(),
                source,
            })?,
            Err(_) => {
                stderr.abort();
                warn!(archive = %archive.display(), "mongodump timed out, killing it");
                return Err(DumpError::TimedOut {
                    secs: self.timeout.as_secs(),
                });
            }
        };

        if !status.success() {
            let tail = stderr.await.unwrap_or_default();
            warn!(
                archive = %archive.display(),
                stderr = %tail.join("\n"),
                "mongodump exited unsuccessfully"
            );
            return Err(match status.code() {
                Some(code) => DumpError::Failed {
                    status: code.to_string(),
                },
                None => DumpError::Killed,
            });
        }

        stderr.abort();
        debug!(archive = %archive.display(), "mongodump finished");
        Ok(())
    }
}
