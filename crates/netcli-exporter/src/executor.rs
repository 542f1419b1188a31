//! Command executors: a shell transport for live devices and a directory of
//! recorded transcripts for offline runs.

use netcli_core::{CommandExecutor, TransportError};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tokio::runtime::Handle;
use tracing::debug;

/// Runs each CLI command through `sh -c` using the configured template.
///
/// `run` blocks on the runtime handle, so call it from a blocking task.
pub struct ShellExecutor {
    handle: Handle,
    host: String,
    template: String,
    timeout: Duration,
}

impl ShellExecutor {
    pub fn new(handle: Handle, host: &str, template: &str, timeout: Duration) -> Self {
        Self {
            handle,
            host: host.to_string(),
            template: template.to_string(),
            timeout,
        }
    }

    /// Shell line for `command` on this executor's host.
    pub fn render(&self, command: &str) -> String {
        render_template(&self.template, &self.host, command)
    }
}

pub fn render_template(template: &str, host: &str, command: &str) -> String {
    template.replace("{host}", host).replace("{command}", command)
}

impl CommandExecutor for ShellExecutor {
    fn run(&self, command: &str) -> Result<String, TransportError> {
        let line = self.render(command);
        debug!("Executing: {}", line);

        let output = self.handle.block_on(async {
            let child = Command::new("sh")
                .arg("-c")
                .arg(&line)
                .kill_on_drop(true)
                .output();
            tokio::time::timeout(self.timeout, child).await
        });

        let output = match output {
            Err(_) => {
                return Err(TransportError::Timeout {
                    command: command.to_string(),
                    secs: self.timeout.as_secs(),
                })
            }
            Ok(Err(source)) => {
                return Err(TransportError::Io {
                    command: command.to_string(),
                    source,
                })
            }
            Ok(Ok(output)) => output,
        };

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(TransportError::Exit {
                command: command.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

/// Serves transcripts recorded as `<dir>/<command>.txt`, with every
/// non-alphanumeric character of the command replaced by `_`.
pub struct FixtureExecutor {
    dir: PathBuf,
}

impl FixtureExecutor {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, command: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", fixture_stem(command)))
    }
}

pub fn fixture_stem(command: &str) -> String {
    command
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

impl CommandExecutor for FixtureExecutor {
    fn run(&self, command: &str) -> Result<String, TransportError> {
        let path = self.path_for(command);
        match std::fs::read_to_string(&path) {
            Ok(transcript) => Ok(transcript),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(TransportError::Missing {
                command: command.to_string(),
            }),
            Err(source) => Err(TransportError::Io {
                command: command.to_string(),
                source,
            }),
        }
    }
}
