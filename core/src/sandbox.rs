//! Sandbox validation of generated patches.
//!
//! The patch text is model output and must be treated as untrusted. The
//! validator gives it a fresh temporary working directory and a wall-clock
//! limit, then hands it to the configured test runner and captures whatever
//! comes back. That is the whole trust boundary: no filesystem or network
//! isolation is attempted here.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{info, warn};

use crate::HealError;
use crate::config::Config;

/// Captured result of one sandbox run.
#[derive(Debug, Clone)]
pub struct ValidationOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code when the runner terminated normally.
    pub exit_code: Option<i32>,
    /// True when the run was killed at the wall-clock limit.
    pub timed_out: bool,
}

/// Executes generated patch text under a test runner.
pub struct SandboxValidator {
    runner: String,
    timeout: Duration,
}

impl SandboxValidator {
    pub fn new(config: &Config) -> Self {
        Self {
            runner: config.sandbox_runner.clone(),
            timeout: Duration::from_secs(config.sandbox_timeout_secs),
        }
    }

    /// Writes `patch_text` verbatim to a test module in a fresh temp
    /// directory and runs it under the configured runner. The temp
    /// directory is removed when the run finishes.
    pub async fn run_patch(&self, patch_text: &str) -> Result<ValidationOutput, HealError> {
        let dir = tempfile::tempdir()?;
        let test_file = dir.path().join("test_sample.py");
        std::fs::write(&test_file, patch_text)?;

        info!("running {} on generated patch", self.runner);
        let child = Command::new(&self.runner)
            .arg(&test_file)
            .current_dir(dir.path())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => {
                let output = output?;
                Ok(ValidationOutput {
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    exit_code: output.status.code(),
                    timed_out: false,
                })
            }
            Err(_) => {
                warn!("sandbox run exceeded {:?}, killed", self.timeout);
                Ok(ValidationOutput {
                    stdout: String::new(),
                    stderr: String::new(),
                    exit_code: None,
                    timed_out: true,
                })
            }
        }
    }
}
