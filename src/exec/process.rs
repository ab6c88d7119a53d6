// src/exec/process.rs

//! Running one step command as a child process.

use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result};
use regex::Regex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

/// Result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    pub exit_code: i32,
    pub success: bool,
    /// Capture group 1 of the last stdout line matching the watch pattern.
    pub captured: Option<String>,
}

/// Run `cmd` through the platform shell in `workdir`, streaming its output
/// to the log and optionally watching stdout for `pattern`.
pub async fn run_shell(
    label: &str,
    cmd: &str,
    workdir: Option<&Path>,
    pattern: Option<&Regex>,
) -> Result<ProcessResult> {
    info!(step = %label, %cmd, "starting step process");

    // Build a shell command appropriate for the platform.
    let mut command = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    };

    if let Some(dir) = workdir {
        command.current_dir(dir);
    }

    command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .with_context(|| format!("spawning process for step '{label}'"))?;

    // Always consume stderr so buffers don't fill; log at debug.
    if let Some(stderr) = child.stderr.take() {
        let label = label.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(step = %label, "stderr: {}", line);
            }
        });
    }

    let mut captured = None;
    if let Some(stdout) = child.stdout.take() {
        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines
            .next_line()
            .await
            .with_context(|| format!("reading stdout of step '{label}'"))?
        {
            debug!(step = %label, "stdout: {}", line);
            if let Some(caps) = pattern.and_then(|re| re.captures(&line)) {
                if let Some(m) = caps.get(1) {
                    captured = Some(m.as_str().to_string());
                }
            }
        }
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of step '{label}'"))?;
    let exit_code = status.code().unwrap_or(-1);

    info!(
        step = %label,
        exit_code,
        success = status.success(),
        "step process exited"
    );

    Ok(ProcessResult {
        exit_code,
        success: status.success(),
        captured,
    })
}
