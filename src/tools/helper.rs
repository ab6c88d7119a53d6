// src/tools/helper.rs

//! Running helper programs and collecting their stdout.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::{debug, trace};

/// Run `program` with `args` to completion and return its stdout.
///
/// A non-zero exit status is an error carrying the first stderr line.
pub fn run_helper<I, S>(program: &Path, args: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args);
    debug!(?cmd, "running helper");

    let output = cmd
        .output()
        .with_context(|| format!("spawning helper {:?}", program))?;

    let stdout = String::from_utf8(output.stdout)
        .with_context(|| format!("helper {:?} wrote non UTF-8 output", program))?;
    trace!(program = ?program, %stdout, "helper output");

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let first = stderr.lines().next().unwrap_or("").trim();
        bail!(
            "helper {:?} exited with {}{}",
            program,
            output.status,
            if first.is_empty() {
                String::new()
            } else {
                format!(": {first}")
            }
        );
    }

    Ok(stdout)
}
