//! External tool invocation.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::PipelineError;

/// Run `exec args...` inside `workdir` and require `expected_output` afterwards.
///
/// Output streams are captured and logged. A non-zero exit fails with the
/// exit status and captured stderr.
pub(crate) async fn run_tool(
    tool: &'static str,
    exec: &Path,
    args: &[String],
    workdir: &Path,
    expected_output: &Path,
) -> Result<(), PipelineError> {
    if exec.as_os_str().is_empty() {
        return Err(PipelineError::ToolNotConfigured { tool });
    }
    match tokio::fs::metadata(exec).await {
        Ok(meta) if meta.is_file() => {}
        _ => {
            return Err(PipelineError::ToolMissing {
                tool,
                path: exec.to_path_buf(),
            });
        }
    }

    tracing::info!("Running {}: {:?} {}", tool, exec, args.join(" "));
    let output = Command::new(exec)
        .args(args)
        .current_dir(workdir)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| PipelineError::io(exec, e))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    for line in stdout.lines() {
        tracing::debug!("{} stdout: {}", tool, line);
    }
    for line in stderr.lines() {
        tracing::debug!("{} stderr: {}", tool, line);
    }

    if !output.status.success() {
        let status = match output.status.code() {
            Some(code) => format!("exit code {code}"),
            None => "no exit code (terminated by signal)".to_string(),
        };
        tracing::warn!("{} failed with {}", tool, status);
        return Err(PipelineError::ToolFailed {
            tool,
            status,
            stderr: stderr.trim().to_string(),
        });
    }

    if !tokio::fs::try_exists(expected_output).await.unwrap_or(false) {
        return Err(PipelineError::MissingOutput {
            tool,
            path: expected_output.to_path_buf(),
        });
    }
    Ok(())
}
