//! Running external command-line tools.

use std::process::{Command, Stdio};

/// Whether `program` can be started; `probe_arg` should make it exit quickly.
///
/// Only the spawn matters: some tools print their version to stderr and exit
/// non-zero.
pub fn command_available(program: &str, probe_arg: &str) -> bool {
    let available = Command::new(program)
        .arg(probe_arg)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok();

    tracing::debug!("Probe {} {}: {}", program, probe_arg, available);
    available
}

/// Errors from [`run`]
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{program} failed to start: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Run a prepared command to completion and return its stdout
pub fn run(command: &mut Command) -> Result<Vec<u8>, ToolError> {
    let program = command.get_program().to_string_lossy().into_owned();
    tracing::trace!("Running {:?}", command);

    let output = command
        .stdin(Stdio::null())
        .output()
        .map_err(|source| ToolError::Spawn {
            program: program.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(ToolError::Failed {
            program,
            status: output.status,
            stderr: single_line(&String::from_utf8_lossy(&output.stderr)),
        });
    }

    Ok(output.stdout)
}

/// Collapse tool output into one line for error messages
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
