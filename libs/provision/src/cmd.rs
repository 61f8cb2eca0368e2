//! Process execution helpers

use anyhow::{Context, Result};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a command and return the output
pub fn run_command(program: &str, args: &[&str]) -> Result<std::process::Output> {
    log::debug!("Running command: {} {}", program, args.join(" "));

    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("Failed to execute: {} {}", program, args.join(" ")))?;

    log::debug!("Command exit status: {}", output.status);
    if !output.stdout.is_empty() {
        log::debug!("stdout: {}", String::from_utf8_lossy(&output.stdout));
    }
    if !output.stderr.is_empty() {
        log::debug!("stderr: {}", String::from_utf8_lossy(&output.stderr));
    }

    Ok(output)
}

/// Run a command and require a zero exit status, returning stdout
pub fn run_command_success(program: &str, args: &[&str]) -> Result<String> {
    let output = run_command(program, args)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!(
            "Command failed: {} {}\nError: {}",
            program,
            args.join(" "),
            stderr
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Run a command silently, returning only whether it exited successfully
///
/// Used for the opportunistic operations (rotation, touch mapping) whose
/// failure must never surface to the operator.
pub fn run_command_quiet(program: &str, args: &[&str]) -> bool {
    log::debug!("Running command (quiet): {} {}", program, args.join(" "));
    Command::new(program)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Check if a command exists in PATH
pub fn command_exists(program: &str) -> bool {
    Command::new("which")
        .arg(program)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Write a file and set its permission bits
pub fn write_file_with_mode(path: &Path, content: &str, mode: u32) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;

    let mut perms = std::fs::metadata(path)
        .with_context(|| format!("Failed to read permissions: {}", path.display()))?
        .permissions();
    perms.set_mode(mode);
    std::fs::set_permissions(path, perms)
        .with_context(|| format!("Failed to set permissions: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_command_success_captures_stdout() {
        let out = run_command_success("echo", &["hello"]).unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[test]
    fn test_run_command_success_fails_on_nonzero_exit() {
        let result = run_command_success("false", &[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_command_quiet_swallows_failure() {
        assert!(!run_command_quiet("false", &[]));
        assert!(run_command_quiet("true", &[]));
    }

    #[test]
    fn test_write_file_with_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("fragment");
        write_file_with_mode(&path, "content\n", 0o440).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o440);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "content\n");
    }
}
