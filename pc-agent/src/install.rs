// Self-installation into ~/.local/bin
//
// The generated units reference the agent binary by absolute path, so
// setup copies the running executable to a stable location first.

use anyhow::{Context, Result};
use colored::Colorize;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use pistats_provision::output;

/// Target directory for the installed binary (~/.local/bin)
pub fn install_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".local/bin"))
}

/// Absolute path the units point at
pub fn installed_bin_path() -> Result<PathBuf> {
    Ok(install_dir()?.join("pistats-pc"))
}

/// Copy the running executable into ~/.local/bin
///
/// Returns the installed path. Skips the copy when already running from
/// the install location, as happens on re-runs of setup.
pub fn install_self() -> Result<PathBuf> {
    let current_exe =
        std::env::current_exe().context("Failed to determine current executable path")?;
    let install_path = installed_bin_path()?;

    if current_exe == install_path {
        return Ok(install_path);
    }

    let dir = install_dir()?;
    std::fs::create_dir_all(&dir).with_context(|| {
        format!(
            "Failed to create directory: {}. Check permissions.",
            dir.display()
        )
    })?;

    std::fs::copy(&current_exe, &install_path).with_context(|| {
        format!(
            "Failed to copy binary from {} to {}",
            current_exe.display(),
            install_path.display()
        )
    })?;

    let mut perms = std::fs::metadata(&install_path)
        .context("Failed to read file permissions")?
        .permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&install_path, perms)
        .context("Failed to set executable permissions")?;

    Ok(install_path)
}

/// Check if directory is in PATH
pub fn is_in_path(dir: &Path) -> bool {
    std::env::var("PATH")
        .map(|path| path.split(':').any(|p| Path::new(p) == dir))
        .unwrap_or(false)
}

/// Warn when ~/.local/bin is missing from PATH
pub fn warn_if_not_in_path() -> Result<()> {
    let dir = install_dir()?;
    if !is_in_path(&dir) {
        output::warning("~/.local/bin is not in your PATH.");
        println!();
        output::info("Add this line to your ~/.bashrc or ~/.zshrc:");
        println!();
        println!("  {}", "export PATH=\"$HOME/.local/bin:$PATH\"".cyan());
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_in_path_compares_components() {
        // PATH is inherited from the test environment; only exercise the
        // pure comparison against a directory that cannot be present.
        assert!(!is_in_path(Path::new("/nonexistent/pistats-bin-dir")));
    }
}
