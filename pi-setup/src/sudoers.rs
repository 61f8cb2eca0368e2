// Sudoers policy for the settings page
//
// The display server's settings page swaps rotation hooks with `cp`/`rm`
// and requests shutdown/reboot, all through sudo. The grant is a fixed
// allow-list for the display user, staged to a temp file and checked
// with visudo before anything lands in /etc/sudoers.d; a fragment that
// fails the syntax check is discarded, never installed.

use anyhow::{Context, Result};
use std::io::Write as _;
use std::path::Path;

use pistats_provision::cmd::{run_command, write_file_with_mode};
use pistats_provision::output;

use crate::constants::SUDOERS_PATH;

/// The single-line grant for the display user
pub fn sudoers_line(user: &str) -> String {
    format!(
        "{user} ALL=(ALL) NOPASSWD: /usr/bin/cp, /usr/bin/rm, /usr/sbin/shutdown, /usr/sbin/reboot\n"
    )
}

/// Stage, validate and install the sudoers fragment
///
/// Validation failure is continue-and-warn: the rest of the display
/// setup works without it, only the settings page's privileged actions
/// are lost.
pub fn install(user: &str, dry_run: bool) -> Result<()> {
    if dry_run {
        log::info!("Would install sudoers fragment at {SUDOERS_PATH}");
        return Ok(());
    }

    install_fragment(user, Path::new(SUDOERS_PATH), "visudo")
}

/// Validation gate: the fragment reaches `target` only if `checker`
/// (visudo in production) accepts the staged copy
fn install_fragment(user: &str, target: &Path, checker: &str) -> Result<()> {
    let line = sudoers_line(user);

    let mut staged = tempfile::NamedTempFile::new().context("Failed to create staging file")?;
    staged
        .write_all(line.as_bytes())
        .context("Failed to write staged sudoers fragment")?;
    staged.flush().context("Failed to flush staged sudoers fragment")?;

    let staged_path = staged.path().to_string_lossy().to_string();
    let check = run_command(checker, &["-c", "-q", "-f", &staged_path])?;

    if !check.status.success() {
        // Staged file is dropped with the handle; nothing reaches /etc
        output::warning("Sudoers fragment failed visudo validation and was not installed.");
        output::info("The settings page's reboot and orientation controls will not work.");
        log::debug!(
            "visudo rejected fragment: {}",
            String::from_utf8_lossy(&check.stderr).trim()
        );
        return Ok(());
    }

    write_file_with_mode(target, &line, 0o440)
        .context("Failed to install sudoers fragment")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    #[test]
    fn test_sudoers_line_grants_fixed_allow_list() {
        let line = sudoers_line("pi");
        assert_eq!(
            line,
            "pi ALL=(ALL) NOPASSWD: /usr/bin/cp, /usr/bin/rm, /usr/sbin/shutdown, /usr/sbin/reboot\n"
        );
    }

    #[test]
    fn test_sudoers_line_is_single_line() {
        let line = sudoers_line("gamer");
        assert_eq!(line.lines().count(), 1);
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn test_rejected_fragment_is_never_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("010-pistats");

        // `false` stands in for a visudo that rejects the fragment
        install_fragment("pi", &target, "false").unwrap();

        assert!(!target.exists());
    }

    #[test]
    fn test_accepted_fragment_lands_with_0440() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("010-pistats");

        install_fragment("pi", &target, "true").unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), sudoers_line("pi"));
        let mode = std::fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o440);
    }
}
