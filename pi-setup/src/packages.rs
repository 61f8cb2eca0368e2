// OS package installation
//
// `apt-get install -y` already skips packages that are current, which is
// what makes re-running setup safe.

use anyhow::Result;
use pistats_provision::cmd::{run_command, run_command_success};

use crate::constants::REQUIRED_PACKAGES;

/// Install the display host's package set
pub fn install(dry_run: bool) -> Result<()> {
    if dry_run {
        log::info!(
            "Would install packages: {}",
            REQUIRED_PACKAGES.join(", ")
        );
        return Ok(());
    }

    // Refresh indexes first; a stale mirror is not fatal
    let update = run_command("apt-get", &["update", "-qq"])?;
    if !update.status.success() {
        log::warn!(
            "apt-get update failed: {}",
            String::from_utf8_lossy(&update.stderr).trim()
        );
    }

    let mut args = vec!["install", "-y", "-qq"];
    args.extend_from_slice(REQUIRED_PACKAGES);
    run_command_success("apt-get", &args)?;

    Ok(())
}
