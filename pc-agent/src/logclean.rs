// Session log cleanup sweep
//
// MangoHud keeps appending to a session log for as long as a game runs
// and never deletes it. Left alone these files accumulate in the home
// directory, so an independent sweep removes any log untouched for 30+
// seconds. The age threshold is ten times the FPS staleness window,
// which keeps the sweep from deleting a file the logger still considers
// live.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::Result;

use crate::constants::{CLEANUP_INTERVAL_SECS, CLEANUP_MAX_AGE_SECS};
use crate::logs::{scan_dir, session_logs};

/// Delete session logs untouched for the maximum age or longer
///
/// Returns the number of files removed. Individual delete failures are
/// logged and skipped; the next sweep retries them.
pub fn sweep(dir: &Path, now: SystemTime) -> usize {
    let max_age = Duration::from_secs(CLEANUP_MAX_AGE_SECS);
    let mut removed = 0;

    for (path, modified) in session_logs(dir) {
        let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
        if age < max_age {
            continue;
        }

        match std::fs::remove_file(&path) {
            Ok(()) => {
                log::debug!("Removed stale session log: {}", path.display());
                removed += 1;
            }
            Err(error) => {
                log::warn!("Failed to remove {}: {error}", path.display());
            }
        }
    }

    removed
}

/// Run the cleanup loop (never returns under normal operation)
pub fn run_cleanup(scan_dir_override: Option<PathBuf>) -> Result<()> {
    let scan_dir = match scan_dir_override {
        Some(dir) => dir,
        None => scan_dir()?,
    };

    log::info!(
        "Log cleanup started, sweeping {} every {CLEANUP_INTERVAL_SECS}s",
        scan_dir.display()
    );

    loop {
        let removed = sweep(&scan_dir, SystemTime::now());
        if removed > 0 {
            log::info!("Removed {removed} stale session log(s)");
        }

        std::thread::sleep(Duration::from_secs(CLEANUP_INTERVAL_SECS));
    }
}
