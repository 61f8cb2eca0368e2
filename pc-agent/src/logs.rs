// MangoHud session log discovery
//
// MangoHud writes per-session CSV logs named with a timestamp suffix,
// e.g. `Cyberpunk2077_2026-08-23_18-04-11.csv`. Both the FPS logger and
// the cleanup sweep scan the same directory for this pattern; only their
// age thresholds differ.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::SystemTime;

use anyhow::Context;
use regex::Regex;

/// Directory MangoHud drops session logs into
///
/// MangoHud's `output_folder` defaults to the user's home directory in
/// this project's recommended configuration.
pub fn scan_dir() -> anyhow::Result<PathBuf> {
    dirs::home_dir().context("Failed to determine home directory")
}

static SESSION_LOG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.+_\d{4}-\d{2}-\d{2}_\d{2}-\d{2}-\d{2}\.csv$")
        .expect("session log pattern is valid")
});

/// Check whether a file name matches the timestamp-suffixed CSV pattern
pub fn is_session_log(file_name: &str) -> bool {
    SESSION_LOG_RE.is_match(file_name)
}

/// All session logs in a directory with their modification times
///
/// Unreadable entries are skipped; a vanished file between readdir and
/// stat is normal here (the cleanup sweep may have been first).
pub fn session_logs(dir: &Path) -> Vec<(PathBuf, SystemTime)> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        log::debug!("Cannot read scan directory: {}", dir.display());
        return Vec::new();
    };

    entries
        .flatten()
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(is_session_log)
        })
        .filter_map(|entry| {
            let modified = entry.metadata().ok()?.modified().ok()?;
            Some((entry.path(), modified))
        })
        .collect()
}

/// The most recently modified session log, if any
pub fn latest_session_log(dir: &Path) -> Option<(PathBuf, SystemTime)> {
    session_logs(dir).into_iter().max_by_key(|(_, mtime)| *mtime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_matches_mangohud_names() {
        assert!(is_session_log("Cyberpunk2077_2026-08-23_18-04-11.csv"));
        assert!(is_session_log("steam_app_1091500_2026-01-02_03-04-05.csv"));
    }

    #[test]
    fn test_pattern_rejects_other_files() {
        assert!(!is_session_log("notes.csv"));
        assert!(!is_session_log("Cyberpunk2077_2026-08-23.csv"));
        assert!(!is_session_log("_2026-08-23_18-04-11.csv"));
        assert!(!is_session_log("Cyberpunk2077_2026-08-23_18-04-11.csv.bak"));
        assert!(!is_session_log("Cyberpunk2077_2026-08-23_18-04-11.txt"));
    }

    #[test]
    fn test_latest_session_log_picks_newest() {
        use std::time::Duration;

        let dir = tempfile::tempdir().unwrap();
        for (name, age_secs) in [
            ("old_2026-08-23_10-00-00.csv", 60),
            ("new_2026-08-23_10-01-00.csv", 1),
            ("ignored.csv", 0),
        ] {
            let path = dir.path().join(name);
            std::fs::write(&path, "fps\n60\n").unwrap();
            let file = std::fs::File::options().write(true).open(&path).unwrap();
            file.set_modified(SystemTime::now() - Duration::from_secs(age_secs))
                .unwrap();
        }

        let (path, _) = latest_session_log(dir.path()).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "new_2026-08-23_10-01-00.csv"
        );
    }

    #[test]
    fn test_missing_directory_yields_empty() {
        assert!(session_logs(Path::new("/nonexistent/pistats-scan")).is_empty());
    }
}
