// FPS logger loop
//
// Polls the newest MangoHud session log twice a second and mirrors its
// most recent frame rate into a scalar file the sender script reads.
// A stale or absent log is reported as "0" so the display drops to zero
// when a game exits instead of freezing on the last sample.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};

use crate::constants::{FPS_FILE, FPS_POLL_MS, FPS_STALENESS_SECS};
use crate::logs::{latest_session_log, scan_dir};

/// Parse the frame rate from MangoHud CSV content
///
/// MangoHud appends one row per sample with FPS in the first column; the
/// last non-empty row is the current reading. Header rows and partial
/// writes parse as `None`.
pub fn parse_fps_csv(content: &str) -> Option<u32> {
    let last_row = content.lines().rev().find(|line| !line.trim().is_empty())?;

    let first_field = last_row.split(',').next()?.trim();

    // MangoHud logs fractional FPS; the display shows whole frames.
    first_field
        .parse::<f64>()
        .ok()
        .filter(|fps| fps.is_finite() && *fps >= 0.0)
        .map(|fps| fps.round() as u32)
}

/// Current FPS reading for a scan directory
///
/// Returns 0 when there is no session log, the newest one has gone
/// stale, or its content is unparseable.
pub fn current_fps(scan_dir: &Path, now: SystemTime) -> u32 {
    let Some((path, modified)) = latest_session_log(scan_dir) else {
        return 0;
    };

    // Strict window: a log exactly at the threshold already counts stale
    let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
    if age >= Duration::from_secs(FPS_STALENESS_SECS) {
        return 0;
    }

    std::fs::read_to_string(&path)
        .ok()
        .and_then(|content| parse_fps_csv(&content))
        .unwrap_or(0)
}

/// Publish one FPS sample, overwriting the whole file
///
/// Readers always see a complete value because the file only ever holds
/// a single short line.
pub fn write_sample(path: &Path, fps: u32) -> Result<()> {
    std::fs::write(path, format!("{fps}\n"))
        .with_context(|| format!("Failed to write FPS sample: {}", path.display()))
}

/// Run the FPS logger loop (never returns under normal operation)
///
/// `scan_dir` and `out` default to the home directory and `/tmp/fps.txt`;
/// the unit files use the defaults, the flags exist for manual runs.
pub fn run_logger(scan_dir_override: Option<PathBuf>, out: Option<PathBuf>) -> Result<()> {
    let scan_dir = match scan_dir_override {
        Some(dir) => dir,
        None => scan_dir()?,
    };
    let sample_path = out.unwrap_or_else(|| PathBuf::from(FPS_FILE));

    log::info!(
        "FPS logger started, scanning {} every {FPS_POLL_MS}ms",
        scan_dir.display()
    );

    loop {
        let fps = current_fps(&scan_dir, SystemTime::now());
        if let Err(error) = write_sample(&sample_path, fps) {
            log::warn!("{error:#}");
        }

        std::thread::sleep(Duration::from_millis(FPS_POLL_MS));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn write_aged(dir: &Path, name: &str, content: &str, age: Duration) {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        let file = File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
    }

    #[test]
    fn test_parse_last_row_first_column() {
        let content = "fps,frametime,cpu_load\n59.7,16.7,42\n144.2,6.9,38\n";
        assert_eq!(parse_fps_csv(content), Some(144));
    }

    #[test]
    fn test_parse_ignores_trailing_blank_lines() {
        assert_eq!(parse_fps_csv("60.0,16.6\n\n\n"), Some(60));
    }

    #[test]
    fn test_parse_header_only_is_none() {
        assert_eq!(parse_fps_csv("fps,frametime\n"), None);
        assert_eq!(parse_fps_csv(""), None);
    }

    #[test]
    fn test_parse_rejects_negative_and_nan() {
        assert_eq!(parse_fps_csv("-5.0,1.0\n"), None);
        assert_eq!(parse_fps_csv("NaN,1.0\n"), None);
    }

    #[test]
    fn test_fresh_log_yields_its_fps() {
        let dir = tempfile::tempdir().unwrap();
        write_aged(
            dir.path(),
            "game_2026-08-23_12-00-00.csv",
            "fps\n75.4\n",
            Duration::from_secs(1),
        );

        assert_eq!(current_fps(dir.path(), SystemTime::now()), 75);
    }

    #[test]
    fn test_stale_log_yields_zero() {
        let dir = tempfile::tempdir().unwrap();
        write_aged(
            dir.path(),
            "game_2026-08-23_12-00-00.csv",
            "fps\n75.4\n",
            Duration::from_secs(5),
        );

        assert_eq!(current_fps(dir.path(), SystemTime::now()), 0);
    }

    #[test]
    fn test_staleness_window_is_strict() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game_2026-08-23_12-00-00.csv");
        std::fs::write(&path, "fps\n75.4\n").unwrap();

        let mtime = SystemTime::now();
        let file = File::options().write(true).open(&path).unwrap();
        file.set_modified(mtime).unwrap();

        // Just inside the window it is live; at exactly the threshold it
        // is already stale, matching the sender's own freshness check.
        assert_eq!(current_fps(dir.path(), mtime + Duration::from_secs(2)), 75);
        assert_eq!(current_fps(dir.path(), mtime + Duration::from_secs(3)), 0);
    }

    #[test]
    fn test_no_logs_yields_zero() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(current_fps(dir.path(), SystemTime::now()), 0);
    }

    #[test]
    fn test_write_sample_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fps.txt");

        write_sample(&path, 144).unwrap();
        write_sample(&path, 0).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "0\n");
    }
}
