//! Append-only, idempotent edits of key=value configuration files
//!
//! Used for the Pi boot firmware config: each setting is appended only if
//! no uncommented line already assigns the key. The edit is idempotent but
//! never corrective - a malformed or unexpected existing entry is left
//! exactly as found.

use anyhow::{Context, Result};
use std::path::Path;

/// Check whether an uncommented `key=...` assignment is present
pub fn has_setting(content: &str, key: &str) -> bool {
    content.lines().any(|line| {
        let trimmed = line.trim_start();
        !trimmed.starts_with('#')
            && trimmed
                .strip_prefix(key)
                .is_some_and(|rest| rest.trim_start().starts_with('='))
    })
}

/// Append `key=value` if the key is not already assigned
///
/// Returns `None` when the content already assigns the key (with any
/// value), otherwise the new content with the assignment appended.
pub fn ensure_setting(content: &str, key: &str, value: &str) -> Option<String> {
    if has_setting(content, key) {
        return None;
    }

    let mut updated = content.to_string();
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str(key);
    updated.push('=');
    updated.push_str(value);
    updated.push('\n');
    Some(updated)
}

/// Apply a batch of settings to a file, appending only the missing ones
///
/// Returns the number of settings that were appended. The file must
/// already exist; a missing boot config is not something this utility
/// should invent.
pub fn apply_settings(path: &Path, settings: &[(&str, &str)]) -> Result<usize> {
    let mut content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut appended = 0;
    for (key, value) in settings {
        if let Some(updated) = ensure_setting(&content, key, value) {
            content = updated;
            appended += 1;
        }
    }

    if appended > 0 {
        std::fs::write(path, &content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    }

    Ok(appended)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTINGS: &[(&str, &str)] = &[
        ("hdmi_blanking", "1"),
        ("hdmi_force_hotplug", "1"),
        ("hdmi_drive", "2"),
        ("gpu_mem", "128"),
    ];

    #[test]
    fn test_has_setting_ignores_comments() {
        assert!(has_setting("gpu_mem=64\n", "gpu_mem"));
        assert!(has_setting("  gpu_mem = 64\n", "gpu_mem"));
        assert!(!has_setting("#gpu_mem=64\n", "gpu_mem"));
        assert!(!has_setting("gpu_mem_256=1\n", "gpu_mem"));
    }

    #[test]
    fn test_ensure_setting_appends_once() {
        let first = ensure_setting("dtparam=audio=on\n", "gpu_mem", "128").unwrap();
        assert!(first.ends_with("gpu_mem=128\n"));
        assert_eq!(ensure_setting(&first, "gpu_mem", "128"), None);
    }

    #[test]
    fn test_ensure_setting_handles_missing_trailing_newline() {
        let updated = ensure_setting("dtparam=audio=on", "gpu_mem", "128").unwrap();
        assert_eq!(updated, "dtparam=audio=on\ngpu_mem=128\n");
    }

    #[test]
    fn test_ensure_setting_is_never_corrective() {
        // An existing assignment with a different value is left untouched
        assert_eq!(ensure_setting("gpu_mem=broken\n", "gpu_mem", "128"), None);
    }

    #[test]
    fn test_apply_settings_idempotent_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.txt");
        std::fs::write(&path, "dtparam=audio=on\nhdmi_drive=2\n").unwrap();

        let appended = apply_settings(&path, SETTINGS).unwrap();
        assert_eq!(appended, 3); // hdmi_drive was already there

        let after_first = std::fs::read_to_string(&path).unwrap();

        // Second run changes nothing: each key appears exactly once
        let appended = apply_settings(&path, SETTINGS).unwrap();
        assert_eq!(appended, 0);
        let after_second = std::fs::read_to_string(&path).unwrap();
        assert_eq!(after_first, after_second);

        for (key, _) in SETTINGS {
            let count = after_second
                .lines()
                .filter(|l| l.starts_with(&format!("{key}=")))
                .count();
            assert_eq!(count, 1, "{key} should appear exactly once");
        }
    }

    #[test]
    fn test_apply_settings_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        assert!(apply_settings(&path, SETTINGS).is_err());
    }
}
