// Display rotation and opportunistic touch remapping
//
// Invoked as the generated unit's failure-tolerant pre-start hook and by
// the settings page when the user flips orientation. The orientation is
// read from the persisted config at process start - there is no second
// encoding to keep in sync.
//
// Rotation uses the display-server transform (xrandr) rather than
// firmware rotation. Touch input remapping is attempted opportunistically
// and failure is silently tolerated: input may desync from display
// orientation, a known and accepted defect class on these panels.

use anyhow::Result;

use pistats_provision::cmd::{run_command, run_command_quiet};

use crate::config::DisplayConfig;

/// Apply the configured orientation to the live display session
pub fn run_rotate(boot: bool) -> Result<()> {
    let config = DisplayConfig::load()?;

    if boot {
        log::debug!("Boot-time rotation, orientation={}", config.orientation);
    }

    let Some(display_output) = detect_connected_output() else {
        log::debug!("No connected display output found; skipping rotation");
        return Ok(());
    };

    let rotated = run_command_quiet(
        "xrandr",
        &[
            "--output",
            &display_output,
            "--rotate",
            config.orientation.xrandr_rotation(),
        ],
    );

    if !rotated {
        log::debug!("xrandr rotation failed for output {display_output}");
        return Ok(());
    }

    remap_touch_input(&display_output);

    Ok(())
}

/// First connected output reported by xrandr
fn detect_connected_output() -> Option<String> {
    let output = run_command("xrandr", &["--query"]).ok()?;
    if !output.status.success() {
        return None;
    }
    parse_connected_output(&String::from_utf8_lossy(&output.stdout))
}

fn parse_connected_output(stdout: &str) -> Option<String> {
    stdout.lines().find_map(|line| {
        let mut words = line.split_whitespace();
        let name = words.next()?;
        (words.next()? == "connected").then(|| name.to_string())
    })
}

/// Map the touchscreen onto the rotated output; all failures suppressed
fn remap_touch_input(display_output: &str) {
    let Ok(list) = run_command("xinput", &["list", "--name-only"]) else {
        return;
    };
    if !list.status.success() {
        return;
    }

    let names = String::from_utf8_lossy(&list.stdout);
    let Some(device) = find_touch_device(&names) else {
        log::debug!("No touch input device found; skipping touch remap");
        return;
    };

    if !run_command_quiet("xinput", &["map-to-output", &device, display_output]) {
        log::debug!("Touch remap failed for device '{device}'");
    }
}

fn find_touch_device(names: &str) -> Option<String> {
    names
        .lines()
        .map(str::trim)
        .find(|name| !name.is_empty() && name.to_lowercase().contains("touch"))
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_connected_output_picks_first_connected() {
        let stdout = "\
Screen 0: minimum 320 x 200, current 1920 x 480, maximum 16384 x 16384
HDMI-1 disconnected (normal left inverted right x axis y axis)
HDMI-2 connected primary 1920x480+0+0 (normal left inverted right) 800mm x 200mm
DP-1 connected 1024x768+0+0
";
        assert_eq!(parse_connected_output(stdout), Some("HDMI-2".to_string()));
    }

    #[test]
    fn test_parse_connected_output_none_when_all_disconnected() {
        let stdout = "HDMI-1 disconnected (normal left inverted right x axis y axis)\n";
        assert_eq!(parse_connected_output(stdout), None);
    }

    #[test]
    fn test_find_touch_device_case_insensitive() {
        let names = "Virtual core pointer\nILITEK ILITEK-TP Touchscreen\nkeyboard\n";
        assert_eq!(
            find_touch_device(names),
            Some("ILITEK ILITEK-TP Touchscreen".to_string())
        );
        assert_eq!(find_touch_device("Virtual core pointer\n"), None);
    }
}
