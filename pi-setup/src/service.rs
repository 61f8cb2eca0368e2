// Generation of the display service unit
//
// The unit is rebuilt from the persisted configuration on every setup
// run. Start is preceded by a fixed delay plus a best-effort rotation
// attempt whose failure does not block service start.

use anyhow::Result;
use pistats_provision::units::{ExecHook, UnitScope, UnitSpec};

use crate::config::DisplayConfig;
use crate::constants::{BIN_INSTALL_PATH, RESTART_SEC, SERVICE_NAME, STARTUP_DELAY_SECS};

/// Build the display service descriptor from the persisted config
pub fn build_unit(config: &DisplayConfig) -> UnitSpec {
    let script = config.display_dir.join(crate::constants::DISPLAY_SCRIPT);

    let mut unit = UnitSpec::new(
        SERVICE_NAME,
        "PiStats display server",
        format!("/usr/bin/python3 {}", script.display()),
    );
    unit.after = vec![
        "graphical.target".to_string(),
        "network-online.target".to_string(),
    ];
    unit.wants = vec!["graphical.target".to_string()];
    unit.user = Some(config.user.clone());
    unit.working_directory = Some(config.display_dir.clone());
    unit.environment = vec![
        ("DISPLAY".to_string(), ":0".to_string()),
        (
            "XAUTHORITY".to_string(),
            format!("/home/{}/.Xauthority", config.user),
        ),
        (
            "PISTATS_ORIENTATION".to_string(),
            config.orientation.to_string(),
        ),
    ];
    unit.exec_start_pre = vec![
        ExecHook::new(format!("/bin/sleep {STARTUP_DELAY_SECS}")),
        ExecHook::tolerant(format!("{BIN_INSTALL_PATH} rotate --boot")),
    ];
    unit.restart_sec = RESTART_SEC;
    unit.wanted_by = "graphical.target".to_string();

    unit
}

/// Write the unit file (overwrite semantics)
pub fn install_unit(config: &DisplayConfig, dry_run: bool) -> Result<()> {
    if dry_run {
        log::info!("Would write {SERVICE_NAME}");
        return Ok(());
    }

    let path = build_unit(config).install(UnitScope::System)?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Orientation;

    #[test]
    fn test_unit_environment_matches_persisted_orientation() {
        for (orientation, expected) in [
            (Orientation::Portrait, "PISTATS_ORIENTATION=portrait"),
            (Orientation::Landscape, "PISTATS_ORIENTATION=landscape"),
        ] {
            let config = DisplayConfig::new(orientation, "pi");
            let rendered = build_unit(&config).render();
            assert!(rendered.contains(expected), "missing {expected}");
        }
    }

    #[test]
    fn test_rotation_hook_is_failure_tolerant() {
        let config = DisplayConfig::new(Orientation::Portrait, "pi");
        let rendered = build_unit(&config).render();
        assert!(rendered.contains("ExecStartPre=/bin/sleep 15\n"));
        assert!(rendered.contains("ExecStartPre=-/usr/local/bin/pistats-pi rotate --boot\n"));
    }

    #[test]
    fn test_unit_restart_policy() {
        let config = DisplayConfig::new(Orientation::Portrait, "pi");
        let rendered = build_unit(&config).render();
        assert!(rendered.contains("Restart=always\nRestartSec=5\n"));
        assert!(rendered.contains("WantedBy=graphical.target\n"));
    }

    #[test]
    fn test_unit_runs_script_from_display_dir() {
        let config = DisplayConfig::new(Orientation::Portrait, "gamer");
        let rendered = build_unit(&config).render();
        assert!(rendered.contains("WorkingDirectory=/home/gamer/stats-display\n"));
        assert!(rendered
            .contains("ExecStart=/usr/bin/python3 /home/gamer/stats-display/stats_display.py\n"));
    }
}
