// Generated user units for the sender host
//
// Three services run under the per-user manager: the Python stats
// sender, the FPS logger loop, and the session log cleanup sweep. The
// sender gets its endpoint through an environment variable derived from
// the validated config, so the deployed script itself is never edited.

use anyhow::Result;
use pistats_provision::units::{UnitScope, UnitSpec};

use crate::config::AgentConfig;
use crate::constants::{
    CLEANUP_RESTART_SEC, CLEANUP_UNIT, FPS_RESTART_SEC, FPS_UNIT, SENDER_RESTART_SEC,
    SENDER_SCRIPT, SENDER_UNIT, SENDER_URL_ENV,
};

/// Unit running the external Python stats sender
pub fn sender_unit(config: &AgentConfig) -> Result<UnitSpec> {
    let data_dir = AgentConfig::data_dir()?;
    let script = data_dir.join(SENDER_SCRIPT);

    let mut unit = UnitSpec::new(
        SENDER_UNIT,
        "PiStats system stats sender",
        format!("/usr/bin/python3 {}", script.display()),
    );
    unit.after = vec!["network-online.target".to_string()];
    unit.wants = vec!["network-online.target".to_string()];
    unit.working_directory = Some(data_dir);
    unit.environment = vec![(SENDER_URL_ENV.to_string(), config.stats_url())];
    unit.restart_sec = SENDER_RESTART_SEC;
    Ok(unit)
}

/// Unit running the FPS logger loop
pub fn fps_unit(agent_bin: &str) -> UnitSpec {
    let mut unit = UnitSpec::new(
        FPS_UNIT,
        "PiStats MangoHud FPS logger",
        format!("{agent_bin} run fps-logger"),
    );
    unit.restart_sec = FPS_RESTART_SEC;
    unit
}

/// Unit running the session log cleanup sweep
pub fn cleanup_unit(agent_bin: &str) -> UnitSpec {
    let mut unit = UnitSpec::new(
        CLEANUP_UNIT,
        "PiStats MangoHud log cleanup",
        format!("{agent_bin} run log-cleanup"),
    );
    unit.restart_sec = CLEANUP_RESTART_SEC;
    unit
}

/// Write all three unit files into the user scope
pub fn install_all(config: &AgentConfig, agent_bin: &str) -> Result<()> {
    sender_unit(config)?.install(UnitScope::User)?;
    fps_unit(agent_bin).install(UnitScope::User)?;
    cleanup_unit(agent_bin).install(UnitScope::User)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_sender_unit_carries_endpoint_env() {
        let config = AgentConfig::new(Ipv4Addr::new(10, 0, 0, 225));
        let rendered = sender_unit(&config).unwrap().render();

        assert!(rendered.contains("Environment=\"PISTATS_URL=http://10.0.0.225:5000/stats\"\n"));
        assert!(rendered.contains("stat_sender.py\n"));
        assert!(rendered.contains("After=network-online.target\n"));
        assert!(rendered.contains("Restart=always\nRestartSec=5\n"));
    }

    #[test]
    fn test_loop_units_invoke_agent_subcommands() {
        let fps = fps_unit("/home/dan/.local/bin/pistats-pc").render();
        assert!(fps.contains("ExecStart=/home/dan/.local/bin/pistats-pc run fps-logger\n"));
        assert!(fps.contains("RestartSec=3\n"));

        let cleanup = cleanup_unit("/home/dan/.local/bin/pistats-pc").render();
        assert!(cleanup.contains("ExecStart=/home/dan/.local/bin/pistats-pc run log-cleanup\n"));
        assert!(cleanup.contains("RestartSec=10\n"));
    }

    #[test]
    fn test_all_units_target_default_target() {
        let config = AgentConfig::new(Ipv4Addr::new(192, 168, 1, 2));
        for rendered in [
            sender_unit(&config).unwrap().render(),
            fps_unit("pistats-pc").render(),
            cleanup_unit("pistats-pc").render(),
        ] {
            assert!(rendered.ends_with("[Install]\nWantedBy=default.target\n"));
        }
    }
}
