//! Systemd unit descriptors and rendering
//!
//! Units are regenerated fresh on every setup run (overwrite semantics)
//! and enabled once; they persist until cleanup/uninstall. All services
//! use an unconditional restart-always policy with a fixed backoff: the
//! design assumes transient failures are common and recovery should be
//! automatic rather than escalated.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::PathBuf;

/// Where a unit is installed and which service manager owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitScope {
    /// System manager, `/etc/systemd/system`
    System,
    /// Per-user manager, `~/.config/systemd/user`
    User,
}

impl UnitScope {
    /// Directory unit files are written to
    pub fn unit_dir(self) -> Result<PathBuf> {
        match self {
            Self::System => Ok(PathBuf::from("/etc/systemd/system")),
            Self::User => {
                let config_dir = dirs::config_dir()
                    .context("Could not determine XDG_CONFIG_HOME")?;
                Ok(config_dir.join("systemd/user"))
            }
        }
    }
}

/// A pre-start command, optionally failure-tolerant
///
/// Failure-tolerant hooks render with systemd's `-` prefix so a failed
/// rotation attempt never blocks service start.
#[derive(Debug, Clone)]
pub struct ExecHook {
    pub command: String,
    pub tolerate_failure: bool,
}

impl ExecHook {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            tolerate_failure: false,
        }
    }

    pub fn tolerant(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            tolerate_failure: true,
        }
    }
}

/// Descriptor for a generated service unit
///
/// Fixed schema: Description, After/Wants ordering, Type=simple,
/// Restart=always with fixed `RestartSec`, environment variables and
/// working directory.
#[derive(Debug, Clone)]
pub struct UnitSpec {
    pub name: String,
    pub description: String,
    pub after: Vec<String>,
    pub wants: Vec<String>,
    pub user: Option<String>,
    pub working_directory: Option<PathBuf>,
    pub environment: Vec<(String, String)>,
    pub exec_start_pre: Vec<ExecHook>,
    pub exec_start: String,
    pub restart_sec: u32,
    pub wanted_by: String,
}

impl UnitSpec {
    /// Create a descriptor with the common defaults
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        exec_start: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            after: Vec::new(),
            wants: Vec::new(),
            user: None,
            working_directory: None,
            environment: Vec::new(),
            exec_start_pre: Vec::new(),
            exec_start: exec_start.into(),
            restart_sec: 5,
            wanted_by: "default.target".to_string(),
        }
    }

    /// Render the unit file contents
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("[Unit]\n");
        let _ = writeln!(out, "Description={}", self.description);
        if !self.after.is_empty() {
            let _ = writeln!(out, "After={}", self.after.join(" "));
        }
        if !self.wants.is_empty() {
            let _ = writeln!(out, "Wants={}", self.wants.join(" "));
        }

        out.push_str("\n[Service]\nType=simple\n");
        if let Some(ref user) = self.user {
            let _ = writeln!(out, "User={user}");
        }
        if let Some(ref dir) = self.working_directory {
            let _ = writeln!(out, "WorkingDirectory={}", dir.display());
        }
        for (key, value) in &self.environment {
            let _ = writeln!(out, "Environment=\"{key}={value}\"");
        }
        for hook in &self.exec_start_pre {
            let prefix = if hook.tolerate_failure { "-" } else { "" };
            let _ = writeln!(out, "ExecStartPre={prefix}{}", hook.command);
        }
        let _ = writeln!(out, "ExecStart={}", self.exec_start);
        out.push_str("Restart=always\n");
        let _ = writeln!(out, "RestartSec={}", self.restart_sec);

        out.push_str("\n[Install]\n");
        let _ = writeln!(out, "WantedBy={}", self.wanted_by);

        out
    }

    /// Path this unit is written to within the given scope
    pub fn path(&self, scope: UnitScope) -> Result<PathBuf> {
        Ok(scope.unit_dir()?.join(&self.name))
    }

    /// Write the unit file, overwriting any previous generation
    pub fn install(&self, scope: UnitScope) -> Result<PathBuf> {
        let path = self.path(scope)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create unit directory: {}", parent.display()))?;
        }
        std::fs::write(&path, self.render())
            .with_context(|| format!("Failed to write unit file: {}", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_unit() -> UnitSpec {
        let mut unit = UnitSpec::new(
            "stats-display.service",
            "PiStats display server",
            "/usr/bin/python3 /home/pi/stats-display/stats_display.py",
        );
        unit.after = vec!["graphical.target".to_string()];
        unit.wants = vec!["graphical.target".to_string()];
        unit.user = Some("pi".to_string());
        unit.working_directory = Some(PathBuf::from("/home/pi/stats-display"));
        unit.environment = vec![
            ("DISPLAY".to_string(), ":0".to_string()),
            ("PISTATS_ORIENTATION".to_string(), "portrait".to_string()),
        ];
        unit.exec_start_pre = vec![
            ExecHook::new("/bin/sleep 15"),
            ExecHook::tolerant("/usr/local/bin/pistats-pi rotate --boot"),
        ];
        unit.wanted_by = "graphical.target".to_string();
        unit
    }

    #[test]
    fn test_render_has_fixed_schema() {
        let rendered = sample_unit().render();
        assert!(rendered.starts_with("[Unit]\nDescription=PiStats display server\n"));
        assert!(rendered.contains("After=graphical.target\n"));
        assert!(rendered.contains("Type=simple\n"));
        assert!(rendered.contains("User=pi\n"));
        assert!(rendered.contains("WorkingDirectory=/home/pi/stats-display\n"));
        assert!(rendered.contains("Restart=always\nRestartSec=5\n"));
        assert!(rendered.ends_with("[Install]\nWantedBy=graphical.target\n"));
    }

    #[test]
    fn test_tolerant_pre_hook_renders_with_dash() {
        let rendered = sample_unit().render();
        assert!(rendered.contains("ExecStartPre=/bin/sleep 15\n"));
        assert!(rendered.contains("ExecStartPre=-/usr/local/bin/pistats-pi rotate --boot\n"));
    }

    #[test]
    fn test_environment_preserves_insertion_order() {
        let rendered = sample_unit().render();
        let display_pos = rendered.find("Environment=\"DISPLAY=:0\"").unwrap();
        let orientation_pos = rendered
            .find("Environment=\"PISTATS_ORIENTATION=portrait\"")
            .unwrap();
        assert!(display_pos < orientation_pos);
    }

    #[test]
    fn test_install_overwrites_previous_generation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats-display.service");

        let mut unit = sample_unit();
        std::fs::write(&path, "stale contents").unwrap();
        std::fs::write(&path, unit.render()).unwrap();
        let first = std::fs::read_to_string(&path).unwrap();
        assert!(!first.contains("stale"));

        unit.environment[1].1 = "landscape".to_string();
        std::fs::write(&path, unit.render()).unwrap();
        let second = std::fs::read_to_string(&path).unwrap();
        assert!(second.contains("PISTATS_ORIENTATION=landscape"));
        assert!(!second.contains("PISTATS_ORIENTATION=portrait"));
    }
}
