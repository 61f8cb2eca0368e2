//! Service activation across system and user scopes
//!
//! The user-scope path has to cope with install sessions that have no
//! session bus (ssh without lingering, provisioning from a chroot, ...).
//! Rather than branching installer logic, `ensure_active` is a single
//! idempotent operation that detects supervisor availability internally
//! and falls back to enabling lingering, deferring activation to the
//! next login.

use anyhow::Result;

use crate::cmd::{command_exists, run_command, run_command_success};
use crate::units::UnitScope;

/// Outcome of an activation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Unit was enabled and (re)started
    Started,
    /// No user manager reachable; lingering enabled, unit starts on next login
    DeferredToLogin,
}

fn systemctl_args(scope: UnitScope) -> &'static [&'static str] {
    match scope {
        UnitScope::System => &[],
        UnitScope::User => &["--user"],
    }
}

/// Check whether the per-user service manager can be controlled right now
///
/// True when a session bus is reachable: either the runtime directory
/// carries a systemd socket, or `systemctl --user` answers at all.
pub fn user_manager_available() -> bool {
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR")
        && std::path::Path::new(&runtime_dir).join("systemd").exists()
    {
        return true;
    }

    run_command("systemctl", &["--user", "is-system-running"])
        .map(|output| {
            let state = String::from_utf8_lossy(&output.stdout);
            let state = state.trim();
            state == "running" || state == "degraded" || state == "starting"
        })
        .unwrap_or(false)
}

/// Reload unit definitions for the given scope
pub fn daemon_reload(scope: UnitScope) -> Result<()> {
    let mut args = systemctl_args(scope).to_vec();
    args.push("daemon-reload");
    run_command_success("systemctl", &args)?;
    Ok(())
}

/// Check if a service is currently active
pub fn is_active(scope: UnitScope, unit: &str) -> bool {
    if !command_exists("systemctl") {
        return false;
    }
    let mut args = systemctl_args(scope).to_vec();
    args.extend_from_slice(&["is-active", unit]);
    run_command("systemctl", &args)
        .map(|output| String::from_utf8_lossy(&output.stdout).trim() == "active")
        .unwrap_or(false)
}

/// Check if a service is enabled
pub fn is_enabled(scope: UnitScope, unit: &str) -> bool {
    if !command_exists("systemctl") {
        return false;
    }
    let mut args = systemctl_args(scope).to_vec();
    args.extend_from_slice(&["is-enabled", unit]);
    run_command("systemctl", &args)
        .map(|output| String::from_utf8_lossy(&output.stdout).trim() == "enabled")
        .unwrap_or(false)
}

/// Ensure a unit is enabled and running, adapting to supervisor availability
///
/// System scope: reload, enable, restart (restart rather than start so a
/// regenerated unit file takes effect on re-runs).
///
/// User scope: same when a session bus is present; otherwise lingering is
/// enabled for `linger_user` and activation is deferred to the next login.
pub fn ensure_active(scope: UnitScope, unit: &str, linger_user: &str) -> Result<Activation> {
    if scope == UnitScope::User && !user_manager_available() {
        log::info!("No user session bus; enabling lingering for {linger_user}");
        run_command_success("loginctl", &["enable-linger", linger_user])?;
        return Ok(Activation::DeferredToLogin);
    }

    daemon_reload(scope)?;

    let mut enable_args = systemctl_args(scope).to_vec();
    enable_args.extend_from_slice(&["enable", unit]);
    run_command_success("systemctl", &enable_args)?;

    let mut restart_args = systemctl_args(scope).to_vec();
    restart_args.extend_from_slice(&["restart", unit]);
    run_command_success("systemctl", &restart_args)?;

    Ok(Activation::Started)
}

/// Best-effort stop and disable, for cleanup/uninstall paths
pub fn stop_and_disable(scope: UnitScope, unit: &str) {
    let mut stop_args = systemctl_args(scope).to_vec();
    stop_args.extend_from_slice(&["stop", unit]);
    let _ = run_command("systemctl", &stop_args);

    let mut disable_args = systemctl_args(scope).to_vec();
    disable_args.extend_from_slice(&["disable", unit]);
    let _ = run_command("systemctl", &disable_args);
}
