// Autologin session and kiosk autostart
//
// The display manager logs the display user straight into a graphical
// session, and an autostart entry launches the browser with no window
// chrome pointed at the locally served stats page.

use anyhow::{Context, Result};
use std::path::PathBuf;

use pistats_provision::cmd::{run_command, write_file_with_mode};

use crate::config::DisplayConfig;
use crate::constants::{AUTOLOGIN_DROPIN_PATH, KIOSK_DESKTOP_RELPATH};

/// LightDM drop-in enabling autologin for the display user
pub fn autologin_conf(user: &str) -> String {
    format!("[Seat:*]\nautologin-user={user}\nautologin-user-timeout=0\n")
}

/// Kiosk autostart entry launching the browser at the stats page
pub fn kiosk_desktop(url: &str) -> String {
    format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Name=PiStats Kiosk\n\
         Exec=chromium-browser --kiosk --noerrdialogs --disable-session-crashed-bubble --incognito {url}\n\
         X-GNOME-Autostart-enabled=true\n"
    )
}

/// Write both pieces, overwriting any previous generation
pub fn configure(user: &str, dry_run: bool) -> Result<()> {
    let desktop_path = PathBuf::from(format!("/home/{user}")).join(KIOSK_DESKTOP_RELPATH);

    if dry_run {
        log::info!("Would write {AUTOLOGIN_DROPIN_PATH} and {}", desktop_path.display());
        return Ok(());
    }

    write_file_with_mode(
        std::path::Path::new(AUTOLOGIN_DROPIN_PATH),
        &autologin_conf(user),
        0o644,
    )
    .context("Failed to write autologin drop-in")?;

    write_file_with_mode(&desktop_path, &kiosk_desktop(&DisplayConfig::kiosk_url()), 0o644)
        .context("Failed to write kiosk autostart entry")?;

    // Setup runs as root; hand the autostart entry back to its owner
    let autostart_dir = desktop_path.parent().map(|p| p.display().to_string());
    if let Some(dir) = autostart_dir {
        let owner = format!("{user}:{user}");
        let _ = run_command("chown", &["-R", &owner, &dir]);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autologin_conf_names_user() {
        let conf = autologin_conf("pi");
        assert!(conf.starts_with("[Seat:*]\n"));
        assert!(conf.contains("autologin-user=pi\n"));
    }

    #[test]
    fn test_kiosk_desktop_launches_kiosk_mode() {
        let entry = kiosk_desktop("http://localhost:5000");
        assert!(entry.contains("--kiosk"));
        assert!(entry.ends_with("X-GNOME-Autostart-enabled=true\n"));
        assert!(entry.contains("http://localhost:5000"));
    }
}
