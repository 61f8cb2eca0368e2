// Constants for the PiStats Raspberry Pi display host setup
//
// This module centralizes all hardcoded values used throughout the
// application to ensure consistency and make configuration changes easier.

// ============================================================================
// Service & Paths
// ============================================================================

/// Name of the generated display service unit
pub const SERVICE_NAME: &str = "stats-display.service";

/// Persisted orientation/display configuration
pub const CONFIG_PATH: &str = "/etc/pistats/config.json";

/// Sudoers fragment granting the settings page its privileged commands
pub const SUDOERS_PATH: &str = "/etc/sudoers.d/010-pistats";

/// Stable path the setup binary installs itself to, referenced by the
/// generated service's pre-start rotation hook
pub const BIN_INSTALL_PATH: &str = "/usr/local/bin/pistats-pi";

/// LightDM drop-in enabling the autologin session for the kiosk
pub const AUTOLOGIN_DROPIN_PATH: &str = "/etc/lightdm/lightdm.conf.d/20-pistats-autologin.conf";

/// Kiosk autostart entry, relative to the display user's home
pub const KIOSK_DESKTOP_RELPATH: &str = ".config/autostart/pistats-kiosk.desktop";

/// Display script deployed next to this installer
pub const DISPLAY_SCRIPT: &str = "stats_display.py";

/// Directory (relative to the display user's home) the script runs from
pub const DISPLAY_DIR_NAME: &str = "stats-display";

/// Artwork drop directory consumed by the display server
pub const GAME_ART_DIR_NAME: &str = "game_art";

/// Base for timestamped backups of files this setup mutates in place
pub const BACKUP_BASE_DIR: &str = "/var/backups/pistats";

// ============================================================================
// Boot firmware configuration
// ============================================================================

/// Known boot config locations, in preference order
pub const BOOT_CONFIG_PATHS: &[&str] = &["/boot/firmware/config.txt", "/boot/config.txt"];

/// Settings appended (only if absent) to the boot firmware config
pub const BOOT_SETTINGS: &[(&str, &str)] = &[
    ("hdmi_blanking", "1"),
    ("hdmi_force_hotplug", "1"),
    ("hdmi_drive", "2"),
    ("gpu_mem", "128"),
];

// ============================================================================
// Packages & service timing
// ============================================================================

/// OS packages the display host needs; `apt-get install -y` is a no-op
/// for anything already present, keeping re-runs safe
pub const REQUIRED_PACKAGES: &[&str] = &[
    "chromium-browser",
    "unclutter",
    "python3-flask",
    "python3-requests",
    "x11-xserver-utils",
    "xinput",
];

/// Fixed pre-start delay before the display service comes up, trading
/// startup latency for resilience against a not-yet-ready display server
pub const STARTUP_DELAY_SECS: u32 = 15;

/// Restart backoff for the display service
pub const RESTART_SEC: u32 = 5;

/// Port the display server listens on (owned by the external script)
pub const DISPLAY_PORT: u16 = 5000;

/// Fallback login user on Raspberry Pi OS when detection fails
pub const DEFAULT_USER: &str = "pi";
