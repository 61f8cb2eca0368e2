// Constants for the PiStats gaming-PC sender host
//
// This module centralizes all hardcoded values used throughout the
// application to ensure consistency and make configuration changes easier.

// ============================================================================
// Units & external collaborators
// ============================================================================

/// User unit running the external Python stats sender
pub const SENDER_UNIT: &str = "pistats-sender.service";

/// User unit running `pistats-pc run fps-logger`
pub const FPS_UNIT: &str = "pistats-fps.service";

/// User unit running `pistats-pc run log-cleanup`
pub const CLEANUP_UNIT: &str = "pistats-logclean.service";

/// All generated user units
pub const ALL_UNITS: &[&str] = &[SENDER_UNIT, FPS_UNIT, CLEANUP_UNIT];

/// The external sender script this setup deploys and configures
pub const SENDER_SCRIPT: &str = "stat_sender.py";

/// Directory name under ~/.local/share for deployed payloads
pub const DATA_DIR_NAME: &str = "pistats";

/// Environment variable handing the sender its target endpoint
pub const SENDER_URL_ENV: &str = "PISTATS_URL";

/// Port the Pi's stats receiver listens on
pub const DISPLAY_PORT: u16 = 5000;

// ============================================================================
// FPS logger & cleanup sweep timing
// ============================================================================

/// Scalar sample file consumed by the sender
pub const FPS_FILE: &str = "/tmp/fps.txt";

/// FPS poll period (2x/second)
pub const FPS_POLL_MS: u64 = 500;

/// A session log older than this is reported as zero FPS rather than a
/// frozen last-known value
pub const FPS_STALENESS_SECS: u64 = 3;

/// Cleanup sweep period
pub const CLEANUP_INTERVAL_SECS: u64 = 10;

/// Session logs untouched this long are deleted. Deliberately much
/// larger than the FPS staleness window so the sweep cannot race the
/// logger into reading a just-deleted file.
pub const CLEANUP_MAX_AGE_SECS: u64 = 30;

// ============================================================================
// Service policy
// ============================================================================

/// Restart backoff for the sender unit
pub const SENDER_RESTART_SEC: u32 = 5;

/// Restart backoff for the FPS logger unit
pub const FPS_RESTART_SEC: u32 = 3;

/// Restart backoff for the cleanup unit
pub const CLEANUP_RESTART_SEC: u32 = 10;
