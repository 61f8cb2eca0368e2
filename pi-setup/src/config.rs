// Display host configuration
//
// The orientation is selected once at install time and persisted here as
// an explicit, externalized value. Everything that needs it afterwards
// (the rotation pre-start hook, the generated unit's environment, the
// status command) reads this single encoding, so the unit file and the
// display script can never disagree about orientation.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_PATH, DISPLAY_DIR_NAME, DISPLAY_PORT};

const CONFIG_VERSION: u32 = 1;

/// Screen orientation of the touchscreen panel
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// 480x1920 panel standing upright
    #[default]
    Portrait,
    /// 1920x480 panel lying flat
    Landscape,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }

    /// The xrandr transform that realizes this orientation
    ///
    /// Rotation is done via display-server transform rather than firmware
    /// rotation; the panel is natively landscape, so portrait needs a
    /// quarter turn.
    pub fn xrandr_rotation(self) -> &'static str {
        match self {
            Self::Portrait => "right",
            Self::Landscape => "normal",
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted display host configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Configuration schema version for future migrations
    pub version: u32,

    /// Panel orientation chosen at install time
    pub orientation: Orientation,

    /// Login user that owns the kiosk session and the display script
    pub user: String,

    /// Directory the display script is deployed to and runs from
    pub display_dir: PathBuf,
}

impl DisplayConfig {
    pub fn new(orientation: Orientation, user: &str) -> Self {
        Self {
            version: CONFIG_VERSION,
            orientation,
            user: user.to_string(),
            display_dir: PathBuf::from(format!("/home/{user}/{DISPLAY_DIR_NAME}")),
        }
    }

    /// Load the persisted configuration
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_PATH))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_context(|| {
            format!(
                "Failed to read config file: {} (run 'pistats-pi setup' first)",
                path.display()
            )
        })?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Save the configuration, overwriting any previous install's choice
    pub fn save(&self) -> Result<()> {
        self.save_to(Path::new(CONFIG_PATH))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn exists() -> bool {
        Path::new(CONFIG_PATH).exists()
    }

    /// URL the kiosk browser opens
    pub fn kiosk_url() -> String {
        format!("http://localhost:{DISPLAY_PORT}")
    }
}

/// Resolve the login user the display session belongs to
///
/// Setup runs as root (usually via sudo), so the interesting user is the
/// one who invoked sudo, not root itself.
pub fn detect_install_user() -> String {
    if let Ok(user) = std::env::var("SUDO_USER")
        && !user.is_empty()
        && user != "root"
    {
        return user;
    }
    if let Ok(user) = std::env::var("USER")
        && !user.is_empty()
        && user != "root"
    {
        return user;
    }
    crate::constants::DEFAULT_USER.to_string()
}
