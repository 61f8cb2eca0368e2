// Agent configuration
//
// The target Pi address is validated once at setup time and persisted
// here; the generated sender unit derives its endpoint from the same
// value, so there is no second encoding to patch.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use crate::constants::{DATA_DIR_NAME, DISPLAY_PORT};

const CONFIG_VERSION: u32 = 1;

/// Persisted PC agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Configuration schema version for future migrations
    pub version: u32,

    /// Validated IPv4 address of the Pi display host
    pub pi_addr: Ipv4Addr,
}

impl AgentConfig {
    pub fn new(pi_addr: Ipv4Addr) -> Self {
        Self {
            version: CONFIG_VERSION,
            pi_addr,
        }
    }

    /// Endpoint the sender POSTs stats to
    pub fn stats_url(&self) -> String {
        format!("http://{}:{DISPLAY_PORT}/stats", self.pi_addr)
    }

    /// Get the XDG-compliant configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory (XDG_CONFIG_HOME or ~/.config)")?;

        Ok(config_dir.join(DATA_DIR_NAME).join("agent.json"))
    }

    /// Directory deployed payloads (the sender script) live in
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .context("Failed to determine data directory (XDG_DATA_HOME or ~/.local/share)")?;

        Ok(data_dir.join(DATA_DIR_NAME))
    }

    /// Load the persisted configuration
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_context(|| {
            format!(
                "Failed to read config file: {} (run 'pistats-pc setup' first)",
                path.display()
            )
        })?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Save the configuration, overwriting any previous install's choice
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_url_uses_well_known_port() {
        let config = AgentConfig::new(Ipv4Addr::new(10, 0, 0, 225));
        assert_eq!(config.stats_url(), "http://10.0.0.225:5000/stats");
    }

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.json");

        let config = AgentConfig::new(Ipv4Addr::new(192, 168, 1, 50));
        config.save_to(&path).unwrap();

        let loaded = AgentConfig::load_from(&path).unwrap();
        assert_eq!(loaded.pi_addr, Ipv4Addr::new(192, 168, 1, 50));
        assert_eq!(loaded.version, CONFIG_VERSION);
    }

    #[test]
    fn test_missing_config_mentions_setup_hint() {
        let err = AgentConfig::load_from(Path::new("/nonexistent/agent.json")).unwrap_err();
        assert!(err.to_string().contains("pistats-pc setup"));
    }
}
