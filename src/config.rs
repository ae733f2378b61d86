use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Result;

pub const DEFAULT_DATAFILE: &str = "profiles.json";
pub const DEFAULT_DATA_TTL_SECS: u64 = 3600;

/// Connection parameters and cache location.
///
/// Every field has a default, so a JSON config file only needs the keys it
/// overrides. In code, use struct update syntax:
///
/// ```
/// use d3armory::ArmoryConfig;
///
/// let config = ArmoryConfig {
///     realm: "us".to_owned(),
///     ..Default::default()
/// };
/// assert_eq!(config.game, "d3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ArmoryConfig {
    pub realm: String,
    pub lang: String,
    pub game: String,
    pub base: String,
    pub scheme: String,
    pub user_agent: String,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    pub max_redirects: usize,
    pub datafile: PathBuf,
    /// Declared lifetime of cached profiles. Not enforced: cached tags are
    /// served until the entry is removed from the data file.
    pub data_ttl_secs: u64,
}

impl Default for ArmoryConfig {
    fn default() -> Self {
        Self {
            realm: "eu".to_owned(),
            lang: "en".to_owned(),
            game: "d3".to_owned(),
            base: "battle.net".to_owned(),
            scheme: "http".to_owned(),
            user_agent: "spider".to_owned(),
            connect_timeout_secs: 20,
            timeout_secs: 20,
            max_redirects: 10,
            datafile: PathBuf::from(DEFAULT_DATAFILE),
            data_ttl_secs: DEFAULT_DATA_TTL_SECS,
        }
    }
}

impl ArmoryConfig {
    /// Load overrides from a JSON file, missing keys keep their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ArmoryConfig = serde_json::from_str(&content)?;
        log::debug!(
            "loaded configuration from {}: {:?}",
            path.as_ref().display(),
            config
        );
        Ok(config)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn data_ttl(&self) -> Duration {
        Duration::from_secs(self.data_ttl_secs)
    }
}
