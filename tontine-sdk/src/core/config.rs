//! Client configuration loaded from TOML with environment overrides

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use validator::Validate;

use tontine_types::{Address, DEFAULT_MODULE_ADDRESS, DEFAULT_MODULE_NAME};

use super::error::{SdkError, SdkResult};

pub const ENV_NODE_URL: &str = "TONTINE_NODE_URL";
pub const ENV_INDEXER_URL: &str = "TONTINE_INDEXER_URL";
pub const ENV_LOG_LEVEL: &str = "TONTINE_LOG_LEVEL";

// ============================================================================
// Network
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
    Local,
}

impl Network {
    /// Fullnode REST endpoint, without a trailing slash
    pub fn fullnode_url(self) -> &'static str {
        match self {
            Network::Mainnet => "https://fullnode.mainnet.aptoslabs.com",
            Network::Testnet => "https://fullnode.testnet.aptoslabs.com",
            Network::Devnet => "https://fullnode.devnet.aptoslabs.com",
            Network::Local => "http://localhost:8080",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Local => "local",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            "local" => Ok(Network::Local),
            other => Err(SdkError::InvalidConfig(format!("unknown network '{}'", other))),
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ClientConfig {
    #[validate]
    pub network: NetworkConfig,
    #[validate]
    pub module: ModuleConfig,
    #[validate]
    pub indexer: IndexerConfig,
    #[validate]
    pub names: NamesConfig,
    #[validate]
    pub http: HttpConfig,
    #[validate]
    pub refresh: RefreshConfig,
    #[validate]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct NetworkConfig {
    pub name: Network,
    /// Overrides the named network's fullnode
    #[validate(url)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ModuleConfig {
    #[validate(length(min = 3, max = 66))]
    pub address: String,
    #[validate(length(min = 1, max = 128))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct IndexerConfig {
    #[validate(url)]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct NamesConfig {
    #[validate(url)]
    pub url: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct HttpConfig {
    #[validate(range(min = 1, max = 120))]
    pub connect_timeout_secs: u64,
    #[validate(range(min = 1, max = 300))]
    pub read_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RefreshConfig {
    /// Pause between a confirmed transaction and the refetch
    #[validate(range(max = 60000))]
    pub post_txn_delay_ms: u64,
    #[validate(range(min = 1, max = 3600))]
    pub poll_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MonitoringConfig {
    pub log_level: String,
    pub structured_logging: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: Network::Mainnet,
            node_url: None,
        }
    }
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_MODULE_ADDRESS.to_string(),
            name: DEFAULT_MODULE_NAME.to_string(),
        }
    }
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            url: "https://tontine-processor.dport.me".to_string(),
        }
    }
}

impl Default for NamesConfig {
    fn default() -> Self {
        Self {
            url: "https://www.aptosnames.com/api".to_string(),
            enabled: true,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            read_timeout_secs: 30,
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            post_txn_delay_ms: 2000,
            poll_interval_secs: 10,
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            structured_logging: false,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

fn trim_trailing_slashes(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

impl ClientConfig {
    /// Load configuration from file, apply environment overrides and validate
    pub fn from_file(path: impl AsRef<Path>) -> SdkResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Self = toml::from_str(&content)
            .map_err(|e| SdkError::InvalidConfig(e.to_string()))?;
        config.apply_env_overrides();
        config.validate_all()?;
        Ok(config)
    }

    /// Defaults plus environment overrides, for running without a file
    pub fn from_env() -> SdkResult<Self> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate_all()?;
        Ok(config)
    }

    /// Write configuration as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> SdkResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SdkError::Serialization(e.to_string()))?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup; empty values are ignored
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(node_url) = lookup(ENV_NODE_URL) {
            self.network.node_url = Some(node_url);
        }
        if let Some(indexer_url) = lookup(ENV_INDEXER_URL) {
            self.indexer.url = indexer_url;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.monitoring.log_level = level;
        }
    }

    /// Field validation plus the cross-field checks the derive cannot express
    pub fn validate_all(&self) -> SdkResult<()> {
        self.validate()
            .map_err(|e| SdkError::InvalidConfig(e.to_string()))?;

        Address::parse(&self.module.address)
            .map_err(|e| SdkError::InvalidConfig(format!("module.address: {}", e)))?;

        let name_is_identifier = self
            .module
            .name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !name_is_identifier {
            return Err(SdkError::InvalidConfig(format!(
                "module.name '{}' is not a Move identifier",
                self.module.name
            )));
        }

        self.monitoring
            .log_level
            .parse::<tracing::Level>()
            .map_err(|_| {
                SdkError::InvalidConfig(format!(
                    "monitoring.log_level '{}' is not a log level",
                    self.monitoring.log_level
                ))
            })?;

        Ok(())
    }

    /// Effective fullnode URL without trailing slashes
    pub fn node_url(&self) -> String {
        match &self.network.node_url {
            Some(url) => trim_trailing_slashes(url),
            None => self.network.name.fullnode_url().to_string(),
        }
    }

    pub fn indexer_url(&self) -> String {
        trim_trailing_slashes(&self.indexer.url)
    }

    pub fn names_url(&self) -> String {
        trim_trailing_slashes(&self.names.url)
    }

    /// `<address>::<name>`, the prefix of every entry and view function
    pub fn module_id(&self) -> SdkResult<String> {
        let address = Address::parse(&self.module.address)?;
        Ok(format!("{}::{}", address, self.module.name))
    }
}
