pub mod config;
pub mod error;

pub use config::{
    ClientConfig, HttpConfig, IndexerConfig, ModuleConfig, MonitoringConfig, NamesConfig, Network,
    NetworkConfig, RefreshConfig,
};
pub use error::{SdkError, SdkResult};
