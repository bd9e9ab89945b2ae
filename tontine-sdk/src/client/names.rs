//! Primary name lookups against the Aptos Names API

use async_trait::async_trait;
use serde::Deserialize;

use tontine_types::Address;

use crate::{
    client::http::HttpAgent,
    core::{ClientConfig, Network, SdkError, SdkResult},
    ports::NameResolver,
};

#[derive(Debug, Deserialize)]
struct PrimaryName {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NameClient {
    http: HttpAgent,
    network: Network,
}

impl NameClient {
    pub fn new(http: HttpAgent, network: Network) -> Self {
        Self { http, network }
    }

    pub fn from_config(config: &ClientConfig) -> SdkResult<Self> {
        Ok(Self::new(
            HttpAgent::new(&config.names_url(), &config.http)?,
            config.network.name,
        ))
    }
}

#[async_trait]
impl NameResolver for NameClient {
    async fn primary_name(&self, address: &Address) -> SdkResult<Option<String>> {
        let path = format!("{}/v1/primary-name/{}", self.network, address);
        match self.http.get::<PrimaryName>(&path).await {
            Ok(found) => Ok(found.name.filter(|name| !name.is_empty())),
            Err(SdkError::HttpStatus { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
