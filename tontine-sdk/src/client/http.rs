//! Blocking JSON HTTP on the tokio blocking pool
//!
//! ureq is synchronous, so every request runs inside `spawn_blocking` and the
//! async callers never stall the runtime.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::core::{HttpConfig, SdkError, SdkResult};

#[derive(Clone)]
pub struct HttpAgent {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpAgent {
    /// `base_url` must parse as an absolute URL; trailing slashes are dropped
    pub fn new(base_url: &str, http: &HttpConfig) -> SdkResult<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        Url::parse(trimmed)
            .map_err(|e| SdkError::InvalidConfig(format!("invalid URL '{}': {}", base_url, e)))?;

        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(http.connect_timeout_secs))
            .timeout_read(Duration::from_secs(http.read_timeout_secs))
            .build();

        Ok(Self {
            base_url: trimmed.to_string(),
            agent,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET `path` and decode the JSON body
    pub async fn get<T>(&self, path: &str) -> SdkResult<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let url = self.url_for(path);
        debug!(%url, "GET");

        tokio::task::spawn_blocking({
            let agent = self.agent.clone();
            move || {
                let response = agent
                    .get(&url)
                    .set("Accept", "application/json")
                    .call()?;
                Ok::<T, SdkError>(response.into_json()?)
            }
        })
        .await?
    }

    /// POST a JSON body to `path` and decode the JSON response
    pub async fn post<T>(&self, path: &str, payload: Value) -> SdkResult<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let url = self.url_for(path);
        debug!(%url, %payload, "POST");

        tokio::task::spawn_blocking({
            let agent = self.agent.clone();
            move || {
                let response = agent.post(&url).send_json(payload)?;
                Ok::<T, SdkError>(response.into_json()?)
            }
        })
        .await?
    }
}

impl std::fmt::Debug for HttpAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAgent")
            .field("base_url", &self.base_url)
            .finish()
    }
}
