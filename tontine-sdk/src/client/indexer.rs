//! Off-chain membership index client

use async_trait::async_trait;
use tracing::info;

use tontine_types::{decode_membership_list, Address, MembershipRecord, RawMembershipRecord};

use crate::{
    client::http::HttpAgent,
    core::{ClientConfig, SdkResult},
    ports::MembershipIndex,
};

#[derive(Debug, Clone)]
pub struct MembershipIndexClient {
    http: HttpAgent,
}

impl MembershipIndexClient {
    pub fn new(http: HttpAgent) -> Self {
        Self { http }
    }

    pub fn from_config(config: &ClientConfig) -> SdkResult<Self> {
        Ok(Self::new(HttpAgent::new(&config.indexer_url(), &config.http)?))
    }
}

#[async_trait]
impl MembershipIndex for MembershipIndexClient {
    async fn fetch_membership_list(&self, user: &Address) -> SdkResult<Vec<MembershipRecord>> {
        let raw: Vec<RawMembershipRecord> = self.http.get(&format!("tontines/{}", user)).await?;
        let records = decode_membership_list(raw)?;
        info!(user = %user, count = records.len(), "fetched membership list");
        Ok(records)
    }
}
