//! Fullnode REST client for tontine resources, status views and transaction results

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

use tontine_types::{
    decode_member_statuses, Address, MemberStatus, OverallStatus, TontineError, TontineSnapshot,
    OBJECT_CORE_RESOURCE,
};

use crate::{
    client::http::HttpAgent,
    core::{ClientConfig, SdkError, SdkResult},
    ports::{LedgerReader, TxnHash},
};

const PENDING_TRANSACTION: &str = "pending_transaction";
const MAX_PENDING_POLLS: u32 = 30;

/// Resource envelope returned by `/v1/accounts/{address}/resource/{type}`
#[derive(Debug, Deserialize)]
struct MoveResource {
    data: Value,
}

/// The fields of a transaction this client looks at
#[derive(Debug, Deserialize)]
struct TransactionOutcome {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    vm_status: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LedgerClient {
    http: HttpAgent,
    module_id: String,
}

impl LedgerClient {
    pub fn new(http: HttpAgent, module_id: impl Into<String>) -> Self {
        Self {
            http,
            module_id: module_id.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> SdkResult<Self> {
        Ok(Self::new(
            HttpAgent::new(&config.node_url(), &config.http)?,
            config.module_id()?,
        ))
    }

    pub fn node_url(&self) -> &str {
        self.http.base_url()
    }

    pub fn module_id(&self) -> &str {
        &self.module_id
    }

    /// Data of one account resource
    pub async fn resource(&self, address: &Address, resource_type: &str) -> SdkResult<Value> {
        let path = format!("v1/accounts/{}/resource/{}", address, resource_type);
        match self.http.get::<MoveResource>(&path).await {
            Ok(resource) => Ok(resource.data),
            Err(SdkError::HttpStatus { status: 404, .. }) => Err(SdkError::ResourceNotFound {
                address: address.to_string(),
                resource: resource_type.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    /// Call a view function of the tontine module
    pub async fn view(&self, function: &str, arguments: Vec<Value>) -> SdkResult<Vec<Value>> {
        let payload = json!({
            "function": format!("{}::{}", self.module_id, function),
            "type_arguments": [],
            "arguments": arguments,
        });
        self.http.post("v1/view", payload).await
    }

    async fn view_first(&self, function: &str, tontine: &Address) -> SdkResult<Value> {
        self.view(function, vec![Value::String(tontine.to_string())])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TontineError::invalid_resource(function, "empty view result").into())
    }

    async fn transaction(&self, path: String) -> SdkResult<TransactionOutcome> {
        self.http.get(&path).await
    }
}

/// View results encode `u8` as a JSON number, but tolerate strings
fn status_code(function: &str, value: &Value) -> SdkResult<u8> {
    let code = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    };
    code.and_then(|c| u8::try_from(c).ok())
        .ok_or_else(|| TontineError::invalid_resource(function, format!("not a u8 status: {}", value)).into())
}

#[async_trait]
impl LedgerReader for LedgerClient {
    async fn fetch_snapshot(&self, tontine: &Address) -> SdkResult<TontineSnapshot> {
        let tontine_type = format!("{}::Tontine", self.module_id);
        let (tontine_data, object_data) = tokio::try_join!(
            self.resource(tontine, &tontine_type),
            self.resource(tontine, OBJECT_CORE_RESOURCE),
        )?;

        let snapshot = TontineSnapshot::decode(tontine.clone(), tontine_data, object_data)?;
        debug!(
            tontine = %tontine,
            members = snapshot.members.len(),
            locked_time_secs = snapshot.locked_time_secs,
            "fetched tontine snapshot"
        );
        Ok(snapshot)
    }

    async fn fetch_overall_status(&self, tontine: &Address) -> SdkResult<OverallStatus> {
        let function = "get_overall_status";
        let value = self.view_first(function, tontine).await?;
        Ok(OverallStatus::try_from(status_code(function, &value)?)?)
    }

    async fn fetch_member_statuses(
        &self,
        tontine: &Address,
    ) -> SdkResult<BTreeMap<Address, MemberStatus>> {
        let value = self.view_first("get_member_statuses", tontine).await?;
        Ok(decode_member_statuses(value)?)
    }

    async fn wait_for_transaction(&self, hash: &TxnHash) -> SdkResult<()> {
        let mut outcome = self
            .transaction(format!("v1/transactions/wait_by_hash/{}", hash))
            .await?;

        let mut polls = 0;
        while outcome.kind == PENDING_TRANSACTION {
            if polls >= MAX_PENDING_POLLS {
                return Err(SdkError::Network(format!(
                    "transaction {} still pending after {} polls",
                    hash, polls
                )));
            }
            polls += 1;
            tokio::time::sleep(Duration::from_secs(1)).await;
            outcome = self
                .transaction(format!("v1/transactions/by_hash/{}", hash))
                .await?;
        }

        match outcome.success {
            Some(true) => {
                info!(hash = %hash, "transaction committed");
                Ok(())
            }
            _ => {
                let vm_status = outcome.vm_status.unwrap_or_else(|| "unknown".to_string());
                warn!(hash = %hash, vm_status = %vm_status, "transaction failed");
                Err(SdkError::VmFailure {
                    hash: hash.to_string(),
                    vm_status,
                })
            }
        }
    }
}
