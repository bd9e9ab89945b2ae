//! Seams between the client and the outside world.
//!
//! The HTTP clients in [`crate::client`] implement the read-side ports.
//! Signing stays outside this crate: callers plug a wallet in through
//! [`TransactionSubmitter`].

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use tontine_types::{Address, MemberStatus, MembershipRecord, OverallStatus, TontineSnapshot};

use crate::{core::SdkResult, instructions::EntryFunctionPayload};

/// Hash of a submitted transaction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxnHash(pub String);

impl fmt::Display for TxnHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
pub trait LedgerReader: Send + Sync {
    async fn fetch_snapshot(&self, tontine: &Address) -> SdkResult<TontineSnapshot>;

    async fn fetch_overall_status(&self, tontine: &Address) -> SdkResult<OverallStatus>;

    async fn fetch_member_statuses(
        &self,
        tontine: &Address,
    ) -> SdkResult<BTreeMap<Address, MemberStatus>>;

    /// Block until the transaction is committed; a failed execution is an error
    async fn wait_for_transaction(&self, hash: &TxnHash) -> SdkResult<()>;
}

#[async_trait]
pub trait MembershipIndex: Send + Sync {
    async fn fetch_membership_list(&self, user: &Address) -> SdkResult<Vec<MembershipRecord>>;
}

#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn primary_name(&self, address: &Address) -> SdkResult<Option<String>>;

    /// Look up many addresses at once. Lookup failures just leave the name out.
    async fn primary_names(&self, addresses: &[Address]) -> BTreeMap<Address, String> {
        let lookups = addresses.iter().map(|address| async move {
            match self.primary_name(address).await {
                Ok(name) => name.map(|name| (address.clone(), name)),
                Err(e) => {
                    debug!(address = %address, error = %e, "name lookup failed");
                    None
                }
            }
        });
        join_all(lookups).await.into_iter().flatten().collect()
    }
}

#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    async fn submit(&self, payload: &EntryFunctionPayload) -> SdkResult<TxnHash>;
}

/// Resolver for when name lookups are switched off
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNames;

#[async_trait]
impl NameResolver for NoNames {
    async fn primary_name(&self, _address: &Address) -> SdkResult<Option<String>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_names_resolves_nothing() {
        let addresses = [Address::parse("0x1").unwrap(), Address::parse("0x2").unwrap()];
        let names = tokio_test::block_on(NoNames.primary_names(&addresses));
        assert!(names.is_empty());
        assert_eq!(TxnHash("0xbeef".to_string()).to_string(), "0xbeef");
    }
}
