/// Tontine snapshot and decoding of the ledger's JSON resources

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::{address::Address, constants::*, errors::TontineError, status::MemberStatus};

// ============================================================================
// Fallback Policy
// ============================================================================

/// What happens to the funds when nobody claims them in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallbackPolicy {
    ReturnToMembers,
    SendToGivingApt,
}

impl FallbackPolicy {
    pub fn code(self) -> u8 {
        match self {
            FallbackPolicy::ReturnToMembers => FALLBACK_POLICY_RETURN_TO_MEMBERS,
            FallbackPolicy::SendToGivingApt => FALLBACK_POLICY_SEND_TO_GIVING_APT,
        }
    }
}

impl TryFrom<u8> for FallbackPolicy {
    type Error = TontineError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            FALLBACK_POLICY_RETURN_TO_MEMBERS => Ok(FallbackPolicy::ReturnToMembers),
            FALLBACK_POLICY_SEND_TO_GIVING_APT => Ok(FallbackPolicy::SendToGivingApt),
            other => Err(TontineError::UnknownFallbackPolicy(other)),
        }
    }
}

impl fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackPolicy::ReturnToMembers => f.write_str("Return funds to members"),
            FallbackPolicy::SendToGivingApt => f.write_str("Send funds to Giving APT"),
        }
    }
}

// ============================================================================
// Tontine Snapshot
// ============================================================================

/// Immutable view of a tontine's on-chain resource at one ledger version
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TontineSnapshot {
    pub address: Address,
    pub creator_address: Address,
    pub description: String,
    /// Members in on-chain order, creator included
    pub members: Vec<Address>,
    pub per_member_amount: u64,
    pub check_in_frequency_secs: u64,
    pub claim_window_secs: u64,
    pub fallback_policy: FallbackPolicy,
    pub creation_time_secs: u64,
    /// 0 while the tontine is not locked
    pub locked_time_secs: u64,
    /// 0 while the funds are not claimed
    pub funds_claimed_time_secs: u64,
    pub contributions: BTreeMap<Address, u64>,
    pub last_check_in: BTreeMap<Address, u64>,
    pub reconfirmation_required: BTreeSet<Address>,
}

impl TontineSnapshot {
    /// Build a snapshot from the `Tontine` resource data and the
    /// `0x1::object::ObjectCore` resource data of the same account
    pub fn decode(
        address: Address,
        tontine_data: serde_json::Value,
        object_data: serde_json::Value,
    ) -> Result<Self, TontineError> {
        let tontine: TontineResource = serde_json::from_value(tontine_data)
            .map_err(|e| TontineError::invalid_resource("Tontine", e.to_string()))?;
        let object: ObjectCoreResource = serde_json::from_value(object_data)
            .map_err(|e| TontineError::invalid_resource("ObjectCore", e.to_string()))?;

        let snapshot = Self {
            address,
            creator_address: object.owner,
            description: tontine.config.description,
            members: tontine.config.members,
            per_member_amount: tontine.config.per_member_amount_octa,
            check_in_frequency_secs: tontine.config.check_in_frequency_secs,
            claim_window_secs: tontine.config.claim_window_secs,
            fallback_policy: FallbackPolicy::try_from(tontine.config.fallback_policy.policy)?,
            creation_time_secs: tontine.creation_time_secs,
            locked_time_secs: tontine.locked_time_secs,
            funds_claimed_time_secs: tontine.funds_claimed_secs,
            contributions: tontine
                .contributions
                .into_entries()
                .map(|(member, coin)| (member, coin.value))
                .collect(),
            last_check_in: tontine
                .last_check_in_times_secs
                .into_entries()
                .map(|(member, secs)| (member, secs.0))
                .collect(),
            reconfirmation_required: tontine.reconfirmation_required.into_iter().collect(),
        };

        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Every keyed collection only references members
    pub fn validate(&self) -> Result<(), TontineError> {
        let members: BTreeSet<&Address> = self.members.iter().collect();
        let keyed = [
            ("contributions", self.contributions.keys().collect::<Vec<_>>()),
            ("last_check_in_times_secs", self.last_check_in.keys().collect()),
            ("reconfirmation_required", self.reconfirmation_required.iter().collect()),
        ];

        for (field, keys) in keyed {
            if let Some(stranger) = keys.into_iter().find(|key| !members.contains(key)) {
                return Err(TontineError::invalid_resource(
                    field,
                    format!("{} is not a member", stranger),
                ));
            }
        }
        Ok(())
    }

    pub fn is_locked(&self) -> bool {
        self.locked_time_secs > 0
    }

    /// Amount the given account has contributed, 0 when absent
    pub fn contribution_of(&self, address: &Address) -> u64 {
        self.contributions.get(address).copied().unwrap_or(0)
    }

    pub fn total_contributed(&self) -> u64 {
        self.contributions.values().fold(0u64, |acc, v| acc.saturating_add(*v))
    }
}

// ============================================================================
// Wire Format
// ============================================================================

/// Move `SimpleMap` as serialised by the node: `{ "data": [{ "key", "value" }] }`
#[derive(Debug, Clone, Deserialize)]
pub struct SimpleMap<K, V> {
    #[serde(default = "Vec::new")]
    pub data: Vec<SimpleMapEntry<K, V>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimpleMapEntry<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> SimpleMap<K, V> {
    pub fn into_entries(self) -> impl Iterator<Item = (K, V)> {
        self.data.into_iter().map(|entry| (entry.key, entry.value))
    }
}

/// Decode the member status map returned by the status view function
pub fn decode_member_statuses(
    value: serde_json::Value,
) -> Result<BTreeMap<Address, MemberStatus>, TontineError> {
    let map: SimpleMap<Address, u8> = serde_json::from_value(value)
        .map_err(|e| TontineError::invalid_resource("member_statuses", e.to_string()))?;
    map.into_entries()
        .map(|(member, code)| Ok((member, MemberStatus::try_from(code)?)))
        .collect()
}

#[derive(Debug, Deserialize)]
struct TontineResource {
    config: TontineConfigResource,
    #[serde(deserialize_with = "de_u64")]
    creation_time_secs: u64,
    #[serde(default, deserialize_with = "de_u64")]
    locked_time_secs: u64,
    #[serde(default, deserialize_with = "de_u64")]
    funds_claimed_secs: u64,
    contributions: SimpleMap<Address, CoinValue>,
    last_check_in_times_secs: SimpleMap<Address, U64Value>,
    #[serde(default)]
    reconfirmation_required: Vec<Address>,
}

#[derive(Debug, Deserialize)]
struct TontineConfigResource {
    #[serde(default)]
    description: String,
    members: Vec<Address>,
    #[serde(deserialize_with = "de_u64")]
    per_member_amount_octa: u64,
    #[serde(deserialize_with = "de_u64")]
    check_in_frequency_secs: u64,
    #[serde(deserialize_with = "de_u64")]
    claim_window_secs: u64,
    fallback_policy: FallbackPolicyResource,
}

#[derive(Debug, Deserialize)]
struct FallbackPolicyResource {
    policy: u8,
}

#[derive(Debug, Deserialize)]
struct ObjectCoreResource {
    owner: Address,
}

#[derive(Debug, Deserialize)]
struct CoinValue {
    #[serde(deserialize_with = "de_u64")]
    value: u64,
}

#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct U64Value(#[serde(deserialize_with = "de_u64")] u64);

/// The node encodes u64 as decimal strings; plain numbers are accepted too
pub fn de_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(u64),
    }

    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s.parse().map_err(serde::de::Error::custom),
        StringOrNumber::Number(n) => Ok(n),
    }
}
