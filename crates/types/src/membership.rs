//! Membership records served by the off-chain membership index

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{address::Address, constants::*, errors::TontineError};

/// Coarse lifecycle used only for grouping tontines in lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BasicState {
    Staging,
    Locked,
    Complete,
}

impl TryFrom<i64> for BasicState {
    type Error = TontineError;

    fn try_from(state: i64) -> Result<Self, Self::Error> {
        match state {
            BASIC_TONTINE_STATE_STAGING => Ok(BasicState::Staging),
            BASIC_TONTINE_STATE_LOCKED => Ok(BasicState::Locked),
            BASIC_TONTINE_STATE_COMPLETE => Ok(BasicState::Complete),
            other => Err(TontineError::UnknownBasicState(other)),
        }
    }
}

impl fmt::Display for BasicState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BasicState::Staging => "New Tontines",
            BasicState::Locked => "Locked Tontines",
            BasicState::Complete => "Concluded Tontines",
        };
        f.write_str(label)
    }
}

/// One tontine the connected account created, joined or was invited to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MembershipRecord {
    pub tontine_address: Address,
    pub is_creator: bool,
    pub has_ever_contributed: bool,
    pub basic_state: BasicState,
}

/// Membership record exactly as the index serves it
#[derive(Debug, Clone, Deserialize)]
pub struct RawMembershipRecord {
    pub tontine_address: String,
    #[serde(default)]
    pub is_creator: bool,
    #[serde(default)]
    pub has_ever_contributed: bool,
    pub state: i64,
}

impl TryFrom<RawMembershipRecord> for MembershipRecord {
    type Error = TontineError;

    fn try_from(raw: RawMembershipRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            tontine_address: Address::parse(&raw.tontine_address)?,
            is_creator: raw.is_creator,
            has_ever_contributed: raw.has_ever_contributed,
            basic_state: BasicState::try_from(raw.state)?,
        })
    }
}

/// Decode a full index response. A single unknown state fails the whole list.
pub fn decode_membership_list(
    raw: Vec<RawMembershipRecord>,
) -> Result<Vec<MembershipRecord>, TontineError> {
    raw.into_iter().map(MembershipRecord::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_index_response() {
        let json = r#"[
            {"tontine_address": "0xaa", "is_creator": true, "has_ever_contributed": false, "state": 0},
            {"tontine_address": "bb", "is_creator": false, "has_ever_contributed": true, "state": -1}
        ]"#;
        let raw: Vec<RawMembershipRecord> = serde_json::from_str(json).unwrap();
        let records = decode_membership_list(raw).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].basic_state, BasicState::Staging);
        assert!(records[0].is_creator);
        assert_eq!(records[1].tontine_address.as_str(), "0xbb");
        assert_eq!(records[1].basic_state, BasicState::Complete);
    }

    #[test]
    fn test_unknown_state_fails_the_list() {
        let json = r#"[
            {"tontine_address": "0xaa", "is_creator": true, "has_ever_contributed": false, "state": 1},
            {"tontine_address": "0xbb", "is_creator": false, "has_ever_contributed": true, "state": 7}
        ]"#;
        let raw: Vec<RawMembershipRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(
            decode_membership_list(raw),
            Err(TontineError::UnknownBasicState(7))
        );
    }
}
