use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use validator::Validate;

use tontine_types::{Address, FallbackPolicy, MAX_DESCRIPTION_LEN};

use crate::{
    core::{SdkError, SdkResult},
    instructions::{address_arg, u64_arg, u8_arg, EntryFunctionPayload, PayloadBuilder},
};

/// Parameters for creating a tontine
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTontineRequest {
    #[validate(length(min = 1, max = 64))]
    pub description: String,
    /// Members other than the creator
    #[validate(length(min = 1))]
    pub invitees: Vec<Address>,
    #[validate(range(min = 1))]
    pub check_in_frequency_secs: u64,
    #[validate(range(min = 1))]
    pub claim_window_secs: u64,
    #[validate(range(min = 1))]
    pub per_member_amount_octa: u64,
    pub fallback_policy: FallbackPolicy,
}

impl CreateTontineRequest {
    pub fn check(&self, creator: Option<&Address>) -> SdkResult<()> {
        self.validate()
            .map_err(|e| SdkError::InvalidParameters(e.to_string()))?;

        // The derive counts bytes, the module counts characters.
        if self.description.trim().is_empty() || self.description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(SdkError::InvalidParameters(format!(
                "description must be 1 to {} characters",
                MAX_DESCRIPTION_LEN
            )));
        }

        let unique: BTreeSet<&Address> = self.invitees.iter().collect();
        if unique.len() != self.invitees.len() {
            return Err(SdkError::InvalidParameters("invitees contain duplicates".to_string()));
        }
        if let Some(creator) = creator {
            if unique.contains(creator) {
                return Err(SdkError::InvalidParameters(
                    "the creator is a member already and cannot be invited".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl PayloadBuilder {
    pub fn create(&self, request: &CreateTontineRequest) -> SdkResult<EntryFunctionPayload> {
        request.check(None)?;
        Ok(self.call(
            "create",
            vec![
                Value::String(request.description.clone()),
                Value::Array(request.invitees.iter().map(address_arg).collect()),
                u64_arg(request.check_in_frequency_secs),
                u64_arg(request.claim_window_secs),
                u64_arg(request.per_member_amount_octa),
                u8_arg(request.fallback_policy.code()),
            ],
        ))
    }

    /// Creator-only, before lock
    pub fn remove_member(&self, tontine: &Address, member: &Address) -> EntryFunctionPayload {
        self.call("remove_member", vec![address_arg(tontine), address_arg(member)])
    }
}
