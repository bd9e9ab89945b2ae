//! Status vocabulary returned by the tontine module's view functions
//!
//! The codes are opaque to this client: it never derives them, it only maps
//! them onto closed enums so that an unhandled code is a compile error in the
//! derivations and a decoding error at the boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{constants::*, errors::TontineError};

// ============================================================================
// Overall Status
// ============================================================================

/// Lifecycle phase of a tontine as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OverallStatus {
    Staging,
    Cancelled,
    CanBeLocked,
    Locked,
    FundsClaimable,
    FundsClaimed,
    FundsNeverClaimed,
    FallbackExecuted,
}

impl OverallStatus {
    pub const ALL: [OverallStatus; 8] = [
        OverallStatus::Staging,
        OverallStatus::Cancelled,
        OverallStatus::CanBeLocked,
        OverallStatus::Locked,
        OverallStatus::FundsClaimable,
        OverallStatus::FundsClaimed,
        OverallStatus::FundsNeverClaimed,
        OverallStatus::FallbackExecuted,
    ];

    pub fn code(self) -> u8 {
        match self {
            OverallStatus::Staging => OVERALL_STATUS_STAGING,
            OverallStatus::Cancelled => OVERALL_STATUS_CANCELLED,
            OverallStatus::CanBeLocked => OVERALL_STATUS_CAN_BE_LOCKED,
            OverallStatus::Locked => OVERALL_STATUS_LOCKED,
            OverallStatus::FundsClaimable => OVERALL_STATUS_FUNDS_CLAIMABLE,
            OverallStatus::FundsClaimed => OVERALL_STATUS_FUNDS_CLAIMED,
            OverallStatus::FundsNeverClaimed => OVERALL_STATUS_FUNDS_NEVER_CLAIMED,
            OverallStatus::FallbackExecuted => OVERALL_STATUS_FALLBACK_EXECUTED,
        }
    }

    /// Not locked yet: `Staging` or `CanBeLocked`
    pub fn is_pre_lock(self) -> bool {
        matches!(self, OverallStatus::Staging | OverallStatus::CanBeLocked)
    }

    /// No further state changes are possible
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OverallStatus::FundsClaimed
                | OverallStatus::FundsNeverClaimed
                | OverallStatus::FallbackExecuted
        )
    }

    /// Funds have left the tontine, every action is closed
    pub fn is_finished(self) -> bool {
        matches!(
            self,
            OverallStatus::FundsClaimed | OverallStatus::FallbackExecuted
        )
    }
}

impl TryFrom<u8> for OverallStatus {
    type Error = TontineError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            OVERALL_STATUS_STAGING => Ok(OverallStatus::Staging),
            OVERALL_STATUS_CANCELLED => Ok(OverallStatus::Cancelled),
            OVERALL_STATUS_CAN_BE_LOCKED => Ok(OverallStatus::CanBeLocked),
            OVERALL_STATUS_LOCKED => Ok(OverallStatus::Locked),
            OVERALL_STATUS_FUNDS_CLAIMABLE => Ok(OverallStatus::FundsClaimable),
            OVERALL_STATUS_FUNDS_CLAIMED => Ok(OverallStatus::FundsClaimed),
            OVERALL_STATUS_FUNDS_NEVER_CLAIMED => Ok(OverallStatus::FundsNeverClaimed),
            OVERALL_STATUS_FALLBACK_EXECUTED => Ok(OverallStatus::FallbackExecuted),
            other => Err(TontineError::UnknownOverallStatus(other)),
        }
    }
}

impl From<OverallStatus> for u8 {
    fn from(status: OverallStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OverallStatus::Staging => "Staging",
            OverallStatus::Cancelled => "Cancelled",
            OverallStatus::CanBeLocked => "Ready to lock",
            OverallStatus::Locked => "Locked",
            OverallStatus::FundsClaimable => "Funds claimable",
            OverallStatus::FundsClaimed => "Funds claimed",
            OverallStatus::FundsNeverClaimed => "Funds never claimed",
            OverallStatus::FallbackExecuted => "Fallback executed",
        };
        f.write_str(label)
    }
}

// ============================================================================
// Member Status
// ============================================================================

/// A participant's individual eligibility / claim state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MemberStatus {
    MustContribute,
    MustReconfirm,
    Ready,
    StillEligible,
    Ineligible,
    CanClaimFunds,
    ClaimedFunds,
    NeverClaimedFunds,
}

impl MemberStatus {
    pub const ALL: [MemberStatus; 8] = [
        MemberStatus::MustContribute,
        MemberStatus::MustReconfirm,
        MemberStatus::Ready,
        MemberStatus::StillEligible,
        MemberStatus::Ineligible,
        MemberStatus::CanClaimFunds,
        MemberStatus::ClaimedFunds,
        MemberStatus::NeverClaimedFunds,
    ];

    pub fn code(self) -> u8 {
        match self {
            MemberStatus::MustContribute => MEMBER_STATUS_MUST_CONTRIBUTE_FUNDS,
            MemberStatus::MustReconfirm => MEMBER_STATUS_MUST_RECONFIRM,
            MemberStatus::Ready => MEMBER_STATUS_READY,
            MemberStatus::StillEligible => MEMBER_STATUS_STILL_ELIGIBLE,
            MemberStatus::Ineligible => MEMBER_STATUS_INELIGIBLE,
            MemberStatus::CanClaimFunds => MEMBER_STATUS_CAN_CLAIM_FUNDS,
            MemberStatus::ClaimedFunds => MEMBER_STATUS_CLAIMED_FUNDS,
            MemberStatus::NeverClaimedFunds => MEMBER_STATUS_NEVER_CLAIMED_FUNDS,
        }
    }

    /// Member may still check in to stay in the tontine
    pub fn can_check_in(self) -> bool {
        matches!(self, MemberStatus::StillEligible | MemberStatus::CanClaimFunds)
    }
}

impl TryFrom<u8> for MemberStatus {
    type Error = TontineError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            MEMBER_STATUS_MUST_CONTRIBUTE_FUNDS => Ok(MemberStatus::MustContribute),
            MEMBER_STATUS_MUST_RECONFIRM => Ok(MemberStatus::MustReconfirm),
            MEMBER_STATUS_READY => Ok(MemberStatus::Ready),
            MEMBER_STATUS_STILL_ELIGIBLE => Ok(MemberStatus::StillEligible),
            MEMBER_STATUS_INELIGIBLE => Ok(MemberStatus::Ineligible),
            MEMBER_STATUS_CAN_CLAIM_FUNDS => Ok(MemberStatus::CanClaimFunds),
            MEMBER_STATUS_CLAIMED_FUNDS => Ok(MemberStatus::ClaimedFunds),
            MEMBER_STATUS_NEVER_CLAIMED_FUNDS => Ok(MemberStatus::NeverClaimedFunds),
            other => Err(TontineError::UnknownMemberStatus(other)),
        }
    }
}

impl From<MemberStatus> for u8 {
    fn from(status: MemberStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MemberStatus::MustContribute => "Must contribute",
            MemberStatus::MustReconfirm => "Must reconfirm",
            MemberStatus::Ready => "Ready",
            MemberStatus::StillEligible => "Still eligible",
            MemberStatus::Ineligible => "Ineligible",
            MemberStatus::CanClaimFunds => "Can claim funds",
            MemberStatus::ClaimedFunds => "Claimed funds",
            MemberStatus::NeverClaimedFunds => "Never claimed funds",
        };
        f.write_str(label)
    }
}

// ============================================================================
// Loading State
// ============================================================================

/// A value fetched from the ledger that may not have arrived yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Loadable<T> {
    #[default]
    Loading,
    Ready(T),
}

impl<T> Loadable<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }

    pub fn as_ref(&self) -> Loadable<&T> {
        match self {
            Loadable::Loading => Loadable::Loading,
            Loadable::Ready(value) => Loadable::Ready(value),
        }
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Loadable::Loading => None,
            Loadable::Ready(value) => Some(value),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Loadable<U> {
        match self {
            Loadable::Loading => Loadable::Loading,
            Loadable::Ready(value) => Loadable::Ready(f(value)),
        }
    }
}

impl<T> From<Option<T>> for Loadable<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Loadable::Ready(value),
            None => Loadable::Loading,
        }
    }
}
