/// Constants used across the tontine client

// ============================================================================
// Overall Status Codes
// ============================================================================

/// Tontine is still being configured and members are contributing
pub const OVERALL_STATUS_STAGING: u8 = 64;

/// Tontine was cancelled by its creator before being locked
pub const OVERALL_STATUS_CANCELLED: u8 = 65;

/// Every member has contributed and reconfirmed, the tontine can be locked
pub const OVERALL_STATUS_CAN_BE_LOCKED: u8 = 66;

/// Tontine is locked and members must keep checking in
pub const OVERALL_STATUS_LOCKED: u8 = 67;

/// One member remains and may claim the funds
pub const OVERALL_STATUS_FUNDS_CLAIMABLE: u8 = 68;

/// The last remaining member claimed the funds
pub const OVERALL_STATUS_FUNDS_CLAIMED: u8 = 69;

/// The claim window passed without anyone claiming
pub const OVERALL_STATUS_FUNDS_NEVER_CLAIMED: u8 = 70;

/// The fallback policy was executed
pub const OVERALL_STATUS_FALLBACK_EXECUTED: u8 = 71;

// ============================================================================
// Member Status Codes
// ============================================================================

pub const MEMBER_STATUS_MUST_CONTRIBUTE_FUNDS: u8 = 128;
pub const MEMBER_STATUS_MUST_RECONFIRM: u8 = 129;
pub const MEMBER_STATUS_READY: u8 = 130;
pub const MEMBER_STATUS_STILL_ELIGIBLE: u8 = 131;
pub const MEMBER_STATUS_INELIGIBLE: u8 = 132;
pub const MEMBER_STATUS_CAN_CLAIM_FUNDS: u8 = 133;
pub const MEMBER_STATUS_CLAIMED_FUNDS: u8 = 134;
pub const MEMBER_STATUS_NEVER_CLAIMED_FUNDS: u8 = 135;

// ============================================================================
// Membership Index States
// ============================================================================

/// Coarse lifecycle reported by the membership index for a staging tontine
pub const BASIC_TONTINE_STATE_STAGING: i64 = 0;

/// Coarse lifecycle reported by the membership index for a locked tontine
pub const BASIC_TONTINE_STATE_LOCKED: i64 = 1;

/// Coarse lifecycle reported by the membership index for a concluded tontine
pub const BASIC_TONTINE_STATE_COMPLETE: i64 = -1;

// ============================================================================
// Fallback Policies
// ============================================================================

/// Unclaimed funds are returned to the members
pub const FALLBACK_POLICY_RETURN_TO_MEMBERS: u8 = 1;

/// Unclaimed funds are sent to the Giving APT account
pub const FALLBACK_POLICY_SEND_TO_GIVING_APT: u8 = 2;

// ============================================================================
// Amounts
// ============================================================================

/// Octa per APT
pub const OCTA_PER_APT: u64 = 100_000_000;

/// Number of decimal places in an APT amount
pub const APT_DECIMALS: usize = 8;

// ============================================================================
// Module Location
// ============================================================================

/// Account the tontine module is published under
pub const DEFAULT_MODULE_ADDRESS: &str =
    "0x81e2e2499407693c81fe65c86405ca70df529438339d9da7a6fc2520142b591e";

/// Name of the tontine module
pub const DEFAULT_MODULE_NAME: &str = "tontine02";

/// Resource type holding object ownership (the tontine creator)
pub const OBJECT_CORE_RESOURCE: &str = "0x1::object::ObjectCore";

// ============================================================================
// Navigation
// ============================================================================

/// Query parameter holding the address of the tontine being viewed
pub const TONTINE_QUERY_PARAM: &str = "tontine";

/// Maximum description length accepted when creating a tontine
pub const MAX_DESCRIPTION_LEN: usize = 64;
