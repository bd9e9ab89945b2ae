//! # Tontine Core - Client-Side Derivations
//!
//! Pure, synchronous logic over data already fetched from the ledger and the
//! membership index. Nothing here performs I/O; callers re-run the
//! derivations whenever a fresher snapshot arrives.
//!
//! - [`actions`]: which of the seven lifecycle actions are permitted and why not
//! - [`bucketing`]: grouping memberships by lifecycle and role for list display
//! - [`selection`]: keeping the viewed tontine in step with a navigation parameter
//! - [`member_table`]: per-member rows of the tontine detail view

pub mod actions;
pub mod bucketing;
pub mod member_table;
pub mod selection;

// Re-export commonly used items
pub use actions::{
    decide, evaluate_actions, Action, ActionDecision, ActionDecisions, ActionInputs, Availability,
};
pub use bucketing::{Bucket, MembershipBuckets, Role};
pub use member_table::{
    member_rows, DeadlineCell, EligibilityCell, MemberProgress, MemberRow, ReadinessCell,
};
pub use selection::{NavigationParam, SelectionNotice, SelectionSynchronizer, SyncPhase, UrlQueryParam};
