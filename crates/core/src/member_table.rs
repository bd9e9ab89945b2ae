//! Per-member rows for the tontine detail view.

use serde::Serialize;
use std::collections::BTreeMap;

use tontine_types::{Address, Loadable, MemberStatus, OverallStatus, TontineSnapshot};

use crate::actions::Availability;

pub const REASON_CANNOT_REMOVE_SELF: &str =
    "Cannot remove yourself from the tontine, you must instead destroy the entire tontine";

/// Whether a member is ready for the tontine to lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReadinessCell {
    Loading,
    Yes,
    No,
}

/// When the member must next check in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeadlineCell {
    NotApplicable,
    By(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EligibilityCell {
    Loading,
    Yes,
    No,
    CanClaim,
    FundsClaimed,
    FailedToClaim,
}

/// Lifecycle-dependent part of a row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MemberProgress {
    Staging {
        reconfirmation_required: bool,
        ready: ReadinessCell,
    },
    Locked {
        last_check_in: Option<u64>,
        next_check_in: DeadlineCell,
        eligibility: EligibilityCell,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberRow {
    pub address: Address,
    pub is_user: bool,
    pub is_creator: bool,
    pub contribution: u64,
    pub progress: MemberProgress,
    /// Present only when the viewer could remove members at all
    pub remove: Option<Availability>,
}

fn readiness(status: Option<MemberStatus>) -> ReadinessCell {
    match status {
        Some(MemberStatus::Ready) => ReadinessCell::Yes,
        _ => ReadinessCell::No,
    }
}

fn eligibility(status: Option<MemberStatus>) -> EligibilityCell {
    match status {
        Some(MemberStatus::StillEligible) => EligibilityCell::Yes,
        Some(MemberStatus::Ineligible) => EligibilityCell::No,
        Some(MemberStatus::CanClaimFunds) => EligibilityCell::CanClaim,
        Some(MemberStatus::ClaimedFunds) => EligibilityCell::FundsClaimed,
        _ => EligibilityCell::FailedToClaim,
    }
}

/// Build one row per member in on-chain order
pub fn member_rows(
    snapshot: &TontineSnapshot,
    overall: Loadable<OverallStatus>,
    statuses: Loadable<&BTreeMap<Address, MemberStatus>>,
    viewer: Option<&Address>,
) -> Vec<MemberRow> {
    let viewer_is_creator = viewer == Some(&snapshot.creator_address);
    let terminal = matches!(overall, Loadable::Ready(status) if status.is_terminal());

    snapshot
        .members
        .iter()
        .map(|member| {
            let status = statuses.map(|s| s.get(member).copied());
            let progress = if snapshot.is_locked() {
                let last_check_in = snapshot.last_check_in.get(member).copied();
                let next_check_in = if terminal {
                    DeadlineCell::NotApplicable
                } else {
                    let base = last_check_in.unwrap_or(snapshot.creation_time_secs);
                    DeadlineCell::By(base.saturating_add(snapshot.check_in_frequency_secs))
                };
                MemberProgress::Locked {
                    last_check_in,
                    next_check_in,
                    eligibility: status.ready().map_or(EligibilityCell::Loading, eligibility),
                }
            } else {
                MemberProgress::Staging {
                    reconfirmation_required: snapshot.reconfirmation_required.contains(member),
                    ready: status.ready().map_or(ReadinessCell::Loading, readiness),
                }
            };

            let is_creator = *member == snapshot.creator_address;
            let remove = (viewer_is_creator && !snapshot.is_locked()).then(|| {
                if is_creator {
                    Availability::Disabled { reason: REASON_CANNOT_REMOVE_SELF }
                } else {
                    Availability::Enabled { note: None }
                }
            });

            MemberRow {
                address: member.clone(),
                is_user: viewer == Some(member),
                is_creator,
                contribution: snapshot.contribution_of(member),
                progress,
                remove,
            }
        })
        .collect()
}
