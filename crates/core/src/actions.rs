//! Action availability for a single tontine.
//!
//! Each action owns an ordered rule list. Rules are evaluated top to bottom
//! and the first one whose predicate holds decides the outcome; when none
//! match the action is enabled. Two overrides sit in front of every list:
//! unresolved statuses disable everything with a loading reason, and a
//! finished tontine disables everything with the finished reason.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use tontine_types::{Address, Loadable, MemberStatus, OverallStatus, TontineSnapshot};

// ============================================================================
// Actions
// ============================================================================

/// Lifecycle actions a member can submit against a tontine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Action {
    Contribute,
    Withdraw,
    Leave,
    Lock,
    CheckIn,
    Claim,
    ExecuteFallback,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Contribute,
        Action::Withdraw,
        Action::Leave,
        Action::Lock,
        Action::CheckIn,
        Action::Claim,
        Action::ExecuteFallback,
    ];

    /// Name of the entry function in the tontine module
    pub fn entry_function(self) -> &'static str {
        match self {
            Action::Contribute => "contribute",
            Action::Withdraw => "withdraw",
            Action::Leave => "leave",
            Action::Lock => "lock",
            Action::CheckIn => "check_in",
            Action::Claim => "claim",
            Action::ExecuteFallback => "execute_fallback",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn rules(self) -> &'static [Rule] {
        match self {
            Action::Contribute => CONTRIBUTE_RULES,
            Action::Withdraw => WITHDRAW_RULES,
            Action::Leave => LEAVE_RULES,
            Action::Lock => LOCK_RULES,
            Action::CheckIn => CHECK_IN_RULES,
            Action::Claim => CLAIM_RULES,
            Action::ExecuteFallback => EXECUTE_FALLBACK_RULES,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Contribute => "Contribute",
            Action::Withdraw => "Withdraw",
            Action::Leave => "Leave",
            Action::Lock => "Lock",
            Action::CheckIn => "Check in",
            Action::Claim => "Claim",
            Action::ExecuteFallback => "Execute fallback",
        };
        f.write_str(label)
    }
}

impl std::str::FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Action::ALL
            .into_iter()
            .find(|action| action.entry_function() == normalised)
            .ok_or_else(|| format!("unknown action '{}'", s))
    }
}

// ============================================================================
// Decisions
// ============================================================================

pub const REASON_LOADING: &str = "Loading…";
pub const REASON_FINISHED: &str = "The tontine is finished";
pub const REASON_LOCKED: &str = "Tontine is locked";
pub const REASON_CANCELLED: &str = "Tontine is cancelled";
pub const REASON_NOTHING_CONTRIBUTED: &str = "You have not contributed anything yet";
pub const REASON_NOT_A_MEMBER: &str = "You are not a member of this tontine";
pub const REASON_MUST_CONTRIBUTE_BEFORE_LOCK: &str =
    "Some members must still contribute before you can lock the tontine";
pub const REASON_ALREADY_LOCKED: &str = "Tontine is already locked";
pub const REASON_MUST_LOCK_FIRST: &str = "Tontine is not active yet, you must lock it";
pub const REASON_NO_LONGER_ELIGIBLE: &str = "You are no longer eligible to check in";
pub const REASON_NOT_ACTIVE: &str = "Tontine is not active yet";
pub const REASON_OTHERS_STILL_ELIGIBLE: &str = "Multiple members are still eligible for the funds";
pub const REASON_STILL_ACTIVE: &str = "Tontine is still active";
pub const REASON_FUNDS_STILL_CLAIMABLE: &str = "Funds can still be claimed";
pub const REASON_FUNDS_ALREADY_CLAIMED: &str = "Funds have already been claimed";
pub const REASON_FALLBACK_ALREADY_EXECUTED: &str = "Fallback has already been executed";
pub const NOTE_CREATOR_LEAVING: &str =
    "You are the creator of this tontine, leaving will cancel the tontine";

/// Whether an action may be submitted, with the text to show the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Availability {
    /// Permitted; `note` is informational and never blocks the action
    Enabled { note: Option<&'static str> },
    Disabled { reason: &'static str },
}

/// Outcome for one action. Produced fresh on every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionDecision {
    pub action: Action,
    pub availability: Availability,
}

impl ActionDecision {
    pub fn is_enabled(&self) -> bool {
        matches!(self.availability, Availability::Enabled { .. })
    }

    /// Explanation when the action is disabled
    pub fn reason(&self) -> Option<&'static str> {
        match self.availability {
            Availability::Disabled { reason } => Some(reason),
            Availability::Enabled { .. } => None,
        }
    }

    pub fn note(&self) -> Option<&'static str> {
        match self.availability {
            Availability::Enabled { note } => note,
            Availability::Disabled { .. } => None,
        }
    }

    /// Tooltip text: the reason when disabled, the note otherwise
    pub fn tooltip(&self) -> Option<&'static str> {
        self.reason().or_else(|| self.note())
    }
}

/// One decision per action, in [`Action::ALL`] order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionDecisions([ActionDecision; 7]);

impl ActionDecisions {
    pub fn get(&self, action: Action) -> &ActionDecision {
        &self.0[action.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionDecision> {
        self.0.iter()
    }

    pub fn enabled(&self) -> impl Iterator<Item = Action> + '_ {
        self.0.iter().filter(|d| d.is_enabled()).map(|d| d.action)
    }
}

// ============================================================================
// Inputs
// ============================================================================

/// Everything the rules look at. `overall` and `member` may still be loading;
/// `member` resolves to `None` when the viewer is not a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionInputs {
    pub locked_time_secs: u64,
    pub overall: Loadable<OverallStatus>,
    pub member: Loadable<Option<MemberStatus>>,
    pub contribution_amount: u64,
    pub is_creator: bool,
}

impl ActionInputs {
    /// Derive inputs for `viewer` from a snapshot and whatever statuses have arrived
    pub fn for_viewer(
        snapshot: &TontineSnapshot,
        viewer: &Address,
        overall: Loadable<OverallStatus>,
        member_statuses: Loadable<&BTreeMap<Address, MemberStatus>>,
    ) -> Self {
        Self {
            locked_time_secs: snapshot.locked_time_secs,
            overall,
            member: member_statuses.map(|statuses| statuses.get(viewer).copied()),
            contribution_amount: snapshot.contribution_of(viewer),
            is_creator: snapshot.creator_address == *viewer,
        }
    }

    fn resolve(&self) -> Option<Resolved> {
        match (self.overall, self.member) {
            (Loadable::Ready(overall), Loadable::Ready(member)) => Some(Resolved {
                overall,
                member,
                locked_time_secs: self.locked_time_secs,
                contribution_amount: self.contribution_amount,
                is_creator: self.is_creator,
            }),
            _ => None,
        }
    }
}

/// Inputs once both statuses are known
#[derive(Debug, Clone, Copy)]
struct Resolved {
    overall: OverallStatus,
    member: Option<MemberStatus>,
    locked_time_secs: u64,
    contribution_amount: u64,
    is_creator: bool,
}

// ============================================================================
// Rules
// ============================================================================

type Predicate = fn(&Resolved) -> bool;

struct Rule {
    when: Predicate,
    then: Availability,
}

const fn disable(when: Predicate, reason: &'static str) -> Rule {
    Rule { when, then: Availability::Disabled { reason } }
}

const fn enable(when: Predicate, note: Option<&'static str>) -> Rule {
    Rule { when, then: Availability::Enabled { note } }
}

fn is_locked(r: &Resolved) -> bool {
    r.locked_time_secs > 0
}

fn is_cancelled(r: &Resolved) -> bool {
    r.overall == OverallStatus::Cancelled
}

fn is_staging(r: &Resolved) -> bool {
    r.overall == OverallStatus::Staging
}

fn is_pre_lock(r: &Resolved) -> bool {
    r.overall.is_pre_lock()
}

fn has_not_contributed(r: &Resolved) -> bool {
    r.contribution_amount == 0
}

fn is_creator(r: &Resolved) -> bool {
    r.is_creator
}

fn is_not_member(r: &Resolved) -> bool {
    r.member.is_none()
}

fn cannot_check_in(r: &Resolved) -> bool {
    !r.member.is_some_and(MemberStatus::can_check_in)
}

fn cannot_claim(r: &Resolved) -> bool {
    r.member != Some(MemberStatus::CanClaimFunds)
}

fn is_status_locked(r: &Resolved) -> bool {
    r.overall == OverallStatus::Locked
}

fn is_funds_claimable(r: &Resolved) -> bool {
    r.overall == OverallStatus::FundsClaimable
}

fn is_funds_claimed(r: &Resolved) -> bool {
    r.overall == OverallStatus::FundsClaimed
}

fn is_fallback_executed(r: &Resolved) -> bool {
    r.overall == OverallStatus::FallbackExecuted
}

fn is_finished(r: &Resolved) -> bool {
    r.overall.is_finished()
}

static FINISHED_OVERRIDE: Rule = disable(is_finished, REASON_FINISHED);

static CONTRIBUTE_RULES: &[Rule] = &[
    disable(is_locked, REASON_LOCKED),
    disable(is_cancelled, REASON_CANCELLED),
];

// Cancellation always lets members recover their funds.
static WITHDRAW_RULES: &[Rule] = &[
    enable(is_cancelled, None),
    disable(is_locked, REASON_LOCKED),
    disable(has_not_contributed, REASON_NOTHING_CONTRIBUTED),
];

static LEAVE_RULES: &[Rule] = &[
    disable(is_locked, REASON_LOCKED),
    enable(is_creator, Some(NOTE_CREATOR_LEAVING)),
    disable(is_not_member, REASON_NOT_A_MEMBER),
];

static LOCK_RULES: &[Rule] = &[
    disable(is_staging, REASON_MUST_CONTRIBUTE_BEFORE_LOCK),
    disable(is_locked, REASON_ALREADY_LOCKED),
];

static CHECK_IN_RULES: &[Rule] = &[
    disable(is_pre_lock, REASON_MUST_LOCK_FIRST),
    disable(cannot_check_in, REASON_NO_LONGER_ELIGIBLE),
];

static CLAIM_RULES: &[Rule] = &[
    disable(is_pre_lock, REASON_NOT_ACTIVE),
    disable(cannot_claim, REASON_OTHERS_STILL_ELIGIBLE),
];

static EXECUTE_FALLBACK_RULES: &[Rule] = &[
    disable(is_pre_lock, REASON_NOT_ACTIVE),
    disable(is_status_locked, REASON_STILL_ACTIVE),
    disable(is_funds_claimable, REASON_FUNDS_STILL_CLAIMABLE),
    disable(is_funds_claimed, REASON_FUNDS_ALREADY_CLAIMED),
    disable(is_fallback_executed, REASON_FALLBACK_ALREADY_EXECUTED),
];

// ============================================================================
// Evaluation
// ============================================================================

/// Decide a single action
pub fn decide(action: Action, inputs: &ActionInputs) -> ActionDecision {
    let availability = match inputs.resolve() {
        None => Availability::Disabled { reason: REASON_LOADING },
        Some(resolved) => std::iter::once(&FINISHED_OVERRIDE)
            .chain(action.rules())
            .find(|rule| (rule.when)(&resolved))
            .map(|rule| rule.then)
            .unwrap_or(Availability::Enabled { note: None }),
    };

    ActionDecision { action, availability }
}

/// Decide every action. Total over all inputs.
pub fn evaluate_actions(inputs: &ActionInputs) -> ActionDecisions {
    let decisions = ActionDecisions(Action::ALL.map(|action| decide(action, inputs)));
    debug!(
        overall = ?inputs.overall,
        member = ?inputs.member,
        locked_time_secs = inputs.locked_time_secs,
        enabled = ?decisions.enabled().collect::<Vec<_>>(),
        "evaluated action availability"
    );
    decisions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(overall: OverallStatus, member: Option<MemberStatus>) -> ActionInputs {
        ActionInputs {
            locked_time_secs: 0,
            overall: Loadable::Ready(overall),
            member: Loadable::Ready(member),
            contribution_amount: 0,
            is_creator: false,
        }
    }

    #[test]
    fn test_loading_disables_everything() {
        let mut pending = inputs(OverallStatus::Locked, Some(MemberStatus::StillEligible));
        pending.member = Loadable::Loading;
        for decision in evaluate_actions(&pending).iter() {
            assert_eq!(decision.reason(), Some(REASON_LOADING));
        }

        let mut pending = inputs(OverallStatus::FundsClaimed, None);
        pending.overall = Loadable::Loading;
        assert!(evaluate_actions(&pending).iter().all(|d| d.reason() == Some(REASON_LOADING)));
    }

    #[test]
    fn test_finished_override_wins_over_action_rules() {
        let mut finished = inputs(OverallStatus::FallbackExecuted, Some(MemberStatus::CanClaimFunds));
        finished.contribution_amount = 10;
        let decisions = evaluate_actions(&finished);
        for decision in decisions.iter() {
            assert_eq!(decision.reason(), Some(REASON_FINISHED));
        }
    }

    #[test]
    fn test_withdraw_cancellation_override() {
        let mut cancelled = inputs(OverallStatus::Cancelled, Some(MemberStatus::MustContribute));
        assert!(decide(Action::Withdraw, &cancelled).is_enabled());

        // Even with a lock timestamp the cancellation rule comes first.
        cancelled.locked_time_secs = 5;
        assert!(decide(Action::Withdraw, &cancelled).is_enabled());

        let staging = inputs(OverallStatus::Staging, Some(MemberStatus::MustContribute));
        assert_eq!(decide(Action::Withdraw, &staging).reason(), Some(REASON_NOTHING_CONTRIBUTED));
    }

    #[test]
    fn test_contribute_rules() {
        let cancelled = inputs(OverallStatus::Cancelled, Some(MemberStatus::MustContribute));
        assert_eq!(decide(Action::Contribute, &cancelled).reason(), Some(REASON_CANCELLED));

        let mut locked = inputs(OverallStatus::Locked, Some(MemberStatus::StillEligible));
        locked.locked_time_secs = 1000;
        assert_eq!(decide(Action::Contribute, &locked).reason(), Some(REASON_LOCKED));
    }

    #[test]
    fn test_leave_rules() {
        let mut creator = inputs(OverallStatus::Staging, Some(MemberStatus::Ready));
        creator.is_creator = true;
        let decision = decide(Action::Leave, &creator);
        assert!(decision.is_enabled());
        assert_eq!(decision.note(), Some(NOTE_CREATOR_LEAVING));
        assert_eq!(decision.tooltip(), Some(NOTE_CREATOR_LEAVING));

        let outsider = inputs(OverallStatus::Staging, None);
        assert_eq!(decide(Action::Leave, &outsider).reason(), Some(REASON_NOT_A_MEMBER));

        let member = inputs(OverallStatus::Staging, Some(MemberStatus::MustReconfirm));
        let decision = decide(Action::Leave, &member);
        assert!(decision.is_enabled());
        assert_eq!(decision.note(), None);

        creator.locked_time_secs = 1;
        assert_eq!(decide(Action::Leave, &creator).reason(), Some(REASON_LOCKED));
    }

    #[test]
    fn test_lock_rules() {
        let staging = inputs(OverallStatus::Staging, Some(MemberStatus::Ready));
        assert_eq!(decide(Action::Lock, &staging).reason(), Some(REASON_MUST_CONTRIBUTE_BEFORE_LOCK));

        let ready = inputs(OverallStatus::CanBeLocked, Some(MemberStatus::Ready));
        assert!(decide(Action::Lock, &ready).is_enabled());

        let mut locked = inputs(OverallStatus::Locked, Some(MemberStatus::StillEligible));
        locked.locked_time_secs = 42;
        assert_eq!(decide(Action::Lock, &locked).reason(), Some(REASON_ALREADY_LOCKED));
    }

    #[test]
    fn test_check_in_rules() {
        let ready = inputs(OverallStatus::CanBeLocked, Some(MemberStatus::Ready));
        assert_eq!(decide(Action::CheckIn, &ready).reason(), Some(REASON_MUST_LOCK_FIRST));

        let ineligible = inputs(OverallStatus::Locked, Some(MemberStatus::Ineligible));
        assert_eq!(decide(Action::CheckIn, &ineligible).reason(), Some(REASON_NO_LONGER_ELIGIBLE));

        let outsider = inputs(OverallStatus::Locked, None);
        assert_eq!(decide(Action::CheckIn, &outsider).reason(), Some(REASON_NO_LONGER_ELIGIBLE));

        let claimant = inputs(OverallStatus::FundsClaimable, Some(MemberStatus::CanClaimFunds));
        assert!(decide(Action::CheckIn, &claimant).is_enabled());
    }

    #[test]
    fn test_execute_fallback_chain() {
        let cases = [
            (OverallStatus::Staging, Some(REASON_NOT_ACTIVE)),
            (OverallStatus::CanBeLocked, Some(REASON_NOT_ACTIVE)),
            (OverallStatus::Locked, Some(REASON_STILL_ACTIVE)),
            (OverallStatus::FundsClaimable, Some(REASON_FUNDS_STILL_CLAIMABLE)),
            (OverallStatus::FundsNeverClaimed, None),
        ];
        for (overall, expected) in cases {
            let decision = decide(Action::ExecuteFallback, &inputs(overall, Some(MemberStatus::Ineligible)));
            assert_eq!(decision.reason(), expected, "overall {:?}", overall);
        }
    }

    #[test]
    fn test_action_names() {
        assert_eq!("check-in".parse::<Action>(), Ok(Action::CheckIn));
        assert_eq!("execute_fallback".parse::<Action>(), Ok(Action::ExecuteFallback));
        assert!("dance".parse::<Action>().is_err());
        assert_eq!(Action::CheckIn.to_string(), "Check in");
    }

    #[test]
    fn test_inputs_for_viewer() {
        let a = Address::parse("0xa").unwrap();
        let b = Address::parse("0xb").unwrap();
        let snapshot = TontineSnapshot {
            address: Address::parse("0x99").unwrap(),
            creator_address: a.clone(),
            description: String::new(),
            members: vec![a.clone(), b.clone()],
            per_member_amount: 50,
            check_in_frequency_secs: 60,
            claim_window_secs: 120,
            fallback_policy: tontine_types::FallbackPolicy::ReturnToMembers,
            creation_time_secs: 1,
            locked_time_secs: 0,
            funds_claimed_time_secs: 0,
            contributions: [(a.clone(), 50)].into_iter().collect(),
            last_check_in: BTreeMap::new(),
            reconfirmation_required: Default::default(),
        };
        let statuses: BTreeMap<_, _> = [(a.clone(), MemberStatus::Ready)].into_iter().collect();

        let for_a = ActionInputs::for_viewer(
            &snapshot,
            &a,
            Loadable::Ready(OverallStatus::Staging),
            Loadable::Ready(&statuses),
        );
        assert!(for_a.is_creator);
        assert_eq!(for_a.contribution_amount, 50);
        assert_eq!(for_a.member, Loadable::Ready(Some(MemberStatus::Ready)));

        let for_b = ActionInputs::for_viewer(&snapshot, &b, Loadable::Ready(OverallStatus::Staging), Loadable::Loading);
        assert!(!for_b.is_creator);
        assert_eq!(for_b.member, Loadable::Loading);
    }
}
