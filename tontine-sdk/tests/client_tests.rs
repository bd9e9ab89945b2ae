//! Client facade tests against in-memory ports

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use tontine_core::{Action, SelectionNotice, SelectionSynchronizer};
use tontine_sdk::core::RefreshConfig;
use tontine_sdk::{
    EntryFunctionPayload, LedgerReader, MembershipIndex, NameResolver, NoNames, SdkError, SdkResult,
    TontineClient, TransactionSubmitter, TxnHash,
};
use tontine_types::{
    Address, BasicState, FallbackPolicy, Loadable, MemberStatus, MembershipRecord, OverallStatus,
    TontineError, TontineSnapshot,
};

fn addr(s: &str) -> Address {
    Address::parse(s).unwrap()
}

// ============================================================================
// In-memory ports
// ============================================================================

#[derive(Clone)]
struct LedgerState {
    snapshot: TontineSnapshot,
    overall: Result<OverallStatus, String>,
    statuses: BTreeMap<Address, MemberStatus>,
    vm_failure: Option<String>,
    snapshot_unavailable: bool,
}

struct MemoryLedger {
    state: Mutex<LedgerState>,
    /// State the ledger moves to once a transaction is committed
    after_commit: Mutex<Option<LedgerState>>,
    snapshot_reads: Mutex<u32>,
}

impl MemoryLedger {
    fn new(state: LedgerState) -> Self {
        Self {
            state: Mutex::new(state),
            after_commit: Mutex::new(None),
            snapshot_reads: Mutex::new(0),
        }
    }

    fn then(self, state: LedgerState) -> Self {
        *self.after_commit.lock().unwrap() = Some(state);
        self
    }
}

#[async_trait]
impl LedgerReader for MemoryLedger {
    async fn fetch_snapshot(&self, _tontine: &Address) -> SdkResult<TontineSnapshot> {
        *self.snapshot_reads.lock().unwrap() += 1;
        let state = self.state.lock().unwrap();
        if state.snapshot_unavailable {
            return Err(SdkError::HttpStatus {
                status: 503,
                url: "http://node/v1/accounts/0x7070/resource".to_string(),
                body: "service unavailable".to_string(),
            });
        }
        Ok(state.snapshot.clone())
    }

    async fn fetch_overall_status(&self, _tontine: &Address) -> SdkResult<OverallStatus> {
        match &self.state.lock().unwrap().overall {
            Ok(status) => Ok(*status),
            Err(kind) if kind == "network" => Err(SdkError::Network("connection reset".to_string())),
            Err(_) => Err(TontineError::UnknownOverallStatus(99).into()),
        }
    }

    async fn fetch_member_statuses(
        &self,
        _tontine: &Address,
    ) -> SdkResult<BTreeMap<Address, MemberStatus>> {
        Ok(self.state.lock().unwrap().statuses.clone())
    }

    async fn wait_for_transaction(&self, hash: &TxnHash) -> SdkResult<()> {
        if let Some(vm_status) = self.state.lock().unwrap().vm_failure.clone() {
            return Err(SdkError::VmFailure {
                hash: hash.to_string(),
                vm_status,
            });
        }
        if let Some(next) = self.after_commit.lock().unwrap().take() {
            *self.state.lock().unwrap() = next;
        }
        Ok(())
    }
}

struct MemoryIndex(Vec<MembershipRecord>);

#[async_trait]
impl MembershipIndex for MemoryIndex {
    async fn fetch_membership_list(&self, _user: &Address) -> SdkResult<Vec<MembershipRecord>> {
        Ok(self.0.clone())
    }
}

#[derive(Default)]
struct RecordingWallet {
    submitted: Mutex<Vec<EntryFunctionPayload>>,
}

#[async_trait]
impl TransactionSubmitter for RecordingWallet {
    async fn submit(&self, payload: &EntryFunctionPayload) -> SdkResult<TxnHash> {
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(payload.clone());
        Ok(TxnHash(format!("0x{:x}", submitted.len())))
    }
}

struct FlakyNames;

#[async_trait]
impl NameResolver for FlakyNames {
    async fn primary_name(&self, address: &Address) -> SdkResult<Option<String>> {
        match address.as_str() {
            "0xa" => Ok(Some("alice".to_string())),
            "0xb" => Err(SdkError::Network("timeout".to_string())),
            _ => Ok(None),
        }
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn snapshot(locked_time_secs: u64, contributions: &[(&str, u64)]) -> TontineSnapshot {
    TontineSnapshot {
        address: addr("0x7070"),
        creator_address: addr("0xa"),
        description: "Hellfish".to_string(),
        members: vec![addr("0xa"), addr("0xb")],
        per_member_amount: 50,
        check_in_frequency_secs: 60,
        claim_window_secs: 600,
        fallback_policy: FallbackPolicy::ReturnToMembers,
        creation_time_secs: 1_000,
        locked_time_secs,
        funds_claimed_time_secs: 0,
        contributions: contributions.iter().map(|(a, v)| (addr(a), *v)).collect(),
        last_check_in: BTreeMap::new(),
        reconfirmation_required: BTreeSet::new(),
    }
}

fn staging() -> LedgerState {
    LedgerState {
        snapshot: snapshot(0, &[("0xa", 50)]),
        overall: Ok(OverallStatus::Staging),
        statuses: BTreeMap::from([
            (addr("0xa"), MemberStatus::Ready),
            (addr("0xb"), MemberStatus::MustContribute),
        ]),
        vm_failure: None,
        snapshot_unavailable: false,
    }
}

fn no_delay() -> RefreshConfig {
    RefreshConfig {
        post_txn_delay_ms: 0,
        poll_interval_secs: 1,
    }
}

fn client_with(ledger: MemoryLedger, records: Vec<MembershipRecord>) -> (TontineClient, Arc<RecordingWallet>) {
    let wallet = Arc::new(RecordingWallet::default());
    let client = TontineClient::new(
        Arc::new(ledger),
        Arc::new(MemoryIndex(records)),
        Arc::new(NoNames),
        "0x1::tontine02",
        no_delay(),
    )
    .with_submitter(wallet.clone());
    (client, wallet)
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn load_view_derives_decisions_and_rows() {
    let (client, _) = client_with(MemoryLedger::new(staging()), vec![]);
    let view = client.load_view(&addr("0x7070"), Some(&addr("0xb"))).await.unwrap();

    assert_eq!(view.overall, Loadable::Ready(OverallStatus::Staging));
    assert_eq!(view.viewer_status(), Loadable::Ready(Some(MemberStatus::MustContribute)));
    assert!(view.decision(Action::Contribute).unwrap().is_enabled());
    assert_eq!(
        view.decision(Action::Withdraw).unwrap().reason(),
        Some("You have not contributed anything yet")
    );
    assert_eq!(view.rows.len(), 2);
    assert!(view.rows[1].is_user);
}

#[tokio::test]
async fn transient_status_failure_reads_as_loading() {
    let mut state = staging();
    state.overall = Err("network".to_string());
    let (client, _) = client_with(MemoryLedger::new(state), vec![]);

    let view = client.load_view(&addr("0x7070"), Some(&addr("0xa"))).await.unwrap();
    assert_eq!(view.overall, Loadable::Loading);
    assert!(view
        .decisions
        .unwrap()
        .iter()
        .all(|d| d.reason() == Some("Loading…")));
}

#[tokio::test]
async fn unknown_status_code_is_a_hard_error() {
    let mut state = staging();
    state.overall = Err("taxonomy".to_string());
    let (client, _) = client_with(MemoryLedger::new(state), vec![]);

    let err = client.load_view(&addr("0x7070"), None).await.unwrap_err();
    assert!(matches!(err, SdkError::Tontine(TontineError::UnknownOverallStatus(99))));
}

#[tokio::test]
async fn perform_refuses_disabled_actions_without_submitting() {
    let (client, wallet) = client_with(MemoryLedger::new(staging()), vec![]);

    let err = client
        .perform(Action::Lock, &addr("0x7070"), &addr("0xa"), None)
        .await
        .unwrap_err();

    assert!(matches!(err, SdkError::ActionDisabled { action: Action::Lock, .. }));
    assert!(wallet.submitted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn perform_submits_then_refetches() {
    let mut contributed = staging();
    contributed.snapshot = snapshot(0, &[("0xa", 50), ("0xb", 50)]);
    contributed.overall = Ok(OverallStatus::CanBeLocked);
    contributed.statuses.insert(addr("0xb"), MemberStatus::Ready);

    let ledger = MemoryLedger::new(staging()).then(contributed);
    let (client, wallet) = client_with(ledger, vec![]);

    let performed = client
        .perform(Action::Contribute, &addr("0x7070"), &addr("0xb"), Some(50))
        .await
        .unwrap();
    let view = performed.view().unwrap();

    assert_eq!(performed.hash, TxnHash("0x1".to_string()));
    let submitted = wallet.submitted.lock().unwrap();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].function, "0x1::tontine02::contribute");
    assert_eq!(view.overall, Loadable::Ready(OverallStatus::CanBeLocked));
    assert_eq!(view.snapshot.contribution_of(&addr("0xb")), 50);
    assert!(view.decision(Action::Lock).unwrap().is_enabled());
}

#[tokio::test]
async fn failed_transaction_names_the_action() {
    let mut state = staging();
    state.vm_failure = Some("Move abort: E_NOT_MEMBER".to_string());
    let (client, _) = client_with(MemoryLedger::new(state), vec![]);

    let err = client
        .perform(Action::Contribute, &addr("0x7070"), &addr("0xb"), Some(50))
        .await
        .unwrap_err();

    match err {
        SdkError::TransactionFailed { action, cause } => {
            assert_eq!(action, "Contribute");
            assert!(cause.contains("E_NOT_MEMBER"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn refetch_failure_after_commit_keeps_the_hash() {
    let mut unreachable = staging();
    unreachable.snapshot_unavailable = true;

    let ledger = MemoryLedger::new(staging()).then(unreachable);
    let (client, wallet) = client_with(ledger, vec![]);

    let performed = client
        .perform(Action::Contribute, &addr("0x7070"), &addr("0xb"), Some(50))
        .await
        .expect("committed transaction must not be reported as failed");

    assert_eq!(wallet.submitted.lock().unwrap().len(), 1);
    assert_eq!(performed.hash, TxnHash("0x1".to_string()));
    assert!(performed.view().is_none());
    assert!(matches!(performed.refreshed, Err(SdkError::HttpStatus { status: 503, .. })));
}

#[tokio::test]
async fn creator_cannot_remove_themselves() {
    let (client, wallet) = client_with(MemoryLedger::new(staging()), vec![]);

    let err = client
        .remove_member(&addr("0x7070"), &addr("0xa"), &addr("0xa"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Cannot remove yourself"));

    let performed = client
        .remove_member(&addr("0x7070"), &addr("0xa"), &addr("0xb"))
        .await
        .unwrap();
    assert!(performed.view().is_some());
    assert_eq!(wallet.submitted.lock().unwrap()[0].function_name(), "remove_member");
}

#[tokio::test]
async fn first_load_selection_reports_unknown_tontine() {
    let records = vec![MembershipRecord {
        tontine_address: addr("0x7070"),
        is_creator: false,
        has_ever_contributed: true,
        basic_state: BasicState::Locked,
    }];
    let (client, _) = client_with(MemoryLedger::new(staging()), records);

    let mut selection = SelectionSynchronizer::new(Some("0xdead".to_string()));
    let notice = client.sync_selection(&addr("0xb"), &mut selection).await.unwrap();

    assert_eq!(notice, Some(SelectionNotice::UnknownTontine { address: "0xdead".to_string() }));
    assert_eq!(selection.active(), None);
}

#[tokio::test]
async fn name_failures_degrade_to_addresses() {
    let names = FlakyNames
        .primary_names(&[addr("0xa"), addr("0xb"), addr("0xc")])
        .await;
    assert_eq!(names.len(), 1);
    assert_eq!(names[&addr("0xa")], "alice");
}
