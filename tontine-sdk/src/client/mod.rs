pub mod http;
pub mod indexer;
pub mod ledger;
pub mod names;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use tontine_core::{
    evaluate_actions, member_rows, Action, ActionDecision, ActionDecisions, ActionInputs,
    Availability, MemberRow, MembershipBuckets, NavigationParam, SelectionNotice,
    SelectionSynchronizer,
};
use tontine_types::{Address, Loadable, MemberStatus, MembershipRecord, OverallStatus, TontineSnapshot};

use crate::{
    core::{ClientConfig, RefreshConfig, SdkError, SdkResult},
    instructions::{CreateTontineRequest, EntryFunctionPayload, PayloadBuilder},
    ports::{LedgerReader, MembershipIndex, NameResolver, NoNames, TransactionSubmitter, TxnHash},
};

pub use http::HttpAgent;
pub use indexer::MembershipIndexClient;
pub use ledger::LedgerClient;
pub use names::NameClient;

// ============================================================================
// Tontine View
// ============================================================================

/// Everything the detail view of one tontine shows, derived from a single
/// round of fetches. Never patched in place; refetch for a fresh one.
#[derive(Debug, Clone)]
pub struct TontineView {
    pub snapshot: TontineSnapshot,
    pub overall: Loadable<OverallStatus>,
    pub member_statuses: Loadable<BTreeMap<Address, MemberStatus>>,
    pub viewer: Option<Address>,
    /// Present when there is a viewer to decide for
    pub decisions: Option<ActionDecisions>,
    pub rows: Vec<MemberRow>,
}

impl TontineView {
    pub fn derive(
        snapshot: TontineSnapshot,
        overall: Loadable<OverallStatus>,
        member_statuses: Loadable<BTreeMap<Address, MemberStatus>>,
        viewer: Option<Address>,
    ) -> Self {
        let decisions = viewer.as_ref().map(|viewer| {
            evaluate_actions(&ActionInputs::for_viewer(
                &snapshot,
                viewer,
                overall,
                member_statuses.as_ref(),
            ))
        });
        let rows = member_rows(&snapshot, overall, member_statuses.as_ref(), viewer.as_ref());

        Self {
            snapshot,
            overall,
            member_statuses,
            viewer,
            decisions,
            rows,
        }
    }

    pub fn decision(&self, action: Action) -> Option<&ActionDecision> {
        self.decisions.as_ref().map(|decisions| decisions.get(action))
    }

    pub fn viewer_status(&self) -> Loadable<Option<MemberStatus>> {
        match &self.viewer {
            Some(viewer) => self.member_statuses.as_ref().map(|s| s.get(viewer).copied()),
            None => Loadable::Ready(None),
        }
    }
}

/// Outcome of a committed transaction. The refetch runs after the commit, so
/// its failure never means the transaction failed.
#[derive(Debug)]
pub struct Performed {
    pub hash: TxnHash,
    pub refreshed: SdkResult<TontineView>,
}

impl Performed {
    pub fn view(&self) -> Option<&TontineView> {
        self.refreshed.as_ref().ok()
    }
}

/// A failed status fetch that could succeed on retry leaves the value loading;
/// anything else, including an unknown code, is a hard error.
fn loadable<T>(what: &str, tontine: &Address, result: SdkResult<T>) -> SdkResult<Loadable<T>> {
    match result {
        Ok(value) => Ok(Loadable::Ready(value)),
        Err(e) if e.is_transient() => {
            warn!(tontine = %tontine, error = %e, "{} unavailable, treating as loading", what);
            Ok(Loadable::Loading)
        }
        Err(e) => Err(e),
    }
}

// ============================================================================
// Tontine Client
// ============================================================================

/// Main client: reads through the ledger and index ports, derives views with
/// the core rules, and submits through an optional wallet
pub struct TontineClient {
    ledger: Arc<dyn LedgerReader>,
    index: Arc<dyn MembershipIndex>,
    names: Arc<dyn NameResolver>,
    submitter: Option<Arc<dyn TransactionSubmitter>>,
    payloads: PayloadBuilder,
    refresh: RefreshConfig,
}

impl TontineClient {
    pub fn new(
        ledger: Arc<dyn LedgerReader>,
        index: Arc<dyn MembershipIndex>,
        names: Arc<dyn NameResolver>,
        module_id: impl Into<String>,
        refresh: RefreshConfig,
    ) -> Self {
        Self {
            ledger,
            index,
            names,
            submitter: None,
            payloads: PayloadBuilder::new(module_id),
            refresh,
        }
    }

    /// HTTP-backed client for the configured network
    pub fn from_config(config: &ClientConfig) -> SdkResult<Self> {
        let names: Arc<dyn NameResolver> = if config.names.enabled {
            Arc::new(NameClient::from_config(config)?)
        } else {
            Arc::new(NoNames)
        };

        Ok(Self::new(
            Arc::new(LedgerClient::from_config(config)?),
            Arc::new(MembershipIndexClient::from_config(config)?),
            names,
            config.module_id()?,
            config.refresh.clone(),
        ))
    }

    pub fn with_submitter(mut self, submitter: Arc<dyn TransactionSubmitter>) -> Self {
        self.submitter = Some(submitter);
        self
    }

    pub fn payloads(&self) -> &PayloadBuilder {
        &self.payloads
    }

    pub fn refresh(&self) -> &RefreshConfig {
        &self.refresh
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Fetch snapshot and statuses concurrently and derive the view
    pub async fn load_view(&self, tontine: &Address, viewer: Option<&Address>) -> SdkResult<TontineView> {
        let (snapshot, overall, statuses) = tokio::join!(
            self.ledger.fetch_snapshot(tontine),
            self.ledger.fetch_overall_status(tontine),
            self.ledger.fetch_member_statuses(tontine),
        );

        let snapshot = snapshot?;
        let overall = loadable("overall status", tontine, overall)?;
        let statuses = loadable("member statuses", tontine, statuses)?;

        Ok(TontineView::derive(snapshot, overall, statuses, viewer.cloned()))
    }

    pub async fn memberships(&self, user: &Address) -> SdkResult<Vec<MembershipRecord>> {
        self.index.fetch_membership_list(user).await
    }

    pub async fn buckets(&self, user: &Address) -> SdkResult<MembershipBuckets> {
        Ok(MembershipBuckets::from_records(&self.memberships(user).await?))
    }

    /// Run the first-load selection transition against the user's memberships
    pub async fn sync_selection<P: NavigationParam>(
        &self,
        user: &Address,
        selection: &mut SelectionSynchronizer<P>,
    ) -> SdkResult<Option<SelectionNotice>> {
        let records = self.memberships(user).await?;
        Ok(selection.on_memberships_loaded(&records))
    }

    pub async fn display_names(&self, addresses: &[Address]) -> BTreeMap<Address, String> {
        self.names.primary_names(addresses).await
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Payload for `action`, refused when the rules disable it for `user`
    pub async fn prepare(
        &self,
        action: Action,
        tontine: &Address,
        user: &Address,
        amount_octa: Option<u64>,
    ) -> SdkResult<EntryFunctionPayload> {
        let view = self.load_view(tontine, Some(user)).await?;
        ensure_enabled(action, view.decision(action))?;
        self.payloads.for_action(action, tontine, amount_octa)
    }

    /// Check, submit, wait for the result, then refetch. `Err` means nothing
    /// was committed; failures are reported once and retrying is up to the
    /// caller.
    pub async fn perform(
        &self,
        action: Action,
        tontine: &Address,
        user: &Address,
        amount_octa: Option<u64>,
    ) -> SdkResult<Performed> {
        let payload = self.prepare(action, tontine, user, amount_octa).await?;
        let hash = self.execute(&action.to_string(), &payload).await?;
        Ok(self.refetch(hash, tontine, user).await)
    }

    /// Creator removes a member before lock
    pub async fn remove_member(
        &self,
        tontine: &Address,
        creator: &Address,
        member: &Address,
    ) -> SdkResult<Performed> {
        let view = self.load_view(tontine, Some(creator)).await?;
        let permission = view
            .rows
            .iter()
            .find(|row| &row.address == member)
            .ok_or_else(|| SdkError::InvalidParameters(format!("{} is not a member", member)))?
            .remove;

        match permission {
            Some(Availability::Enabled { .. }) => {}
            Some(Availability::Disabled { reason }) => {
                return Err(SdkError::InvalidParameters(reason.to_string()));
            }
            None => {
                return Err(SdkError::InvalidParameters(
                    "only the creator can remove members before the tontine is locked".to_string(),
                ));
            }
        }

        let payload = self.payloads.remove_member(tontine, member);
        let hash = self.execute("Remove member", &payload).await?;
        Ok(self.refetch(hash, tontine, creator).await)
    }

    pub async fn create(&self, creator: &Address, request: &CreateTontineRequest) -> SdkResult<TxnHash> {
        request.check(Some(creator))?;
        let payload = self.payloads.create(request)?;
        self.execute("Create", &payload).await
    }

    async fn execute(&self, label: &str, payload: &EntryFunctionPayload) -> SdkResult<TxnHash> {
        let submitter = self
            .submitter
            .as_ref()
            .ok_or_else(|| SdkError::InvalidConfig("no transaction submitter configured".to_string()))?;

        let failed = |e: SdkError| SdkError::TransactionFailed {
            action: label.to_string(),
            cause: e.to_string(),
        };

        info!(function = %payload.function, "submitting transaction");
        let hash = submitter.submit(payload).await.map_err(failed)?;
        self.ledger.wait_for_transaction(&hash).await.map_err(failed)?;
        Ok(hash)
    }

    /// Wait for the node to catch up, then load a fresh view
    async fn refetch(&self, hash: TxnHash, tontine: &Address, viewer: &Address) -> Performed {
        if self.refresh.post_txn_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.refresh.post_txn_delay_ms)).await;
        }

        let refreshed = self.load_view(tontine, Some(viewer)).await;
        if let Err(e) = &refreshed {
            warn!(hash = %hash, tontine = %tontine, error = %e, "transaction committed but refetch failed");
        }
        Performed { hash, refreshed }
    }
}

fn ensure_enabled(action: Action, decision: Option<&ActionDecision>) -> SdkResult<()> {
    match decision.and_then(ActionDecision::reason) {
        Some(reason) => {
            warn!(%action, reason, "action refused");
            Err(SdkError::ActionDisabled {
                action,
                reason: reason.to_string(),
            })
        }
        None => Ok(()),
    }
}
