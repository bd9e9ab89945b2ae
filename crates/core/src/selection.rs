//! Keeps the active tontine in step with a persisted navigation parameter.
//!
//! The parameter is read exactly once, when the first membership list
//! arrives. From then on it only mirrors the active selection, so a stale
//! deep link can never override a later user choice.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use tontine_types::{Address, MembershipRecord, TONTINE_QUERY_PARAM};

// ============================================================================
// Navigation Parameter
// ============================================================================

/// A single persisted string value, e.g. a URL query pair
pub trait NavigationParam {
    fn get(&self) -> Option<String>;
    fn set(&mut self, value: &str);
    fn remove(&mut self);
}

/// Query parameter on a URL. Other query pairs are left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlQueryParam {
    url: Url,
    key: String,
}

impl UrlQueryParam {
    pub fn new(url: Url) -> Self {
        Self::with_key(url, TONTINE_QUERY_PARAM)
    }

    pub fn with_key(url: Url, key: impl Into<String>) -> Self {
        Self { url, key: key.into() }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn into_url(self) -> Url {
        self.url
    }

    fn rewrite(&mut self, value: Option<&str>) {
        let mut pairs: Vec<(String, String)> = self
            .url
            .query_pairs()
            .filter(|(k, _)| k != self.key.as_str())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        if let Some(value) = value {
            pairs.push((self.key.clone(), value.to_string()));
        }

        if pairs.is_empty() {
            self.url.set_query(None);
        } else {
            self.url.query_pairs_mut().clear().extend_pairs(pairs);
        }
    }
}

impl NavigationParam for UrlQueryParam {
    fn get(&self) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == self.key.as_str())
            .map(|(_, v)| v.into_owned())
    }

    fn set(&mut self, value: &str) {
        self.rewrite(Some(value));
    }

    fn remove(&mut self) {
        self.rewrite(None);
    }
}

impl NavigationParam for Option<String> {
    fn get(&self) -> Option<String> {
        self.clone()
    }

    fn set(&mut self, value: &str) {
        *self = Some(value.to_string());
    }

    fn remove(&mut self) {
        *self = None;
    }
}

// ============================================================================
// Synchronizer
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncPhase {
    AwaitingFirstLoad,
    Synced,
}

/// User-visible, non-fatal notice raised while syncing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionNotice {
    #[error("You are not a creator / member / invitee of tontine {address} or it does not exist")]
    UnknownTontine { address: String },
}

/// Owns the active tontine selection for one browsing session
#[derive(Debug)]
pub struct SelectionSynchronizer<P: NavigationParam> {
    param: P,
    active: Option<Address>,
    phase: SyncPhase,
}

impl<P: NavigationParam> SelectionSynchronizer<P> {
    pub fn new(param: P) -> Self {
        Self {
            param,
            active: None,
            phase: SyncPhase::AwaitingFirstLoad,
        }
    }

    pub fn active(&self) -> Option<&Address> {
        self.active.as_ref()
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn param(&self) -> &P {
        &self.param
    }

    pub fn into_param(self) -> P {
        self.param
    }

    /// First-load transition. Fires once; later calls are ignored.
    pub fn on_memberships_loaded(&mut self, records: &[MembershipRecord]) -> Option<SelectionNotice> {
        if self.phase == SyncPhase::Synced {
            return None;
        }

        let mut notice = None;
        if let Some(raw) = self.param.get() {
            let found = Address::parse(&raw)
                .ok()
                .filter(|wanted| records.iter().any(|r| &r.tontine_address == wanted));
            match found {
                Some(address) => {
                    debug!(tontine = %address, "restored selection from navigation parameter");
                    self.active = Some(address);
                }
                None => {
                    warn!(tontine = %raw, "navigation parameter references an unknown tontine");
                    self.active = None;
                    notice = Some(SelectionNotice::UnknownTontine { address: raw });
                }
            }
        }

        self.phase = SyncPhase::Synced;
        self.write_param();
        notice
    }

    /// User picked a tontine (or cleared the selection)
    pub fn select(&mut self, address: Option<Address>) {
        self.active = address;
        if self.phase == SyncPhase::Synced {
            self.write_param();
        }
    }

    fn write_param(&mut self) {
        match &self.active {
            Some(address) => self.param.set(address.as_str()),
            None => self.param.remove(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tontine_types::BasicState;

    fn member_of(addr: &str) -> MembershipRecord {
        MembershipRecord {
            tontine_address: Address::parse(addr).unwrap(),
            is_creator: false,
            has_ever_contributed: true,
            basic_state: BasicState::Staging,
        }
    }

    #[test]
    fn test_deep_link_is_honoured_once() {
        let url = Url::parse("https://app.example/?tontine=0xAB&network=testnet").unwrap();
        let mut sync = SelectionSynchronizer::new(UrlQueryParam::new(url));

        assert_eq!(sync.on_memberships_loaded(&[member_of("0xab")]), None);
        assert_eq!(sync.active().map(Address::as_str), Some("0xab"));
        assert_eq!(sync.phase(), SyncPhase::Synced);
        assert_eq!(sync.param().get().as_deref(), Some("0xab"));

        // A second list never re-reads the parameter.
        sync.select(None);
        assert_eq!(sync.on_memberships_loaded(&[member_of("0xab")]), None);
        assert_eq!(sync.active(), None);
    }

    #[test]
    fn test_unknown_deep_link_clears_selection() {
        let mut sync = SelectionSynchronizer::new(Some("0xzz".to_string()));
        let notice = sync.on_memberships_loaded(&[member_of("0x1")]);

        assert_eq!(notice, Some(SelectionNotice::UnknownTontine { address: "0xzz".into() }));
        assert_eq!(sync.active(), None);
        assert_eq!(sync.param().get(), None);
        assert!(notice.unwrap().to_string().contains("0xzz"));
    }

    #[test]
    fn test_selection_before_first_load_does_not_write() {
        let mut sync = SelectionSynchronizer::new(None::<String>);
        sync.select(Some(Address::parse("0x5").unwrap()));
        assert_eq!(sync.param().get(), None);

        sync.on_memberships_loaded(&[]);
        assert_eq!(sync.param().get().as_deref(), Some("0x5"));
    }

    #[test]
    fn test_short_deep_link_matches_padded_record() {
        let padded = format!("0x{:0>64}", "ab");
        let mut sync = SelectionSynchronizer::new(Some("0xab".to_string()));

        assert_eq!(sync.on_memberships_loaded(&[member_of(&padded)]), None);
        assert_eq!(sync.active(), Some(&Address::parse(&padded).unwrap()));
        assert_eq!(sync.param().get().as_deref(), Some("0xab"));
    }

    #[test]
    fn test_no_param_and_no_selection_stays_empty() {
        let url = Url::parse("https://app.example/?network=testnet").unwrap();
        let mut sync = SelectionSynchronizer::new(UrlQueryParam::new(url));

        assert_eq!(sync.on_memberships_loaded(&[member_of("0x1"), member_of("0x2")]), None);
        assert_eq!(sync.phase(), SyncPhase::Synced);
        assert_eq!(sync.active(), None);
        assert_eq!(sync.param().get(), None);
        assert_eq!(sync.param().url().as_str(), "https://app.example/?network=testnet");
    }

    #[test]
    fn test_url_param_keeps_other_pairs() {
        let url = Url::parse("https://app.example/?network=testnet").unwrap();
        let mut param = UrlQueryParam::new(url);

        param.set("0x1");
        assert_eq!(param.get().as_deref(), Some("0x1"));
        assert!(param.url().as_str().contains("network=testnet"));

        param.remove();
        assert_eq!(param.url().as_str(), "https://app.example/?network=testnet");

        let mut bare = UrlQueryParam::new(Url::parse("https://app.example/?tontine=0x1").unwrap());
        bare.remove();
        assert_eq!(bare.into_url().as_str(), "https://app.example/");
    }
}
