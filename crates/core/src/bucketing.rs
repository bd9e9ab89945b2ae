//! Groups membership records into lifecycle buckets and role sub-buckets
//! for list views.

use serde::Serialize;
use std::fmt;
use tracing::debug;

use tontine_types::{
    decode_membership_list, BasicState, MembershipRecord, RawMembershipRecord, TontineError,
};

/// The viewer's relationship to a tontine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    Yours,
    Joined,
    Invited,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Yours, Role::Joined, Role::Invited];

    /// Invited only exists before lock. A never-contributing non-creator in a
    /// locked or complete tontine is counted as Joined.
    pub fn of(record: &MembershipRecord) -> Role {
        if record.is_creator {
            Role::Yours
        } else if record.has_ever_contributed || record.basic_state != BasicState::Staging {
            Role::Joined
        } else {
            Role::Invited
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Yours => "Yours",
            Role::Joined => "Joined",
            Role::Invited => "Invited",
        };
        f.write_str(label)
    }
}

const LIFECYCLES: [BasicState; 3] = [BasicState::Staging, BasicState::Locked, BasicState::Complete];

fn lifecycle_index(state: BasicState) -> usize {
    match state {
        BasicState::Staging => 0,
        BasicState::Locked => 1,
        BasicState::Complete => 2,
    }
}

/// One role sub-bucket inside a lifecycle bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bucket<'a> {
    pub lifecycle: BasicState,
    pub role: Role,
    pub records: &'a [MembershipRecord],
}

impl Bucket<'_> {
    /// Heading shown above the bucket, e.g. "Joined (3)"
    pub fn heading(&self) -> String {
        format!("{} ({})", self.role, self.records.len())
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Every lifecycle x role bucket, empty ones included
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MembershipBuckets {
    buckets: [[Vec<MembershipRecord>; 3]; 3],
}

impl MembershipBuckets {
    /// Partition records, keeping input order inside each bucket
    pub fn from_records(records: &[MembershipRecord]) -> Self {
        let mut buckets = Self::default();
        for record in records {
            let role = Role::of(record);
            buckets.buckets[lifecycle_index(record.basic_state)][role.index()].push(record.clone());
        }
        debug!(
            total = records.len(),
            staging = buckets.lifecycle_len(BasicState::Staging),
            locked = buckets.lifecycle_len(BasicState::Locked),
            complete = buckets.lifecycle_len(BasicState::Complete),
            "bucketed memberships"
        );
        buckets
    }

    /// Decode an index response and partition it. An unknown lifecycle code
    /// anywhere in the list fails the whole call.
    pub fn from_raw(raw: Vec<RawMembershipRecord>) -> Result<Self, TontineError> {
        let records = decode_membership_list(raw)?;
        Ok(Self::from_records(&records))
    }

    pub fn get(&self, lifecycle: BasicState, role: Role) -> &[MembershipRecord] {
        &self.buckets[lifecycle_index(lifecycle)][role.index()]
    }

    pub fn lifecycle_len(&self, lifecycle: BasicState) -> usize {
        self.buckets[lifecycle_index(lifecycle)].iter().map(Vec::len).sum()
    }

    pub fn len(&self) -> usize {
        LIFECYCLES.iter().map(|&state| self.lifecycle_len(state)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All nine buckets in display order
    pub fn iter(&self) -> impl Iterator<Item = Bucket<'_>> {
        LIFECYCLES.into_iter().flat_map(move |lifecycle| {
            Role::ALL.into_iter().map(move |role| Bucket {
                lifecycle,
                role,
                records: self.get(lifecycle, role),
            })
        })
    }

    /// Buckets worth rendering
    pub fn non_empty(&self) -> impl Iterator<Item = Bucket<'_>> {
        self.iter().filter(|bucket| !bucket.is_empty())
    }

    /// Lifecycles with at least one record, for section headings
    pub fn non_empty_lifecycles(&self) -> impl Iterator<Item = BasicState> + '_ {
        LIFECYCLES
            .into_iter()
            .filter(move |&state| self.lifecycle_len(state) > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tontine_types::Address;

    fn record(addr: &str, is_creator: bool, contributed: bool, state: BasicState) -> MembershipRecord {
        MembershipRecord {
            tontine_address: Address::parse(addr).unwrap(),
            is_creator,
            has_ever_contributed: contributed,
            basic_state: state,
        }
    }

    #[test]
    fn test_role_assignment() {
        assert_eq!(Role::of(&record("0x1", true, false, BasicState::Staging)), Role::Yours);
        assert_eq!(Role::of(&record("0x1", true, true, BasicState::Locked)), Role::Yours);
        assert_eq!(Role::of(&record("0x1", false, true, BasicState::Staging)), Role::Joined);
        assert_eq!(Role::of(&record("0x1", false, false, BasicState::Staging)), Role::Invited);
        assert_eq!(Role::of(&record("0x1", false, false, BasicState::Locked)), Role::Joined);
        assert_eq!(Role::of(&record("0x1", false, false, BasicState::Complete)), Role::Joined);
    }

    #[test]
    fn test_buckets_keep_input_order() {
        let records = vec![
            record("0x3", false, true, BasicState::Staging),
            record("0x1", true, false, BasicState::Staging),
            record("0x2", false, true, BasicState::Staging),
            record("0x4", false, false, BasicState::Staging),
        ];
        let buckets = MembershipBuckets::from_records(&records);

        let joined: Vec<_> = buckets
            .get(BasicState::Staging, Role::Joined)
            .iter()
            .map(|r| r.tontine_address.as_str())
            .collect();
        assert_eq!(joined, vec!["0x3", "0x2"]);
        assert_eq!(buckets.get(BasicState::Staging, Role::Yours).len(), 1);
        assert_eq!(buckets.get(BasicState::Staging, Role::Invited).len(), 1);
        assert_eq!(buckets.len(), 4);
    }

    #[test]
    fn test_empty_buckets_are_computed_but_not_rendered() {
        let buckets = MembershipBuckets::from_records(&[record("0x1", true, true, BasicState::Locked)]);
        assert_eq!(buckets.iter().count(), 9);

        let rendered: Vec<_> = buckets.non_empty().map(|b| b.heading()).collect();
        assert_eq!(rendered, vec!["Yours (1)"]);
        assert_eq!(buckets.non_empty_lifecycles().collect::<Vec<_>>(), vec![BasicState::Locked]);
    }

    #[test]
    fn test_from_raw_rejects_unknown_state() {
        let raw = vec![RawMembershipRecord {
            tontine_address: "0x1".to_string(),
            is_creator: false,
            has_ever_contributed: false,
            state: 3,
        }];
        assert_eq!(MembershipBuckets::from_raw(raw), Err(TontineError::UnknownBasicState(3)));
    }
}
