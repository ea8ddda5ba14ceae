use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Error;

/// One entry per member who has ever been assigned a numeric ID.
/// `id_str` is always the zero-padded form of `id`; build records through
/// [`MemberRecord::new`] so the two can never drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub id: u16,
    pub id_str: String,
    pub username: String,
    /// Discord role ID captured when the role was created or last recreated.
    /// Older data files predate this field, so it stays optional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<u64>,
}

impl MemberRecord {
    pub fn new(id: u16, username: impl Into<String>, role_id: Option<u64>) -> Self {
        Self {
            id,
            id_str: format!("{:03}", id),
            username: username.into(),
            role_id,
        }
    }
}

/// The full member-ID mapping, keyed by Discord user ID. The in-memory map is
/// the single source of truth; the JSON file on disk is rewritten in full
/// after every mutation.
#[derive(Debug)]
pub struct IdentityStore {
    path: PathBuf,
    records: BTreeMap<u64, MemberRecord>,
}

/// IDs are drawn from [0, POOL_SIZE).
pub const POOL_SIZE: u16 = 1000;

impl IdentityStore {
    /// Reads the data file if it exists. A missing file just means no member
    /// has been assigned yet; a malformed file is an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let records = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(error) if error.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => return Err(error.into()),
        };
        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), Error> {
        fs::write(&self.path, serde_json::to_string_pretty(&self.records)?)?;
        Ok(())
    }

    pub fn get(&self, user_id: u64) -> Option<&MemberRecord> {
        self.records.get(&user_id)
    }

    pub fn contains(&self, user_id: u64) -> bool {
        self.records.contains_key(&user_id)
    }

    /// Inserts or replaces one record and immediately rewrites the data file.
    pub fn put(&mut self, user_id: u64, record: MemberRecord) -> Result<(), Error> {
        self.records.insert(user_id, record);
        self.save()
    }

    /// Drops every record in memory. The file is only rewritten by the next
    /// `put`, matching the reset flow that repopulates one member at a time.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The numeric IDs currently assigned, for computing the free complement.
    pub fn used_ids(&self) -> Vec<u16> {
        self.records.values().map(|record| record.id).collect()
    }

    /// All records ordered by ascending numeric ID.
    pub fn sorted_by_id(&self) -> Vec<(u64, &MemberRecord)> {
        let mut entries: Vec<_> = self
            .records
            .iter()
            .map(|(user_id, record)| (*user_id, record))
            .collect();
        entries.sort_by_key(|(_, record)| record.id);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn temp_store() -> (tempfile::TempDir, IdentityStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = IdentityStore::load(dir.path().join("data.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn missing_file_is_empty_store() {
        let (_dir, store) = temp_store();
        assert!(store.is_empty());
    }

    #[test]
    fn record_display_id_is_zero_padded() {
        assert_eq!(MemberRecord::new(5, "mika", None).id_str, "005");
        assert_eq!(MemberRecord::new(42, "mika", None).id_str, "042");
        assert_eq!(MemberRecord::new(999, "mika", None).id_str, "999");
    }

    #[test]
    fn put_persists_and_round_trips() {
        let (_dir, mut store) = temp_store();
        store.put(111, MemberRecord::new(7, "alice", Some(900))).unwrap();
        store.put(222, MemberRecord::new(8, "bob", None)).unwrap();

        let reloaded = IdentityStore::load(store.path()).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get(111), store.get(111));
        assert_eq!(reloaded.get(222), store.get(222));
    }

    #[test]
    fn data_file_keys_are_stringified_user_ids() {
        let (_dir, mut store) = temp_store();
        store.put(424242, MemberRecord::new(3, "carol", None)).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["424242"]["id"], 3);
        assert_eq!(json["424242"]["id_str"], "003");
        assert_eq!(json["424242"]["username"], "carol");
    }

    #[test]
    fn record_without_role_id_still_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(
            &path,
            r#"{ "99": { "id": 12, "id_str": "012", "username": "old" } }"#,
        )
        .unwrap();

        let store = IdentityStore::load(&path).unwrap();
        assert_eq!(store.get(99), Some(&MemberRecord::new(12, "old", None)));
    }

    #[test]
    fn clear_does_not_touch_disk_until_next_put() {
        let (_dir, mut store) = temp_store();
        store.put(1, MemberRecord::new(0, "a", None)).unwrap();
        store.clear();
        assert!(store.is_empty());

        // The file still holds the pre-clear contents.
        let reloaded = IdentityStore::load(store.path()).unwrap();
        assert_eq!(reloaded.len(), 1);

        store.put(2, MemberRecord::new(1, "b", None)).unwrap();
        let reloaded = IdentityStore::load(store.path()).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.contains(2));
        assert!(!reloaded.contains(1));
    }

    #[test]
    fn sorted_by_id_orders_by_numeric_id_not_user_id() {
        let (_dir, mut store) = temp_store();
        store.put(300, MemberRecord::new(50, "c", None)).unwrap();
        store.put(100, MemberRecord::new(900, "a", None)).unwrap();
        store.put(200, MemberRecord::new(2, "b", None)).unwrap();

        let ids: Vec<u16> = store.sorted_by_id().iter().map(|(_, r)| r.id).collect();
        assert_eq!(ids, vec![2, 50, 900]);
    }

    #[test]
    fn uniqueness_holds_over_used_ids() {
        let (_dir, mut store) = temp_store();
        for n in 0..50u64 {
            store
                .put(n, MemberRecord::new(n as u16 * 3, "x", None))
                .unwrap();
        }
        let used = store.used_ids();
        let distinct: HashSet<u16> = used.iter().copied().collect();
        assert_eq!(used.len(), distinct.len());
    }
}
