//! The authoritative, persisted collection of rooms.
//!
//! Every mutation rewrites the whole collection into the configured
//! key-value storage. Persistence is best-effort: a failed write is logged and
//! flagged through [`RoomStore::persistence_degraded`] but never turns a
//! successful in-memory operation into an error.

use tracing::{debug, info, warn};

use crate::db::KeyValueStorage;
use crate::error::{RoomError, StorageError};
use crate::models::{FilterCriteria, Room, RoomStats};

/// Storage key the room collection lives under.
pub const DEFAULT_STORAGE_KEY: &str = "hostelOS_rooms";

pub struct RoomStore<S> {
    storage: S,
    key: String,
    rooms: Vec<Room>,
    degraded: bool,
}

impl<S: KeyValueStorage> RoomStore<S> {
    /// Open the store on top of `storage` using [`DEFAULT_STORAGE_KEY`].
    pub fn open(storage: S) -> Self {
        Self::open_with_key(storage, DEFAULT_STORAGE_KEY)
    }

    /// Open the store, restoring any collection saved under `key`. Missing
    /// or unreadable data leaves the store empty.
    pub fn open_with_key(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let (rooms, degraded) = match restore(&storage, &key) {
            Ok(Some(rooms)) => {
                info!(count = rooms.len(), "restored saved rooms");
                (rooms, false)
            }
            Ok(None) => {
                debug!(key = %key, "no saved rooms, starting empty");
                (Vec::new(), false)
            }
            Err(err @ StorageError::Corrupt(_)) => {
                warn!(error = %err, "discarding saved rooms");
                (Vec::new(), false)
            }
            Err(err) => {
                warn!(error = %err, "could not read saved rooms, starting empty");
                (Vec::new(), true)
            }
        };
        Self {
            storage,
            key,
            rooms,
            degraded,
        }
    }

    /// Insert a room unless its number is already taken (ignoring case).
    pub fn add_room(&mut self, room: Room) -> Result<(), RoomError> {
        if self.contains(room.room_no()) {
            return Err(RoomError::DuplicateRoom(room.room_no().to_string()));
        }
        debug!(room_no = room.room_no(), capacity = room.capacity(), "adding room");
        self.rooms.push(room);
        self.persist();
        Ok(())
    }

    /// Owned snapshot of every room in insertion order.
    pub fn get_all(&self) -> Vec<Room> {
        self.rooms.clone()
    }

    /// Rooms satisfying `criteria`, in insertion order.
    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<Room> {
        self.rooms
            .iter()
            .filter(|room| criteria.matches(room))
            .cloned()
            .collect()
    }

    /// Remove the room stored under exactly `room_no`. Absent rooms are
    /// ignored.
    pub fn delete_room(&mut self, room_no: &str) {
        let before = self.rooms.len();
        self.rooms.retain(|room| room.room_no() != room_no);
        if self.rooms.len() != before {
            debug!(room_no, "deleted room");
        }
        self.persist();
    }

    pub fn clear_all(&mut self) {
        debug!(count = self.rooms.len(), "clearing all rooms");
        self.rooms.clear();
        self.persist();
    }

    /// Case-insensitive membership test on room numbers.
    pub fn contains(&self, room_no: &str) -> bool {
        self.rooms.iter().any(|room| room.same_number(room_no))
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn stats(&self) -> RoomStats {
        RoomStats::from_rooms(&self.rooms)
    }

    /// Whether the most recent storage access failed. Cleared again by the
    /// next successful write.
    pub fn persistence_degraded(&self) -> bool {
        self.degraded
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.rooms)
            .map_err(StorageError::from)
            .and_then(|payload| self.storage.set(&self.key, &payload));
        match result {
            Ok(()) => self.degraded = false,
            Err(err) => {
                warn!(
                    error = %err,
                    "storage unavailable, rooms will not persist across sessions"
                );
                self.degraded = true;
            }
        }
    }
}

fn restore<S: KeyValueStorage>(storage: &S, key: &str) -> Result<Option<Vec<Room>>, StorageError> {
    let Some(payload) = storage.get(key)? else {
        return Ok(None);
    };
    let rooms: Vec<Room> = serde_json::from_str(&payload)?;
    Ok(Some(dedupe(rooms)))
}

/// Saved data written by hand could break the uniqueness invariant; keep the
/// first occurrence of each room number.
fn dedupe(rooms: Vec<Room>) -> Vec<Room> {
    let mut unique: Vec<Room> = Vec::with_capacity(rooms.len());
    for room in rooms {
        if unique.iter().any(|kept| kept.same_number(room.room_no())) {
            warn!(room_no = room.room_no(), "dropping duplicate saved room");
        } else {
            unique.push(room);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStorage;
    use crate::models::Requirement;

    fn room(no: &str, capacity: u32, ac: bool, wash: bool) -> Room {
        Room::new(no, capacity, ac, wash).unwrap()
    }

    fn numbers(rooms: &[Room]) -> Vec<&str> {
        rooms.iter().map(Room::room_no).collect()
    }

    fn seeded() -> RoomStore<MemoryStorage> {
        let mut store = RoomStore::open(MemoryStorage::new());
        store.add_room(room("101", 2, true, true)).unwrap();
        store.add_room(room("102", 4, false, true)).unwrap();
        store.add_room(room("103", 6, true, false)).unwrap();
        store.add_room(room("104", 3, false, false)).unwrap();
        store
    }

    /// Storage whose reads and writes always fail, like a full quota.
    struct BrokenStorage;

    impl KeyValueStorage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(std::io::Error::other("quota exceeded").into())
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("quota exceeded").into())
        }
    }

    /// Storage whose writes fail until `recovered` is set.
    #[derive(Default)]
    struct FlakyStorage {
        recovered: bool,
        inner: MemoryStorage,
    }

    impl KeyValueStorage for FlakyStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.recovered {
                self.inner.set(key, value)
            } else {
                Err(std::io::Error::other("disk full").into())
            }
        }
    }

    #[test]
    fn degraded_flag_clears_after_successful_write() {
        let mut store = RoomStore::open(FlakyStorage::default());
        assert!(!store.persistence_degraded());

        store.add_room(room("1", 2, false, false)).unwrap();
        assert!(store.persistence_degraded());
        assert_eq!(store.len(), 1);

        store.storage.recovered = true;
        store.add_room(room("2", 3, false, false)).unwrap();
        assert!(!store.persistence_degraded());

        let saved = store.storage().get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        let restored: Vec<Room> = serde_json::from_str(&saved).unwrap();
        assert_eq!(numbers(&restored), ["1", "2"]);
    }

    #[test]
    fn distinct_rooms_coexist() {
        let store = seeded();
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn duplicate_in_any_case_is_rejected() {
        let mut store = RoomStore::open(MemoryStorage::new());
        store.add_room(room("a1", 2, false, false)).unwrap();
        let before = store.get_all();

        let err = store.add_room(room("A1", 8, true, true)).unwrap_err();

        assert_eq!(err, RoomError::DuplicateRoom("A1".into()));
        assert_eq!(err.to_string(), "Room \"A1\" already exists.");
        assert_eq!(store.get_all(), before);
    }

    #[test]
    fn dont_care_filter_returns_everything_in_order() {
        let store = seeded();
        let all = store.filter(&FilterCriteria::default());
        assert_eq!(numbers(&all), ["101", "102", "103", "104"]);
    }

    #[test]
    fn filter_applies_capacity_and_amenities() {
        let store = seeded();

        let roomy = store.filter(&FilterCriteria::default().min_capacity(4));
        assert_eq!(numbers(&roomy), ["102", "103"]);

        let with_ac = store.filter(&FilterCriteria::default().ac(Requirement::Required));
        assert_eq!(numbers(&with_ac), ["101", "103"]);

        let without_ac = store.filter(&FilterCriteria::default().ac(Requirement::Excluded));
        assert_eq!(numbers(&without_ac), ["102", "104"]);

        let no_wash_big = store.filter(
            &FilterCriteria::default()
                .min_capacity(3)
                .washroom(Requirement::Excluded),
        );
        assert_eq!(numbers(&no_wash_big), ["103", "104"]);
    }

    #[test]
    fn get_all_is_a_copy() {
        let store = seeded();
        let mut copy = store.get_all();
        copy.clear();
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn delete_missing_room_is_a_noop() {
        let mut store = seeded();
        let before = store.get_all();
        store.delete_room("999");
        assert_eq!(store.get_all(), before);
    }

    #[test]
    fn delete_matches_exactly() {
        let mut store = seeded();
        store.delete_room("102");
        assert_eq!(numbers(&store.get_all()), ["101", "103", "104"]);
    }

    #[test]
    fn clear_all_empties_store_and_storage() {
        let mut store = seeded();
        store.clear_all();
        assert!(store.is_empty());
        assert_eq!(
            store.storage().get(DEFAULT_STORAGE_KEY).unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn mutations_round_trip_through_storage() {
        let store = seeded();
        let expected = store.get_all();
        let reopened = RoomStore::open(store.into_storage());
        assert_eq!(reopened.get_all(), expected);
    }

    #[test]
    fn corrupt_payload_starts_empty() {
        let storage = MemoryStorage::new().with_entry(DEFAULT_STORAGE_KEY, "{not json");
        let store = RoomStore::open(storage);
        assert!(store.is_empty());
        assert!(!store.persistence_degraded());
    }

    #[test]
    fn restore_reads_original_format() {
        let storage = MemoryStorage::new().with_entry(
            DEFAULT_STORAGE_KEY,
            r#"[{"roomNo":"G1","capacity":3,"hasAC":false,"hasAttachedWashroom":true}]"#,
        );
        let store = RoomStore::open(storage);
        assert_eq!(store.get_all(), vec![room("G1", 3, false, true)]);
    }

    #[test]
    fn restore_drops_duplicate_numbers() {
        let storage = MemoryStorage::new().with_entry(
            DEFAULT_STORAGE_KEY,
            r#"[{"roomNo":"x","capacity":3,"hasAC":false,"hasAttachedWashroom":true},
                {"roomNo":"X","capacity":5,"hasAC":true,"hasAttachedWashroom":true}]"#,
        );
        let store = RoomStore::open(storage);
        assert_eq!(store.get_all(), vec![room("x", 3, false, true)]);
    }

    #[test]
    fn custom_key_isolates_collections() {
        let mut store = RoomStore::open_with_key(MemoryStorage::new(), "other");
        store.add_room(room("1", 1, false, false)).unwrap();
        let storage = store.into_storage();
        assert!(storage.get(DEFAULT_STORAGE_KEY).unwrap().is_none());
        assert!(RoomStore::open(storage).is_empty());
    }

    #[test]
    fn storage_failures_never_fail_operations() {
        let mut store = RoomStore::open(BrokenStorage);
        assert!(store.is_empty());
        assert!(store.persistence_degraded());

        store.add_room(room("1", 2, false, false)).unwrap();
        store.add_room(room("2", 2, false, false)).unwrap();
        store.delete_room("1");
        assert_eq!(numbers(&store.get_all()), ["2"]);
        assert!(store.persistence_degraded());

        store.clear_all();
        assert!(store.is_empty());
    }

    #[test]
    fn stats_reflect_collection() {
        let stats = seeded().stats();
        assert_eq!((stats.total, stats.with_ac, stats.with_washroom), (4, 2, 2));
    }
}
