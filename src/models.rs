//! Domain models handed between the room store, the allocation engine and the
//! TUI. The types stay light-weight data holders; a [`Room`] can only be built
//! through [`Room::new`], so every instance already satisfies the record
//! invariants.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RoomError;

/// One allocatable hostel room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RoomRecord", into = "RoomRecord")]
pub struct Room {
    room_no: String,
    capacity: u32,
    has_ac: bool,
    has_attached_washroom: bool,
}

impl Room {
    /// Build a room, trimming the room number.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::InvalidInput`] when the room number is blank or
    /// the capacity is zero.
    pub fn new(
        room_no: impl Into<String>,
        capacity: u32,
        has_ac: bool,
        has_attached_washroom: bool,
    ) -> Result<Self, RoomError> {
        let room_no = room_no.into();
        let room_no = room_no.trim();
        if room_no.is_empty() {
            return Err(RoomError::invalid("Room number is required."));
        }
        if capacity == 0 {
            return Err(RoomError::invalid("Capacity must be a positive number."));
        }
        Ok(Self {
            room_no: room_no.to_string(),
            capacity,
            has_ac,
            has_attached_washroom,
        })
    }

    pub fn room_no(&self) -> &str {
        &self.room_no
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn has_ac(&self) -> bool {
        self.has_ac
    }

    pub fn has_attached_washroom(&self) -> bool {
        self.has_attached_washroom
    }

    /// Case-insensitive comparison used for the uniqueness invariant.
    pub fn same_number(&self, room_no: &str) -> bool {
        self.room_no.to_lowercase() == room_no.trim().to_lowercase()
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Room {}", self.room_no)
    }
}

/// Wire shape of a room inside the persisted JSON array.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoomRecord {
    room_no: String,
    capacity: u32,
    #[serde(rename = "hasAC")]
    has_ac: bool,
    has_attached_washroom: bool,
}

impl TryFrom<RoomRecord> for Room {
    type Error = RoomError;

    fn try_from(record: RoomRecord) -> Result<Self, Self::Error> {
        Room::new(
            record.room_no,
            record.capacity,
            record.has_ac,
            record.has_attached_washroom,
        )
    }
}

impl From<Room> for RoomRecord {
    fn from(room: Room) -> Self {
        Self {
            room_no: room.room_no,
            capacity: room.capacity,
            has_ac: room.has_ac,
            has_attached_washroom: room.has_attached_washroom,
        }
    }
}

/// Three-valued amenity constraint. `Excluded` means the room must lack the
/// amenity; `DontCare` places no constraint at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Requirement {
    Required,
    Excluded,
    #[default]
    DontCare,
}

impl Requirement {
    /// Allocation policy: a wanted amenity is required, an unwanted one is
    /// not constrained.
    pub fn from_flag(wanted: bool) -> Self {
        if wanted {
            Self::Required
        } else {
            Self::DontCare
        }
    }

    pub fn matches(self, value: bool) -> bool {
        match self {
            Self::Required => value,
            Self::Excluded => !value,
            Self::DontCare => true,
        }
    }

    /// Rotate Any -> Yes -> No -> Any. Used by the search selectors.
    pub fn cycle(self) -> Self {
        match self {
            Self::DontCare => Self::Required,
            Self::Required => Self::Excluded,
            Self::Excluded => Self::DontCare,
        }
    }

    /// Reverse of [`Requirement::cycle`].
    pub fn cycle_back(self) -> Self {
        match self {
            Self::DontCare => Self::Excluded,
            Self::Excluded => Self::Required,
            Self::Required => Self::DontCare,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Required => "Yes",
            Self::Excluded => "No",
            Self::DontCare => "Any",
        }
    }
}

/// Query shape accepted by [`crate::store::RoomStore::filter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Smallest acceptable capacity; `0` accepts every room.
    pub min_capacity: u32,
    /// Constraint on `has_ac`.
    pub ac: Requirement,
    /// Constraint on `has_attached_washroom`.
    pub washroom: Requirement,
}

impl FilterCriteria {
    pub fn min_capacity(mut self, min_capacity: u32) -> Self {
        self.min_capacity = min_capacity;
        self
    }

    pub fn ac(mut self, ac: Requirement) -> Self {
        self.ac = ac;
        self
    }

    pub fn washroom(mut self, washroom: Requirement) -> Self {
        self.washroom = washroom;
        self
    }

    pub fn matches(&self, room: &Room) -> bool {
        room.capacity >= self.min_capacity
            && self.ac.matches(room.has_ac)
            && self.washroom.matches(room.has_attached_washroom)
    }
}

/// A group asking for a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationRequest {
    /// Group size; the room's capacity must be at least this.
    pub students: u32,
    /// Only consider air-conditioned rooms. `false` means any.
    pub needs_ac: bool,
    /// Only consider rooms with an attached washroom. `false` means any.
    pub needs_washroom: bool,
}

impl AllocationRequest {
    pub fn new(students: u32) -> Self {
        Self {
            students,
            needs_ac: false,
            needs_washroom: false,
        }
    }
}

impl Default for AllocationRequest {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Counts shown in the stats bar of the room listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoomStats {
    /// Number of rooms counted.
    pub total: usize,
    /// Rooms with air conditioning.
    pub with_ac: usize,
    /// Rooms with an attached washroom.
    pub with_washroom: usize,
}

impl RoomStats {
    pub fn from_rooms(rooms: &[Room]) -> Self {
        Self {
            total: rooms.len(),
            with_ac: rooms.iter().filter(|room| room.has_ac).count(),
            with_washroom: rooms
                .iter()
                .filter(|room| room.has_attached_washroom)
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(no: &str, capacity: u32, ac: bool, wash: bool) -> Room {
        Room::new(no, capacity, ac, wash).unwrap()
    }

    #[test]
    fn blank_room_number_is_rejected() {
        let err = Room::new("   ", 4, false, false).unwrap_err();
        assert_eq!(
            err,
            RoomError::InvalidInput("Room number is required.".into())
        );
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(
            Room::new("101", 0, false, false),
            Err(RoomError::InvalidInput(_))
        ));
    }

    #[test]
    fn room_number_is_trimmed() {
        assert_eq!(room("  A-12 ", 2, false, false).room_no(), "A-12");
    }

    #[test]
    fn same_number_ignores_case() {
        let r = room("B12", 2, false, false);
        assert!(r.same_number("b12"));
        assert!(!r.same_number("B13"));
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let json = serde_json::to_value(room("101", 4, true, false)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "roomNo": "101",
                "capacity": 4,
                "hasAC": true,
                "hasAttachedWashroom": false,
            })
        );
    }

    #[test]
    fn deserializing_invalid_record_fails() {
        let result: Result<Room, _> = serde_json::from_str(
            r#"{"roomNo":"","capacity":3,"hasAC":false,"hasAttachedWashroom":false}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn excluded_differs_from_dont_care() {
        assert!(Requirement::DontCare.matches(true));
        assert!(Requirement::DontCare.matches(false));
        assert!(!Requirement::Excluded.matches(true));
        assert!(Requirement::Excluded.matches(false));
        assert!(Requirement::Required.matches(true));
        assert!(!Requirement::Required.matches(false));
    }

    #[test]
    fn from_flag_never_excludes() {
        assert_eq!(Requirement::from_flag(true), Requirement::Required);
        assert_eq!(Requirement::from_flag(false), Requirement::DontCare);
    }

    #[test]
    fn cycle_visits_every_state() {
        let start = Requirement::default();
        let next = start.cycle();
        assert_eq!(next, Requirement::Required);
        assert_eq!(next.cycle(), Requirement::Excluded);
        assert_eq!(next.cycle().cycle(), start);
        assert_eq!(start.cycle_back().cycle(), start);
    }

    #[test]
    fn stats_count_amenities() {
        let rooms = vec![
            room("1", 2, true, true),
            room("2", 3, true, false),
            room("3", 4, false, false),
        ];
        assert_eq!(
            RoomStats::from_rooms(&rooms),
            RoomStats {
                total: 3,
                with_ac: 2,
                with_washroom: 1,
            }
        );
    }
}
