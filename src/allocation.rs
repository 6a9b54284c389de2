//! Picks the best room for a group: the smallest room that satisfies every
//! hard constraint, with ties going to the room that was added first.

use tracing::debug;

use crate::db::KeyValueStorage;
use crate::error::RoomError;
use crate::models::{AllocationRequest, FilterCriteria, Requirement, Room};
use crate::store::RoomStore;

/// Reason attached to a successful allocation.
pub const ALLOCATED_REASON: &str = "Allocated successfully.";

/// Outcome of a successful allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub room: Room,
    pub reason: &'static str,
}

/// Read-only view over a [`RoomStore`] that answers allocation requests.
pub struct AllocationEngine<'a, S> {
    store: &'a RoomStore<S>,
}

impl<'a, S: KeyValueStorage> AllocationEngine<'a, S> {
    pub fn new(store: &'a RoomStore<S>) -> Self {
        Self { store }
    }

    /// Allocate a room for `students`. An amenity that is not needed is left
    /// unconstrained rather than excluded.
    ///
    /// # Errors
    ///
    /// [`RoomError::InvalidInput`] for a zero student count and
    /// [`RoomError::NoRoomAvailable`] when nothing qualifies.
    pub fn allocate_room(
        &self,
        students: u32,
        needs_ac: bool,
        needs_washroom: bool,
    ) -> Result<Allocation, RoomError> {
        if students == 0 {
            return Err(RoomError::invalid("Invalid number of students."));
        }

        let criteria = FilterCriteria::default()
            .min_capacity(students)
            .ac(Requirement::from_flag(needs_ac))
            .washroom(Requirement::from_flag(needs_washroom));
        let candidates = self.store.filter(&criteria);
        debug!(
            students,
            needs_ac,
            needs_washroom,
            candidates = candidates.len(),
            "allocation query"
        );

        // min_by_key keeps the first of equal keys, preserving insertion order.
        let room = candidates
            .into_iter()
            .min_by_key(Room::capacity)
            .ok_or(RoomError::NoRoomAvailable)?;

        Ok(Allocation {
            room,
            reason: ALLOCATED_REASON,
        })
    }

    pub fn allocate(&self, request: &AllocationRequest) -> Result<Allocation, RoomError> {
        self.allocate_room(request.students, request.needs_ac, request.needs_washroom)
    }
}
