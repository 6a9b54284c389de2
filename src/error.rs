//! Error types shared by the room store, the allocation engine and the storage
//! backends. The `Display` text of [`RoomError`] doubles as the reason string
//! shown to the user, so keep the wording friendly.

use thiserror::Error;

/// Recoverable, user-facing failures returned by core operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    /// Malformed or out-of-range request parameters.
    #[error("{0}")]
    InvalidInput(String),

    /// The room number collides (case-insensitively) with a stored room.
    #[error("Room \"{0}\" already exists.")]
    DuplicateRoom(String),

    /// No stored room satisfies the allocation request.
    #[error("No room available")]
    NoRoomAvailable,
}

impl RoomError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

/// Failures of the durable key-value storage. These never escape a store
/// operation; the store logs them and flags itself as degraded.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    PersistenceUnavailable(#[from] rusqlite::Error),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage disabled: {0}")]
    Disabled(String),

    #[error("saved rooms could not be decoded: {0}")]
    Corrupt(#[from] serde_json::Error),
}
