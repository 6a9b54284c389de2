//! Core library surface for the hostel room allocator.
//!
//! The store owns the persisted room collection, the allocation engine picks
//! the smallest sufficient room for a group, and the `ui` module is the
//! terminal front-end the `hostel-rooms` binary runs.
pub mod allocation;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;

pub use allocation::{Allocation, AllocationEngine};
pub use config::AppConfig;
pub use db::{open_or_disable, DisabledStorage, KeyValueStorage, MemoryStorage, SqliteStorage};
pub use error::{RoomError, StorageError};
pub use models::{AllocationRequest, FilterCriteria, Requirement, Room, RoomStats};
pub use store::RoomStore;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
