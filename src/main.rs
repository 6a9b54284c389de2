//! Binary entry point that glues configuration, logging and the SQLite-backed
//! room store to the TUI.
use anyhow::Result;
use hostel_room_allocator::{logging, open_or_disable, run_app, App, AppConfig, RoomStore};

/// Resolve paths, start logging, open the store, and run the Ratatui event
/// loop until the user exits. Neither logging nor the database is required:
/// without them the app runs in memory and the footer says so.
fn main() -> Result<()> {
    let config = AppConfig::resolve()?;
    logging::init(&config);

    let storage = open_or_disable(&config.db_path());
    let store = RoomStore::open_with_key(storage, config.storage_key.clone());

    let mut app = App::new(store);
    run_app(&mut app)
}
