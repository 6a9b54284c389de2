//! Ratatui front-end. It turns key presses into typed room, search and
//! allocation requests, hands them to the core, and renders what comes back.
//! Input validation for the forms lives here; decisions live in the core.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
