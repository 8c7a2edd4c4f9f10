//! Lunara core
//!
//! Cycle arithmetic, the qadha ledger, the beauty planner and the app-state
//! controller that persists them. The desktop shell (feature `desktop`)
//! exposes the controller to the webview as Tauri commands.

pub mod beauty;
pub mod clock;
#[cfg(feature = "desktop")]
pub mod commands;
pub mod config;
pub mod crypto;
pub mod cycle;
pub mod error;
pub mod history;
pub mod models;
pub mod pregnancy;
pub mod qadha;
pub mod routines;
pub mod state;
pub mod storage;
pub mod subscription;

#[cfg(feature = "desktop")]
pub use commands::run;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::Rejection;
pub use state::AppState;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
