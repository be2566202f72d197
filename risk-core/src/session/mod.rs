//! Session Module - dashboard session state
//!
//! Prediction history lives in a `DashboardSession` handed to handlers
//! explicitly; there is no process-wide log.

pub mod history;
pub mod export;
pub mod store;

pub use history::{SessionEntry, SessionLog};
pub use export::{export_file, to_csv_string, write_csv};
pub use store::{DashboardSession, SessionHandle, SessionStore};
