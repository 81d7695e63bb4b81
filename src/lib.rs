//! Read-only board reporting over a booster club's synced spreadsheets and
//! documents.
//!
//! Source files are resolved under one data root, parsed into typed records
//! and cached by path and modification time. [`services::Dashboard`] is the
//! entry point; the binary prints its records as JSON.

pub mod cache;
pub mod error;
pub mod notification;
pub mod parsers;
pub mod processor;
pub mod program;
pub mod queries;
pub mod resolver;
pub mod services;
pub mod state;
pub mod types;
pub mod util;

pub use services::Dashboard;
pub use state::AppState;
