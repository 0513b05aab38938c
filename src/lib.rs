//! Single-session personal finance dashboard: an expense log, invoice name
//! list, per-category spending breakdown and reserve-goal progress, all held
//! in memory for the life of one run.

pub mod cli;
pub mod error;
pub mod fmt;
pub mod logging;
pub mod models;
pub mod reports;
pub mod session;
pub mod settings;
pub mod tui;
